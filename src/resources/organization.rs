use reqwest::Method;
use serde_json::Value;

use crate::client::TelerivetError;
use crate::cursor::ApiCursor;
use crate::domain::Params;
use crate::entity::{Entity, define_entity};
use crate::resources::Project;

define_entity! {
    /// An organization owning one or more projects.
    pub struct Organization;
    path(record) => Ok(format!("/organizations/{}", record.key("id")?));
    read_only {
        id: String,
    }
    writable {
        name: String,
        timezone_id: String,
    }
}

impl Organization {
    pub async fn save(&mut self) -> Result<(), TelerivetError> {
        let path = self.api_path()?;
        self.record.save(&path).await
    }

    /// Billing details: plan, balance and renewal dates.
    pub async fn get_billing_details(&self) -> Result<Value, TelerivetError> {
        let path = format!("{}/billing", self.api_path()?);
        self.record.client().request(Method::GET, &path, None).await
    }

    /// Current usage of a metered resource, e.g. `"phones"`, `"projects"` or `"messages"`.
    pub async fn get_usage(&self, usage_type: &str) -> Result<Value, TelerivetError> {
        let path = format!("{}/usage/{usage_type}", self.api_path()?);
        self.record.client().request(Method::GET, &path, None).await
    }

    pub fn query_projects(&self, options: Params) -> Result<ApiCursor<Project>, TelerivetError> {
        self.record
            .client()
            .cursor(format!("{}/projects", self.api_path()?), options)
    }
}
