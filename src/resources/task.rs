use reqwest::Method;

use crate::client::TelerivetError;
use crate::domain::Params;
use crate::entity::{Entity, define_entity};

define_entity! {
    /// A long-running bulk action (e.g. updating many contacts) processed in the background.
    pub struct Task;
    path(record) => Ok(format!(
        "/projects/{}/tasks/{}",
        record.key("project_id")?,
        record.key("id")?
    ));
    read_only {
        id: String,
        task_type: String,
        task_params: Params,
        filter_type: String,
        filter_params: Params,
        time_created: i64,
        time_active: i64,
        time_complete: i64,
        total_rows: i64,
        current_row: i64,
        status: String,
        table_id: String,
        user_id: String,
        project_id: String,
    }
    writable {}
}

impl Task {
    /// Cancel a task that has not yet completed. Returns the updated task.
    pub async fn cancel(&self) -> Result<Task, TelerivetError> {
        let path = format!("{}/cancel", self.api_path()?);
        self.record
            .client()
            .request_entity(Method::POST, &path, None)
            .await
    }
}
