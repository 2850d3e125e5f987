use crate::client::TelerivetError;
use crate::cursor::ApiCursor;
use crate::domain::Params;
use crate::entity::{Entity, define_entity};
use crate::resources::Message;

define_entity! {
    /// A basic route (Android phone or gateway) connected to a project.
    pub struct Phone;
    path(record) => Ok(format!(
        "/projects/{}/phones/{}",
        record.key("project_id")?,
        record.key("id")?
    ));
    read_only {
        id: String,
        phone_type: String,
        country: String,
        time_created: i64,
        last_active_time: i64,
        project_id: String,
        battery: i64,
        charging: bool,
        internet_type: String,
        app_version: String,
        android_sdk: i64,
        mccmnc: String,
        manufacturer: String,
        model: String,
        send_limit: i64,
    }
    writable {
        name: String,
        phone_number: String,
        send_paused: bool,
    }
}

impl Phone {
    /// Messages sent or received by this phone.
    pub fn query_messages(&self, options: Params) -> Result<ApiCursor<Message>, TelerivetError> {
        self.record
            .client()
            .cursor(format!("{}/messages", self.api_path()?), options)
    }

    pub async fn save(&mut self) -> Result<(), TelerivetError> {
        let path = self.api_path()?;
        self.record.save(&path).await
    }
}
