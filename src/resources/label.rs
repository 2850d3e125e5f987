use crate::client::TelerivetError;
use crate::cursor::ApiCursor;
use crate::domain::Params;
use crate::entity::{Entity, define_entity};
use crate::resources::Message;

define_entity! {
    /// A label used to organize messages.
    pub struct Label;
    path(record) => Ok(format!(
        "/projects/{}/labels/{}",
        record.key("project_id")?,
        record.key("id")?
    ));
    read_only {
        id: String,
        time_created: i64,
        project_id: String,
    }
    writable {
        name: String,
    }
}

impl Label {
    /// Messages that have this label.
    pub fn query_messages(&self, options: Params) -> Result<ApiCursor<Message>, TelerivetError> {
        self.record
            .client()
            .cursor(format!("{}/messages", self.api_path()?), options)
    }

    pub async fn save(&mut self) -> Result<(), TelerivetError> {
        let path = self.api_path()?;
        self.record.save(&path).await
    }

    pub async fn delete(&self) -> Result<(), TelerivetError> {
        self.record.delete(&self.api_path()?).await
    }
}
