use crate::client::TelerivetError;
use crate::entity::{Entity, define_entity};

define_entity! {
    /// A custom route: rules choosing which phone sends each message.
    pub struct Route;
    path(record) => Ok(format!(
        "/projects/{}/routes/{}",
        record.key("project_id")?,
        record.key("id")?
    ));
    read_only {
        id: String,
        project_id: String,
    }
    writable {
        name: String,
    }
}

impl Route {
    pub async fn save(&mut self) -> Result<(), TelerivetError> {
        let path = self.api_path()?;
        self.record.save(&path).await
    }
}
