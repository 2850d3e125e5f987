use crate::client::TelerivetError;
use crate::cursor::ApiCursor;
use crate::domain::Params;
use crate::entity::{Entity, define_entity};
use crate::resources::{Contact, ScheduledMessage};

define_entity! {
    /// A group of contacts. Dynamic groups are defined by a filter and cannot be
    /// edited member by member.
    pub struct Group;
    path(record) => Ok(format!(
        "/projects/{}/groups/{}",
        record.key("project_id")?,
        record.key("id")?
    ));
    read_only {
        id: String,
        dynamic: bool,
        num_members: i64,
        time_created: i64,
        project_id: String,
    }
    writable {
        name: String,
    }
}

impl Group {
    pub fn query_contacts(&self, options: Params) -> Result<ApiCursor<Contact>, TelerivetError> {
        self.record
            .client()
            .cursor(format!("{}/contacts", self.api_path()?), options)
    }

    /// Scheduled messages sent to this group.
    pub fn query_scheduled_messages(
        &self,
        options: Params,
    ) -> Result<ApiCursor<ScheduledMessage>, TelerivetError> {
        self.record
            .client()
            .cursor(format!("{}/scheduled", self.api_path()?), options)
    }

    pub async fn save(&mut self) -> Result<(), TelerivetError> {
        let path = self.api_path()?;
        self.record.save(&path).await
    }

    /// Delete the group. Its contacts are kept.
    pub async fn delete(&self) -> Result<(), TelerivetError> {
        self.record.delete(&self.api_path()?).await
    }
}
