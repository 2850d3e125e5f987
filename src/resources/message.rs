use reqwest::Method;
use serde_json::Value;

use crate::client::TelerivetError;
use crate::entity::{Entity, define_entity};
use crate::resources::{Label, list_contains, update_id_list};

define_entity! {
    /// A message sent or received through a project.
    pub struct Message;
    path(record) => Ok(format!(
        "/projects/{}/messages/{}",
        record.key("project_id")?,
        record.key("id")?
    ));
    read_only {
        id: String,
        direction: String,
        status: String,
        message_type: String,
        source: String,
        time_created: i64,
        time_sent: i64,
        from_number: String,
        to_number: String,
        content: String,
        simulated: bool,
        label_ids: Vec<String>,
        external_id: String,
        price: f64,
        price_currency: String,
        mms_parts: Vec<Value>,
        phone_id: String,
        contact_id: String,
        project_id: String,
    }
    writable {
        starred: bool,
        error_message: String,
    }
}

impl Message {
    /// Whether this message has `label`. Requires the message to be loaded.
    pub fn has_label(&self, label: &Label) -> Result<bool, TelerivetError> {
        let label_id = label.record().key("id")?;
        Ok(list_contains(self.label_ids()?, &label_id))
    }

    pub async fn add_label(&mut self, label: &Label) -> Result<(), TelerivetError> {
        let label_id = label.record().key("id")?;
        let path = format!("{}/messages/{}", label.api_path()?, self.record.key("id")?);
        self.record.client().request(Method::PUT, &path, None).await?;
        update_id_list(self.record.data_mut(), "label_ids", &label_id, true);
        Ok(())
    }

    pub async fn remove_label(&mut self, label: &Label) -> Result<(), TelerivetError> {
        let label_id = label.record().key("id")?;
        let path = format!("{}/messages/{}", label.api_path()?, self.record.key("id")?);
        self.record
            .client()
            .request(Method::DELETE, &path, None)
            .await?;
        update_id_list(self.record.data_mut(), "label_ids", &label_id, false);
        Ok(())
    }

    /// MMS parts (type, filename, size, url) of an MMS message.
    pub async fn get_mms_parts(&self) -> Result<Value, TelerivetError> {
        let path = format!("{}/mms_parts", self.api_path()?);
        self.record.client().request(Method::GET, &path, None).await
    }

    pub async fn save(&mut self) -> Result<(), TelerivetError> {
        let path = self.api_path()?;
        self.record.save(&path).await
    }

    pub async fn delete(&self) -> Result<(), TelerivetError> {
        self.record.delete(&self.api_path()?).await
    }
}
