use crate::client::TelerivetError;
use crate::entity::{Entity, define_entity};

define_entity! {
    /// A receipt for a mobile money transaction, parsed from a provider SMS.
    pub struct MobileMoneyReceipt;
    path(record) => Ok(format!(
        "/projects/{}/receipts/{}",
        record.key("project_id")?,
        record.key("id")?
    ));
    read_only {
        id: String,
        tx_id: String,
        tx_type: String,
        currency: String,
        amount: f64,
        balance: f64,
        fee: f64,
        name: String,
        phone_number: String,
        time_created: i64,
        other_tx_id: String,
        content: String,
        provider_id: String,
        phone_id: String,
        message_id: String,
        project_id: String,
    }
    writable {
        contact_id: String,
    }
}

impl MobileMoneyReceipt {
    pub async fn save(&mut self) -> Result<(), TelerivetError> {
        let path = self.api_path()?;
        self.record.save(&path).await
    }

    pub async fn delete(&self) -> Result<(), TelerivetError> {
        self.record.delete(&self.api_path()?).await
    }
}
