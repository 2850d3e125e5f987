use crate::entity::define_entity;

define_entity! {
    /// A transaction that sent airtime to a phone number.
    pub struct AirtimeTransaction;
    path(record) => Ok(format!(
        "/projects/{}/airtime_transactions/{}",
        record.key("project_id")?,
        record.key("id")?
    ));
    read_only {
        id: String,
        to_number: String,
        operator_name: String,
        country: String,
        status: String,
        status_text: String,
        value: f64,
        value_currency: String,
        price: f64,
        price_currency: String,
        contact_id: String,
        service_id: String,
        project_id: String,
    }
    writable {}
}
