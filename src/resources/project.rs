use reqwest::Method;
use serde_json::Value;

use crate::client::{TelerivetError, into_record, record_with};
use crate::cursor::ApiCursor;
use crate::domain::Params;
use crate::entity::{Entity, FromRecord, define_entity};
use crate::resources::{
    AirtimeTransaction, Contact, DataTable, Group, Label, Message, MobileMoneyReceipt, Phone,
    RelativeScheduledMessage, Route, ScheduledMessage, Service, Task, single_param,
};

define_entity! {
    /// A project: the container for contacts, messages, phones and services.
    pub struct Project;
    path(record) => Ok(format!("/projects/{}", record.key("id")?));
    read_only {
        id: String,
        timezone_id: String,
        url_slug: String,
        organization_id: String,
    }
    writable {
        name: String,
    }
}

/// `query_<plural>`, `get_<single>_by_id` and `init_<single>_by_id` for each
/// collection nested under a project.
macro_rules! project_collections {
    ($($entity:ident => $plural:ident, $single:ident, $segment:literal;)*) => {
        impl Project {
            $(
                ::paste::paste! {
                    #[doc = concat!("Query ", stringify!($plural), " in this project.")]
                    pub fn [<query_ $plural>](
                        &self,
                        options: Params,
                    ) -> Result<ApiCursor<$entity>, TelerivetError> {
                        self.record
                            .client()
                            .cursor(format!("{}/{}", self.api_path()?, $segment), options)
                    }

                    pub async fn [<get_ $single _by_id>](
                        &self,
                        id: &str,
                    ) -> Result<$entity, TelerivetError> {
                        let path = format!("{}/{}/{id}", self.api_path()?, $segment);
                        self.record
                            .client()
                            .request_entity(Method::GET, &path, None)
                            .await
                    }

                    /// Reference an item by id without making an API request.
                    pub fn [<init_ $single _by_id>](
                        &self,
                        id: &str,
                    ) -> Result<$entity, TelerivetError> {
                        self.init_child(id)
                    }
                }
            )*
        }
    };
}

project_collections! {
    Contact => contacts, contact, "contacts";
    Phone => phones, phone, "phones";
    Message => messages, message, "messages";
    Task => tasks, task, "tasks";
    Group => groups, group, "groups";
    Label => labels, label, "labels";
    DataTable => data_tables, data_table, "tables";
    ScheduledMessage => scheduled_messages, scheduled_message, "scheduled";
    RelativeScheduledMessage => relative_scheduled_messages, relative_scheduled_message, "relative_scheduled";
    Service => services, service, "services";
    Route => routes, route, "routes";
    AirtimeTransaction => airtime_transactions, airtime_transaction, "airtime_transactions";
    MobileMoneyReceipt => receipts, receipt, "receipts";
}

impl Project {
    /// Send one message. `options` carries `content` and `to_number` or `contact_id`,
    /// plus optional `route_id`, `message_type`, `vars`, `label_ids`, ...
    pub async fn send_message(&self, options: Params) -> Result<Message, TelerivetError> {
        self.post_entity("messages/send", options).await
    }

    /// Send a message to many recipients at once (group, contact list or numbers).
    /// Returns the broadcast record.
    pub async fn send_broadcast(&self, options: Params) -> Result<Params, TelerivetError> {
        self.post_entity("send_broadcast", options).await
    }

    /// Send the same content to up to 500 phone numbers.
    pub async fn send_multi(&self, options: Params) -> Result<Value, TelerivetError> {
        self.post("send_multi", options).await
    }

    /// Send up to 100 messages, each with its own content and recipient.
    pub async fn send_messages(&self, options: Params) -> Result<Value, TelerivetError> {
        self.post("messages/send_batch", options).await
    }

    pub async fn schedule_message(
        &self,
        options: Params,
    ) -> Result<ScheduledMessage, TelerivetError> {
        self.post_entity("scheduled", options).await
    }

    /// Add an incoming message to the project as if it had been received by a phone.
    pub async fn receive_message(&self, options: Params) -> Result<Message, TelerivetError> {
        self.post_entity("messages/receive", options).await
    }

    /// Find a contact by `lookup_key` (default `phone_number`), creating it if missing.
    pub async fn get_or_create_contact(&self, options: Params) -> Result<Contact, TelerivetError> {
        self.post_entity("contacts", options).await
    }

    /// Create or update up to 200 contacts in one request.
    pub async fn import_contacts(&self, options: Params) -> Result<Value, TelerivetError> {
        self.post("import_contacts", options).await
    }

    pub async fn create_task(&self, options: Params) -> Result<Task, TelerivetError> {
        self.post_entity("tasks", options).await
    }

    /// Users with access to this project.
    pub async fn get_users(&self) -> Result<Value, TelerivetError> {
        let path = format!("{}/users", self.api_path()?);
        self.record.client().request(Method::GET, &path, None).await
    }

    pub async fn get_or_create_group(&self, name: &str) -> Result<Group, TelerivetError> {
        self.post_entity("groups", single_param("name", name)).await
    }

    pub async fn get_or_create_label(&self, name: &str) -> Result<Label, TelerivetError> {
        self.post_entity("labels", single_param("name", name)).await
    }

    pub async fn get_or_create_data_table(&self, name: &str) -> Result<DataTable, TelerivetError> {
        self.post_entity("tables", single_param("name", name)).await
    }

    /// Broadcasts have no entity type; items are raw records.
    pub fn query_broadcasts(&self, options: Params) -> Result<ApiCursor<Params>, TelerivetError> {
        self.record
            .client()
            .cursor(format!("{}/broadcasts", self.api_path()?), options)
    }

    pub async fn get_broadcast_by_id(&self, id: &str) -> Result<Params, TelerivetError> {
        let path = format!("{}/broadcasts/{id}", self.api_path()?);
        into_record(self.record.client().request(Method::GET, &path, None).await?)
    }

    pub async fn save(&mut self) -> Result<(), TelerivetError> {
        let path = self.api_path()?;
        self.record.save(&path).await
    }

    async fn post(&self, segment: &str, options: Params) -> Result<Value, TelerivetError> {
        let path = format!("{}/{segment}", self.api_path()?);
        self.record
            .client()
            .request(Method::POST, &path, Some(&options))
            .await
    }

    async fn post_entity<E: FromRecord>(
        &self,
        segment: &str,
        options: Params,
    ) -> Result<E, TelerivetError> {
        let path = format!("{}/{segment}", self.api_path()?);
        self.record
            .client()
            .request_entity(Method::POST, &path, Some(&options))
            .await
    }

    fn init_child<E: FromRecord>(&self, id: &str) -> Result<E, TelerivetError> {
        let project_id = self.record.key("id")?;
        Ok(E::from_record(
            self.record.client().clone(),
            record_with([("project_id", project_id.as_str()), ("id", id)]),
            false,
        ))
    }
}
