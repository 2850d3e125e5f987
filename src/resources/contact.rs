use reqwest::Method;

use crate::client::TelerivetError;
use crate::cursor::ApiCursor;
use crate::domain::Params;
use crate::entity::{Entity, define_entity};
use crate::resources::{
    ContactServiceState, DataRow, Group, Message, ScheduledMessage, list_contains, update_id_list,
};

define_entity! {
    /// A contact in a project.
    ///
    /// Custom variables are available through [`Entity::vars`].
    pub struct Contact;
    path(record) => Ok(format!(
        "/projects/{}/contacts/{}",
        record.key("project_id")?,
        record.key("id")?
    ));
    read_only {
        id: String,
        time_created: i64,
        time_updated: i64,
        last_message_time: i64,
        last_incoming_message_time: i64,
        last_outgoing_message_time: i64,
        message_count: i64,
        incoming_message_count: i64,
        outgoing_message_count: i64,
        last_message_id: String,
        group_ids: Vec<String>,
        project_id: String,
    }
    writable {
        name: String,
        phone_number: String,
        send_blocked: bool,
        conversation_status: String,
        default_route_id: String,
    }
}

impl Contact {
    /// Whether this contact belongs to `group`. Requires the contact to be loaded.
    pub fn is_in_group(&self, group: &Group) -> Result<bool, TelerivetError> {
        let group_id = group.record().key("id")?;
        Ok(list_contains(self.group_ids()?, &group_id))
    }

    pub async fn add_to_group(&mut self, group: &Group) -> Result<(), TelerivetError> {
        let group_id = group.record().key("id")?;
        let path = format!("{}/contacts/{}", group.api_path()?, self.record.key("id")?);
        self.record.client().request(Method::PUT, &path, None).await?;
        update_id_list(self.record.data_mut(), "group_ids", &group_id, true);
        Ok(())
    }

    pub async fn remove_from_group(&mut self, group: &Group) -> Result<(), TelerivetError> {
        let group_id = group.record().key("id")?;
        let path = format!("{}/contacts/{}", group.api_path()?, self.record.key("id")?);
        self.record
            .client()
            .request(Method::DELETE, &path, None)
            .await?;
        update_id_list(self.record.data_mut(), "group_ids", &group_id, false);
        Ok(())
    }

    /// Messages sent or received by this contact.
    pub fn query_messages(&self, options: Params) -> Result<ApiCursor<Message>, TelerivetError> {
        self.record
            .client()
            .cursor(format!("{}/messages", self.api_path()?), options)
    }

    /// Groups this contact belongs to.
    pub fn query_groups(&self, options: Params) -> Result<ApiCursor<Group>, TelerivetError> {
        self.record
            .client()
            .cursor(format!("{}/groups", self.api_path()?), options)
    }

    pub fn query_scheduled_messages(
        &self,
        options: Params,
    ) -> Result<ApiCursor<ScheduledMessage>, TelerivetError> {
        self.record
            .client()
            .cursor(format!("{}/scheduled", self.api_path()?), options)
    }

    /// Data rows associated with this contact.
    pub fn query_data_rows(&self, options: Params) -> Result<ApiCursor<DataRow>, TelerivetError> {
        self.record
            .client()
            .cursor(format!("{}/rows", self.api_path()?), options)
    }

    /// Service states of this contact.
    pub fn query_service_states(
        &self,
        options: Params,
    ) -> Result<ApiCursor<ContactServiceState>, TelerivetError> {
        self.record
            .client()
            .cursor(format!("{}/states", self.api_path()?), options)
    }

    /// Save changed fields and custom variables.
    pub async fn save(&mut self) -> Result<(), TelerivetError> {
        let path = self.api_path()?;
        self.record.save(&path).await
    }

    pub async fn delete(&self) -> Result<(), TelerivetError> {
        self.record.delete(&self.api_path()?).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::client::ErrorKind;
    use crate::client::testing::{FakeTransport, fake_client, params};
    use crate::entity::FromRecord;

    fn contact(transport: &FakeTransport, data: serde_json::Value, loaded: bool) -> Contact {
        Contact::from_record(fake_client(transport), params(data), loaded)
    }

    #[tokio::test]
    async fn unloaded_contact_becomes_readable_after_load() {
        let transport = FakeTransport::new();
        transport.push_json(
            200,
            json!({ "id": "CT1", "project_id": "PJ1", "name": "Jane", "group_ids": ["GR1"] }),
        );
        let mut contact = contact(&transport, json!({ "id": "CT1", "project_id": "PJ1" }), false);

        assert_eq!(contact.id().unwrap().as_deref(), Some("CT1"));
        assert_eq!(contact.name().unwrap_err().kind(), ErrorKind::NotLoaded);

        contact.load().await.unwrap();
        assert_eq!(contact.name().unwrap().as_deref(), Some("Jane"));
        assert_eq!(
            transport.last_request().path(),
            "/projects/PJ1/contacts/CT1"
        );
    }

    #[test]
    fn read_only_fields_reject_writes_regardless_of_load_state() {
        let transport = FakeTransport::new();
        let mut unloaded = contact(&transport, json!({ "id": "CT1", "project_id": "PJ1" }), false);
        let mut loaded = contact(&transport, json!({ "id": "CT1", "project_id": "PJ1" }), true);

        for entity in [&mut unloaded, &mut loaded] {
            let err = entity.set("message_count", 5).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotWritable);
            assert_eq!(err.to_string(), "message_count is not writable");
        }
        assert_eq!(
            unloaded.set("name", "x").unwrap_err().kind(),
            ErrorKind::NotLoaded
        );
        loaded.set("name", "x").unwrap();
    }

    #[tokio::test]
    async fn typed_setters_are_saved_with_var_diff() {
        let transport = FakeTransport::new();
        transport.push_json(200, json!({}));
        let mut contact = contact(
            &transport,
            json!({ "id": "CT1", "project_id": "PJ1", "name": "Jane", "vars": { "city": "Nairobi" } }),
            true,
        );

        contact.set_send_blocked(true).unwrap();
        contact.set_var("city", "Mombasa").unwrap();
        contact.save().await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path(), "/projects/PJ1/contacts/CT1");
        assert_eq!(
            request.json_body(),
            json!({ "send_blocked": true, "vars": { "city": "Mombasa" } })
        );
    }

    #[tokio::test]
    async fn saving_an_unmodified_contact_sends_nothing() {
        let transport = FakeTransport::new();
        let mut contact = contact(
            &transport,
            json!({ "id": "CT1", "project_id": "PJ1", "vars": { "a": 1 } }),
            true,
        );

        contact.save().await.unwrap();
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn group_membership_is_tracked_locally() {
        let transport = FakeTransport::new();
        transport.push_json(200, json!({}));
        transport.push_json(200, json!({}));
        let client = fake_client(&transport);
        let mut contact = Contact::from_record(
            client.clone(),
            params(json!({ "id": "CT1", "project_id": "PJ1", "group_ids": [] })),
            true,
        );
        let group = Group::from_record(
            client,
            params(json!({ "id": "GR1", "project_id": "PJ1" })),
            false,
        );

        assert!(!contact.is_in_group(&group).unwrap());
        contact.add_to_group(&group).await.unwrap();
        assert!(contact.is_in_group(&group).unwrap());
        assert_eq!(transport.last_request().method, Method::PUT);
        assert_eq!(
            transport.last_request().path(),
            "/projects/PJ1/groups/GR1/contacts/CT1"
        );

        contact.remove_from_group(&group).await.unwrap();
        assert!(!contact.is_in_group(&group).unwrap());
        assert_eq!(transport.last_request().method, Method::DELETE);
    }

    #[test]
    fn is_in_group_requires_loaded_contact() {
        let transport = FakeTransport::new();
        let client = fake_client(&transport);
        let contact = Contact::from_record(
            client.clone(),
            params(json!({ "id": "CT1", "project_id": "PJ1" })),
            false,
        );
        let group = Group::from_record(client, params(json!({ "id": "GR1", "project_id": "PJ1" })), false);

        assert_eq!(
            contact.is_in_group(&group).unwrap_err().kind(),
            ErrorKind::NotLoaded
        );
    }

    #[tokio::test]
    async fn sub_collections_are_scoped_to_the_contact() {
        let transport = FakeTransport::new();
        transport.push_json(200, json!({ "data": [], "truncated": false }));
        let contact = contact(&transport, json!({ "id": "CT1", "project_id": "PJ1" }), false);

        contact
            .query_messages(params(json!({ "direction": "incoming" })))
            .unwrap()
            .all()
            .await
            .unwrap();
        assert_eq!(
            transport.last_request().path(),
            "/projects/PJ1/contacts/CT1/messages?direction=incoming"
        );
    }

    #[tokio::test]
    async fn delete_issues_delete_request() {
        let transport = FakeTransport::new();
        transport.push_json(200, json!({}));
        let contact = contact(&transport, json!({ "id": "CT1", "project_id": "PJ1" }), false);

        contact.delete().await.unwrap();
        let request = transport.last_request();
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.path(), "/projects/PJ1/contacts/CT1");
    }

    #[test]
    fn display_shows_kind_and_load_state() {
        let transport = FakeTransport::new();
        let contact = contact(&transport, json!({ "id": "CT1", "project_id": "PJ1" }), false);
        assert_eq!(
            contact.to_string(),
            r#"[Contact] (not loaded) JSON: {"id":"CT1","project_id":"PJ1"}"#
        );
    }
}
