use reqwest::Method;
use serde_json::Value;

use crate::client::{TelerivetError, into_record};
use crate::cursor::ApiCursor;
use crate::domain::Params;
use crate::entity::{Entity, FromRecord, define_entity};
use crate::resources::{Contact, Message};

define_entity! {
    /// An automated service (poll, auto-reply, webhook, ...) in a project.
    pub struct Service;
    path(record) => Ok(format!(
        "/projects/{}/services/{}",
        record.key("project_id")?,
        record.key("id")?
    ));
    read_only {
        id: String,
        contexts: Params,
        project_id: String,
        label_id: String,
        response_table_id: String,
        sample_group_id: String,
        respondent_group_id: String,
        questions: Value,
    }
    writable {
        name: String,
        active: bool,
        priority: i64,
    }
}

/// Outcome of [`Service::invoke`].
#[derive(Debug, Clone)]
pub struct InvokeResult {
    /// Messages sent while the service ran, as loaded entities.
    pub sent_messages: Vec<Message>,
    /// Remaining members of the response (`return_value`, ...).
    pub data: Params,
}

impl Service {
    /// Run the service manually.
    ///
    /// `options` carries `context` (e.g. `"message"` or `"contact"`) and the id of the
    /// item the service runs on.
    pub async fn invoke(&self, options: Params) -> Result<InvokeResult, TelerivetError> {
        let client = self.record.client();
        let path = format!("{}/invoke", self.api_path()?);
        let mut data = into_record(client.request(Method::POST, &path, Some(&options)).await?)?;

        let sent_messages = match data.shift_remove("sent_messages") {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| into_record(item).map(|it| Message::from_record(client.clone(), it, true)))
                .collect::<Result<Vec<_>, _>>()?,
            _ => Vec::new(),
        };
        Ok(InvokeResult {
            sent_messages,
            data,
        })
    }

    /// Current state of `contact` in this service. A contact without state yields
    /// a state whose `id` is `None`.
    pub async fn get_contact_state(
        &self,
        contact: &Contact,
    ) -> Result<ContactServiceState, TelerivetError> {
        let path = self.state_path(contact)?;
        self.record
            .client()
            .request_entity(Method::GET, &path, None)
            .await
    }

    /// Set the state id and custom variables of `contact` (`id`, `vars`).
    pub async fn set_contact_state(
        &self,
        contact: &Contact,
        options: Params,
    ) -> Result<ContactServiceState, TelerivetError> {
        let path = self.state_path(contact)?;
        self.record
            .client()
            .request_entity(Method::POST, &path, Some(&options))
            .await
    }

    pub async fn reset_contact_state(
        &self,
        contact: &Contact,
    ) -> Result<ContactServiceState, TelerivetError> {
        let path = self.state_path(contact)?;
        self.record
            .client()
            .request_entity(Method::DELETE, &path, None)
            .await
    }

    pub fn query_contact_states(
        &self,
        options: Params,
    ) -> Result<ApiCursor<ContactServiceState>, TelerivetError> {
        self.record
            .client()
            .cursor(format!("{}/states", self.api_path()?), options)
    }

    pub async fn save(&mut self) -> Result<(), TelerivetError> {
        let path = self.api_path()?;
        self.record.save(&path).await
    }

    fn state_path(&self, contact: &Contact) -> Result<String, TelerivetError> {
        Ok(format!(
            "{}/states/{}",
            self.api_path()?,
            contact.record().key("id")?
        ))
    }
}

define_entity! {
    /// The state of one contact within a [`Service`], plus its custom variables.
    ///
    /// Writing `null` to `id` (`state.set("id", Value::Null)`) and saving resets the state.
    pub struct ContactServiceState;
    path(record) => Ok(format!(
        "/projects/{}/services/{}/states/{}",
        record.key("project_id")?,
        record.key("service_id")?,
        record.key("contact_id")?
    ));
    read_only {
        contact_id: String,
        service_id: String,
        time_created: i64,
        time_updated: i64,
        project_id: String,
    }
    writable {
        id: String,
    }
}

impl ContactServiceState {
    /// Save the state id and custom variables. A pending `null` id resets the state instead.
    pub async fn save(&mut self) -> Result<(), TelerivetError> {
        let resets = matches!(self.record.pending_changes().get("id"), Some(Value::Null));
        if !resets {
            let path = self.api_path()?;
            return self.record.save(&path).await;
        }

        self.reset().await?;
        self.record.clear_vars();
        self.record.clear_dirty();
        Ok(())
    }

    pub async fn reset(&self) -> Result<(), TelerivetError> {
        self.record.delete(&self.api_path()?).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::client::testing::{FakeTransport, fake_client, params};

    fn service(transport: &FakeTransport) -> Service {
        Service::from_record(
            fake_client(transport),
            params(json!({ "id": "SV1", "project_id": "PJ1" })),
            false,
        )
    }

    fn contact(transport: &FakeTransport) -> Contact {
        Contact::from_record(
            fake_client(transport),
            params(json!({ "id": "CT1", "project_id": "PJ1" })),
            false,
        )
    }

    #[tokio::test]
    async fn invoke_wraps_sent_messages() {
        let transport = FakeTransport::new();
        transport.push_json(
            200,
            json!({
                "return_value": 42,
                "sent_messages": [
                    { "id": "SM1", "project_id": "PJ1", "content": "thanks" },
                    { "id": "SM2", "project_id": "PJ1", "content": "bye" }
                ]
            }),
        );

        let result = service(&transport)
            .invoke(params(json!({ "context": "contact", "contact_id": "CT1" })))
            .await
            .unwrap();

        assert_eq!(transport.last_request().path(), "/projects/PJ1/services/SV1/invoke");
        assert_eq!(result.sent_messages.len(), 2);
        assert!(result.sent_messages[0].is_loaded());
        assert_eq!(result.sent_messages[1].content().unwrap().as_deref(), Some("bye"));
        assert_eq!(result.data.get("return_value"), Some(&json!(42)));
        assert!(!result.data.contains_key("sent_messages"));
    }

    #[tokio::test]
    async fn contact_state_round_trip_uses_contact_id_in_path() {
        let transport = FakeTransport::new();
        transport.push_json(
            200,
            json!({ "id": null, "contact_id": "CT1", "service_id": "SV1", "project_id": "PJ1" }),
        );
        transport.push_json(
            200,
            json!({ "id": "q2", "contact_id": "CT1", "service_id": "SV1", "project_id": "PJ1" }),
        );

        let service = service(&transport);
        let contact = contact(&transport);
        let state = service.get_contact_state(&contact).await.unwrap();
        assert_eq!(state.id().unwrap(), None);

        let state = service
            .set_contact_state(&contact, params(json!({ "id": "q2" })))
            .await
            .unwrap();
        assert_eq!(state.id().unwrap().as_deref(), Some("q2"));

        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path(), "/projects/PJ1/services/SV1/states/CT1");
        assert_eq!(
            state.api_path().unwrap(),
            "/projects/PJ1/services/SV1/states/CT1"
        );
    }

    #[tokio::test]
    async fn saving_null_id_resets_state() {
        let transport = FakeTransport::new();
        transport.push_json(200, json!({}));
        let mut state = ContactServiceState::from_record(
            fake_client(&transport),
            params(json!({
                "id": "q2",
                "contact_id": "CT1",
                "service_id": "SV1",
                "project_id": "PJ1",
                "vars": { "answer": "yes" }
            })),
            true,
        );

        state.set("id", Value::Null).unwrap();
        state.save().await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.path(), "/projects/PJ1/services/SV1/states/CT1");
        assert!(state.vars().unwrap().is_empty());
        assert!(!state.record().is_dirty());
    }

    #[tokio::test]
    async fn saving_new_id_posts_diff() {
        let transport = FakeTransport::new();
        transport.push_json(200, json!({}));
        let mut state = ContactServiceState::from_record(
            fake_client(&transport),
            params(json!({ "id": "q1", "contact_id": "CT1", "service_id": "SV1", "project_id": "PJ1" })),
            true,
        );

        state.set_id("q2".to_owned()).unwrap();
        state.set_var("answer", "no").unwrap();
        state.save().await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.json_body(), json!({ "id": "q2", "vars": { "answer": "no" } }));
    }
}
