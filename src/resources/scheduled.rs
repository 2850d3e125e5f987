use serde_json::Value;

use crate::client::TelerivetError;
use crate::domain::Params;
use crate::entity::{Entity, define_entity};

define_entity! {
    /// A message scheduled to be sent at a fixed time, optionally recurring.
    ///
    /// Only custom variables can be changed after scheduling.
    pub struct ScheduledMessage;
    path(record) => Ok(format!(
        "/projects/{}/scheduled/{}",
        record.key("project_id")?,
        record.key("id")?
    ));
    read_only {
        id: String,
        content: String,
        rrule: String,
        timezone_id: String,
        recipients: Value,
        recipients_str: String,
        group_id: String,
        contact_id: String,
        to_number: String,
        route_id: String,
        service_id: String,
        audio_url: String,
        tts_lang: String,
        tts_voice: String,
        message_type: String,
        time_created: i64,
        start_time: i64,
        end_time: i64,
        prev_time: i64,
        next_time: i64,
        occurrences: i64,
        is_template: bool,
        track_clicks: bool,
        media: Value,
        route_params: Params,
        label_ids: Vec<String>,
        project_id: String,
    }
    writable {}
}

impl ScheduledMessage {
    pub async fn save(&mut self) -> Result<(), TelerivetError> {
        let path = self.api_path()?;
        self.record.save(&path).await
    }

    /// Cancel the scheduled message.
    pub async fn delete(&self) -> Result<(), TelerivetError> {
        self.record.delete(&self.api_path()?).await
    }
}

define_entity! {
    /// A message scheduled relative to a date stored in each recipient's custom variables.
    pub struct RelativeScheduledMessage;
    path(record) => Ok(format!(
        "/projects/{}/relative_scheduled/{}",
        record.key("project_id")?,
        record.key("id")?
    ));
    read_only {
        id: String,
        recipients_str: String,
        message_type: String,
        time_created: i64,
        media: Value,
        project_id: String,
    }
    writable {
        content: String,
        time_of_day: String,
        date_variable: String,
        offset_scale: String,
        offset_count: i64,
        rrule: String,
        end_time: i64,
        timezone_id: String,
        group_id: String,
        contact_id: String,
        to_number: String,
        route_id: String,
        service_id: String,
        audio_url: String,
        tts_lang: String,
        tts_voice: String,
        replace_variables: bool,
        track_clicks: bool,
        route_params: Params,
        label_ids: Vec<String>,
    }
}

impl RelativeScheduledMessage {
    pub async fn save(&mut self) -> Result<(), TelerivetError> {
        let path = self.api_path()?;
        self.record.save(&path).await
    }

    pub async fn delete(&self) -> Result<(), TelerivetError> {
        self.record.delete(&self.api_path()?).await
    }
}
