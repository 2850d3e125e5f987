//! Concrete entity types and their collection/sub-resource operations.

mod airtime;
mod contact;
mod data_table;
mod group;
mod label;
mod message;
mod organization;
mod phone;
mod project;
mod receipt;
mod route;
mod scheduled;
mod service;
mod task;

pub use airtime::AirtimeTransaction;
pub use contact::Contact;
pub use data_table::{DataRow, DataTable};
pub use group::Group;
pub use label::Label;
pub use message::Message;
pub use organization::Organization;
pub use phone::Phone;
pub use project::Project;
pub use receipt::MobileMoneyReceipt;
pub use route::Route;
pub use scheduled::{RelativeScheduledMessage, ScheduledMessage};
pub use service::{ContactServiceState, InvokeResult, Service};
pub use task::Task;

use serde_json::Value;

use crate::domain::Params;

/// Whether the id list stored in `field` contains `id`.
fn list_contains(list: Option<Vec<String>>, id: &str) -> bool {
    list.is_some_and(|ids| ids.iter().any(|it| it == id))
}

/// Add or remove `id` in the id list stored in `field` after a membership change
/// succeeded server-side.
fn update_id_list(data: &mut Params, field: &str, id: &str, present: bool) {
    let entry = data
        .entry(field.to_owned())
        .or_insert_with(|| Value::Array(Vec::new()));
    if !entry.is_array() {
        *entry = Value::Array(Vec::new());
    }
    if let Value::Array(ids) = entry {
        ids.retain(|it| it.as_str() != Some(id));
        if present {
            ids.push(Value::String(id.to_owned()));
        }
    }
}

/// Build a single-entry parameter map.
fn single_param(name: &str, value: impl Into<Value>) -> Params {
    let mut params = Params::new();
    params.insert(name.to_owned(), value.into());
    params
}
