//! Entity layer: addressable remote records with lazy loading and minimal-diff saves.
//!
//! Every concrete entity wraps a [`Record`] and implements [`Entity`]; the typed
//! accessors are generated from a field list by [`define_entity!`](crate::entity::define_entity).

mod macros;
mod record;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::{TelerivetClient, TelerivetError};
use crate::domain::Params;

pub(crate) use macros::define_entity;
pub use record::{Record, VARS_FIELD};

/// Construct an item from one raw record.
///
/// Cursors use this as their item factory, so they stay independent of the
/// concrete entity types.
pub trait FromRecord: Sized {
    fn from_record(client: TelerivetClient, data: Params, loaded: bool) -> Self;
}

/// Raw records, for collections without a dedicated entity type.
impl FromRecord for Params {
    fn from_record(_client: TelerivetClient, data: Params, _loaded: bool) -> Self {
        data
    }
}

/// Shared behavior of every entity kind.
pub trait Entity: FromRecord {
    /// Type name used in diagnostics.
    const KIND: &'static str;

    /// Fields that can never be written through [`Entity::set`].
    const READ_ONLY: &'static [&'static str];

    fn record(&self) -> &Record;

    fn record_mut(&mut self) -> &mut Record;

    /// Canonical REST path of this entity, relative to the API url.
    fn api_path(&self) -> Result<String, TelerivetError>;

    fn is_loaded(&self) -> bool {
        self.record().is_loaded()
    }

    fn get(&self, field: &str) -> Result<Option<&Value>, TelerivetError> {
        self.record().get(field)
    }

    fn field<T: DeserializeOwned>(&self, field: &str) -> Result<Option<T>, TelerivetError> {
        self.record().field(field)
    }

    /// Write a field. Read-only fields are rejected whether or not the entity is loaded.
    fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<(), TelerivetError> {
        if Self::READ_ONLY.contains(&field) {
            return Err(TelerivetError::FieldNotWritable {
                field: field.to_owned(),
            });
        }
        self.record_mut().set(field, value.into())
    }

    fn vars(&self) -> Result<&Params, TelerivetError> {
        self.record().vars()
    }

    fn var(&self, name: &str) -> Result<Option<&Value>, TelerivetError> {
        self.record().var(name)
    }

    fn set_var(&mut self, name: &str, value: impl Into<Value>) -> Result<(), TelerivetError> {
        self.record_mut().set_var(name, value)
    }

    fn remove_var(&mut self, name: &str) -> Result<Option<Value>, TelerivetError> {
        self.record_mut().remove_var(name)
    }
}
