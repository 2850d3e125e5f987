use std::fmt;
use std::sync::LazyLock;

use reqwest::Method;
use serde::de::{DeserializeOwned, Error as _};
use serde_json::Value;

use crate::client::{TelerivetClient, TelerivetError, into_record};
use crate::domain::Params;

/// Reserved member holding custom variables, both in records and in save payloads.
pub const VARS_FIELD: &str = "vars";

static NO_VARS: LazyLock<Params> = LazyLock::new(Params::new);

/// Field data of one remote record, with deferred loading and dirty tracking.
///
/// Invariants:
/// - fields other than the identifying keys given at construction are only
///   readable once the record is loaded;
/// - writes are only accepted once loaded, and every write is remembered as dirty
///   until the next successful save;
/// - custom variables live under `vars` and are diffed against the snapshot
///   taken at the last load or save, not tracked as a dirty field.
#[derive(Clone)]
pub struct Record {
    client: TelerivetClient,
    data: Params,
    loaded: bool,
    dirty: Params,
    initial_vars: Params,
}

impl Record {
    pub fn new(client: TelerivetClient, data: Params, loaded: bool) -> Self {
        let mut record = Self {
            client,
            data: Params::new(),
            loaded,
            dirty: Params::new(),
            initial_vars: Params::new(),
        };
        record.set_data(data);
        record
    }

    pub fn client(&self) -> &TelerivetClient {
        &self.client
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Raw field data as currently held locally.
    pub fn data(&self) -> &Params {
        &self.data
    }

    /// Read a field.
    ///
    /// Fails with [`TelerivetError::NotLoaded`] if the record is not loaded and the
    /// field was not supplied at construction.
    pub fn get(&self, field: &str) -> Result<Option<&Value>, TelerivetError> {
        if !self.loaded && !self.data.contains_key(field) {
            return Err(not_loaded(field));
        }
        Ok(self.data.get(field))
    }

    /// Read a field as `T`; `null` and absent fields read as `None`.
    pub fn field<T: DeserializeOwned>(&self, field: &str) -> Result<Option<T>, TelerivetError> {
        match self.get(field)? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|source| TelerivetError::Field {
                    field: field.to_owned(),
                    source,
                }),
        }
    }

    /// Read an identifying key used to build the record's path.
    pub fn key(&self, field: &'static str) -> Result<String, TelerivetError> {
        match self.get(field)? {
            Some(Value::String(value)) => Ok(value.clone()),
            Some(Value::Number(value)) => Ok(value.to_string()),
            _ => Err(TelerivetError::Field {
                field: field.to_owned(),
                source: serde_json::Error::missing_field(field),
            }),
        }
    }

    /// Write a field and mark it dirty.
    ///
    /// Writing `vars` with an object replaces the custom variables instead.
    pub fn set(&mut self, field: &str, value: Value) -> Result<(), TelerivetError> {
        if !self.loaded {
            return Err(not_loaded(field));
        }
        if field == VARS_FIELD {
            return match value {
                Value::Object(vars) => {
                    self.data.insert(VARS_FIELD.to_owned(), Value::Object(vars));
                    Ok(())
                }
                other => Err(TelerivetError::Field {
                    field: field.to_owned(),
                    source: serde_json::Error::custom(format!(
                        "custom variables must be an object, got {other}"
                    )),
                }),
            };
        }
        self.data.insert(field.to_owned(), value.clone());
        self.dirty.insert(field.to_owned(), value);
        Ok(())
    }

    pub fn vars(&self) -> Result<&Params, TelerivetError> {
        if !self.loaded {
            return Err(not_loaded(VARS_FIELD));
        }
        Ok(self.current_vars())
    }

    pub fn var(&self, name: &str) -> Result<Option<&Value>, TelerivetError> {
        Ok(self.vars()?.get(name))
    }

    /// Set a custom variable. A `null` value is sent as `null` on save, which
    /// deletes the variable server-side.
    pub fn set_var(&mut self, name: &str, value: impl Into<Value>) -> Result<(), TelerivetError> {
        if !self.loaded {
            return Err(not_loaded(VARS_FIELD));
        }
        let value = value.into();
        self.update_vars(|vars| vars.insert(name.to_owned(), value));
        Ok(())
    }

    /// Remove a custom variable locally; the next save deletes it server-side.
    pub fn remove_var(&mut self, name: &str) -> Result<Option<Value>, TelerivetError> {
        if !self.loaded {
            return Err(not_loaded(VARS_FIELD));
        }
        Ok(self.update_vars(|vars| vars.shift_remove(name)))
    }

    /// Edit the `vars` member in place, creating it (or replacing a non-object) first.
    fn update_vars<R>(&mut self, update: impl FnOnce(&mut Params) -> R) -> R {
        let entry = self
            .data
            .entry(VARS_FIELD)
            .or_insert_with(|| Value::Object(Params::new()));
        let mut vars = match entry.take() {
            Value::Object(vars) => vars,
            _ => Params::new(),
        };
        let result = update(&mut vars);
        *entry = Value::Object(vars);
        result
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty() || !self.dirty_vars().is_empty()
    }

    /// Custom variables that differ from the last snapshot. Removed variables map to `null`.
    pub fn dirty_vars(&self) -> Params {
        let vars = self.current_vars();
        let mut dirty = Params::new();
        for (name, value) in vars {
            if self.initial_vars.get(name) != Some(value) {
                dirty.insert(name.clone(), value.clone());
            }
        }
        for name in self.initial_vars.keys() {
            if !vars.contains_key(name) {
                dirty.insert(name.clone(), Value::Null);
            }
        }
        dirty
    }

    /// The payload the next save would send.
    pub fn pending_changes(&self) -> Params {
        let mut changes = self.dirty.clone();
        let dirty_vars = self.dirty_vars();
        if !dirty_vars.is_empty() {
            changes.insert(VARS_FIELD.to_owned(), Value::Object(dirty_vars));
        }
        changes
    }

    /// Fetch the record from `path` unless it is already loaded.
    pub async fn load(&mut self, path: &str) -> Result<(), TelerivetError> {
        if self.loaded {
            return Ok(());
        }
        let value = self.client.request(Method::GET, path, None).await?;
        let data = into_record(value)?;
        self.set_data(data);
        self.loaded = true;
        Ok(())
    }

    /// POST the dirty fields and custom-variable diff to `path`.
    ///
    /// Nothing is sent when nothing changed. On failure the dirty state is kept so
    /// the save can be retried.
    pub async fn save(&mut self, path: &str) -> Result<(), TelerivetError> {
        let changes = self.pending_changes();
        if changes.is_empty() {
            tracing::debug!(path, "nothing to save");
            return Ok(());
        }

        self.client
            .request(Method::POST, path, Some(&changes))
            .await?;
        self.dirty.clear();
        self.initial_vars = self.current_vars().clone();
        Ok(())
    }

    /// DELETE the record at `path`. Local data is left untouched.
    pub async fn delete(&self, path: &str) -> Result<(), TelerivetError> {
        self.client.request(Method::DELETE, path, None).await?;
        Ok(())
    }

    /// Replace all local state with freshly fetched data.
    pub(crate) fn set_data(&mut self, data: Params) {
        self.data = data;
        self.initial_vars = self.current_vars().clone();
        self.dirty.clear();
    }

    /// Custom variables held locally, whether or not the record is loaded.
    fn current_vars(&self) -> &Params {
        match self.data.get(VARS_FIELD) {
            Some(Value::Object(vars)) => vars,
            _ => &NO_VARS,
        }
    }

    /// Patch local data without marking it dirty (server-side state already changed).
    pub(crate) fn data_mut(&mut self) -> &mut Params {
        &mut self.data
    }

    /// Drop custom variables and their snapshot (server-side state already reset).
    pub(crate) fn clear_vars(&mut self) {
        self.data.shift_remove(VARS_FIELD);
        self.initial_vars.clear();
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    pub(crate) fn fmt_with_kind(&self, kind: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{kind}]")?;
        if !self.loaded {
            f.write_str(" (not loaded)")?;
        }
        let json = serde_json::to_string(&self.data).map_err(|_| fmt::Error)?;
        write!(f, " JSON: {json}")
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("loaded", &self.loaded)
            .field("data", &self.data)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

fn not_loaded(field: &str) -> TelerivetError {
    TelerivetError::NotLoaded {
        field: field.to_owned(),
    }
}
