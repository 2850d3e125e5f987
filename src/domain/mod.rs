//! Domain layer: validated values shared by the other layers (no I/O).

mod validation;
mod value;

pub use validation::ValidationError;
pub use value::{ApiKey, ApiUrl};

/// Request parameters / filter options, keyed by API parameter name.
///
/// Values may nest arbitrarily; GET and DELETE requests flatten them into
/// bracket notation, POST and PUT requests send them as a JSON body.
pub type Params = serde_json::Map<String, serde_json::Value>;
