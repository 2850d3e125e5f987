use std::error::Error as StdError;

use crate::domain::ValidationError;
use crate::transport::ApiErrorBody;

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`TelerivetClient`](crate::TelerivetClient) and the entities and
/// cursors created from it.
///
/// This error preserves:
/// - network failures (DNS, TLS, connection resets, timeouts),
/// - protocol failures (a body that is not JSON, or an envelope of the wrong shape),
/// - API failures reported through the `error` envelope,
/// - local misuse (unloaded access, read-only writes, reserved cursor parameters).
///
/// Use [`TelerivetError::kind`] to branch on the category.
pub enum TelerivetError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Response body was not valid JSON.
    #[error("unexpected response from API (HTTP {status}): {body}")]
    Protocol { status: u16, body: String },

    /// Non-successful HTTP status code with a JSON body that carried no `error` member.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Response could not be decoded into the expected shape (gzip or envelope).
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// The API rejected a request parameter (`invalid_param`).
    #[error("invalid parameter {param:?}: {message}")]
    InvalidParameter {
        param: Option<String>,
        message: String,
    },

    /// The API reported an unknown id or path (`not_found`).
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Any other error code reported by the API.
    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },

    /// A field was read or written before the entity was loaded.
    #[error("entity data not loaded yet; call load() before accessing `{field}`")]
    NotLoaded { field: String },

    /// A read-only field was written.
    #[error("{field} is not writable")]
    FieldNotWritable { field: String },

    /// A cursor was built with parameters it cannot accept.
    #[error("cannot construct cursor: {reason}")]
    Construction { reason: &'static str },

    /// A stored field value does not have the type the accessor expects.
    #[error("field `{field}` has an unexpected type: {source}")]
    Field {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Coarse category of a [`TelerivetError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Protocol,
    InvalidParameter,
    NotFound,
    Api,
    NotLoaded,
    NotWritable,
    Construction,
    Validation,
}

impl TelerivetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Network,
            Self::Protocol { .. } | Self::HttpStatus { .. } | Self::Parse(_) | Self::Field { .. } => {
                ErrorKind::Protocol
            }
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Api { .. } => ErrorKind::Api,
            Self::NotLoaded { .. } => ErrorKind::NotLoaded,
            Self::FieldNotWritable { .. } => ErrorKind::NotWritable,
            Self::Construction { .. } => ErrorKind::Construction,
            Self::Validation(_) => ErrorKind::Validation,
        }
    }

    /// The offending parameter name of an [`TelerivetError::InvalidParameter`].
    pub fn param(&self) -> Option<&str> {
        match self {
            Self::InvalidParameter { param, .. } => param.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn from_api_error(error: ApiErrorBody) -> Self {
        let message = error.message.unwrap_or_default();
        match error.code.as_deref() {
            Some("invalid_param") => Self::InvalidParameter {
                param: error.param,
                message,
            },
            Some("not_found") => Self::NotFound { message },
            other => Self::Api {
                code: other.unwrap_or("unknown").to_owned(),
                message,
            },
        }
    }
}
