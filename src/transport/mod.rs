//! Transport layer: wire-format details (query strings, bodies, envelopes).

mod body;
mod query;
mod response;

pub use body::{DEFAULT_COMPRESSION_THRESHOLD, EncodedBody, encode_json_body};
pub use query::encode_query;
pub use response::{
    ApiErrorBody, ApiResponse, Page, decode_content, decode_count, decode_json_response,
    decode_page,
};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("gzip coding failed: {0}")]
    Gzip(#[source] std::io::Error),
}
