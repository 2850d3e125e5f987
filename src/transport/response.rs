use std::io::Read;

use flate2::read::GzDecoder;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::Params;
use crate::transport::TransportError;

/// Outcome of a successfully parsed response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Ok(Value),
    Error(ApiErrorBody),
}

/// Contents of the `error` member of an error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub param: Option<String>,
}

/// One page of a collection response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub data: Vec<Params>,
    #[serde(default)]
    pub truncated: bool,
    #[serde(default)]
    pub next_marker: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CountEnvelope {
    count: u64,
}

/// Inflate the body when the server declared `Content-Encoding: gzip`.
pub fn decode_content(body: Vec<u8>, content_encoding: Option<&str>) -> Result<Vec<u8>, TransportError> {
    let gzip = content_encoding.is_some_and(|it| it.trim().eq_ignore_ascii_case("gzip"));
    if !gzip {
        return Ok(body);
    }

    let mut inflated = Vec::with_capacity(body.len() * 4);
    GzDecoder::new(body.as_slice())
        .read_to_end(&mut inflated)
        .map_err(TransportError::Gzip)?;
    Ok(inflated)
}

/// Parse a response body and split off error envelopes.
pub fn decode_json_response(body: &[u8]) -> Result<ApiResponse, TransportError> {
    let mut parsed: Value = serde_json::from_slice(body)?;

    let error = match parsed.as_object_mut() {
        Some(object) => object.remove("error").filter(|it| !it.is_null()),
        None => None,
    };

    match error {
        None => Ok(ApiResponse::Ok(parsed)),
        Some(Value::Object(error)) => {
            let body = serde_json::from_value(Value::Object(error))?;
            Ok(ApiResponse::Error(body))
        }
        Some(Value::String(message)) => Ok(ApiResponse::Error(ApiErrorBody {
            message: Some(message),
            ..Default::default()
        })),
        Some(other) => Ok(ApiResponse::Error(ApiErrorBody {
            message: Some(other.to_string()),
            ..Default::default()
        })),
    }
}

pub fn decode_page(value: Value) -> Result<Page, TransportError> {
    Ok(serde_json::from_value(value)?)
}

pub fn decode_count(value: Value) -> Result<u64, TransportError> {
    let envelope: CountEnvelope = serde_json::from_value(value)?;
    Ok(envelope.count)
}
