use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::domain::Params;
use crate::transport::TransportError;

/// JSON request bodies at least this large are gzip-compressed.
pub const DEFAULT_COMPRESSION_THRESHOLD: usize = 400;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub bytes: Vec<u8>,
    pub gzip: bool,
}

/// Serialize POST/PUT parameters as JSON, compressing large payloads.
pub fn encode_json_body(params: &Params, threshold: usize) -> Result<EncodedBody, TransportError> {
    let json = serde_json::to_vec(params)?;
    if json.len() < threshold {
        return Ok(EncodedBody {
            bytes: json,
            gzip: false,
        });
    }

    let mut encoder = GzEncoder::new(Vec::with_capacity(json.len() / 2), Compression::default());
    encoder.write_all(&json).map_err(TransportError::Gzip)?;
    let bytes = encoder.finish().map_err(TransportError::Gzip)?;
    Ok(EncodedBody { bytes, gzip: true })
}
