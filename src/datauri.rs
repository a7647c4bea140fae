//! data: URI decoding
//!
//! The contract returns its payloads as `data:<mime>;base64,<payload>`
//! URIs. Only that exact shape is accepted; the embedded mime type decides
//! how the gateway serves the payload.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use thiserror::Error;

/// Errors from parsing a data: URI
#[derive(Debug, Error)]
pub enum DataUriError {
    #[error("data URI does not start with data:")]
    MissingScheme,

    #[error("data URI is not in ;base64, form")]
    NotBase64Form,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// A decoded data: URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime: String,
    pub payload: Vec<u8>,
}

impl DataUri {
    /// Parse a `data:<mime>;base64,<payload>` URI
    pub fn parse(uri: &str) -> Result<Self, DataUriError> {
        let rest = uri.strip_prefix("data:").ok_or(DataUriError::MissingScheme)?;

        let (mime, b64) = rest
            .split_once(";base64,")
            .ok_or(DataUriError::NotBase64Form)?;

        let payload = BASE64.decode(b64)?;

        Ok(Self {
            mime: mime.to_string(),
            payload,
        })
    }
}
