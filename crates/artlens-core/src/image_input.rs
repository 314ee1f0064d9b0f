//! Raw image submitted for analysis.

use base64::Engine;

use crate::{Error, Result};

const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Image bytes plus MIME type, as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    bytes: Vec<u8>,
    mime_type: String,
}

impl ImageInput {
    /// Wrap raw bytes. The MIME type is sniffed when not supplied.
    pub fn from_bytes(bytes: Vec<u8>, mime_type: Option<&str>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::InvalidInput("Image data is empty".to_string()));
        }

        let mime_type = match mime_type.map(str::trim).filter(|m| !m.is_empty()) {
            Some(mime) => mime.to_string(),
            None => infer::get(&bytes)
                .map(|kind| kind.mime_type().to_string())
                .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
        };

        Ok(Self { bytes, mime_type })
    }

    /// Decode plain base64 or a `data:<mime>;base64,<payload>` URI.
    pub fn from_base64(encoded: &str, mime_type: Option<&str>) -> Result<Self> {
        let encoded = encoded.trim();
        let (uri_mime, payload) = match encoded.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest.split_once(',').ok_or_else(|| {
                    Error::InvalidInput("Malformed data URI: missing ','".to_string())
                })?;
                let mime = header.strip_suffix(";base64").unwrap_or(header);
                (Some(mime.to_string()), payload)
            }
            None => (None, encoded),
        };

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| Error::InvalidInput(format!("Invalid base64 image data: {}", e)))?;

        let mime = mime_type.map(str::to_string).or(uri_mime);
        Self::from_bytes(bytes, mime.as_deref())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Standard base64 encoding of the bytes.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    /// `data:` URI suitable for chat-completion image parts.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}
