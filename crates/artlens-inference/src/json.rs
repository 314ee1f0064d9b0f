//! Defensive JSON extraction for model replies.
//!
//! Generation endpoints often wrap the requested JSON object in prose or
//! markdown fences. Only the span from the first `{` to the last `}` is
//! parsed, and the target type is expected to default every field.

use serde::de::DeserializeOwned;

use artlens_core::{Error, Result};

/// Slice from the first `{` to the last `}`, if both exist in that order.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parse the embedded JSON object of a model reply into a partial record.
///
/// Returns `Error::Parse` when no object is present or it does not parse.
pub fn parse_partial_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    let candidate = extract_json_object(text)
        .ok_or_else(|| Error::Parse("No JSON object found in model reply".to_string()))?;

    serde_json::from_str(candidate)
        .map_err(|e| Error::Parse(format!("Model reply is not valid JSON: {}", e)))
}
