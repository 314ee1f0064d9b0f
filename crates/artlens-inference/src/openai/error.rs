//! OpenAI-specific error handling.

use artlens_core::Error;

/// OpenAI-specific error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAIErrorCode {
    /// Invalid authentication credentials.
    AuthenticationError,
    /// Rate limit exceeded.
    RateLimitExceeded,
    /// Model not found or not available.
    ModelNotFound,
    /// Request too large.
    ContextLengthExceeded,
    /// Server error.
    ServerError,
    /// Unknown error.
    Unknown,
}

impl OpenAIErrorCode {
    /// Determine error code from HTTP status and error type.
    pub fn from_response(status: u16, error_type: &str) -> Self {
        match (status, error_type) {
            (401, _) => Self::AuthenticationError,
            (429, _) => Self::RateLimitExceeded,
            (404, _) | (_, "model_not_found") => Self::ModelNotFound,
            (400, _) if error_type.contains("context_length") => Self::ContextLengthExceeded,
            (500..=599, _) => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

/// Convert an OpenAI error response into an artlens provider failure.
///
/// Every code maps to `ProviderUnavailable`; the stage boundary decides
/// what unavailability means.
pub fn to_artlens_error(code: OpenAIErrorCode, message: &str) -> Error {
    let detail = match code {
        OpenAIErrorCode::AuthenticationError => format!("Authentication failed: {}", message),
        OpenAIErrorCode::RateLimitExceeded => format!("Rate limit exceeded: {}", message),
        OpenAIErrorCode::ModelNotFound => format!("Model not found: {}", message),
        OpenAIErrorCode::ContextLengthExceeded => format!("Context too long: {}", message),
        OpenAIErrorCode::ServerError => format!("Server error: {}", message),
        OpenAIErrorCode::Unknown => message.to_string(),
    };
    Error::ProviderUnavailable(format!("openai: {}", detail))
}
