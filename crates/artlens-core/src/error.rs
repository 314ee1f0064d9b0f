//! Error types for artlens.

use thiserror::Error;

/// Result type alias using artlens's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for artlens operations.
///
/// Provider-level variants (`ProviderUnavailable`, `Request`, `Parse`) are
/// always caught at the call site and degrade that provider's contribution.
/// Only `NoDataAvailable` is meant to reach the caller of `analyze`.
#[derive(Error, Debug)]
pub enum Error {
    /// Credential missing or provider returned a non-2xx response
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Provider or model reply could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Interpretation stage could not produce insights
    #[error("Interpretation unavailable: {0}")]
    InterpretationUnavailable(String),

    /// Synthesis stage could not produce an analysis
    #[error("Synthesis unavailable: {0}")]
    SynthesisUnavailable(String),

    /// Every provider failed for this request
    #[error("No data available: all APIs failed, check configuration/connectivity")]
    NoDataAvailable,

    /// Image bytes could not be decoded
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error only degrades a single provider's contribution.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            Error::ProviderUnavailable(_) | Error::Request(_) | Error::Parse(_)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_provider_unavailable() {
        let err = Error::ProviderUnavailable("google-vision: missing API key".to_string());
        assert_eq!(
            err.to_string(),
            "Provider unavailable: google-vision: missing API key"
        );
    }

    #[test]
    fn test_error_display_interpretation_unavailable() {
        let err = Error::InterpretationUnavailable("no JSON object in reply".to_string());
        assert_eq!(
            err.to_string(),
            "Interpretation unavailable: no JSON object in reply"
        );
    }

    #[test]
    fn test_error_display_synthesis_unavailable() {
        let err = Error::SynthesisUnavailable("backend not configured".to_string());
        assert_eq!(
            err.to_string(),
            "Synthesis unavailable: backend not configured"
        );
    }

    #[test]
    fn test_error_display_no_data_available() {
        let err = Error::NoDataAvailable;
        assert!(err.to_string().contains("all APIs failed"));
        assert!(err.to_string().contains("configuration/connectivity"));
    }

    #[test]
    fn test_error_display_image_decode() {
        let err = Error::ImageDecode("unsupported format".to_string());
        assert_eq!(err.to_string(), "Image decode error: unsupported format");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("empty image".to_string());
        assert_eq!(err.to_string(), "Invalid input: empty image");
    }

    #[test]
    fn test_is_provider_failure() {
        assert!(Error::ProviderUnavailable("x".into()).is_provider_failure());
        assert!(Error::Request("x".into()).is_provider_failure());
        assert!(Error::Parse("x".into()).is_provider_failure());
        assert!(!Error::NoDataAvailable.is_provider_failure());
        assert!(!Error::InvalidInput("x".into()).is_provider_failure());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
