//! Shared GET-and-decode plumbing for reference clients.

use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use artlens_core::{Error, Result};

pub(crate) fn client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("artlens/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Send `request` and decode a JSON body.
///
/// `Ok(None)` on 404; other non-2xx statuses are `ProviderUnavailable`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    provider: &str,
    request: RequestBuilder,
) -> Result<Option<T>> {
    let start = Instant::now();
    let response = request
        .send()
        .await
        .map_err(|e| Error::Request(format!("{}: {}", provider, e)))?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        debug!(provider, "Reference lookup returned 404");
        return Ok(None);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::ProviderUnavailable(format!(
            "{} returned {}: {}",
            provider, status, body
        )));
    }

    let value = response
        .json::<T>()
        .await
        .map_err(|e| Error::Parse(format!("{}: {}", provider, e)))?;

    debug!(
        provider,
        duration_ms = start.elapsed().as_millis() as u64,
        "Reference lookup finished"
    );
    Ok(Some(value))
}

/// Trimmed, non-empty string.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_trims_slash() {
        assert_eq!(join_url("http://x/", "/a"), "http://x/a");
        assert_eq!(join_url("http://x", "/a"), "http://x/a");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some(" Monet ".to_string())), Some("Monet".to_string()));
        assert_eq!(non_empty(None), None);
    }
}
