//! Vision providers that label an artwork image.
//!
//! Each provider turns one image into a [`ProviderObservation`]. Merging
//! and failure isolation happen in the aggregator, not here: a provider
//! simply returns an error when it cannot answer.
//!
//! [`ProviderObservation`]: artlens_core::ProviderObservation

mod google;
mod huggingface;
mod llm;

use std::sync::Arc;
use std::time::Duration;

use artlens_core::{ArtlensConfig, Error, Result, VisionProvider};

pub use google::GoogleVisionProvider;
pub use huggingface::HuggingFaceProvider;
pub use llm::VisionLlmProvider;

/// Build every vision provider in fixed merge order.
///
/// Providers are returned whether or not their credential is present so
/// status reporting can list them; the aggregator skips unconfigured ones.
pub fn build_vision_providers(config: &ArtlensConfig) -> Result<Vec<Arc<dyn VisionProvider>>> {
    let timeout = config.provider_timeout_secs;
    Ok(vec![
        Arc::new(GoogleVisionProvider::new(
            config.google_vision.clone(),
            timeout,
        )?),
        Arc::new(HuggingFaceProvider::new(config.huggingface.clone(), timeout)?),
        Arc::new(VisionLlmProvider::new(
            config.vision_llm.clone(),
            config.generation.timeout_secs,
        )?),
    ])
}

/// HTTP client with a per-call timeout.
pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))
}
