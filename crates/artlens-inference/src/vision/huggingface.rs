//! Hugging Face hosted image-classification provider.
//!
//! The inference API takes the raw image as the request body, not JSON.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use artlens_core::defaults;
use artlens_core::{
    push_unique, Error, HuggingFaceConfig, ImageInput, ProviderObservation, Result,
    VisionProvider,
};

const PROVIDER: &str = "huggingface";

/// Image-classification labels from a hosted model.
pub struct HuggingFaceProvider {
    client: Client,
    config: HuggingFaceConfig,
}

#[derive(Debug, Deserialize)]
struct Classification {
    label: String,
    #[serde(default)]
    score: f64,
}

impl HuggingFaceProvider {
    pub fn new(config: HuggingFaceConfig, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: super::http_client(timeout_secs)?,
            config,
        })
    }

    /// ImageNet-style labels list aliases ("tabby, tabby cat"); keep the first.
    fn primary_alias(label: &str) -> &str {
        label.split(',').next().unwrap_or(label).trim()
    }

    fn into_observation(classes: Vec<Classification>) -> ProviderObservation {
        let mut labels = Vec::new();
        for class in classes
            .iter()
            .filter(|c| c.score >= defaults::HUGGINGFACE_MIN_SCORE)
        {
            let alias = Self::primary_alias(&class.label);
            if !alias.is_empty() {
                push_unique(&mut labels, alias);
            }
        }
        ProviderObservation {
            labels,
            ..Default::default()
        }
    }
}

#[async_trait]
impl VisionProvider for HuggingFaceProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn observe(&self, image: &ImageInput) -> Result<ProviderObservation> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            Error::ProviderUnavailable(format!("{}: HUGGINGFACE_API_KEY not set", PROVIDER))
        })?;

        let url = format!(
            "{}/models/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/octet-stream")
            .body(image.bytes().to_vec())
            .send()
            .await
            .map_err(|e| Error::Request(format!("{}: {}", PROVIDER, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ProviderUnavailable(format!(
                "{} returned {}: {}",
                PROVIDER, status, body
            )));
        }

        let classes: Vec<Classification> = response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("{}: {}", PROVIDER, e)))?;

        debug!(
            provider = PROVIDER,
            model = %self.config.model,
            result_count = classes.len(),
            "Image classification finished"
        );
        Ok(Self::into_observation(classes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_alias() {
        assert_eq!(HuggingFaceProvider::primary_alias("tabby, tabby cat"), "tabby");
        assert_eq!(HuggingFaceProvider::primary_alias("suspension bridge"), "suspension bridge");
    }

    #[test]
    fn test_low_scores_dropped() {
        let classes: Vec<Classification> = serde_json::from_str(
            r#"[
                {"label": "suspension bridge", "score": 0.62},
                {"label": "pier, wharf", "score": 0.21},
                {"label": "Pier", "score": 0.10},
                {"label": "lakeside, lakeshore", "score": 0.01}
            ]"#,
        )
        .unwrap();
        let obs = HuggingFaceProvider::into_observation(classes);
        assert_eq!(obs.labels, vec!["suspension bridge", "pier"]);
        assert!(obs.face_count.is_none());
    }
}
