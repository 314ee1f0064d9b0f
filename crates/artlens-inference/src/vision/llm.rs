//! Vision-capable chat model used as a labeling provider.

use async_trait::async_trait;
use tracing::debug;

use artlens_core::{
    Error, GenerationConfig, ImageInput, ProviderObservation, Result, VisionLlmConfig,
    VisionProvider,
};

use crate::json::parse_partial_json;
use crate::openai::{ChatCompletionRequest, ChatMessage, OpenAIBackend, ResponseFormat};

const PROVIDER: &str = "vision-llm";

const LABEL_PROMPT: &str = r#"Look at this artwork and describe what is visible.
Reply with a single JSON object and nothing else:
{
  "labels": ["short subject or genre labels"],
  "objects": ["distinct objects you can see"],
  "colors": ["dominant colors as rgb(r,g,b)"],
  "text": ["any legible text, signatures or inscriptions"],
  "faces": 0
}"#;

/// Labels an image by sending it inline to an OpenAI-compatible chat model.
pub struct VisionLlmProvider {
    backend: OpenAIBackend,
    enabled: bool,
}

impl VisionLlmProvider {
    pub fn new(config: VisionLlmConfig, timeout_secs: u64) -> Result<Self> {
        let enabled = config.is_configured();
        let backend = OpenAIBackend::new(GenerationConfig {
            base_url: config.base_url,
            api_key: config.api_key,
            model: config.model.unwrap_or_default(),
            timeout_secs,
        })?;
        Ok(Self { backend, enabled })
    }

    fn build_request(&self, image: &ImageInput) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.backend.config().model.clone(),
            messages: vec![ChatMessage::user_with_image(
                LABEL_PROMPT,
                image.to_data_uri(),
            )],
            temperature: Some(0.0),
            max_tokens: Some(800),
            response_format: Some(ResponseFormat::json_object()),
            stream: false,
        }
    }
}

#[async_trait]
impl VisionProvider for VisionLlmProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn is_configured(&self) -> bool {
        self.enabled
    }

    async fn observe(&self, image: &ImageInput) -> Result<ProviderObservation> {
        if !self.enabled {
            return Err(Error::ProviderUnavailable(format!(
                "{}: ARTLENS_VISION_MODEL not set",
                PROVIDER
            )));
        }

        let reply = self.backend.chat(&self.build_request(image)).await?;
        let observation: ProviderObservation = parse_partial_json(&reply)?;

        debug!(
            provider = PROVIDER,
            response_len = reply.len(),
            result_count = observation.labels.len(),
            "Vision chat labeling finished"
        );
        Ok(observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(model: Option<&str>) -> VisionLlmConfig {
        VisionLlmConfig {
            base_url: "http://localhost:11434/v1".to_string(),
            api_key: None,
            model: model.map(str::to_string),
        }
    }

    #[test]
    fn test_enabled_only_with_model() {
        assert!(!VisionLlmProvider::new(config(None), 5).unwrap().is_configured());
        assert!(VisionLlmProvider::new(config(Some("llava")), 5)
            .unwrap()
            .is_configured());
    }

    #[test]
    fn test_request_carries_data_uri() {
        let provider = VisionLlmProvider::new(config(Some("llava")), 5).unwrap();
        let image = ImageInput::from_bytes(vec![1, 2, 3], Some("image/png")).unwrap();
        let json = serde_json::to_value(provider.build_request(&image)).unwrap();

        assert_eq!(json["model"], "llava");
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(
            json["messages"][0]["content"][1]["image_url"]["url"],
            "data:image/png;base64,AQID"
        );
    }

    #[tokio::test]
    async fn test_disabled_is_unavailable() {
        let provider = VisionLlmProvider::new(config(None), 5).unwrap();
        let image = ImageInput::from_bytes(vec![1, 2, 3], None).unwrap();
        let err = provider.observe(&image).await.unwrap_err();
        assert!(err.is_provider_failure());
    }
}
