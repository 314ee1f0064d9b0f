//! OpenAI-compatible generation backend implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use artlens_core::{Error, GenerationBackend, GenerationConfig, Result};

use super::error::{to_artlens_error, OpenAIErrorCode};
use super::types::*;

/// OpenAI-compatible generation backend.
pub struct OpenAIBackend {
    client: Client,
    config: GenerationConfig,
}

impl OpenAIBackend {
    /// Create a new backend with the given configuration.
    pub fn new(config: GenerationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            base_url = %config.base_url,
            model = %config.model,
            "Initializing OpenAI backend"
        );

        Ok(Self { client, config })
    }

    /// Get the current configuration.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Build a POST request with authentication if configured.
    fn build_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let mut req = self.client.post(&url);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        req.header("Content-Type", "application/json")
    }

    /// Send a chat-completion request and return the first choice's text.
    ///
    /// Shared by text generation and the vision-capable chat provider.
    pub async fn chat(&self, request: &ChatCompletionRequest) -> Result<String> {
        let start = Instant::now();

        let response = self
            .build_request("/chat/completions")
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Request(format!("openai: request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body: OpenAIErrorResponse = response.json().await.unwrap_or(OpenAIErrorResponse {
                error: OpenAIError {
                    message: format!("HTTP {}", status),
                    error_type: "unknown".to_string(),
                    code: None,
                },
            });
            let code = OpenAIErrorCode::from_response(status.as_u16(), &body.error.error_type);
            warn!(
                status = status.as_u16(),
                model = %request.model,
                error = %body.error.message,
                "Chat completion rejected"
            );
            return Err(to_artlens_error(code, &body.error.message));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("openai: failed to parse response: {}", e)))?;

        let content = result.first_content();

        debug!(
            model = %request.model,
            response_len = content.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Chat completion finished"
        );
        Ok(content)
    }
}

#[async_trait]
impl GenerationBackend for OpenAIBackend {
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Generating"
        );

        let mut messages = Vec::new();
        if !system.is_empty() {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            temperature: Some(0.4),
            max_tokens: None,
            response_format: None,
            stream: false,
        };

        self.chat(&request).await
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}
