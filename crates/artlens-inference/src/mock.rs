//! Mock generation and vision backends for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use artlens_core::GenerationBackend;
//! use artlens_inference::mock::MockGenerationBackend;
//!
//! #[tokio::test]
//! async fn test_with_mock_backend() {
//!     let backend = MockGenerationBackend::new()
//!         .with_response_mapping("texture", r#"{"summary": "Thick impasto."}"#)
//!         .with_fixed_response("{}");
//!
//!     let reply = backend.generate_with_system("", "Describe the texture").await.unwrap();
//!     assert!(reply.contains("impasto"));
//! }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use artlens_core::{
    Error, GenerationBackend, ImageInput, ProviderObservation, Result, VisionProvider,
};

/// Prompts seen by one generation call.
#[derive(Debug, Clone)]
struct MockCall {
    system: String,
    input: String,
}

#[derive(Debug, Clone)]
struct MockConfig {
    /// (substring, reply) pairs, checked in insertion order against
    /// the system prompt and then the user prompt.
    mappings: Vec<(String, String)>,
    default_response: String,
    fail: bool,
    model: String,
    provider: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            mappings: Vec::new(),
            default_response: "Mock response".to_string(),
            fail: false,
            model: "mock-model".to_string(),
            provider: "openai".to_string(),
        }
    }
}

/// Mock text-generation backend.
#[derive(Clone)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerationBackend {
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Reply used when no mapping matches.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Reply with `output` whenever the system or user prompt contains `needle`.
    pub fn with_response_mapping(
        mut self,
        needle: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .mappings
            .push((needle.into(), output.into()));
        self
    }

    /// Make every call fail with `ProviderUnavailable`.
    pub fn failing(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail = true;
        self
    }

    pub fn with_provider_name(mut self, name: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).provider = name.into();
        self
    }

    pub fn generate_call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    /// Number of calls whose system or user prompt contains `needle`.
    pub fn calls_containing(&self, needle: &str) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.system.contains(needle) || c.input.contains(needle))
            .count()
    }

    fn log_call(&self, system: &str, input: &str) {
        self.call_log.lock().unwrap().push(MockCall {
            system: system.to_string(),
            input: input.to_string(),
        });
    }

    fn reply_for(&self, system: &str, prompt: &str) -> String {
        self.config
            .mappings
            .iter()
            .find(|(needle, _)| system.contains(needle.as_str()))
            .or_else(|| {
                self.config
                    .mappings
                    .iter()
                    .find(|(needle, _)| prompt.contains(needle.as_str()))
            })
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.config.default_response.clone())
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.log_call(system, prompt);
        if self.config.fail {
            return Err(Error::ProviderUnavailable(
                "mock generation failure".to_string(),
            ));
        }
        Ok(self.reply_for(system, prompt))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn provider_name(&self) -> &str {
        &self.config.provider
    }
}

/// Mock vision provider returning a fixed observation or failing.
#[derive(Clone)]
pub struct MockVisionProvider {
    name: String,
    configured: bool,
    outcome: std::result::Result<ProviderObservation, String>,
    calls: Arc<Mutex<usize>>,
}

impl MockVisionProvider {
    pub fn new(name: impl Into<String>, observation: ProviderObservation) -> Self {
        Self {
            name: name.into(),
            configured: true,
            outcome: Ok(observation),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Provider whose every call fails.
    pub fn failing(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            outcome: Err(format!("{}: mock failure", name)),
            ..Self::new(name, ProviderObservation::default())
        }
    }

    /// Mark the provider as missing its credential.
    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn observe(&self, _image: &ImageInput) -> Result<ProviderObservation> {
        *self.calls.lock().unwrap() += 1;
        self.outcome
            .clone()
            .map_err(Error::ProviderUnavailable)
    }
}
