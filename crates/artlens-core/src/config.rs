//! Configuration for artlens.
//!
//! All credentials and endpoints live in one explicit struct that is passed
//! into each component's constructor. A missing credential disables only
//! the provider that needs it.
//!
//! # Example
//!
//! ```rust,no_run
//! use artlens_core::ArtlensConfig;
//!
//! let config = ArtlensConfig::from_env();
//! config.validate().expect("invalid configuration");
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::defaults;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// OpenAI-compatible text-generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::OPENAI_URL.to_string(),
            api_key: None,
            model: defaults::GEN_MODEL.to_string(),
            timeout_secs: defaults::GEN_TIMEOUT_SECS,
        }
    }
}

impl GenerationConfig {
    /// A key is required for the hosted endpoint; a custom base URL
    /// (local OpenAI-compatible server) is usable without one.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() || self.base_url.trim_end_matches('/') != defaults::OPENAI_URL
    }
}

/// Vision-capable chat model used as a labeling provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisionLlmConfig {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Enabled only when a model is named.
    pub model: Option<String>,
}

impl VisionLlmConfig {
    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }
}

/// Google Cloud Vision annotate endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleVisionConfig {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for GoogleVisionConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::GOOGLE_VISION_URL.to_string(),
            api_key: None,
        }
    }
}

/// Hugging Face hosted image-classification endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuggingFaceConfig {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::HUGGINGFACE_URL.to_string(),
            api_key: None,
            model: defaults::HUGGINGFACE_MODEL.to_string(),
        }
    }
}

/// Reference and museum endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuseumConfig {
    pub wikipedia_url: String,
    pub met_museum_url: String,
    pub artic_url: String,
    pub harvard_url: String,
    #[serde(skip_serializing)]
    pub harvard_api_key: Option<String>,
    pub rijksmuseum_url: String,
    #[serde(skip_serializing)]
    pub rijksmuseum_api_key: Option<String>,
}

impl Default for MuseumConfig {
    fn default() -> Self {
        Self {
            wikipedia_url: defaults::WIKIPEDIA_URL.to_string(),
            met_museum_url: defaults::MET_MUSEUM_URL.to_string(),
            artic_url: defaults::ARTIC_URL.to_string(),
            harvard_url: defaults::HARVARD_URL.to_string(),
            harvard_api_key: None,
            rijksmuseum_url: defaults::RIJKSMUSEUM_URL.to_string(),
            rijksmuseum_api_key: None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtlensConfig {
    pub host: String,
    pub port: u16,
    /// Per-call timeout for vision and reference providers.
    pub provider_timeout_secs: u64,
    pub generation: GenerationConfig,
    pub vision_llm: VisionLlmConfig,
    pub google_vision: GoogleVisionConfig,
    pub huggingface: HuggingFaceConfig,
    pub museums: MuseumConfig,
}

impl Default for ArtlensConfig {
    fn default() -> Self {
        Self {
            host: defaults::SERVER_HOST.to_string(),
            port: defaults::SERVER_PORT,
            provider_timeout_secs: defaults::PROVIDER_TIMEOUT_SECS,
            generation: GenerationConfig::default(),
            vision_llm: VisionLlmConfig {
                base_url: defaults::OPENAI_URL.to_string(),
                ..Default::default()
            },
            google_vision: GoogleVisionConfig::default(),
            huggingface: HuggingFaceConfig::default(),
            museums: MuseumConfig::default(),
        }
    }
}

impl ArtlensConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from a key/value map.
    pub fn from_map(vars: &HashMap<String, String>) -> Self {
        Self::from_vars(|key| vars.get(key).cloned())
    }

    /// Load configuration through a variable lookup. Empty values count
    /// as unset.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());
        let parse_or = |key: &str, default: u64| {
            get(key)
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(default)
        };

        let openai_url = get_or("OPENAI_BASE_URL", defaults::OPENAI_URL);
        let openai_key = get("OPENAI_API_KEY");

        Self {
            host: get_or("ARTLENS_HOST", defaults::SERVER_HOST),
            port: get("ARTLENS_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults::SERVER_PORT),
            provider_timeout_secs: parse_or(
                "ARTLENS_PROVIDER_TIMEOUT",
                defaults::PROVIDER_TIMEOUT_SECS,
            ),
            generation: GenerationConfig {
                base_url: openai_url.clone(),
                api_key: openai_key.clone(),
                model: get_or("OPENAI_GEN_MODEL", defaults::GEN_MODEL),
                timeout_secs: parse_or("OPENAI_TIMEOUT", defaults::GEN_TIMEOUT_SECS),
            },
            vision_llm: VisionLlmConfig {
                base_url: openai_url,
                api_key: openai_key,
                model: get("ARTLENS_VISION_MODEL"),
            },
            google_vision: GoogleVisionConfig {
                base_url: get_or("GOOGLE_VISION_BASE_URL", defaults::GOOGLE_VISION_URL),
                api_key: get("GOOGLE_VISION_API_KEY"),
            },
            huggingface: HuggingFaceConfig {
                base_url: get_or("HUGGINGFACE_BASE_URL", defaults::HUGGINGFACE_URL),
                api_key: get("HUGGINGFACE_API_KEY"),
                model: get_or("HUGGINGFACE_MODEL", defaults::HUGGINGFACE_MODEL),
            },
            museums: MuseumConfig {
                wikipedia_url: get_or("WIKIPEDIA_BASE_URL", defaults::WIKIPEDIA_URL),
                met_museum_url: get_or("MET_MUSEUM_BASE_URL", defaults::MET_MUSEUM_URL),
                artic_url: get_or("ARTIC_BASE_URL", defaults::ARTIC_URL),
                harvard_url: get_or("HARVARD_BASE_URL", defaults::HARVARD_URL),
                harvard_api_key: get("HARVARD_API_KEY"),
                rijksmuseum_url: get_or("RIJKSMUSEUM_BASE_URL", defaults::RIJKSMUSEUM_URL),
                rijksmuseum_api_key: get("RIJKSMUSEUM_API_KEY"),
            },
        }
    }

    /// Validate URLs and timeouts.
    pub fn validate(&self) -> ConfigResult<()> {
        let urls = [
            ("OPENAI_BASE_URL", &self.generation.base_url),
            ("GOOGLE_VISION_BASE_URL", &self.google_vision.base_url),
            ("HUGGINGFACE_BASE_URL", &self.huggingface.base_url),
            ("WIKIPEDIA_BASE_URL", &self.museums.wikipedia_url),
            ("MET_MUSEUM_BASE_URL", &self.museums.met_museum_url),
            ("ARTIC_BASE_URL", &self.museums.artic_url),
            ("HARVARD_BASE_URL", &self.museums.harvard_url),
            ("RIJKSMUSEUM_BASE_URL", &self.museums.rijksmuseum_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Validation(format!(
                    "{} must start with http:// or https://, got: {}",
                    name, url
                )));
            }
        }

        if self.provider_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "ARTLENS_PROVIDER_TIMEOUT must be greater than zero".to_string(),
            ));
        }
        if self.generation.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "OPENAI_TIMEOUT must be greater than zero".to_string(),
            ));
        }
        if self.generation.model.is_empty() {
            return Err(ConfigError::Validation(
                "OPENAI_GEN_MODEL cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
