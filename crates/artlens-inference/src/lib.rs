//! # artlens-inference
//!
//! Text-generation and vision provider backends for artlens.
//!
//! This crate provides:
//! - OpenAI-compatible chat-completion backend implementing `GenerationBackend`
//! - Vision providers: Google Cloud Vision, Hugging Face image
//!   classification, and a vision-capable chat model
//! - Defensive JSON extraction for model replies
//! - Mock backends for tests (feature `mock`)
//!
//! # Example
//!
//! ```rust,no_run
//! use artlens_core::{ArtlensConfig, GenerationBackend};
//! use artlens_inference::OpenAIBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ArtlensConfig::from_env();
//!     let backend = OpenAIBackend::new(config.generation).unwrap();
//!     let reply = backend.generate_with_system("", "Describe chiaroscuro in one line.").await.unwrap();
//!     println!("{}", reply);
//! }
//! ```

pub mod json;
pub mod openai;
pub mod vision;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use json::{extract_json_object, parse_partial_json};
pub use openai::{OpenAIBackend, OpenAIErrorCode};
pub use vision::{
    build_vision_providers, GoogleVisionProvider, HuggingFaceProvider, VisionLlmProvider,
};
