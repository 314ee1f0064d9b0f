//! OpenAI-compatible text-generation backend.
//!
//! Works with any endpoint that speaks the chat-completions protocol:
//!
//! - OpenAI cloud API
//! - Azure OpenAI
//! - Ollama (in OpenAI compatibility mode)
//! - vLLM, LocalAI, LM Studio
//!
//! The same wire types carry image parts for the vision-capable chat
//! provider in [`crate::vision`].

mod backend;
mod error;
mod types;

pub use backend::OpenAIBackend;
pub use error::{to_artlens_error, OpenAIErrorCode};
pub use types::*;
