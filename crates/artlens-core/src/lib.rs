//! # artlens-core
//!
//! Core types, traits, and configuration for the artlens analysis pipeline.
//!
//! This crate provides the domain records passed between pipeline stages,
//! the provider traits that concrete HTTP clients implement, and the
//! configuration struct every component is constructed from.

pub mod color;
pub mod config;
pub mod defaults;
pub mod error;
pub mod image_input;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use color::*;
pub use config::{
    ArtlensConfig, ConfigError, GenerationConfig, GoogleVisionConfig, HuggingFaceConfig,
    MuseumConfig, VisionLlmConfig,
};
pub use error::{Error, Result};
pub use image_input::ImageInput;
pub use models::*;
pub use traits::*;
