//! Core traits for artlens provider abstractions.
//!
//! These traits define the seams between the orchestration pipeline and
//! the concrete HTTP clients, so tests can substitute fakes for any
//! provider.

use async_trait::async_trait;

use crate::{
    ArtworkRecord, ImageInput, InterpretationInsight, ProviderObservation, ReferenceSummary,
    Result, TextureAnalysis, VisionObservation,
};

/// Backend for text generation.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text with a system prompt. An empty system prompt is omitted.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name.
    fn model_name(&self) -> &str;

    /// Provider name reported in analysis sources.
    fn provider_name(&self) -> &str;
}

/// A labeling/vision provider.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider name reported in analysis sources.
    fn name(&self) -> &str;

    /// Whether the credential this provider needs is present.
    fn is_configured(&self) -> bool;

    /// Label the image.
    async fn observe(&self, image: &ImageInput) -> Result<ProviderObservation>;
}

/// Encyclopedia-style summary lookup.
#[async_trait]
pub trait EncyclopediaSource: Send + Sync {
    fn name(&self) -> &str;

    /// Summary for `term`; `Ok(None)` when the term has no article.
    async fn summary(&self, term: &str) -> Result<Option<ReferenceSummary>>;
}

/// Museum collection search.
#[async_trait]
pub trait CollectionSource: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this source needs an API key.
    fn requires_credential(&self) -> bool;

    /// Whether the source can be queried with the current configuration.
    fn is_configured(&self) -> bool;

    /// Search the collection for `term`, returning at most `limit` records.
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<ArtworkRecord>>;
}

/// Texture and brushwork analysis, gated on technique keywords.
#[async_trait]
pub trait TextureAnalyzer: Send + Sync {
    fn name(&self) -> &str;

    async fn analyze_texture(
        &self,
        observation: &VisionObservation,
        insight: &InterpretationInsight,
    ) -> Result<TextureAnalysis>;
}
