//! Pipeline orchestration: one `analyze` call per uploaded image.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use artlens_core::{
    ArtlensConfig, CollectionSource, EducationalAnalysis, EncyclopediaSource, Error,
    GenerationBackend, ImageInput, InterpretationInsight, Result, TextureAnalyzer,
    VisionProvider,
};
use artlens_inference::{build_vision_providers, OpenAIBackend};
use artlens_reference::{build_collection_sources, WikipediaSource};

use crate::enrichment::Enricher;
use crate::interpretation::Interpreter;
use crate::palette::{default_palette, sample_palette};
use crate::recall::RecallDispatcher;
use crate::summary::{compose_summary, SummarySource};
use crate::synthesis::{
    collect_sources, complete_with, compute_confidence, fallback_analysis, Synthesizer,
};
use crate::texture::GenerativeTextureAnalyzer;
use crate::vision_aggregator::VisionAggregator;

/// Status key reported when no generation backend is present.
pub const GENERATION_PROVIDER: &str = "openai";

/// Builder for an [`Analyzer`] with injected providers.
#[derive(Default)]
pub struct AnalyzerBuilder {
    vision_providers: Vec<Arc<dyn VisionProvider>>,
    generation: Option<Arc<dyn GenerationBackend>>,
    encyclopedia: Option<Arc<dyn EncyclopediaSource>>,
    collections: Vec<Arc<dyn CollectionSource>>,
    texture: Option<Arc<dyn TextureAnalyzer>>,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vision provider. Merge precedence follows call order.
    pub fn with_vision_provider(mut self, provider: Arc<dyn VisionProvider>) -> Self {
        self.vision_providers.push(provider);
        self
    }

    pub fn with_generation_backend(mut self, backend: Arc<dyn GenerationBackend>) -> Self {
        self.generation = Some(backend);
        self
    }

    pub fn with_encyclopedia(mut self, encyclopedia: Arc<dyn EncyclopediaSource>) -> Self {
        self.encyclopedia = Some(encyclopedia);
        self
    }

    /// Add a museum collection. Slot precedence follows call order.
    pub fn with_collection_source(mut self, source: Arc<dyn CollectionSource>) -> Self {
        self.collections.push(source);
        self
    }

    /// Override the texture analyzer. Defaults to one backed by the
    /// generation backend.
    pub fn with_texture_analyzer(mut self, analyzer: Arc<dyn TextureAnalyzer>) -> Self {
        self.texture = Some(analyzer);
        self
    }

    pub fn build(self) -> Analyzer {
        let texture = self.texture.or_else(|| {
            self.generation.clone().map(|backend| {
                Arc::new(GenerativeTextureAnalyzer::new(backend)) as Arc<dyn TextureAnalyzer>
            })
        });

        Analyzer {
            vision: VisionAggregator::new(self.vision_providers),
            interpreter: Interpreter::new(self.generation.clone()),
            recall: RecallDispatcher::new(self.encyclopedia.clone(), self.collections, texture),
            synthesizer: Synthesizer::new(self.generation.clone()),
            enricher: Enricher::new(self.encyclopedia),
            generation: self.generation,
        }
    }
}

/// The educational analysis pipeline.
#[derive(Clone)]
pub struct Analyzer {
    vision: VisionAggregator,
    interpreter: Interpreter,
    recall: RecallDispatcher,
    synthesizer: Synthesizer,
    enricher: Enricher,
    generation: Option<Arc<dyn GenerationBackend>>,
}

impl Analyzer {
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Wire every provider from configuration. Providers without
    /// credentials are still registered so status can report them; they
    /// are skipped at call time.
    pub fn from_config(config: &ArtlensConfig) -> Result<Self> {
        let mut builder = AnalyzerBuilder::new().with_encyclopedia(Arc::new(
            WikipediaSource::new(&config.museums.wikipedia_url, config.provider_timeout_secs)?,
        ));

        for provider in build_vision_providers(config)? {
            builder = builder.with_vision_provider(provider);
        }
        for source in build_collection_sources(&config.museums, config.provider_timeout_secs)? {
            builder = builder.with_collection_source(source);
        }
        if config.generation.is_configured() {
            builder = builder
                .with_generation_backend(Arc::new(OpenAIBackend::new(config.generation.clone())?));
        } else {
            warn!(
                subsystem = "analysis",
                component = "analyzer",
                "No generation backend configured; interpretation and synthesis will use fallbacks"
            );
        }

        Ok(builder.build())
    }

    /// Provider name to configured flag. Says nothing about reachability.
    pub fn check_api_status(&self) -> BTreeMap<String, bool> {
        let mut status = BTreeMap::new();
        for provider in self.vision.providers() {
            status.insert(provider.name().to_string(), provider.is_configured());
        }
        match &self.generation {
            Some(backend) => status.insert(backend.provider_name().to_string(), true),
            None => status.insert(GENERATION_PROVIDER.to_string(), false),
        };
        if let Some(encyclopedia) = self.recall.encyclopedia() {
            status.insert(encyclopedia.name().to_string(), true);
        }
        for source in self.recall.collections() {
            status.insert(source.name().to_string(), source.is_configured());
        }
        status
    }

    /// Run the full pipeline. Only fails with `NoDataAvailable` when no
    /// stage produced anything usable.
    #[instrument(skip(self, image), fields(
        subsystem = "analysis",
        component = "analyzer",
        op = "analyze",
        image_bytes = image.len(),
        mime_type = image.mime_type(),
    ))]
    pub async fn analyze(&self, image: ImageInput) -> Result<EducationalAnalysis> {
        let start = Instant::now();

        let bytes = image.bytes().to_vec();
        let palette_task = tokio::task::spawn_blocking(move || sample_palette(&bytes));
        let (sampled, vision) = tokio::join!(palette_task, self.vision.aggregate(&image));
        let sampled = sampled.unwrap_or_else(|e| {
            warn!(error = %e, "Palette extraction task failed");
            None
        });
        let palette_sampled = sampled.is_some();
        let palette = sampled.unwrap_or_else(|| {
            debug!("No pixels sampled, using default palette");
            default_palette()
        });
        let observation = vision.observation;

        let interpreted = self.interpreter.interpret(&observation).await;
        let interpretation_ok = interpreted.is_ok();
        let insight = interpreted.unwrap_or_else(|e| {
            warn!(error = %e, "Interpretation unavailable, continuing without insight");
            InterpretationInsight::default()
        });

        let recall = self.recall.recall(&observation, &insight, &palette).await;

        let fallback = fallback_analysis(&observation, &insight, &recall);
        let (synthesized, synthesis_ok) = match self
            .synthesizer
            .synthesize(&observation, &insight, &recall)
            .await
        {
            Ok(analysis) => (complete_with(analysis, fallback), true),
            Err(e) => {
                warn!(error = %e, "Synthesis unavailable, using local fallback");
                (fallback, false)
            }
        };

        if observation.is_empty()
            && !interpretation_ok
            && !synthesis_ok
            && !recall.has_network_data()
        {
            warn!(
                duration_ms = start.elapsed().as_millis() as u64,
                "No provider returned usable data"
            );
            return Err(Error::NoDataAvailable);
        }

        let movement_context = self.enricher.enrich(&synthesized.art_movements).await;

        let confidence = compute_confidence(&observation, &insight, &recall);
        let generation_used = (interpretation_ok || synthesis_ok)
            .then(|| self.generation.as_ref().map(|b| b.provider_name()))
            .flatten();
        let mut sources = collect_sources(
            &vision.providers,
            generation_used,
            &recall,
            palette_sampled,
        );
        sources.extend(movement_context.iter().map(|m| m.source.clone()));

        let narrative = compose_summary(
            &SummarySource {
                observation: &observation,
                analysis: &synthesized,
                palette: &palette,
            },
            interpretation_ok.then_some(&insight),
            Some(&recall),
        );

        info!(
            confidence,
            source_count = sources.len(),
            interpretation = interpretation_ok,
            synthesis = synthesis_ok,
            duration_ms = start.elapsed().as_millis() as u64,
            "Analysis complete"
        );

        Ok(EducationalAnalysis {
            id: Uuid::now_v7(),
            generated_at: Utc::now(),
            style_analysis: synthesized.style_analysis,
            technique_analysis: synthesized.technique_analysis,
            theme_analysis: synthesized.theme_analysis,
            medium_analysis: synthesized.medium_analysis,
            color_analysis: synthesized.color_analysis,
            composition_analysis: synthesized.composition_analysis,
            historical_context: synthesized.historical_context,
            cultural_significance: synthesized.cultural_significance,
            reflection_questions: synthesized.reflection_questions,
            learning_objectives: synthesized.learning_objectives,
            discussion_prompts: synthesized.discussion_prompts,
            art_movements: synthesized.art_movements,
            palette,
            color_theory: recall.color_analysis,
            observation,
            reference: recall.wikipedia_data,
            similar_artworks: recall.similar_artworks.unwrap_or_default(),
            learning_resources: recall.learning_resources.unwrap_or_default(),
            movement_context,
            confidence,
            sources,
            narrative: narrative.text(),
            narrative_units: narrative.into_units(),
        })
    }
}
