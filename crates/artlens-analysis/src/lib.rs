//! # artlens-analysis
//!
//! The educational analysis pipeline for a single artwork image:
//!
//! - Palette extraction and color theory (local, no network)
//! - Vision aggregation across labeling providers
//! - Interpretation (first generation call)
//! - Recall of encyclopedia, museum and texture context
//! - Synthesis (second generation call) with local fallbacks
//! - Movement enrichment and the 40-unit narrative
//!
//! ## Example
//!
//! ```ignore
//! use artlens_analysis::Analyzer;
//! use artlens_core::{ArtlensConfig, ImageInput};
//!
//! let analyzer = Analyzer::from_config(&ArtlensConfig::from_env())?;
//! let image = ImageInput::from_base64(&payload, None)?;
//! let analysis = analyzer.analyze(image).await?;
//! println!("{}", analysis.narrative);
//! ```

pub mod analyzer;
pub mod color_theory;
pub mod enrichment;
pub mod interpretation;
pub mod palette;
pub mod recall;
pub mod settle;
pub mod summary;
pub mod synthesis;
pub mod texture;
pub mod vision_aggregator;

pub use analyzer::{Analyzer, AnalyzerBuilder};
pub use color_theory::{analyze_colors, classify_harmony};
pub use enrichment::Enricher;
pub use interpretation::Interpreter;
pub use palette::{default_palette, extract_palette, sample_palette};
pub use recall::RecallDispatcher;
pub use settle::{settle, settle_all};
pub use summary::{compose_summary, Narrative, SummarySource, PADDING_SENTENCE};
pub use synthesis::{compute_confidence, Synthesizer};
pub use texture::GenerativeTextureAnalyzer;
pub use vision_aggregator::VisionAggregator;
