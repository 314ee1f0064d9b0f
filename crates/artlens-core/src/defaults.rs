//! Centralized default constants for artlens.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers. Organized by domain area.

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP bind address.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Maximum request body size in bytes (20 MB, large phone photos as base64).
pub const MAX_BODY_SIZE_BYTES: usize = 20 * 1024 * 1024;

// =============================================================================
// PROVIDERS
// =============================================================================

/// Timeout for vision and reference provider requests in seconds.
pub const PROVIDER_TIMEOUT_SECS: u64 = 30;

/// Timeout for text-generation requests in seconds.
pub const GEN_TIMEOUT_SECS: u64 = 120;

/// Default OpenAI-compatible API endpoint.
pub const OPENAI_URL: &str = "https://api.openai.com/v1";

/// Default generation model.
pub const GEN_MODEL: &str = "gpt-4o-mini";

/// Default Google Cloud Vision endpoint.
pub const GOOGLE_VISION_URL: &str = "https://vision.googleapis.com";

/// Maximum labels requested from Google Cloud Vision.
pub const GOOGLE_VISION_MAX_LABELS: u32 = 10;

/// Default Hugging Face inference endpoint.
pub const HUGGINGFACE_URL: &str = "https://api-inference.huggingface.co";

/// Default Hugging Face image-classification model.
pub const HUGGINGFACE_MODEL: &str = "google/vit-base-patch16-224";

/// Minimum score for a Hugging Face label to be kept.
pub const HUGGINGFACE_MIN_SCORE: f64 = 0.05;

/// Default Wikipedia endpoint.
pub const WIKIPEDIA_URL: &str = "https://en.wikipedia.org";

/// Default Metropolitan Museum of Art collection endpoint.
pub const MET_MUSEUM_URL: &str = "https://collectionapi.metmuseum.org";

/// Default Art Institute of Chicago endpoint.
pub const ARTIC_URL: &str = "https://api.artic.edu";

/// Default Harvard Art Museums endpoint.
pub const HARVARD_URL: &str = "https://api.harvardartmuseums.org";

/// Default Rijksmuseum endpoint.
pub const RIJKSMUSEUM_URL: &str = "https://www.rijksmuseum.nl";

/// Records requested from each museum collection slot.
pub const MUSEUM_RESULTS: usize = 5;

// =============================================================================
// PALETTE
// =============================================================================

/// Sample every Nth pixel (row-major) instead of every pixel.
pub const PIXEL_STRIDE: usize = 10;

/// Pixels with alpha below this value are skipped.
pub const ALPHA_THRESHOLD: u8 = 128;

/// Channel quantization step (values round to the nearest multiple).
pub const QUANTIZATION_STEP: u8 = 32;

/// Buckets at or below this share of sampled pixels are dropped.
pub const MIN_COLOR_PERCENTAGE: f64 = 1.0;

/// Maximum number of palette entries returned.
pub const MAX_PALETTE_COLORS: usize = 6;

/// Saturation (percent) below which a color is treated as achromatic.
pub const ACHROMATIC_SATURATION: u8 = 15;

// =============================================================================
// RECALL
// =============================================================================

/// Maximum number of search terms seeded into recall queries.
pub const MAX_SEARCH_TERMS: usize = 5;

/// Strings taken from the head of each insight category.
pub const INSIGHTS_PER_CATEGORY: usize = 2;

/// Search terms used for the similar-artwork search.
pub const SIMILAR_SEARCH_TERMS: usize = 2;

/// Results requested per (term, source) in the similar-artwork search.
pub const SIMILAR_PER_SOURCE: usize = 3;

/// Maximum similar artworks kept after merging.
pub const MAX_SIMILAR_ARTWORKS: usize = 6;

/// Maximum art movements looked up during enrichment.
pub const MAX_ENRICHED_MOVEMENTS: usize = 2;

// =============================================================================
// SYNTHESIS
// =============================================================================

/// Confidence before any upstream signal is counted.
pub const CONFIDENCE_BASE: f64 = 0.5;

/// Confidence added per present upstream signal.
pub const CONFIDENCE_INCREMENT: f64 = 0.1;

/// Number of sentence-units in every narrative.
pub const NARRATIVE_UNITS: usize = 40;
