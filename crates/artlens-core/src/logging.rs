//! Structured logging field name constants for artlens.
//!
//! All crates use these constants for consistent structured logging fields,
//! so a single analysis request can be followed across every stage.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Provider failed or was skipped, fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), analysis completions |
//! | DEBUG | Dispatch decisions, intermediate values, config choices |
//! | TRACE | Per-item iteration (palette buckets, merged labels) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID for one analysis request.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "analysis", "inference", "reference"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "vision_aggregator", "recall", "synthesis", "openai"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "analyze", "observe", "interpret", "recall", "synthesize"
pub const OPERATION: &str = "op";

/// External provider name.
/// Examples: "google-vision", "huggingface", "wikipedia", "met-museum"
pub const PROVIDER: &str = "provider";

/// Recall slot name.
/// Examples: "wikipedia_data", "texture_analysis"
pub const SLOT: &str = "slot";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a provider.
pub const RESULT_COUNT: &str = "result_count";

/// Byte length of a prompt.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";

/// Byte length of the submitted image.
pub const IMAGE_BYTES: &str = "image_bytes";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for inference.
pub const MODEL: &str = "model";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Confidence score of a finished analysis.
pub const CONFIDENCE: &str = "confidence";
