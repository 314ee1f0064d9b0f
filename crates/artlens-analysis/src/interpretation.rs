//! First generation call: turn the vision vocabulary into art-historical
//! insight categories.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument};

use artlens_core::{Error, GenerationBackend, InterpretationInsight, Result, VisionObservation};
use artlens_inference::parse_partial_json;

pub const INTERPRETATION_SYSTEM_PROMPT: &str = "You are an expert art historian and museum \
educator. Given what a computer-vision system saw in an artwork, identify its likely style, \
techniques, themes and medium, and propose questions and learning objectives for students. \
Respond with a single JSON object only.";

const RESPONSE_SHAPE: &str = r#"{
  "styleInsights": ["art movements or stylistic traits"],
  "techniqueInsights": ["techniques such as brushwork, impasto, glazing"],
  "themeInsights": ["subjects and themes"],
  "mediumInsights": ["likely materials and support"],
  "reflectionQuestions": ["open questions for the viewer"],
  "learningObjectives": ["what a student should learn from this work"]
}"#;

/// Builds the interpretation prompt and parses the reply.
#[derive(Clone, Default)]
pub struct Interpreter {
    backend: Option<Arc<dyn GenerationBackend>>,
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none detected".to_string()
    } else {
        items.join(", ")
    }
}

/// User prompt embedding the merged observation.
pub fn build_interpretation_prompt(observation: &VisionObservation) -> String {
    format!(
        "Vision analysis of an artwork:\n\
         - Labels: {}\n\
         - Objects: {}\n\
         - Dominant colors: {}\n\
         - Visible text: {}\n\
         - Faces detected: {}\n\n\
         Return JSON in exactly this shape:\n{}",
        list_or_none(&observation.labels),
        list_or_none(&observation.objects),
        list_or_none(&observation.colors),
        list_or_none(&observation.text),
        observation.face_count,
        RESPONSE_SHAPE
    )
}

impl Interpreter {
    pub fn new(backend: Option<Arc<dyn GenerationBackend>>) -> Self {
        Self { backend }
    }

    /// Fails with `InterpretationUnavailable` on a missing backend, a
    /// backend error or an unparseable reply.
    #[instrument(skip(self, observation), fields(
        subsystem = "analysis",
        component = "interpretation",
        op = "interpret",
    ))]
    pub async fn interpret(&self, observation: &VisionObservation) -> Result<InterpretationInsight> {
        let backend = self.backend.as_ref().ok_or_else(|| {
            Error::InterpretationUnavailable("no generation backend configured".to_string())
        })?;

        let start = Instant::now();
        let prompt = build_interpretation_prompt(observation);
        let reply = backend
            .generate_with_system(INTERPRETATION_SYSTEM_PROMPT, &prompt)
            .await
            .map_err(|e| Error::InterpretationUnavailable(e.to_string()))?;

        let insight: InterpretationInsight = parse_partial_json(&reply)
            .map_err(|e| Error::InterpretationUnavailable(e.to_string()))?;

        debug!(
            model = backend.model_name(),
            prompt_len = prompt.len(),
            response_len = reply.len(),
            style = insight.style_insights.len(),
            technique = insight.technique_insights.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Interpretation parsed"
        );
        Ok(insight)
    }
}
