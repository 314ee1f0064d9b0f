//! Generative texture analysis, run only for texture-heavy techniques.

use std::sync::Arc;

use async_trait::async_trait;

use artlens_core::{
    GenerationBackend, InterpretationInsight, Result, TextureAnalysis, TextureAnalyzer,
    VisionObservation,
};
use artlens_inference::parse_partial_json;

pub const TEXTURE_SYSTEM_PROMPT: &str = "You are a painting conservator who specialises in \
surface texture and brushwork. Respond with a single JSON object only.";

/// Asks the generation backend for a short JSON texture note.
pub struct GenerativeTextureAnalyzer {
    backend: Arc<dyn GenerationBackend>,
}

impl GenerativeTextureAnalyzer {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }
}

pub fn build_texture_prompt(
    observation: &VisionObservation,
    insight: &InterpretationInsight,
) -> String {
    format!(
        "Techniques identified: {}.\nVisible subjects: {}.\n\
         Describe the surface texture, brushwork and paint handling a viewer should look for.\n\
         Return JSON: {{\"summary\": \"one or two sentences\", \"observations\": [\"specific things to notice\"]}}",
        insight.technique_insights.join(", "),
        observation.labels.join(", ")
    )
}

#[async_trait]
impl TextureAnalyzer for GenerativeTextureAnalyzer {
    /// Reported under the generation provider it calls.
    fn name(&self) -> &str {
        self.backend.provider_name()
    }

    async fn analyze_texture(
        &self,
        observation: &VisionObservation,
        insight: &InterpretationInsight,
    ) -> Result<TextureAnalysis> {
        let reply = self
            .backend
            .generate_with_system(
                TEXTURE_SYSTEM_PROMPT,
                &build_texture_prompt(observation, insight),
            )
            .await?;
        parse_partial_json(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artlens_inference::mock::MockGenerationBackend;

    #[tokio::test]
    async fn test_texture_reply_parsed() {
        let backend = MockGenerationBackend::new().with_fixed_response(
            r#"{"summary": "Thick impasto ridges catch the light.", "observations": "raised strokes"}"#,
        );
        let analyzer = GenerativeTextureAnalyzer::new(Arc::new(backend));
        let insight = InterpretationInsight {
            technique_insights: vec!["impasto".to_string()],
            ..Default::default()
        };

        let texture = analyzer
            .analyze_texture(&VisionObservation::default(), &insight)
            .await
            .unwrap();
        assert!(texture.summary.contains("impasto"));
        assert_eq!(texture.observations, vec!["raised strokes"]);
        assert_eq!(analyzer.name(), "openai");
    }

    #[test]
    fn test_prompt_lists_techniques() {
        let insight = InterpretationInsight {
            technique_insights: vec!["impasto".to_string(), "palette knife".to_string()],
            ..Default::default()
        };
        let prompt = build_texture_prompt(&VisionObservation::default(), &insight);
        assert!(prompt.contains("impasto, palette knife"));
    }
}
