//! Second generation call: fold observation, insight and recall into the
//! final educational analysis, plus the metadata every analysis carries.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument};

use artlens_core::defaults;
use artlens_core::{
    Error, GenerationBackend, InterpretationInsight, RecallBundle, Result, SynthesizedAnalysis,
    VisionObservation,
};
use artlens_inference::parse_partial_json;

pub const SYNTHESIS_SYSTEM_PROMPT: &str = "You are a senior curator writing a rich, accurate \
analysis of an artwork for students. Ground every statement in the evidence provided and do not \
invent provenance. Respond with a single JSON object only.";

const RESPONSE_TEMPLATE: &str = r#"{
  "styleAnalysis": "paragraph on style and movement",
  "techniqueAnalysis": "paragraph on technique and handling",
  "themeAnalysis": "paragraph on subject and themes",
  "mediumAnalysis": "paragraph on materials and support",
  "colorAnalysis": "paragraph on color choices and their effect",
  "compositionAnalysis": "paragraph on composition and structure",
  "historicalContext": "paragraph placing the work in history",
  "culturalSignificance": "paragraph on cultural significance",
  "reflectionQuestions": ["3-5 open questions"],
  "learningObjectives": ["3-5 learning objectives"],
  "discussionPrompts": ["3-5 classroom discussion prompts"],
  "artMovements": ["related art movements"]
}"#;

/// Source name for the local palette extractor.
pub const COLOR_EXTRACTOR: &str = "color-extractor";

#[derive(Clone, Default)]
pub struct Synthesizer {
    backend: Option<Arc<dyn GenerationBackend>>,
}

fn bullet_list(label: &str, items: &[String]) -> Option<String> {
    (!items.is_empty()).then(|| format!("{}: {}", label, items.join("; ")))
}

/// Evidence block for the synthesis prompt. Absent data is omitted.
pub fn build_synthesis_prompt(
    observation: &VisionObservation,
    insight: &InterpretationInsight,
    recall: &RecallBundle,
) -> String {
    let mut lines: Vec<String> = [
        bullet_list("Vision labels", &observation.labels),
        bullet_list("Objects", &observation.objects),
        bullet_list("Visible text", &observation.text),
        bullet_list("Style insights", &insight.style_insights),
        bullet_list("Technique insights", &insight.technique_insights),
        bullet_list("Theme insights", &insight.theme_insights),
        bullet_list("Medium insights", &insight.medium_insights),
    ]
    .into_iter()
    .flatten()
    .collect();

    if observation.face_count > 0 {
        lines.push(format!("Faces detected: {}", observation.face_count));
    }
    if let Some(colors) = &recall.color_analysis {
        let names: Vec<&str> = colors
            .dominant_colors
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        lines.push(format!(
            "Palette: {} ({} harmony, {} temperature, {} mood)",
            names.join(", "),
            colors.harmony,
            colors.temperature,
            colors.mood
        ));
    }
    if let Some(reference) = &recall.wikipedia_data {
        lines.push(format!("Reference ({}): {}", reference.title, reference.extract));
    }
    if let Some(texture) = &recall.texture_analysis {
        lines.push(format!("Texture: {}", texture.summary));
    }
    if let Some(emotion) = &recall.emotional_analysis {
        lines.push(format!("Emotional reading: {}", emotion.summary));
    }
    let related: Vec<String> = recall
        .museum_records()
        .chain(recall.similar_artworks.iter().flatten())
        .take(6)
        .map(|r| match &r.artist {
            Some(artist) => format!("{} by {}", r.title, artist),
            None => r.title.clone(),
        })
        .collect();
    if let Some(line) = bullet_list("Related museum works", &related) {
        lines.push(line);
    }

    format!(
        "Evidence about the artwork:\n{}\n\nWrite the analysis as JSON in exactly this shape:\n{}",
        lines
            .iter()
            .map(|l| format!("- {}", l))
            .collect::<Vec<_>>()
            .join("\n"),
        RESPONSE_TEMPLATE
    )
}

impl Synthesizer {
    pub fn new(backend: Option<Arc<dyn GenerationBackend>>) -> Self {
        Self { backend }
    }

    /// Single attempt, no retry. Missing backend, backend error or an
    /// unparseable reply is `SynthesisUnavailable`.
    #[instrument(skip_all, fields(
        subsystem = "analysis",
        component = "synthesis",
        op = "synthesize",
    ))]
    pub async fn synthesize(
        &self,
        observation: &VisionObservation,
        insight: &InterpretationInsight,
        recall: &RecallBundle,
    ) -> Result<SynthesizedAnalysis> {
        let backend = self.backend.as_ref().ok_or_else(|| {
            Error::SynthesisUnavailable("no generation backend configured".to_string())
        })?;

        let start = Instant::now();
        let prompt = build_synthesis_prompt(observation, insight, recall);
        let reply = backend
            .generate_with_system(SYNTHESIS_SYSTEM_PROMPT, &prompt)
            .await
            .map_err(|e| Error::SynthesisUnavailable(e.to_string()))?;
        let analysis: SynthesizedAnalysis = parse_partial_json(&reply)
            .map_err(|e| Error::SynthesisUnavailable(e.to_string()))?;

        debug!(
            model = backend.model_name(),
            prompt_len = prompt.len(),
            response_len = reply.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Synthesis parsed"
        );
        Ok(analysis)
    }
}

// =============================================================================
// FALLBACK
// =============================================================================

fn sentence_from(items: &[String], lead: &str) -> Option<String> {
    let picked: Vec<&str> = items.iter().take(3).map(String::as_str).collect();
    (!picked.is_empty()).then(|| format!("{} {}.", lead, picked.join(", ")))
}

fn or_canned(value: Option<String>, canned: &str) -> String {
    value.unwrap_or_else(|| canned.to_string())
}

/// Analysis assembled locally from insight, recall and observation when
/// synthesis is unavailable or leaves a field empty.
pub fn fallback_analysis(
    observation: &VisionObservation,
    insight: &InterpretationInsight,
    recall: &RecallBundle,
) -> SynthesizedAnalysis {
    let texture = recall
        .texture_analysis
        .as_ref()
        .map(|t| t.summary.clone())
        .filter(|s| !s.is_empty());

    let color = recall.color_analysis.as_ref().map(|c| {
        let mut text = format!(
            "The palette is {} in temperature with a {} harmony and a {} mood.",
            c.temperature, c.harmony, c.mood
        );
        if let Some(first) = c.insights.first() {
            text.push(' ');
            text.push_str(first);
        }
        text
    });

    let reflection_questions = if insight.reflection_questions.is_empty() {
        vec![
            "What is the first thing you notice, and why do you think your eye goes there?"
                .to_string(),
            "How do the colors affect the mood of the work?".to_string(),
        ]
    } else {
        insight.reflection_questions.clone()
    };

    let learning_objectives = if insight.learning_objectives.is_empty() {
        vec!["Describe how color and composition shape a viewer's response.".to_string()]
    } else {
        insight.learning_objectives.clone()
    };

    let discussion_prompts = recall
        .search_terms
        .iter()
        .filter(|t| !crate::recall::is_blocklisted_term(t))
        .take(2)
        .map(|t| format!("Discuss how {} shapes the meaning of this work.", t))
        .collect();

    SynthesizedAnalysis {
        style_analysis: or_canned(
            sentence_from(&insight.style_insights, "The work shows stylistic affinities with"),
            "The style of this work invites comparison with related artistic traditions.",
        ),
        technique_analysis: or_canned(
            sentence_from(&insight.technique_insights, "Notable techniques include").or(texture),
            "Look closely at how the surface was built up to understand the artist's technique.",
        ),
        theme_analysis: or_canned(
            sentence_from(&insight.theme_insights, "Themes explored here include"),
            "The subject matter offers several themes worth discussing.",
        ),
        medium_analysis: or_canned(
            sentence_from(&insight.medium_insights, "The work appears to use"),
            "The materials used shape how the image looks and how it has aged.",
        ),
        color_analysis: or_canned(
            color,
            "Color choices guide the viewer's attention across the work.",
        ),
        composition_analysis: or_canned(
            sentence_from(&observation.objects, "The composition brings together"),
            "The arrangement of forms leads the eye through the picture.",
        ),
        historical_context: or_canned(
            recall.wikipedia_data.as_ref().map(|w| w.extract.clone()),
            "Placing the work in its historical moment deepens our understanding of it.",
        ),
        cultural_significance: or_canned(
            recall
                .wikipedia_data
                .as_ref()
                .and_then(|w| w.description.clone())
                .map(|d| format!("Related context: {}.", d)),
            "Works like this one reflect the values and concerns of the culture that produced them.",
        ),
        reflection_questions,
        learning_objectives,
        discussion_prompts,
        art_movements: insight.style_insights.clone(),
    }
}

fn fill(target: &mut String, fallback: String) {
    if target.trim().is_empty() {
        *target = fallback;
    }
}

fn fill_list(target: &mut Vec<String>, fallback: Vec<String>) {
    if target.is_empty() {
        *target = fallback;
    }
}

/// Fill every empty field of `analysis` from `fallback`.
pub fn complete_with(mut analysis: SynthesizedAnalysis, fallback: SynthesizedAnalysis) -> SynthesizedAnalysis {
    fill(&mut analysis.style_analysis, fallback.style_analysis);
    fill(&mut analysis.technique_analysis, fallback.technique_analysis);
    fill(&mut analysis.theme_analysis, fallback.theme_analysis);
    fill(&mut analysis.medium_analysis, fallback.medium_analysis);
    fill(&mut analysis.color_analysis, fallback.color_analysis);
    fill(&mut analysis.composition_analysis, fallback.composition_analysis);
    fill(&mut analysis.historical_context, fallback.historical_context);
    fill(&mut analysis.cultural_significance, fallback.cultural_significance);
    fill_list(&mut analysis.reflection_questions, fallback.reflection_questions);
    fill_list(&mut analysis.learning_objectives, fallback.learning_objectives);
    fill_list(&mut analysis.discussion_prompts, fallback.discussion_prompts);
    fill_list(&mut analysis.art_movements, fallback.art_movements);
    analysis
}

// =============================================================================
// METADATA
// =============================================================================

/// Heuristic confidence: base 0.5, +0.1 per evidence signal, capped at 1.
pub fn compute_confidence(
    observation: &VisionObservation,
    insight: &InterpretationInsight,
    recall: &RecallBundle,
) -> f64 {
    let signals = [
        !observation.labels.is_empty(),
        !observation.objects.is_empty(),
        !observation.colors.is_empty(),
        !insight.style_insights.is_empty(),
        recall.wikipedia_data.is_some(),
    ];
    let score = defaults::CONFIDENCE_BASE
        + defaults::CONFIDENCE_INCREMENT * signals.iter().filter(|s| **s).count() as f64;
    score.min(1.0)
}

/// Sorted names of every provider that contributed. The color extractor
/// counts only when real pixels were sampled.
pub fn collect_sources(
    vision_providers: &[String],
    generation_provider: Option<&str>,
    recall: &RecallBundle,
    palette_sampled: bool,
) -> BTreeSet<String> {
    let mut sources: BTreeSet<String> = vision_providers.iter().cloned().collect();
    if let Some(provider) = generation_provider {
        sources.insert(provider.to_string());
    }
    sources.extend(recall.sources.iter().cloned());
    if palette_sampled {
        sources.insert(COLOR_EXTRACTOR.to_string());
    }
    sources
}
