//! Domain records passed between pipeline stages.
//!
//! Every record here is transient: built for one analysis request and
//! dropped after the response is rendered. Records parsed from model
//! output are partial by construction; each field defaults to empty and
//! tolerates the wrong JSON shape.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::color::{ColorAnalysis, ColorMood, ColorSample};

// =============================================================================
// ORDERED SETS
// =============================================================================

/// Push `item` unless an equal entry (trimmed, case-insensitive) exists.
///
/// Returns true when the item was inserted.
pub fn push_unique(items: &mut Vec<String>, item: &str) -> bool {
    let trimmed = item.trim();
    if trimmed.is_empty() {
        return false;
    }
    let key = trimmed.to_lowercase();
    if items.iter().any(|existing| existing.to_lowercase() == key) {
        return false;
    }
    items.push(trimmed.to_string());
    true
}

// =============================================================================
// VISION
// =============================================================================

/// One vision provider's contribution before merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderObservation {
    #[serde(default, deserialize_with = "lenient_strings")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub objects: Vec<String>,
    /// Color descriptors, `rgb(r,g,b)`.
    #[serde(default, deserialize_with = "lenient_strings")]
    pub colors: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub text: Vec<String>,
    /// `None` when the provider does not report faces.
    #[serde(
        default,
        alias = "faces",
        alias = "faceCount",
        deserialize_with = "lenient_count"
    )]
    pub face_count: Option<u32>,
}

/// Merged vision vocabulary shared by every later stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionObservation {
    pub labels: Vec<String>,
    pub objects: Vec<String>,
    pub colors: Vec<String>,
    pub text: Vec<String>,
    pub face_count: u32,
}

impl VisionObservation {
    /// Fold one provider's contribution in, keeping first occurrences.
    pub fn merge(&mut self, contribution: &ProviderObservation) {
        for label in &contribution.labels {
            push_unique(&mut self.labels, label);
        }
        for object in &contribution.objects {
            push_unique(&mut self.objects, object);
        }
        for color in &contribution.colors {
            push_unique(&mut self.colors, color);
        }
        for line in &contribution.text {
            push_unique(&mut self.text, line);
        }
        if let Some(faces) = contribution.face_count {
            self.face_count = self.face_count.saturating_add(faces);
        }
    }

    /// True when no provider contributed anything.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
            && self.objects.is_empty()
            && self.colors.is_empty()
            && self.text.is_empty()
            && self.face_count == 0
    }
}

/// Vision aggregation result plus the providers that answered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedVision {
    pub observation: VisionObservation,
    pub providers: Vec<String>,
}

// =============================================================================
// INTERPRETATION
// =============================================================================

/// Insights requested from the first generation call.
///
/// The schema is advisory: every key may be missing or malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretationInsight {
    #[serde(default, alias = "style_insights", deserialize_with = "lenient_strings")]
    pub style_insights: Vec<String>,
    #[serde(
        default,
        alias = "technique_insights",
        deserialize_with = "lenient_strings"
    )]
    pub technique_insights: Vec<String>,
    #[serde(default, alias = "theme_insights", deserialize_with = "lenient_strings")]
    pub theme_insights: Vec<String>,
    #[serde(default, alias = "medium_insights", deserialize_with = "lenient_strings")]
    pub medium_insights: Vec<String>,
    #[serde(
        default,
        alias = "reflection_questions",
        deserialize_with = "lenient_strings"
    )]
    pub reflection_questions: Vec<String>,
    #[serde(
        default,
        alias = "learning_objectives",
        deserialize_with = "lenient_strings"
    )]
    pub learning_objectives: Vec<String>,
}

// =============================================================================
// RECALL
// =============================================================================

/// One artwork returned by a museum collection source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtworkRecord {
    pub source: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ArtworkRecord {
    /// Case-insensitive (title, artist) key used for de-duplication.
    pub fn identity(&self) -> (String, String) {
        (
            self.title.trim().to_lowercase(),
            self.artist
                .as_deref()
                .unwrap_or_default()
                .trim()
                .to_lowercase(),
        )
    }
}

/// Encyclopedia summary for a search term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSummary {
    pub source: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub extract: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Surface and brushwork notes, only produced for texture-heavy techniques.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureAnalysis {
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub observations: Vec<String>,
}

/// Emotional reading derived from color mood and themes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalAnalysis {
    pub mood: ColorMood,
    pub summary: String,
    pub keywords: Vec<String>,
}

/// Further-study link built from the search terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningResource {
    pub title: String,
    pub url: String,
    pub kind: String,
}

/// Named recall slots. `None` means the call did not run or failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecallBundle {
    pub search_terms: Vec<String>,
    pub color_analysis: Option<ColorAnalysis>,
    pub wikipedia_data: Option<ReferenceSummary>,
    pub met_museum_data: Option<Vec<ArtworkRecord>>,
    pub harvard_data: Option<Vec<ArtworkRecord>>,
    pub art_institute_data: Option<Vec<ArtworkRecord>>,
    pub art_search_data: Option<Vec<ArtworkRecord>>,
    pub texture_analysis: Option<TextureAnalysis>,
    pub emotional_analysis: Option<EmotionalAnalysis>,
    pub learning_resources: Option<Vec<LearningResource>>,
    pub similar_artworks: Option<Vec<ArtworkRecord>>,
    /// Providers whose slots populated.
    pub sources: BTreeSet<String>,
}

impl RecallBundle {
    /// True when any slot was filled by a network provider.
    pub fn has_network_data(&self) -> bool {
        self.wikipedia_data.is_some()
            || self.met_museum_data.is_some()
            || self.harvard_data.is_some()
            || self.art_institute_data.is_some()
            || self.art_search_data.is_some()
            || self.texture_analysis.is_some()
            || self.similar_artworks.is_some()
    }

    /// Museum records from every collection slot, in slot order.
    pub fn museum_records(&self) -> impl Iterator<Item = &ArtworkRecord> {
        [
            &self.met_museum_data,
            &self.art_institute_data,
            &self.harvard_data,
            &self.art_search_data,
        ]
        .into_iter()
        .flatten()
        .flatten()
    }
}

// =============================================================================
// SYNTHESIS
// =============================================================================

/// Analysis requested from the second generation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizedAnalysis {
    #[serde(default, alias = "style_analysis", deserialize_with = "lenient_string")]
    pub style_analysis: String,
    #[serde(
        default,
        alias = "technique_analysis",
        deserialize_with = "lenient_string"
    )]
    pub technique_analysis: String,
    #[serde(default, alias = "theme_analysis", deserialize_with = "lenient_string")]
    pub theme_analysis: String,
    #[serde(default, alias = "medium_analysis", deserialize_with = "lenient_string")]
    pub medium_analysis: String,
    #[serde(default, alias = "color_analysis", deserialize_with = "lenient_string")]
    pub color_analysis: String,
    #[serde(
        default,
        alias = "composition_analysis",
        deserialize_with = "lenient_string"
    )]
    pub composition_analysis: String,
    #[serde(
        default,
        alias = "historical_context",
        deserialize_with = "lenient_string"
    )]
    pub historical_context: String,
    #[serde(
        default,
        alias = "cultural_significance",
        deserialize_with = "lenient_string"
    )]
    pub cultural_significance: String,
    #[serde(
        default,
        alias = "reflection_questions",
        deserialize_with = "lenient_strings"
    )]
    pub reflection_questions: Vec<String>,
    #[serde(
        default,
        alias = "learning_objectives",
        deserialize_with = "lenient_strings"
    )]
    pub learning_objectives: Vec<String>,
    #[serde(
        default,
        alias = "discussion_prompts",
        deserialize_with = "lenient_strings"
    )]
    pub discussion_prompts: Vec<String>,
    #[serde(default, alias = "art_movements", deserialize_with = "lenient_strings")]
    pub art_movements: Vec<String>,
}

/// Final artifact rendered on the result screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationalAnalysis {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub style_analysis: String,
    pub technique_analysis: String,
    pub theme_analysis: String,
    pub medium_analysis: String,
    pub color_analysis: String,
    pub composition_analysis: String,
    pub historical_context: String,
    pub cultural_significance: String,
    pub reflection_questions: Vec<String>,
    pub learning_objectives: Vec<String>,
    pub discussion_prompts: Vec<String>,
    pub art_movements: Vec<String>,
    pub palette: Vec<ColorSample>,
    pub color_theory: Option<ColorAnalysis>,
    pub observation: VisionObservation,
    pub reference: Option<ReferenceSummary>,
    pub similar_artworks: Vec<ArtworkRecord>,
    pub learning_resources: Vec<LearningResource>,
    pub movement_context: Vec<ReferenceSummary>,
    /// Heuristic in `[0, 1]`.
    pub confidence: f64,
    pub sources: BTreeSet<String>,
    pub narrative: String,
    pub narrative_units: Vec<String>,
}

// =============================================================================
// LENIENT DESERIALIZATION
// =============================================================================

/// Strings from a JSON value: a string becomes one item, arrays keep their
/// non-empty string items, anything else is empty.
pub fn strings_from_value(value: &JsonValue) -> Vec<String> {
    match value {
        JsonValue::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                vec![]
            } else {
                vec![trimmed.to_string()]
            }
        }
        JsonValue::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => vec![],
    }
}

/// A single string from a JSON value; arrays of strings are joined.
pub fn string_from_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Array(_) => strings_from_value(value).join(" "),
        JsonValue::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn lenient_strings<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.as_ref().map(strings_from_value).unwrap_or_default())
}

/// A non-negative count from a number or numeric string; anything else is `None`.
fn count_from_value(value: &JsonValue) -> Option<u32> {
    match value {
        JsonValue::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_from_value))
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.as_ref().map(string_from_value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_preserves_first_occurrence() {
        let mut observation = VisionObservation::default();
        observation.merge(&ProviderObservation {
            labels: vec!["red".into(), "blue".into()],
            ..Default::default()
        });
        observation.merge(&ProviderObservation {
            labels: vec!["blue".into(), "green".into()],
            ..Default::default()
        });
        assert_eq!(observation.labels, vec!["red", "blue", "green"]);
    }

    #[test]
    fn test_merge_dedup_is_case_insensitive() {
        let mut observation = VisionObservation::default();
        observation.merge(&ProviderObservation {
            labels: vec!["Painting".into()],
            ..Default::default()
        });
        observation.merge(&ProviderObservation {
            labels: vec!["painting".into(), "Bridge".into()],
            ..Default::default()
        });
        assert_eq!(observation.labels, vec!["Painting", "Bridge"]);
    }

    #[test]
    fn test_merge_sums_reported_faces_only() {
        let mut observation = VisionObservation::default();
        observation.merge(&ProviderObservation {
            face_count: Some(2),
            ..Default::default()
        });
        observation.merge(&ProviderObservation::default());
        observation.merge(&ProviderObservation {
            face_count: Some(1),
            ..Default::default()
        });
        assert_eq!(observation.face_count, 3);
    }

    #[test]
    fn test_empty_observation() {
        assert!(VisionObservation::default().is_empty());
        let observation = VisionObservation {
            face_count: 1,
            ..Default::default()
        };
        assert!(!observation.is_empty());
    }

    #[test]
    fn test_insight_tolerates_missing_and_malformed_keys() {
        let json = r#"{
            "styleInsights": "Impressionist handling",
            "techniqueInsights": ["loose brushwork", 42, null, "  "],
            "themeInsights": {"unexpected": "object"},
            "learning_objectives": ["Compare light effects"]
        }"#;
        let insight: InterpretationInsight = serde_json::from_str(json).unwrap();
        assert_eq!(insight.style_insights, vec!["Impressionist handling"]);
        assert_eq!(insight.technique_insights, vec!["loose brushwork"]);
        assert!(insight.theme_insights.is_empty());
        assert!(insight.medium_insights.is_empty());
        assert!(insight.reflection_questions.is_empty());
        assert_eq!(insight.learning_objectives, vec!["Compare light effects"]);
    }

    #[test]
    fn test_insight_null_fields_are_empty() {
        let insight: InterpretationInsight =
            serde_json::from_str(r#"{"styleInsights": null}"#).unwrap();
        assert_eq!(insight, InterpretationInsight::default());
    }

    #[test]
    fn test_synthesized_analysis_defaults() {
        let json = r#"{"styleAnalysis": ["Bold", "and direct"], "artMovements": "Fauvism"}"#;
        let analysis: SynthesizedAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.style_analysis, "Bold and direct");
        assert_eq!(analysis.art_movements, vec!["Fauvism"]);
        assert!(analysis.technique_analysis.is_empty());
        assert!(analysis.discussion_prompts.is_empty());
    }

    #[test]
    fn test_provider_observation_accepts_faces_alias() {
        let json = r#"{"labels": ["bridge"], "faces": 2}"#;
        let observation: ProviderObservation = serde_json::from_str(json).unwrap();
        assert_eq!(observation.face_count, Some(2));
    }

    #[test]
    fn test_provider_observation_tolerates_bad_face_count() {
        let json = r#"{"labels": ["bridge"], "faces": "2"}"#;
        let observation: ProviderObservation = serde_json::from_str(json).unwrap();
        assert_eq!(observation.face_count, Some(2));

        for faces in [r#"-1"#, r#""several""#, r#"1.5"#, r#"[1]"#, "null"] {
            let json = format!(r#"{{"labels": ["bridge"], "faces": {}}}"#, faces);
            let observation: ProviderObservation = serde_json::from_str(&json).unwrap();
            assert_eq!(observation.labels, vec!["bridge"]);
            assert_eq!(observation.face_count, None, "faces = {}", faces);
        }
    }

    #[test]
    fn test_artwork_identity_ignores_case_and_whitespace() {
        let a = ArtworkRecord {
            source: "met-museum".into(),
            title: "Water Lilies ".into(),
            artist: Some("Claude Monet".into()),
            date: None,
            medium: None,
            image_url: None,
            url: None,
        };
        let mut b = a.clone();
        b.source = "art-institute".into();
        b.title = "water lilies".into();
        b.artist = Some("CLAUDE MONET".into());
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn test_recall_bundle_network_data() {
        let mut bundle = RecallBundle::default();
        assert!(!bundle.has_network_data());
        bundle.learning_resources = Some(vec![]);
        assert!(!bundle.has_network_data());
        bundle.met_museum_data = Some(vec![]);
        assert!(bundle.has_network_data());
    }

    #[test]
    fn test_push_unique_ignores_case_and_blanks() {
        let mut items = Vec::new();
        for item in ["a", "B", "b", " ", "c", "A"] {
            push_unique(&mut items, item);
        }
        assert_eq!(items, vec!["a", "B", "c"]);
    }
}
