//! Deterministic 40-unit narrative builder.
//!
//! Twenty topic slots come first in a fixed order. Each takes the best real
//! sentence available for its topic or a fixed canned sentence. Units 21-40
//! draw from leftover real content and are then padded, so the narrative
//! length never depends on how much upstream data arrived.

use artlens_core::defaults::NARRATIVE_UNITS;
use artlens_core::{
    ColorSample, InterpretationInsight, RecallBundle, SynthesizedAnalysis, VisionObservation,
};

pub const PADDING_SENTENCE: &str =
    "Continued close looking will reveal further details worth discussing.";

const TOPIC_SLOTS: usize = 20;

/// Canned sentence per topic slot, in slot order.
const CANNED: [&str; TOPIC_SLOTS] = [
    "This artwork invites careful, unhurried looking.",
    "The artist's technique rewards a closer look at the surface.",
    "The composition guides the eye through the picture.",
    "The palette sets the tone of the work.",
    "The balance of warm and cool tones shapes the atmosphere.",
    "The relationships between colors hold the image together.",
    "Color and light together establish the mood.",
    "Stylistic choices connect this work to wider artistic traditions.",
    "The subject matter opens several paths for interpretation.",
    "Individual elements reward attention on their own.",
    "Color theory helps explain why the image feels the way it does.",
    "Materials and handling leave visible traces in the finished work.",
    "The work explores themes that remain relevant today.",
    "Viewers may respond to this work in very different ways.",
    "Historical context deepens our understanding of the work.",
    "Works like this reflect the culture that produced them.",
    "Reading about the period can enrich a visit with this work.",
    "Students can practise describing what they see before interpreting it.",
    "Discuss what you notice first and why.",
    "Taken together, these qualities make the work a rewarding subject for study.",
];

/// Upstream results the compositor always has.
#[derive(Debug, Clone, Copy)]
pub struct SummarySource<'a> {
    pub observation: &'a VisionObservation,
    pub analysis: &'a SynthesizedAnalysis,
    pub palette: &'a [ColorSample],
}

/// Exactly [`NARRATIVE_UNITS`] normalised sentence-units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narrative {
    units: Vec<String>,
}

impl Narrative {
    pub fn units(&self) -> &[String] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn text(&self) -> String {
        self.units.join(" ")
    }

    pub fn into_units(self) -> Vec<String> {
        self.units
    }
}

/// Words that end in a period without ending the sentence.
const ABBREVIATIONS: [&str; 9] = ["c", "ca", "st", "dr", "mr", "mrs", "vs", "e.g", "i.e"];

/// A first sentence shorter than this is kept together with what follows.
const MIN_SENTENCE_CHARS: usize = 20;

fn is_abbreviation(before: &str) -> bool {
    let word = before
        .rsplit(' ')
        .next()
        .unwrap_or_default()
        .trim_start_matches(|c: char| !c.is_alphanumeric());
    word.chars().count() == 1 || ABBREVIATIONS.contains(&word.to_lowercase().as_str())
}

/// Byte offset just past the first sentence terminator. A terminator
/// counts only when the next word is capitalised, and a period after an
/// initial or a known abbreviation never counts.
fn sentence_end(text: &str) -> Option<usize> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    for (pos, &(i, c)) in chars.iter().enumerate() {
        if !matches!(c, '.' | '!' | '?') || chars.get(pos + 1).map(|&(_, n)| n) != Some(' ') {
            continue;
        }
        if !chars.get(pos + 2).is_some_and(|&(_, n)| n.is_uppercase()) {
            continue;
        }
        if c == '.' && is_abbreviation(&text[..i]) {
            continue;
        }
        return Some(i + c.len_utf8());
    }
    None
}

/// Collapse whitespace, keep the first sentence, capitalise and make sure
/// it ends in punctuation. Blank input yields `None`.
pub fn normalize_sentence(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }

    let first = match sentence_end(&collapsed) {
        Some(end) if collapsed[..end].chars().count() >= MIN_SENTENCE_CHARS => &collapsed[..end],
        _ => collapsed.as_str(),
    };

    let mut chars = first.chars();
    let mut sentence = match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect::<String>(),
        None => return None,
    };
    if !sentence.ends_with(['.', '!', '?']) {
        sentence.push('.');
    }
    Some(sentence)
}

fn first_of(items: &[String]) -> Option<&str> {
    items.iter().map(String::as_str).find(|s| !s.trim().is_empty())
}

fn joined(items: &[String], n: usize) -> Option<String> {
    let picked: Vec<&str> = items
        .iter()
        .map(String::as_str)
        .filter(|s| !s.trim().is_empty())
        .take(n)
        .collect();
    (!picked.is_empty()).then(|| picked.join(", "))
}

fn non_blank(text: &str) -> Option<&str> {
    (!text.trim().is_empty()).then_some(text)
}

fn topic_candidates(
    source: &SummarySource<'_>,
    insight: Option<&InterpretationInsight>,
    recall: Option<&RecallBundle>,
) -> [Option<String>; TOPIC_SLOTS] {
    let analysis = source.analysis;
    let colors = recall.and_then(|r| r.color_analysis.as_ref());
    let emotion = recall.and_then(|r| r.emotional_analysis.as_ref());
    let texture = recall.and_then(|r| r.texture_analysis.as_ref());
    let reference = recall.and_then(|r| r.wikipedia_data.as_ref());

    let palette_names: Vec<String> = source.palette.iter().map(|c| c.name.clone()).collect();

    [
        joined(&source.observation.labels, 3).map(|l| format!("This artwork depicts {}.", l)),
        non_blank(&analysis.technique_analysis).map(str::to_string),
        non_blank(&analysis.composition_analysis).map(str::to_string),
        joined(&palette_names, 3).map(|c| format!("The dominant colors are {}.", c)),
        colors.map(|c| format!("Overall the palette reads as {} in temperature.", c.temperature)),
        colors.map(|c| format!("The colors form a {} harmony.", c.harmony)),
        emotion
            .map(|e| e.summary.clone())
            .filter(|s| !s.trim().is_empty())
            .or_else(|| colors.map(|c| format!("The mood of the palette is {}.", c.mood))),
        insight
            .and_then(|i| first_of(&i.style_insights))
            .map(|s| format!("Stylistically, the work relates to {}.", s)),
        insight
            .and_then(|i| first_of(&i.theme_insights))
            .map(|t| format!("A central theme is {}.", t)),
        joined(&source.observation.objects, 3).map(|o| format!("Notable elements include {}.", o)),
        colors
            .and_then(|c| first_of(&c.insights))
            .map(str::to_string)
            .or_else(|| non_blank(&analysis.color_analysis).map(str::to_string)),
        texture
            .map(|t| t.summary.clone())
            .filter(|s| !s.trim().is_empty())
            .or_else(|| non_blank(&analysis.medium_analysis).map(str::to_string)),
        non_blank(&analysis.theme_analysis).map(str::to_string),
        emotion
            .and_then(|e| joined(&e.keywords, 3))
            .map(|k| format!("The work may evoke feelings of {}.", k)),
        non_blank(&analysis.historical_context).map(str::to_string),
        non_blank(&analysis.cultural_significance).map(str::to_string),
        reference.and_then(|r| non_blank(&r.extract)).map(str::to_string),
        first_of(&analysis.learning_objectives)
            .or_else(|| insight.and_then(|i| first_of(&i.learning_objectives)))
            .map(str::to_string),
        first_of(&analysis.discussion_prompts)
            .or_else(|| insight.and_then(|i| first_of(&i.reflection_questions)))
            .map(str::to_string),
        non_blank(&analysis.style_analysis).map(str::to_string),
    ]
}

fn extra_candidates(
    source: &SummarySource<'_>,
    insight: Option<&InterpretationInsight>,
    recall: Option<&RecallBundle>,
) -> Vec<String> {
    let mut extras = Vec::new();

    if let Some(insight) = insight {
        extras.extend(insight.style_insights.iter().skip(1).cloned());
        extras.extend(insight.technique_insights.iter().cloned());
        extras.extend(insight.theme_insights.iter().skip(1).cloned());
        extras.extend(insight.medium_insights.iter().cloned());
    }

    extras.extend(source.analysis.reflection_questions.iter().cloned());
    extras.extend(source.analysis.discussion_prompts.iter().skip(1).cloned());

    if let Some(similar) = recall.and_then(|r| r.similar_artworks.as_ref()) {
        extras.extend(similar.iter().map(|record| match &record.artist {
            Some(artist) => format!("Compare it with {} by {}.", record.title, artist),
            None => format!("Compare it with {}.", record.title),
        }));
    }

    if let Some(colors) = recall.and_then(|r| r.color_analysis.as_ref()) {
        extras.extend(colors.insights.iter().skip(1).cloned());
    }

    extras
}

/// Build the narrative. Any combination of missing inputs still yields
/// exactly [`NARRATIVE_UNITS`] units.
pub fn compose_summary(
    source: &SummarySource<'_>,
    insight: Option<&InterpretationInsight>,
    recall: Option<&RecallBundle>,
) -> Narrative {
    let mut units: Vec<String> = topic_candidates(source, insight, recall)
        .into_iter()
        .zip(CANNED)
        .map(|(candidate, canned)| {
            candidate
                .as_deref()
                .and_then(normalize_sentence)
                .unwrap_or_else(|| canned.to_string())
        })
        .collect();

    units.extend(
        extra_candidates(source, insight, recall)
            .iter()
            .filter_map(|s| normalize_sentence(s))
            .take(NARRATIVE_UNITS - TOPIC_SLOTS),
    );
    units.resize(NARRATIVE_UNITS, PADDING_SENTENCE.to_string());

    Narrative { units }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_theory::analyze_colors;
    use crate::palette::default_palette;
    use artlens_core::{ArtworkRecord, ReferenceSummary, TextureAnalysis};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_sentence() {
        assert_eq!(
            normalize_sentence("  loose   brushwork across the sky.  Then more."),
            Some("Loose brushwork across the sky.".to_string())
        );
        assert_eq!(
            normalize_sentence("what do you see?"),
            Some("What do you see?".to_string())
        );
        assert_eq!(normalize_sentence("impasto"), Some("Impasto.".to_string()));
        assert_eq!(normalize_sentence("   "), None);
    }

    #[test]
    fn test_normalize_sentence_keeps_abbreviations() {
        assert_eq!(
            normalize_sentence("Painted c. 1890 in oil"),
            Some("Painted c. 1890 in oil.".to_string())
        );
        assert_eq!(
            normalize_sentence(
                "Joseph Mallord William Turner (c. 1775 - 1851) was an English Romantic painter. He travelled widely."
            ),
            Some(
                "Joseph Mallord William Turner (c. 1775 - 1851) was an English Romantic painter."
                    .to_string()
            )
        );
        assert_eq!(
            normalize_sentence("Compare e.g. Monet and Sisley at the river. Then look again."),
            Some("Compare e.g. Monet and Sisley at the river.".to_string())
        );
    }

    #[test]
    fn test_normalize_sentence_keeps_initials() {
        assert_eq!(
            normalize_sentence("J. M. W. Turner painted this c. 1839 in London. It was exhibited later."),
            Some("J. M. W. Turner painted this c. 1839 in London.".to_string())
        );
    }

    #[test]
    fn test_normalize_sentence_short_first_sentence_keeps_whole_text() {
        assert_eq!(
            normalize_sentence("Oil on canvas. Painted outdoors"),
            Some("Oil on canvas. Painted outdoors.".to_string())
        );
    }

    #[test]
    fn test_historical_context_with_initials_stays_whole() {
        let observation = VisionObservation::default();
        let analysis = SynthesizedAnalysis {
            historical_context: "J. M. W. Turner painted this c. 1839 in London.".to_string(),
            ..Default::default()
        };
        let source = SummarySource {
            observation: &observation,
            analysis: &analysis,
            palette: &[],
        };
        let narrative = compose_summary(&source, None, None);
        assert_eq!(
            narrative.units()[14],
            "J. M. W. Turner painted this c. 1839 in London."
        );
    }

    #[test]
    fn test_all_absent_is_forty_canned_and_padding() {
        let observation = VisionObservation::default();
        let analysis = SynthesizedAnalysis::default();
        let source = SummarySource {
            observation: &observation,
            analysis: &analysis,
            palette: &[],
        };

        let narrative = compose_summary(&source, None, None);
        assert_eq!(narrative.len(), NARRATIVE_UNITS);
        assert_eq!(narrative.units()[0], CANNED[0]);
        assert_eq!(narrative.units()[19], CANNED[19]);
        assert!(narrative.units()[20..].iter().all(|u| u == PADDING_SENTENCE));
        assert!(narrative.text().starts_with("This artwork invites careful"));
    }

    #[test]
    fn test_all_present_is_still_forty() {
        let observation = VisionObservation {
            labels: strings(&["bridge", "painting", "river"]),
            objects: strings(&["boat"]),
            colors: strings(&["rgb(100,150,200)"]),
            text: vec![],
            face_count: 1,
        };
        let palette = default_palette();
        let many: Vec<String> = (0..30).map(|i| format!("Extra point {}", i)).collect();
        let analysis = SynthesizedAnalysis {
            style_analysis: "Impressionist in spirit.".to_string(),
            technique_analysis: "Broken color throughout.".to_string(),
            reflection_questions: many.clone(),
            ..Default::default()
        };
        let insight = InterpretationInsight {
            style_insights: strings(&["Impressionism", "Plein air"]),
            technique_insights: many,
            ..Default::default()
        };
        let recall = RecallBundle {
            color_analysis: Some(analyze_colors(&palette)),
            texture_analysis: Some(TextureAnalysis {
                summary: "Thick ridges of paint.".to_string(),
                observations: vec![],
            }),
            wikipedia_data: Some(ReferenceSummary {
                source: "wikipedia".to_string(),
                title: "Bridge".to_string(),
                description: None,
                extract: "A bridge is a structure. It spans water.".to_string(),
                url: None,
                thumbnail: None,
            }),
            similar_artworks: Some(vec![ArtworkRecord {
                source: "met-museum".to_string(),
                title: "Bridge at Argenteuil".to_string(),
                artist: Some("Claude Monet".to_string()),
                date: None,
                medium: None,
                image_url: None,
                url: None,
            }]),
            ..Default::default()
        };
        let source = SummarySource {
            observation: &observation,
            analysis: &analysis,
            palette: &palette,
        };

        let narrative = compose_summary(&source, Some(&insight), Some(&recall));
        assert_eq!(narrative.len(), NARRATIVE_UNITS);
        assert_eq!(narrative.units()[0], "This artwork depicts bridge, painting, river.");
        assert_eq!(narrative.units()[1], "Broken color throughout.");
        assert_eq!(narrative.units()[7], "Stylistically, the work relates to Impressionism.");
        assert_eq!(narrative.units()[11], "Thick ridges of paint.");
        assert_eq!(narrative.units()[16], "A bridge is a structure.");
        assert_eq!(narrative.units()[20], "Plein air.");
        assert!(!narrative.units().iter().any(|u| u == PADDING_SENTENCE));
    }

    #[test]
    fn test_partial_input_pads_after_extras() {
        let observation = VisionObservation::default();
        let analysis = SynthesizedAnalysis {
            reflection_questions: strings(&["why this moment"]),
            ..Default::default()
        };
        let source = SummarySource {
            observation: &observation,
            analysis: &analysis,
            palette: &[],
        };
        let narrative = compose_summary(&source, None, None);
        assert_eq!(narrative.len(), NARRATIVE_UNITS);
        assert_eq!(narrative.units()[20], "Why this moment.");
        assert_eq!(narrative.units()[21], PADDING_SENTENCE);
    }
}
