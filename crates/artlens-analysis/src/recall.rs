//! Recall dispatch: search-term extraction and the reference, museum,
//! texture and similar-artwork lookups that fill a [`RecallBundle`].
//!
//! Network lookups run concurrently and are individually settled, so the
//! dispatcher never returns an error. Color analysis, emotional analysis
//! and learning resources are computed locally and always present.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};

use artlens_core::defaults;
use artlens_core::{
    push_unique, ArtworkRecord, CollectionSource, ColorAnalysis, ColorMood, ColorSample,
    EmotionalAnalysis, EncyclopediaSource, InterpretationInsight, LearningResource, RecallBundle,
    ReferenceSummary, TextureAnalysis, TextureAnalyzer, VisionObservation,
};
use artlens_reference::names;

use crate::color_theory::analyze_colors;
use crate::palette::{default_palette, parse_rgb_descriptor, sample_from_rgb};
use crate::settle::{settle, settle_all};

/// Appended after labels and insights so there is always something to search.
pub const GENERIC_KEYWORDS: [&str; 3] = ["painting", "art history", "fine art"];

/// Placeholder terms that never get an encyclopedia lookup.
pub const TERM_BLOCKLIST: [&str; 12] = [
    "art",
    "artwork",
    "painting",
    "image",
    "picture",
    "photo",
    "photograph",
    "unknown",
    "none",
    "n/a",
    "fine art",
    "art history",
];

const TEXTURE_KEYWORDS: [&str; 4] = ["brush", "texture", "impasto", "palette knife"];

/// Strip punctuation (keeping `-` and `'`) and collapse whitespace.
pub fn normalize_term(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '\'')
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Ordered, de-duplicated search terms, at most five.
///
/// Vision labels come first, then the first two entries of each insight
/// category, then the generic keywords.
pub fn extract_search_terms(
    observation: &VisionObservation,
    insight: &InterpretationInsight,
) -> Vec<String> {
    let per_category = defaults::INSIGHTS_PER_CATEGORY;
    let candidates = observation
        .labels
        .iter()
        .map(String::as_str)
        .chain(
            [
                &insight.style_insights,
                &insight.technique_insights,
                &insight.theme_insights,
                &insight.medium_insights,
            ]
            .into_iter()
            .flat_map(|category| category.iter().take(per_category).map(String::as_str)),
        )
        .chain(GENERIC_KEYWORDS);

    let mut terms = Vec::new();
    for candidate in candidates {
        if terms.len() == defaults::MAX_SEARCH_TERMS {
            break;
        }
        push_unique(&mut terms, &normalize_term(candidate));
    }
    terms
}

pub fn is_blocklisted_term(term: &str) -> bool {
    let term = term.trim().to_lowercase();
    term.is_empty() || TERM_BLOCKLIST.contains(&term.as_str())
}

/// True when any technique insight names a texture-heavy technique.
pub fn mentions_texture_technique(insight: &InterpretationInsight) -> bool {
    insight.technique_insights.iter().any(|technique| {
        let technique = technique.to_lowercase();
        TEXTURE_KEYWORDS.iter().any(|kw| technique.contains(kw))
    })
}

/// Emotional reading from the color mood plus the leading themes.
pub fn emotional_analysis(
    colors: &ColorAnalysis,
    insight: &InterpretationInsight,
) -> EmotionalAnalysis {
    let (base, mood_keywords): (&str, &[&str]) = match colors.mood {
        ColorMood::Energetic => (
            "The vivid palette conveys energy and excitement.",
            &["energy", "vitality"],
        ),
        ColorMood::Dramatic => (
            "Dark values and deep shadows create a dramatic, contemplative atmosphere.",
            &["drama", "tension"],
        ),
        ColorMood::Calm => (
            "Muted color keeps the atmosphere calm and reflective.",
            &["calm", "reflection"],
        ),
        ColorMood::Serene => (
            "Light, airy tones evoke serenity and quiet.",
            &["serenity", "lightness"],
        ),
        ColorMood::Balanced => (
            "A balanced palette supports a measured emotional tone.",
            &["balance", "harmony"],
        ),
    };

    let themes: Vec<&String> = insight.theme_insights.iter().take(2).collect();
    let summary = if themes.is_empty() {
        base.to_string()
    } else {
        format!(
            "{} Themes of {} shape how that mood is read.",
            base,
            themes
                .iter()
                .map(|t| t.to_lowercase())
                .collect::<Vec<_>>()
                .join(" and ")
        )
    };

    let mut keywords = Vec::new();
    for keyword in mood_keywords.iter().copied().chain(themes.iter().map(|t| t.as_str())) {
        push_unique(&mut keywords, keyword);
    }

    EmotionalAnalysis {
        mood: colors.mood,
        summary,
        keywords,
    }
}

/// Further-study links for the specific (non-generic) search terms.
pub fn learning_resources(terms: &[String]) -> Vec<LearningResource> {
    let mut resources = Vec::new();
    for term in terms.iter().filter(|t| !is_blocklisted_term(t)).take(3) {
        resources.push(LearningResource {
            title: format!("{} on Wikipedia", term),
            url: format!(
                "https://en.wikipedia.org/wiki/{}",
                urlencoding::encode(&term.replace(' ', "_"))
            ),
            kind: "encyclopedia".to_string(),
        });
        resources.push(LearningResource {
            title: format!("{} on Google Arts & Culture", term),
            url: format!(
                "https://artsandculture.google.com/search?q={}",
                urlencoding::encode(term)
            ),
            kind: "collection".to_string(),
        });
    }
    resources.push(LearningResource {
        title: "Heilbrunn Timeline of Art History".to_string(),
        url: "https://www.metmuseum.org/toah/".to_string(),
        kind: "timeline".to_string(),
    });
    resources
}

/// Color analysis of the palette, or of the vision color descriptors when
/// no palette was supplied.
fn color_samples(observation: &VisionObservation, palette: &[ColorSample]) -> Vec<ColorSample> {
    if !palette.is_empty() {
        return palette.to_vec();
    }
    let parsed: Vec<_> = observation
        .colors
        .iter()
        .filter_map(|c| parse_rgb_descriptor(c))
        .collect();
    if parsed.is_empty() {
        return default_palette();
    }
    let share = 100.0 / parsed.len() as f64;
    parsed
        .into_iter()
        .map(|rgb| sample_from_rgb(rgb, share))
        .collect()
}

/// Merge per-(term, source) results: term-major order, de-duplicated by
/// case-insensitive (title, artist), capped.
pub fn merge_similar(batches: Vec<Vec<ArtworkRecord>>) -> Vec<ArtworkRecord> {
    let mut seen = Vec::new();
    let mut merged = Vec::new();
    for record in batches.into_iter().flatten() {
        if merged.len() == defaults::MAX_SIMILAR_ARTWORKS {
            break;
        }
        let identity = record.identity();
        if !seen.contains(&identity) {
            seen.push(identity);
            merged.push(record);
        }
    }
    merged
}

/// Dispatches every recall lookup for one analysis.
#[derive(Clone, Default)]
pub struct RecallDispatcher {
    encyclopedia: Option<Arc<dyn EncyclopediaSource>>,
    collections: Vec<Arc<dyn CollectionSource>>,
    texture: Option<Arc<dyn TextureAnalyzer>>,
}

impl RecallDispatcher {
    pub fn new(
        encyclopedia: Option<Arc<dyn EncyclopediaSource>>,
        collections: Vec<Arc<dyn CollectionSource>>,
        texture: Option<Arc<dyn TextureAnalyzer>>,
    ) -> Self {
        Self {
            encyclopedia,
            collections,
            texture,
        }
    }

    pub fn encyclopedia(&self) -> Option<&Arc<dyn EncyclopediaSource>> {
        self.encyclopedia.as_ref()
    }

    pub fn collections(&self) -> &[Arc<dyn CollectionSource>] {
        &self.collections
    }

    /// Collection sources that can be queried: credential-free ones always,
    /// credentialed ones only when configured.
    fn enabled_collections(&self) -> Vec<&Arc<dyn CollectionSource>> {
        self.collections
            .iter()
            .filter(|s| !s.requires_credential() || s.is_configured())
            .collect()
    }

    #[instrument(skip_all, fields(
        subsystem = "analysis",
        component = "recall",
        op = "recall",
    ))]
    pub async fn recall(
        &self,
        observation: &VisionObservation,
        insight: &InterpretationInsight,
        palette: &[ColorSample],
    ) -> RecallBundle {
        let start = Instant::now();
        let search_terms = extract_search_terms(observation, insight);
        debug!(terms = ?search_terms, "Search terms extracted");

        let color_analysis = analyze_colors(&color_samples(observation, palette));
        let emotional = emotional_analysis(&color_analysis, insight);
        let resources = learning_resources(&search_terms);

        let (reference, museums, texture, similar) = tokio::join!(
            self.lookup_reference(&search_terms),
            self.search_museums(search_terms.first().map(String::as_str)),
            self.analyze_texture(observation, insight),
            self.similar_artworks(&search_terms),
        );

        let mut bundle = RecallBundle {
            search_terms,
            color_analysis: Some(color_analysis),
            emotional_analysis: Some(emotional),
            learning_resources: Some(resources),
            ..Default::default()
        };

        if let Some((source, summary)) = reference {
            bundle.sources.insert(source);
            bundle.wikipedia_data = Some(summary);
        }
        for (source, records) in museums {
            let slot = match source.as_str() {
                names::MET_MUSEUM => &mut bundle.met_museum_data,
                names::ART_INSTITUTE => &mut bundle.art_institute_data,
                names::HARVARD => &mut bundle.harvard_data,
                names::RIJKSMUSEUM => &mut bundle.art_search_data,
                other => {
                    debug!(provider = other, "Collection source has no recall slot");
                    continue;
                }
            };
            *slot = Some(records);
            bundle.sources.insert(source);
        }
        if let Some((source, analysis)) = texture {
            bundle.sources.insert(source);
            bundle.texture_analysis = Some(analysis);
        }
        if !similar.is_empty() {
            for record in &similar {
                bundle.sources.insert(record.source.clone());
            }
            bundle.similar_artworks = Some(similar);
        }

        info!(
            sources = ?bundle.sources,
            network_data = bundle.has_network_data(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Recall complete"
        );
        bundle
    }

    /// Encyclopedia summary for the first search term, with exactly one
    /// fallback term when the first is not found.
    async fn lookup_reference(&self, terms: &[String]) -> Option<(String, ReferenceSummary)> {
        let encyclopedia = self.encyclopedia.as_ref()?;
        let name = encyclopedia.name().to_string();

        let primary = terms.first()?;
        if is_blocklisted_term(primary) {
            debug!(provider = %name, term = %primary, "Generic term, skipping encyclopedia lookup");
            return None;
        }

        match settle(&name, "wikipediaData", encyclopedia.summary(primary)).await {
            Some(Some(summary)) => return Some((name, summary)),
            Some(None) => {}
            None => return None,
        }

        let fallback = terms.iter().skip(1).find(|t| !is_blocklisted_term(t))?;
        debug!(provider = %name, term = %primary, fallback = %fallback, "Not found, trying fallback term");
        settle(&name, "wikipediaData", encyclopedia.summary(fallback))
            .await
            .flatten()
            .map(|summary| (name, summary))
    }

    /// One search per enabled collection; empty results leave the slot empty.
    async fn search_museums(&self, term: Option<&str>) -> Vec<(String, Vec<ArtworkRecord>)> {
        let Some(term) = term else {
            return vec![];
        };
        let enabled = self.enabled_collections();
        let results = settle_all(enabled.iter().map(|source| {
            (
                source.name().to_string(),
                "museum".to_string(),
                source.search(term, defaults::MUSEUM_RESULTS),
            )
        }).collect::<Vec<_>>())
        .await;

        enabled
            .iter()
            .zip(results)
            .filter_map(|(source, records)| {
                records
                    .filter(|r| !r.is_empty())
                    .map(|r| (source.name().to_string(), r))
            })
            .collect()
    }

    async fn analyze_texture(
        &self,
        observation: &VisionObservation,
        insight: &InterpretationInsight,
    ) -> Option<(String, TextureAnalysis)> {
        if !mentions_texture_technique(insight) {
            debug!("No texture technique mentioned, skipping texture analysis");
            return None;
        }
        let analyzer = self.texture.as_ref()?;
        let name = analyzer.name().to_string();
        settle(
            &name,
            "textureAnalysis",
            analyzer.analyze_texture(observation, insight),
        )
        .await
        .map(|analysis| (name, analysis))
    }

    /// First two search terms across every enabled collection.
    async fn similar_artworks(&self, terms: &[String]) -> Vec<ArtworkRecord> {
        let enabled = self.enabled_collections();
        let calls = terms
            .iter()
            .take(defaults::SIMILAR_SEARCH_TERMS)
            .flat_map(|term| {
                enabled.iter().map(move |source| {
                    (
                        source.name().to_string(),
                        "similarArtworks".to_string(),
                        source.search(term, defaults::SIMILAR_PER_SOURCE),
                    )
                })
            })
            .collect::<Vec<_>>();
        let batches = settle_all(calls).await;
        merge_similar(batches.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use artlens_core::{Result, Rgb};
    use artlens_reference::mock::{MockCollection, MockEncyclopedia};
    use async_trait::async_trait;

    struct CountingTexture {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextureAnalyzer for CountingTexture {
        fn name(&self) -> &str {
            "texture-mock"
        }

        async fn analyze_texture(
            &self,
            _observation: &VisionObservation,
            _insight: &InterpretationInsight,
        ) -> Result<TextureAnalysis> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(TextureAnalysis {
                summary: "Heavy impasto.".to_string(),
                observations: vec![],
            })
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn observation(labels: &[&str]) -> VisionObservation {
        VisionObservation {
            labels: strings(labels),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_term() {
        assert_eq!(normalize_term("  Post-Impressionism!! "), "Post-Impressionism");
        assert_eq!(normalize_term("Van Gogh's\t(late)   style"), "Van Gogh's late style");
        assert_eq!(normalize_term("..."), "");
    }

    #[test]
    fn test_search_terms_order_and_cap() {
        let insight = InterpretationInsight {
            style_insights: strings(&["Impressionism", "Plein air", "ignored third"]),
            technique_insights: strings(&["broken color"]),
            ..Default::default()
        };
        let terms = extract_search_terms(&observation(&["Bridge", "bridge", "River."]), &insight);
        assert_eq!(
            terms,
            vec!["Bridge", "River", "Impressionism", "Plein air", "broken color"]
        );
    }

    #[test]
    fn test_search_terms_fall_back_to_generic() {
        let terms = extract_search_terms(&VisionObservation::default(), &InterpretationInsight::default());
        assert_eq!(terms, vec!["painting", "art history", "fine art"]);
    }

    #[test]
    fn test_blocklist() {
        assert!(is_blocklisted_term("Painting"));
        assert!(is_blocklisted_term(" n/a "));
        assert!(is_blocklisted_term(""));
        assert!(!is_blocklisted_term("Impressionism"));
    }

    #[test]
    fn test_texture_keywords() {
        let with = |t: &str| InterpretationInsight {
            technique_insights: strings(&[t]),
            ..Default::default()
        };
        assert!(mentions_texture_technique(&with("Thick IMPASTO")));
        assert!(mentions_texture_technique(&with("visible brushstrokes")));
        assert!(mentions_texture_technique(&with("Palette knife work")));
        assert!(!mentions_texture_technique(&with("glazing")));
        assert!(!mentions_texture_technique(&InterpretationInsight {
            style_insights: strings(&["impasto"]),
            ..Default::default()
        }));
    }

    #[test]
    fn test_merge_similar_dedups_and_caps() {
        let record = |title: &str, artist: &str| ArtworkRecord {
            source: "s".to_string(),
            title: title.to_string(),
            artist: Some(artist.to_string()),
            date: None,
            medium: None,
            image_url: None,
            url: None,
        };
        let merged = merge_similar(vec![
            vec![record("A", "x"), record("B", "y")],
            vec![record("a", "X"), record("C", "z"), record("D", "w")],
            vec![record("E", "v"), record("F", "u"), record("G", "t")],
        ]);
        let titles: Vec<&str> = merged.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C", "D", "E", "F"]);
    }

    #[test]
    fn test_color_samples_from_descriptors() {
        let obs = VisionObservation {
            colors: strings(&["rgb(100,150,200)", "bogus"]),
            ..Default::default()
        };
        let samples = color_samples(&obs, &[]);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].rgb, Rgb::new(100, 150, 200));
        assert_eq!(color_samples(&VisionObservation::default(), &[]), default_palette());
    }

    #[test]
    fn test_learning_resources_skip_generic_terms() {
        let resources = learning_resources(&strings(&["painting", "Claude Monet"]));
        assert_eq!(resources.len(), 3);
        assert_eq!(resources[0].url, "https://en.wikipedia.org/wiki/Claude_Monet");
        assert_eq!(resources[2].kind, "timeline");
    }

    #[tokio::test]
    async fn test_texture_gating() {
        let texture = Arc::new(CountingTexture {
            calls: AtomicUsize::new(0),
        });
        let dispatcher = RecallDispatcher::new(None, vec![], Some(texture.clone()));

        let impasto = InterpretationInsight {
            technique_insights: strings(&["impasto"]),
            ..Default::default()
        };
        let bundle = dispatcher
            .recall(&VisionObservation::default(), &impasto, &[])
            .await;
        assert_eq!(texture.calls.load(Ordering::SeqCst), 1);
        assert!(bundle.texture_analysis.is_some());
        assert!(bundle.sources.contains("texture-mock"));

        let glazing = InterpretationInsight {
            technique_insights: strings(&["glazing"]),
            ..Default::default()
        };
        let bundle = dispatcher
            .recall(&VisionObservation::default(), &glazing, &[])
            .await;
        assert_eq!(texture.calls.load(Ordering::SeqCst), 1);
        assert!(bundle.texture_analysis.is_none());
    }

    #[tokio::test]
    async fn test_encyclopedia_fallback_tried_once() {
        let wiki = MockEncyclopedia::new().with_article("River", "A river is a natural stream.");
        let dispatcher = RecallDispatcher::new(Some(Arc::new(wiki.clone())), vec![], None);

        let bundle = dispatcher
            .recall(
                &observation(&["Zzyzx", "River", "Lake"]),
                &InterpretationInsight::default(),
                &[],
            )
            .await;
        assert_eq!(wiki.lookups(), vec!["Zzyzx", "River"]);
        assert_eq!(
            bundle.wikipedia_data.map(|s| s.title),
            Some("River".to_string())
        );
        assert!(bundle.sources.contains("wikipedia"));
    }

    #[tokio::test]
    async fn test_encyclopedia_gives_up_after_one_fallback() {
        let wiki = MockEncyclopedia::new().with_article("Lake", "A lake.");
        let dispatcher = RecallDispatcher::new(Some(Arc::new(wiki.clone())), vec![], None);

        let bundle = dispatcher
            .recall(
                &observation(&["Zzyzx", "Qwerty", "Lake"]),
                &InterpretationInsight::default(),
                &[],
            )
            .await;
        assert_eq!(wiki.lookups(), vec!["Zzyzx", "Qwerty"]);
        assert!(bundle.wikipedia_data.is_none());
    }

    #[tokio::test]
    async fn test_generic_first_term_skips_encyclopedia() {
        let wiki = MockEncyclopedia::new();
        let dispatcher = RecallDispatcher::new(Some(Arc::new(wiki.clone())), vec![], None);
        dispatcher
            .recall(&observation(&["Painting", "Bridge"]), &InterpretationInsight::default(), &[])
            .await;
        assert!(wiki.lookups().is_empty());
    }

    #[tokio::test]
    async fn test_museum_slots_and_credentials() {
        let met = MockCollection::new(names::MET_MUSEUM).with_records(&[("Water Lilies", "Monet")]);
        let harvard = MockCollection::new(names::HARVARD)
            .credentialed(false)
            .with_records(&[("Unused", "Nobody")]);
        let rijks = MockCollection::new(names::RIJKSMUSEUM)
            .credentialed(true)
            .with_records(&[("The Night Watch", "Rembrandt")]);
        let artic = MockCollection::new(names::ART_INSTITUTE).failing();

        let dispatcher = RecallDispatcher::new(
            None,
            vec![
                Arc::new(met.clone()),
                Arc::new(artic.clone()),
                Arc::new(harvard.clone()),
                Arc::new(rijks.clone()),
            ],
            None,
        );
        let bundle = dispatcher
            .recall(&observation(&["Bridge"]), &InterpretationInsight::default(), &[])
            .await;

        assert_eq!(harvard.search_count(), 0);
        assert!(bundle.harvard_data.is_none());
        assert!(bundle.art_institute_data.is_none());
        assert_eq!(bundle.met_museum_data.as_ref().map(Vec::len), Some(1));
        assert_eq!(bundle.art_search_data.as_ref().map(Vec::len), Some(1));
        assert!(bundle.sources.contains(names::MET_MUSEUM));
        assert!(bundle.sources.contains(names::RIJKSMUSEUM));
        assert!(!bundle.sources.contains(names::ART_INSTITUTE));
        assert!(bundle.has_network_data());
    }

    #[tokio::test]
    async fn test_similar_artworks_term_major() {
        let met = MockCollection::new(names::MET_MUSEUM)
            .with_term_records("Bridge", &[("Met Bridge", "A"), ("Shared", "Z")])
            .with_term_records("River", &[("Met River", "B")]);
        let artic = MockCollection::new(names::ART_INSTITUTE)
            .with_term_records("Bridge", &[("Shared", "z"), ("AIC Bridge", "C")])
            .with_term_records("River", &[("AIC River", "D")]);

        let dispatcher = RecallDispatcher::new(
            None,
            vec![Arc::new(met.clone()), Arc::new(artic)],
            None,
        );
        let bundle = dispatcher
            .recall(&observation(&["Bridge", "River", "Lake"]), &InterpretationInsight::default(), &[])
            .await;

        let titles: Vec<String> = bundle
            .similar_artworks
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(
            titles,
            vec!["Met Bridge", "Shared", "AIC Bridge", "Met River", "AIC River"]
        );
        // Museum slot search plus two similar-artwork searches.
        assert_eq!(met.search_count(), 3);
    }

    #[tokio::test]
    async fn test_local_slots_always_present() {
        let bundle = RecallDispatcher::default()
            .recall(&VisionObservation::default(), &InterpretationInsight::default(), &[])
            .await;
        assert!(bundle.color_analysis.is_some());
        assert!(bundle.emotional_analysis.is_some());
        assert!(bundle.learning_resources.is_some());
        assert!(!bundle.has_network_data());
        assert!(bundle.sources.is_empty());
    }
}
