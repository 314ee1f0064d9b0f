//! End-to-end pipeline tests against mock providers.

use std::io::Cursor;
use std::sync::Arc;

use image::{ImageFormat, Rgba, RgbaImage};

use artlens_analysis::{Analyzer, PADDING_SENTENCE};
use artlens_core::defaults::NARRATIVE_UNITS;
use artlens_core::{Error, ImageInput, ProviderObservation};
use artlens_inference::mock::{MockGenerationBackend, MockVisionProvider};
use artlens_reference::mock::{MockCollection, MockEncyclopedia};

const INTERPRETATION_REPLY: &str = r#"{
  "styleInsights": ["Impressionism"],
  "techniqueInsights": ["impasto brushwork"],
  "themeInsights": ["modern life"],
  "mediumInsights": ["oil on canvas"],
  "reflectionQuestions": ["What time of day is shown?"],
  "learningObjectives": ["Identify broken color"]
}"#;

const CALM_INTERPRETATION_REPLY: &str = r#"{
  "styleInsights": ["Minimalism"],
  "techniqueInsights": ["flat color fields"]
}"#;

const SYNTHESIS_REPLY: &str = r#"Here is the analysis:
{
  "styleAnalysis": "The loose handling places the work within Impressionism.",
  "techniqueAnalysis": "Thick strokes of paint build up the water.",
  "themeAnalysis": "The bridge links nature and industry.",
  "artMovements": ["Impressionism"],
  "discussionPrompts": ["Why paint a bridge?"]
}"#;

const TEXTURE_REPLY: &str =
    r#"{"summary": "Raised ridges of paint catch the light.", "observations": ["ridges"]}"#;

fn png_bytes() -> Vec<u8> {
    let mut img = RgbaImage::new(40, 40);
    for (x, _, pixel) in img.enumerate_pixels_mut() {
        *pixel = if x < 20 {
            Rgba([100, 150, 200, 255])
        } else {
            Rgba([200, 80, 40, 255])
        };
    }
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

fn image() -> ImageInput {
    ImageInput::from_bytes(png_bytes(), None).unwrap()
}

fn bridge_observation() -> ProviderObservation {
    ProviderObservation {
        labels: vec!["bridge".to_string(), "painting".to_string()],
        colors: vec!["rgb(100,150,200)".to_string()],
        ..Default::default()
    }
}

fn generation(interpretation: &str) -> MockGenerationBackend {
    MockGenerationBackend::new()
        .with_response_mapping("art historian", interpretation)
        .with_response_mapping("conservator", TEXTURE_REPLY)
        .with_response_mapping("curator", SYNTHESIS_REPLY)
}

#[tokio::test]
async fn test_sources_include_succeeding_providers_only() {
    let backend = generation(INTERPRETATION_REPLY);
    let analyzer = Analyzer::builder()
        .with_vision_provider(Arc::new(MockVisionProvider::new(
            "google-vision",
            bridge_observation(),
        )))
        .with_vision_provider(Arc::new(MockVisionProvider::failing("huggingface")))
        .with_generation_backend(Arc::new(backend.clone()))
        .with_encyclopedia(Arc::new(
            MockEncyclopedia::new()
                .with_article("bridge", "A bridge is a structure spanning an obstacle.")
                .with_article("Impressionism", "Impressionism is a 19th-century movement."),
        ))
        .with_collection_source(Arc::new(
            MockCollection::new("met-museum").with_records(&[("The Bridge", "Claude Monet")]),
        ))
        .with_collection_source(Arc::new(MockCollection::new("harvard").failing()))
        .build();

    let analysis = analyzer.analyze(image()).await.unwrap();

    for expected in ["google-vision", "openai", "wikipedia", "met-museum", "color-extractor"] {
        assert!(analysis.sources.contains(expected), "missing {}", expected);
    }
    assert!(!analysis.sources.contains("huggingface"));
    assert!(!analysis.sources.contains("harvard"));

    assert_eq!(analysis.observation.labels, vec!["bridge", "painting"]);
    assert_eq!(
        analysis.style_analysis,
        "The loose handling places the work within Impressionism."
    );
    // Fields the synthesis left out are filled locally.
    assert!(!analysis.historical_context.is_empty());
    assert!(!analysis.palette.is_empty());
    assert_eq!(analysis.reference.as_ref().map(|r| r.title.as_str()), Some("bridge"));
    assert_eq!(analysis.movement_context.len(), 1);
    assert_eq!(analysis.similar_artworks[0].title, "The Bridge");
    assert_eq!(analysis.narrative_units.len(), NARRATIVE_UNITS);
    assert!(analysis.confidence <= 1.0);
}

#[tokio::test]
async fn test_confidence_with_labels_and_objects_only() {
    let observation = ProviderObservation {
        labels: vec!["bridge".to_string()],
        objects: vec!["boat".to_string()],
        ..Default::default()
    };
    let analyzer = Analyzer::builder()
        .with_vision_provider(Arc::new(MockVisionProvider::new("google-vision", observation)))
        .build();

    let analysis = analyzer.analyze(image()).await.unwrap();
    assert!((analysis.confidence - 0.7).abs() < 1e-9);
    assert!(!analysis.sources.contains("openai"));
}

#[tokio::test]
async fn test_texture_stage_gated_on_technique_keywords() {
    let textured = generation(INTERPRETATION_REPLY);
    Analyzer::builder()
        .with_vision_provider(Arc::new(MockVisionProvider::new(
            "google-vision",
            bridge_observation(),
        )))
        .with_generation_backend(Arc::new(textured.clone()))
        .build()
        .analyze(image())
        .await
        .unwrap();
    assert_eq!(textured.calls_containing("conservator"), 1);

    let calm = generation(CALM_INTERPRETATION_REPLY);
    Analyzer::builder()
        .with_vision_provider(Arc::new(MockVisionProvider::new(
            "google-vision",
            bridge_observation(),
        )))
        .with_generation_backend(Arc::new(calm.clone()))
        .build()
        .analyze(image())
        .await
        .unwrap();
    assert_eq!(calm.calls_containing("conservator"), 0);
    assert_eq!(calm.calls_containing("curator"), 1);
}

#[tokio::test]
async fn test_everything_failing_is_no_data() {
    let analyzer = Analyzer::builder()
        .with_vision_provider(Arc::new(MockVisionProvider::failing("google-vision")))
        .with_vision_provider(Arc::new(MockVisionProvider::failing("huggingface")))
        .with_generation_backend(Arc::new(MockGenerationBackend::new().failing()))
        .with_encyclopedia(Arc::new(MockEncyclopedia::new().failing()))
        .with_collection_source(Arc::new(MockCollection::new("met-museum").failing()))
        .build();

    let err = analyzer.analyze(image()).await.unwrap_err();
    assert!(matches!(err, Error::NoDataAvailable));
}

#[tokio::test]
async fn test_vision_only_uses_fallbacks() {
    let analyzer = Analyzer::builder()
        .with_vision_provider(Arc::new(MockVisionProvider::new(
            "google-vision",
            bridge_observation(),
        )))
        .build();

    let analysis = analyzer.analyze(image()).await.unwrap();
    assert_eq!(analysis.narrative_units.len(), NARRATIVE_UNITS);
    assert_eq!(
        analysis.narrative_units[0],
        "This artwork depicts bridge, painting."
    );
    assert!(analysis
        .narrative_units
        .iter()
        .any(|unit| unit == PADDING_SENTENCE));
    assert!(!analysis.style_analysis.is_empty());
    assert!(!analysis.reflection_questions.is_empty());
}

#[tokio::test]
async fn test_undecodable_image_still_analyzed() {
    let analyzer = Analyzer::builder()
        .with_vision_provider(Arc::new(MockVisionProvider::new(
            "google-vision",
            bridge_observation(),
        )))
        .build();
    let input = ImageInput::from_bytes(b"not an image".to_vec(), Some("image/png")).unwrap();

    let analysis = analyzer.analyze(input).await.unwrap();
    assert_eq!(analysis.palette, artlens_analysis::default_palette());
    assert!(!analysis.sources.contains("color-extractor"));
    assert!(analysis.sources.contains("google-vision"));
}

#[tokio::test]
async fn test_analysis_serializes_camel_case() {
    let analyzer = Analyzer::builder()
        .with_vision_provider(Arc::new(MockVisionProvider::new(
            "google-vision",
            bridge_observation(),
        )))
        .build();
    let analysis = analyzer.analyze(image()).await.unwrap();

    let json = serde_json::to_value(&analysis).unwrap();
    assert!(json.get("styleAnalysis").is_some());
    assert!(json.get("narrativeUnits").is_some());
    assert_eq!(json["sources"][0], "color-extractor");
}
