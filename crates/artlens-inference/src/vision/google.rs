//! Google Cloud Vision `images:annotate` provider.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use artlens_core::defaults;
use artlens_core::{
    Error, GoogleVisionConfig, ImageInput, ProviderObservation, Result, VisionProvider,
};

const PROVIDER: &str = "google-vision";

/// Labels, objects, dominant colors, text and faces from Cloud Vision.
pub struct GoogleVisionProvider {
    client: Client,
    config: GoogleVisionConfig,
}

impl GoogleVisionProvider {
    pub fn new(config: GoogleVisionConfig, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: super::http_client(timeout_secs)?,
            config,
        })
    }

    fn build_request(image: &ImageInput) -> AnnotateRequest {
        let feature = |kind: &str, max_results: Option<u32>| Feature {
            feature_type: kind.to_string(),
            max_results,
        };
        AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: RequestImage {
                    content: image.to_base64(),
                },
                features: vec![
                    feature("LABEL_DETECTION", Some(defaults::GOOGLE_VISION_MAX_LABELS)),
                    feature("OBJECT_LOCALIZATION", Some(defaults::GOOGLE_VISION_MAX_LABELS)),
                    feature("IMAGE_PROPERTIES", None),
                    feature("TEXT_DETECTION", None),
                    feature("FACE_DETECTION", None),
                ],
            }],
        }
    }
}

#[async_trait]
impl VisionProvider for GoogleVisionProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn observe(&self, image: &ImageInput) -> Result<ProviderObservation> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            Error::ProviderUnavailable(format!("{}: GOOGLE_VISION_API_KEY not set", PROVIDER))
        })?;

        let start = Instant::now();
        let url = format!(
            "{}/v1/images:annotate",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&Self::build_request(image))
            .send()
            .await
            .map_err(|e| Error::Request(format!("{}: {}", PROVIDER, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ProviderUnavailable(format!(
                "{} returned {}: {}",
                PROVIDER, status, body
            )));
        }

        let body: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("{}: {}", PROVIDER, e)))?;

        let annotation = body.responses.into_iter().next().unwrap_or_default();
        if let Some(err) = annotation.error {
            return Err(Error::ProviderUnavailable(format!(
                "{}: {}",
                PROVIDER, err.message
            )));
        }

        let observation = annotation.into_observation();
        debug!(
            provider = PROVIDER,
            result_count = observation.labels.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Vision annotate finished"
        );
        Ok(observation)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest {
    image: RequestImage,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct RequestImage {
    content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature {
    #[serde(rename = "type")]
    feature_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_results: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageAnnotation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageAnnotation {
    #[serde(default)]
    label_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    localized_object_annotations: Vec<LocalizedObject>,
    #[serde(default)]
    image_properties_annotation: Option<ImageProperties>,
    #[serde(default)]
    text_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    face_annotations: Vec<serde_json::Value>,
    #[serde(default)]
    error: Option<AnnotateError>,
}

#[derive(Debug, Deserialize)]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct LocalizedObject {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageProperties {
    dominant_colors: Option<DominantColors>,
}

#[derive(Debug, Deserialize)]
struct DominantColors {
    #[serde(default)]
    colors: Vec<ColorInfo>,
}

#[derive(Debug, Deserialize)]
struct ColorInfo {
    color: ColorValue,
}

/// Channels are omitted by the API when zero.
#[derive(Debug, Deserialize)]
struct ColorValue {
    #[serde(default)]
    red: f64,
    #[serde(default)]
    green: f64,
    #[serde(default)]
    blue: f64,
}

#[derive(Debug, Deserialize)]
struct AnnotateError {
    #[serde(default)]
    message: String,
}

impl ImageAnnotation {
    fn into_observation(self) -> ProviderObservation {
        let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;

        let colors = self
            .image_properties_annotation
            .and_then(|p| p.dominant_colors)
            .map(|d| d.colors)
            .unwrap_or_default()
            .into_iter()
            .map(|c| {
                format!(
                    "rgb({},{},{})",
                    channel(c.color.red),
                    channel(c.color.green),
                    channel(c.color.blue)
                )
            })
            .collect();

        // The first text annotation holds the full detected text.
        let text = self
            .text_annotations
            .first()
            .map(|t| {
                t.description
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        ProviderObservation {
            labels: self
                .label_annotations
                .into_iter()
                .map(|a| a.description)
                .filter(|d| !d.is_empty())
                .collect(),
            objects: self
                .localized_object_annotations
                .into_iter()
                .map(|o| o.name)
                .filter(|n| !n.is_empty())
                .collect(),
            colors,
            text,
            face_count: Some(self.face_annotations.len() as u32),
        }
    }
}
