//! Analysis HTTP handlers.
//!
//! Both routes run the full pipeline on one image and return the
//! educational analysis as camelCase JSON.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use artlens_core::{EducationalAnalysis, ImageInput};

use crate::{ApiError, AppState};

/// Request body for analyzing a base64 image.
#[derive(Debug, Deserialize)]
pub struct AnalyzeImageRequest {
    /// Plain base64 or a `data:<mime>;base64,` URI.
    pub image_data: String,
    /// Overrides the MIME type from the data URI or sniffing.
    pub mime_type: Option<String>,
}

/// Analyze a base64-encoded image.
///
/// # Returns
/// - 200 OK with the educational analysis
/// - 400 Bad Request if image_data is empty or not base64
/// - 502 Bad Gateway if every provider failed
pub async fn analyze_image(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeImageRequest>,
) -> Result<Json<EducationalAnalysis>, ApiError> {
    let image = ImageInput::from_base64(&req.image_data, req.mime_type.as_deref())?;
    run(&state, image).await
}

/// Analyze an uploaded image.
///
/// # Multipart Fields
/// - `image`: image file (required)
pub async fn analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<EducationalAnalysis>, ApiError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut content_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("image") {
            content_type = field.content_type().map(|c| c.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?
                    .to_vec(),
            );
        }
    }

    let bytes = file_data
        .ok_or_else(|| ApiError::BadRequest("Missing image in multipart form".to_string()))?;
    // Browsers send octet-stream for unknown files; let sniffing decide.
    let mime_type = content_type.filter(|c| c != "application/octet-stream");
    let image = ImageInput::from_bytes(bytes, mime_type.as_deref())?;
    run(&state, image).await
}

async fn run(state: &AppState, image: ImageInput) -> Result<Json<EducationalAnalysis>, ApiError> {
    let analysis = state.analyzer.analyze(image).await?;
    info!(
        analysis_id = %analysis.id,
        confidence = analysis.confidence,
        "Analysis served"
    );
    Ok(Json(analysis))
}
