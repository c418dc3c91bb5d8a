//! Upload and preview handler.

use std::path::Path;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::{error, info};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// File extensions accepted for upload.
const ALLOWED_VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "mov", "avi", "mkv"];

/// Multipart field carrying the video payload.
const VIDEO_FIELD: &str = "video_file";

/// Upload response.
#[derive(Serialize)]
pub struct UploadPreviewResponse {
    pub status: String,
    pub preview_url: String,
    pub input_file: String,
    pub output_prefix: String,
}

fn allowed_video(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ALLOWED_VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn validate_filename(filename: &str) -> ApiResult<()> {
    if filename.is_empty() {
        return Err(ApiError::bad_request("No selected file"));
    }
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(ApiError::bad_request("Invalid file name"));
    }
    Ok(())
}

/// Accept a video upload and synchronously produce a preview still.
///
/// The upload is persisted before preview extraction runs, so a preview
/// failure returns a server error while the input file remains on disk.
pub async fn upload_preview(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadPreviewResponse>> {
    let mut upload: Option<(String, axum::body::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some(VIDEO_FIELD) {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;
            upload = Some((filename, data));
        }
    }

    let (filename, data) = upload.ok_or_else(|| ApiError::bad_request("No file part"))?;
    validate_filename(&filename)?;
    if !allowed_video(&filename) {
        return Err(ApiError::bad_request("Invalid file type."));
    }

    let input_path = state.config.upload_dir.join(&filename);
    tokio::fs::write(&input_path, &data)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to save upload: {}", e)))?;
    info!("Uploaded file saved to {}", input_path.display());
    metrics::record_upload();

    // Output prefix and preview name derive from the original base name.
    let stem = Path::new(&filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(&filename)
        .to_string();
    let preview_filename = format!("{}_preview.jpg", stem);
    let preview_path = state.config.preview_dir.join(&preview_filename);

    if let Err(e) = revid_media::extract_first_frame(&input_path, &preview_path).await {
        error!("Error extracting preview: {}", e.diagnostic());
        return Err(ApiError::internal("Error extracting preview."));
    }

    Ok(Json(UploadPreviewResponse {
        status: "success".to_string(),
        preview_url: format!("/previews/{}", preview_filename),
        input_file: filename,
        output_prefix: stem,
    }))
}
