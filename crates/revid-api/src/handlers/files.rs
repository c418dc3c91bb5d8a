//! Output file serving handlers.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Serve an output file as a download attachment.
pub async fn download_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    serve_output(&state, &filename, true).await
}

/// Serve an output file inline (e.g. for playback in the browser).
pub async fn serve_video(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    serve_output(&state, &filename, false).await
}

async fn serve_output(state: &AppState, filename: &str, attachment: bool) -> ApiResult<Response> {
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(ApiError::bad_request("Invalid file name"));
    }

    let path = state.config.output_dir.join(filename);
    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ApiError::not_found("File not found")
        } else {
            ApiError::internal(format!("Failed to read file: {}", e))
        }
    })?;

    let content_type = content_type_for(filename);

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, bytes.len());

    if attachment {
        builder = builder.header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        );
    }

    builder
        .body(Body::from(bytes))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {}", e)))
}

fn content_type_for(filename: &str) -> &'static str {
    let lower = filename.to_lowercase();
    if lower.ends_with(".mp4") {
        "video/mp4"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_matches_extension() {
        assert_eq!(content_type_for("clip_reversed.mp4"), "video/mp4");
        assert_eq!(content_type_for("clip_first.JPG"), "image/jpeg");
        assert_eq!(content_type_for("clip.bin"), "application/octet-stream");
    }
}
