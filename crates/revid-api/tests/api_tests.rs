//! API integration tests.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use revid_api::{create_router, ApiConfig, AppState};

fn test_app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = ApiConfig {
        upload_dir: dir.path().join("uploads"),
        output_dir: dir.path().join("outputs"),
        preview_dir: dir.path().join("previews"),
        ..ApiConfig::default()
    };
    config.ensure_dirs().unwrap();

    let app = create_router(AppState::new(config), None);
    (app, dir)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_json(app: &Router, uri: &str, body: Value) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

fn multipart_upload(filename: &str, content: &[u8]) -> (String, Vec<u8>) {
    let boundary = "test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"video_file\"; filename=\"{}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n",
            boundary, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    (
        format!("multipart/form-data; boundary={}", boundary),
        body,
    )
}

async fn upload(app: &Router, filename: &str, content: &[u8]) -> axum::response::Response {
    let (content_type, body) = multipart_upload(filename, content);
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/upload_preview")
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Poll progress until the task leaves `processing`.
async fn poll_until_terminal(app: &Router, task_id: &str) -> Value {
    for _ in 0..100 {
        let response = get(app, &format!("/progress/{}", task_id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let status = body_json(response).await;
        if status["status"] != "processing" {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("task {} never reached a terminal state", task_id);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _dir) = test_app();
    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_task_returns_unknown_status() {
    let (app, _dir) = test_app();

    let response = get(&app, "/progress/never-issued").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["status"], "unknown");
}

#[tokio::test]
async fn test_dispatch_returns_accepted_before_completion() {
    let (app, _dir) = test_app();

    let response = post_json(
        &app,
        "/process_video_async",
        json!({
            "input_file": "clip.mp4",
            "output_prefix": "clip",
            "extract_first": false,
            "extract_last": false,
            "reverse_video": false
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = body_json(response).await;
    let task_id = body["task_id"].as_str().unwrap().to_string();
    assert!(!task_id.is_empty());

    // A job with no requested operations completes with an empty result map.
    let status = poll_until_terminal(&app, &task_id).await;
    assert_eq!(status["status"], "completed");
    assert_eq!(status["result"], json!({}));
}

#[tokio::test]
async fn test_failing_job_is_reported_via_progress() {
    let (app, _dir) = test_app();

    // Input was never uploaded, so the first operation fails.
    let response = post_json(
        &app,
        "/process_video_async",
        json!({
            "input_file": "missing.mp4",
            "output_prefix": "missing"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = body_json(response).await;
    let task_id = body["task_id"].as_str().unwrap().to_string();

    let status = poll_until_terminal(&app, &task_id).await;
    assert_eq!(status["status"], "error");
    assert!(status["result"].as_str().unwrap().contains("File not found"));
}

#[tokio::test]
async fn test_concurrent_dispatches_track_independently() {
    let (app, _dir) = test_app();

    let mut task_ids = Vec::new();
    for prefix in ["a", "b"] {
        let response = post_json(
            &app,
            "/process_video_async",
            json!({
                "input_file": "clip.mp4",
                "output_prefix": prefix,
                "extract_first": false,
                "extract_last": false,
                "reverse_video": false
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body = body_json(response).await;
        task_ids.push(body["task_id"].as_str().unwrap().to_string());
    }

    assert_ne!(task_ids[0], task_ids[1]);
    for task_id in &task_ids {
        let status = poll_until_terminal(&app, task_id).await;
        assert_eq!(status["status"], "completed");
    }
}

#[tokio::test]
async fn test_dispatch_rejects_missing_fields() {
    let (app, _dir) = test_app();

    let response = post_json(&app, "/process_video_async", json!({})).await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_upload_rejects_disallowed_extension() {
    let (app, dir) = test_app();

    let response = upload(&app, "clip.txt", b"not a video").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["status"], "error");

    // Nothing was persisted.
    let uploads = std::fs::read_dir(dir.path().join("uploads")).unwrap().count();
    assert_eq!(uploads, 0);
}

#[tokio::test]
async fn test_upload_rejects_missing_file_part() {
    let (app, _dir) = test_app();

    let boundary = "test-boundary";
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/upload_preview")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(format!("--{}--\r\n", boundary)))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_persists_file_even_when_preview_fails() {
    let (app, dir) = test_app();

    // Garbage bytes: preview extraction fails whether or not FFmpeg is
    // installed, but the upload must remain on disk.
    let response = upload(&app, "clip.mp4", b"garbage bytes").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(dir.path().join("uploads").join("clip.mp4").exists());
}

#[tokio::test]
async fn test_download_unknown_file_is_not_found() {
    let (app, _dir) = test_app();
    let response = get(&app, "/download/nope.mp4").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_output_files_are_served() {
    let (app, dir) = test_app();
    std::fs::write(dir.path().join("outputs").join("clip_reversed.mp4"), b"data").unwrap();

    let response = get(&app, "/video/clip_reversed.mp4").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "video/mp4"
    );

    let response = get(&app, "/download/clip_reversed.mp4").await;
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment"));
}
