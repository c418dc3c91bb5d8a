//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::files::{download_file, serve_video};
use crate::handlers::health::health;
use crate::handlers::jobs::{dispatch_job, get_progress};
use crate::handlers::upload::upload_preview;
use crate::middleware::cors_layer;
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let previews = ServeDir::new(&state.config.preview_dir);

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/upload_preview", post(upload_preview))
        .route("/process_video_async", post(dispatch_job))
        .route("/progress/:task_id", get(get_progress))
        .route("/download/:filename", get(download_file))
        .route("/video/:filename", get(serve_video))
        .nest_service("/previews", previews)
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state);

    if let Some(handle) = metrics_handle {
        app = app.route(
            "/metrics",
            get(move || {
                let handle = handle.clone();
                async move { handle.render() }
            }),
        );
    }

    app
}
