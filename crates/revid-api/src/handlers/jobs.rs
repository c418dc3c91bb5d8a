//! Job dispatch and progress polling handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use revid_models::{JobOptions, TaskId};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::runner;
use crate::state::AppState;

/// Dispatch request body.
#[derive(Debug, Deserialize)]
pub struct DispatchJobRequest {
    pub input_file: String,
    pub output_prefix: String,
    #[serde(flatten)]
    pub options: JobOptions,
}

/// Dispatch response.
#[derive(Serialize)]
pub struct DispatchJobResponse {
    pub task_id: TaskId,
}

/// Response for a task ID the registry has never seen.
#[derive(Serialize)]
struct UnknownTaskResponse {
    status: &'static str,
}

fn validate_reference(value: &str, what: &str) -> ApiResult<()> {
    if value.is_empty() {
        return Err(ApiError::bad_request(format!("Missing {}", what)));
    }
    if value.contains("..") || value.contains('/') || value.contains('\\') {
        return Err(ApiError::bad_request(format!("Invalid {}", what)));
    }
    Ok(())
}

/// Register a task and launch the job without blocking the response.
pub async fn dispatch_job(
    State(state): State<AppState>,
    Json(request): Json<DispatchJobRequest>,
) -> ApiResult<(StatusCode, Json<DispatchJobResponse>)> {
    validate_reference(&request.input_file, "input file")?;
    validate_reference(&request.output_prefix, "output prefix")?;

    let task_id = TaskId::new();
    state.registry.create(task_id.clone()).await;

    let input_path = state.config.upload_dir.join(&request.input_file);
    runner::spawn(
        Arc::clone(&state.registry),
        task_id.clone(),
        input_path,
        state.config.output_dir.clone(),
        request.output_prefix,
        request.options,
    );

    metrics::record_job_dispatched();
    info!("Dispatched job {} for {}", task_id, request.input_file);

    Ok((StatusCode::ACCEPTED, Json(DispatchJobResponse { task_id })))
}

/// Return the current registry entry for a task, or an `unknown` response.
pub async fn get_progress(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Response {
    match state.registry.get(&TaskId::from_string(task_id)).await {
        Some(task) => Json(task).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(UnknownTaskResponse { status: "unknown" }),
        )
            .into_response(),
    }
}
