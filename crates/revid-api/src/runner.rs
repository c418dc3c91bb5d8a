//! Background job runner.
//!
//! A dispatched job runs on its own tokio task, executing the requested
//! operations in fixed order: first frame, last frame, reversal. The runner
//! owns its registry entry for the duration of the job and performs exactly
//! one terminal write on every exit path, including panics.

use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::FutureExt;
use tokio::task::JoinHandle;
use tracing::{error, info};

use revid_media::{extract_first_frame, extract_last_frame, reverse_video, MediaResult};
use revid_models::{JobOptions, OutputKind, TaskId};

use crate::metrics;
use crate::registry::TaskRegistry;

/// Launch a job on an independent tokio task.
///
/// Returns immediately; the caller must already have created the registry
/// entry for `task_id`.
pub fn spawn(
    registry: Arc<TaskRegistry>,
    task_id: TaskId,
    input_path: PathBuf,
    output_dir: PathBuf,
    output_prefix: String,
    options: JobOptions,
) -> JoinHandle<()> {
    tokio::spawn(run(
        registry,
        task_id,
        input_path,
        output_dir,
        output_prefix,
        options,
    ))
}

/// Execute a job and record its terminal state.
pub async fn run(
    registry: Arc<TaskRegistry>,
    task_id: TaskId,
    input_path: PathBuf,
    output_dir: PathBuf,
    output_prefix: String,
    options: JobOptions,
) {
    let job = execute(&input_path, &output_dir, &output_prefix, options);

    match AssertUnwindSafe(job).catch_unwind().await {
        Ok(Ok(outputs)) => {
            info!("Job {} completed with {} output(s)", task_id, outputs.len());
            metrics::record_job_completed();
            registry.complete(&task_id, outputs).await;
        }
        Ok(Err(e)) => {
            let message = e.diagnostic();
            error!("Job {} failed: {}", task_id, message);
            metrics::record_job_failed();
            registry.fail(&task_id, message).await;
        }
        Err(_) => {
            error!("Job {} panicked", task_id);
            metrics::record_job_failed();
            registry.fail(&task_id, "job execution panicked").await;
        }
    }
}

/// Run the requested operations in order, stopping at the first failure.
async fn execute(
    input_path: &Path,
    output_dir: &Path,
    output_prefix: &str,
    options: JobOptions,
) -> MediaResult<BTreeMap<OutputKind, String>> {
    let mut outputs = BTreeMap::new();

    for kind in options.requested() {
        let file_name = kind.file_name(output_prefix);
        let output_path = output_dir.join(&file_name);

        match kind {
            OutputKind::FirstFrame => extract_first_frame(input_path, &output_path).await?,
            OutputKind::LastFrame => extract_last_frame(input_path, &output_path).await?,
            OutputKind::ReversedVideo => reverse_video(input_path, &output_path).await?,
        }

        outputs.insert(kind, file_name);
    }

    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use revid_models::{TaskResult, TaskStatus};

    use super::*;

    fn no_ops() -> JobOptions {
        JobOptions {
            extract_first: false,
            extract_last: false,
            reverse_video: false,
        }
    }

    #[tokio::test]
    async fn job_with_no_requested_operations_completes_empty() {
        let registry = Arc::new(TaskRegistry::new());
        let id = TaskId::new();
        registry.create(id.clone()).await;

        run(
            Arc::clone(&registry),
            id.clone(),
            PathBuf::from("does-not-matter.mp4"),
            PathBuf::from("outputs"),
            "clip".to_string(),
            no_ops(),
        )
        .await;

        let task = registry.get(&id).await.unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.result, Some(TaskResult::Outputs(BTreeMap::new())));
    }

    #[tokio::test]
    async fn missing_input_records_error_and_skips_remaining_operations() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Arc::new(TaskRegistry::new());
        let id = TaskId::new();
        registry.create(id.clone()).await;

        run(
            Arc::clone(&registry),
            id.clone(),
            dir.path().join("missing.mp4"),
            dir.path().to_path_buf(),
            "clip".to_string(),
            JobOptions::default(),
        )
        .await;

        let task = registry.get(&id).await.unwrap();
        assert_eq!(task.status, TaskStatus::Error);
        match task.result {
            Some(TaskResult::Message(msg)) => assert!(msg.contains("File not found")),
            other => panic!("expected error message, got {:?}", other),
        }

        // First operation failed, so nothing after it produced an artifact.
        assert!(!dir.path().join("clip_first.jpg").exists());
        assert!(!dir.path().join("clip_last.jpg").exists());
        assert!(!dir.path().join("clip_reversed.mp4").exists());
    }

    #[tokio::test]
    async fn spawned_job_does_not_block_the_caller() {
        let registry = Arc::new(TaskRegistry::new());
        let id = TaskId::new();
        registry.create(id.clone()).await;

        let handle = spawn(
            Arc::clone(&registry),
            id.clone(),
            PathBuf::from("unused.mp4"),
            PathBuf::from("outputs"),
            "clip".to_string(),
            no_ops(),
        );

        // The entry exists immediately, whatever state the job is in.
        assert!(registry.get(&id).await.is_some());

        handle.await.unwrap();
        let task = registry.get(&id).await.unwrap();
        assert!(task.status.is_terminal());
    }
}
