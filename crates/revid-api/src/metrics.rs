//! Prometheus metrics for the API server.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    pub const UPLOADS_TOTAL: &str = "revid_uploads_total";
    pub const JOBS_DISPATCHED_TOTAL: &str = "revid_jobs_dispatched_total";
    pub const JOBS_COMPLETED_TOTAL: &str = "revid_jobs_completed_total";
    pub const JOBS_FAILED_TOTAL: &str = "revid_jobs_failed_total";
}

/// Record an accepted upload.
pub fn record_upload() {
    counter!(names::UPLOADS_TOTAL).increment(1);
}

/// Record a dispatched job.
pub fn record_job_dispatched() {
    counter!(names::JOBS_DISPATCHED_TOTAL).increment(1);
}

/// Record a completed job.
pub fn record_job_completed() {
    counter!(names::JOBS_COMPLETED_TOTAL).increment(1);
}

/// Record a failed job.
pub fn record_job_failed() {
    counter!(names::JOBS_FAILED_TOTAL).increment(1);
}
