//! Shared data models for the revid backend.
//!
//! This crate provides Serde-serializable types for:
//! - Tasks and their processing status
//! - Job option flags and output kinds
//! - Deterministic output file naming

pub mod job;
pub mod task;

// Re-export common types
pub use job::{JobOptions, OutputKind};
pub use task::{Task, TaskId, TaskResult, TaskStatus};
