//! Task state for progress tracking and polling.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::OutputKind;

/// Unique identifier for a dispatched task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Generate a new random task ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Job is actively being processed
    #[default]
    Processing,
    /// Job completed successfully
    Completed,
    /// Job failed with an error
    Error,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Processing => "processing",
            TaskStatus::Completed => "completed",
            TaskStatus::Error => "error",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Error)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal payload of a task.
///
/// A completed task carries the map of produced output file names keyed by
/// output kind; a failed task carries a diagnostic message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskResult {
    Outputs(BTreeMap<OutputKind, String>),
    Message(String),
}

/// One dispatched, trackable unit of asynchronous job execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier
    pub id: TaskId,
    /// Current task status
    pub status: TaskStatus,
    /// Present only once the task reaches a terminal state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<TaskResult>,
    /// When the task was dispatched
    pub created_at: DateTime<Utc>,
    /// When the status was last updated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task in `processing` state.
    pub fn processing(id: TaskId) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: TaskStatus::Processing,
            result: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Transition to `completed` with the produced output names.
    pub fn complete(&mut self, outputs: BTreeMap<OutputKind, String>) {
        self.status = TaskStatus::Completed;
        self.result = Some(TaskResult::Outputs(outputs));
        self.updated_at = Utc::now();
    }

    /// Transition to `error` with a diagnostic message.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = TaskStatus::Error;
        self.result = Some(TaskResult::Message(message.into()));
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_ids_are_unique() {
        assert_ne!(TaskId::new(), TaskId::new());
    }

    #[test]
    fn processing_task_has_no_result() {
        let task = Task::processing(TaskId::new());
        assert_eq!(task.status, TaskStatus::Processing);
        assert!(!task.status.is_terminal());

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["status"], "processing");
        assert!(json.get("result").is_none());
    }

    #[test]
    fn completed_task_serializes_output_map() {
        let mut task = Task::processing(TaskId::from_string("t1"));
        let mut outputs = BTreeMap::new();
        outputs.insert(OutputKind::FirstFrame, "clip_first.jpg".to_string());
        outputs.insert(OutputKind::LastFrame, "clip_last.jpg".to_string());
        task.complete(outputs);

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["result"]["first_frame"], "clip_first.jpg");
        assert_eq!(json["result"]["last_frame"], "clip_last.jpg");
        assert!(json["result"].get("reversed_video").is_none());
    }

    #[test]
    fn failed_task_serializes_message() {
        let mut task = Task::processing(TaskId::from_string("t2"));
        task.fail("ffmpeg exited with status 1");

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["result"], "ffmpeg exited with status 1");
        assert!(task.status.is_terminal());
    }
}
