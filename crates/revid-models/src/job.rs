//! Job options and output kinds.

use serde::{Deserialize, Serialize};

/// One kind of output a job can produce.
///
/// Variant order is the fixed execution order within a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// Still image of the first decodable frame
    FirstFrame,
    /// Still image taken from very near the end of the stream
    LastFrame,
    /// Video with both streams played in reverse
    ReversedVideo,
}

impl OutputKind {
    /// Key used for this output in a completed task's result map.
    pub fn key(&self) -> &'static str {
        match self {
            OutputKind::FirstFrame => "first_frame",
            OutputKind::LastFrame => "last_frame",
            OutputKind::ReversedVideo => "reversed_video",
        }
    }

    /// File name suffix appended to the job's output prefix.
    pub fn suffix(&self) -> &'static str {
        match self {
            OutputKind::FirstFrame => "_first.jpg",
            OutputKind::LastFrame => "_last.jpg",
            OutputKind::ReversedVideo => "_reversed.mp4",
        }
    }

    /// Derive the output file name for a given prefix.
    pub fn file_name(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.suffix())
    }
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Which operations a dispatched job should perform.
///
/// Each flag is independent; unspecified flags default to `true`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct JobOptions {
    #[serde(default = "default_true")]
    pub extract_first: bool,
    #[serde(default = "default_true")]
    pub extract_last: bool,
    #[serde(default = "default_true")]
    pub reverse_video: bool,
}

fn default_true() -> bool {
    true
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            extract_first: true,
            extract_last: true,
            reverse_video: true,
        }
    }
}

impl JobOptions {
    /// Requested operations in execution order: first, last, reverse.
    pub fn requested(&self) -> Vec<OutputKind> {
        let mut kinds = Vec::with_capacity(3);
        if self.extract_first {
            kinds.push(OutputKind::FirstFrame);
        }
        if self.extract_last {
            kinds.push(OutputKind::LastFrame);
        }
        if self.reverse_video {
            kinds.push(OutputKind::ReversedVideo);
        }
        kinds
    }
}
