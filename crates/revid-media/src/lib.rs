//! FFmpeg CLI wrapper for video processing.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - A runner that captures stderr diagnostics from failed invocations
//! - The three media operations: first frame, last frame, reversal

pub mod command;
pub mod error;
pub mod ops;

pub use command::{FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use ops::{extract_first_frame, extract_last_frame, reverse_video};
