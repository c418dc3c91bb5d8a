//! The three media operations: first frame, last frame, reversal.

use std::path::Path;

use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// JPEG quality for extracted stills (-q:v, lower is better).
const STILL_QUALITY: u8 = 3;

/// Seek offset from end of stream for last-frame extraction, in seconds.
const LAST_FRAME_SEEK_SECS: f64 = -0.1;

fn check_input(input: &Path) -> MediaResult<()> {
    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }
    Ok(())
}

/// Extract the first decodable frame as a still image.
pub async fn extract_first_frame(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();
    check_input(input)?;

    info!("Extracting first frame: {}", output.display());

    let cmd = FfmpegCommand::new(input, output)
        .video_filter("select=eq(n\\,0)")
        .quality(STILL_QUALITY)
        .single_frame();

    FfmpegRunner::new().run(&cmd).await
}

/// Extract a still from very near the end of the stream.
///
/// Seeks from end-of-stream; exact accuracy at the final frame is not
/// guaranteed by FFmpeg and is not required here.
pub async fn extract_last_frame(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();
    check_input(input)?;

    info!("Extracting last frame: {}", output.display());

    let cmd = FfmpegCommand::new(input, output)
        .seek_from_end(LAST_FRAME_SEEK_SECS)
        .output_args(["-update", "1"])
        .quality(STILL_QUALITY);

    FfmpegRunner::new().run(&cmd).await
}

/// Produce a copy of the video with video and audio streams reversed.
pub async fn reverse_video(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();
    check_input(input)?;

    info!("Creating reversed video: {}", output.display());

    let cmd = FfmpegCommand::new(input, output)
        .video_filter("reverse")
        .audio_filter("areverse");

    FfmpegRunner::new().run(&cmd).await
}
