//! Narrow client interface over the external media tool.
//!
//! Every subprocess operation the pipeline needs has exactly one method
//! here, so argument-vector construction and filter-graph quoting live in
//! one place and tests can substitute a mock for the whole tool.

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use reelkit_models::CaptionStyle;

use crate::captions::escape_subtitles_path;
use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::probe::{probe_media, MediaInfo};

/// One method per external-tool operation the pipeline performs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaToolClient: Send + Sync {
    /// Probe duration and stream presence.
    async fn probe(&self, path: &Path) -> MediaResult<MediaInfo>;

    /// Run silence detection and return the raw diagnostic stream.
    ///
    /// The tool is run in null-output mode; a non-zero exit with a captured
    /// diagnostic stream is a normal outcome, not a failure.
    async fn run_silencedetect(
        &self,
        input: &Path,
        noise_floor_db: f64,
        min_silence_secs: f64,
    ) -> MediaResult<String>;

    /// Losslessly cut `[start_secs, end_secs)` from `input` via stream copy.
    async fn cut(
        &self,
        input: &Path,
        output: &Path,
        start_secs: f64,
        end_secs: f64,
    ) -> MediaResult<()>;

    /// Join the part files listed in `manifest` via the concat demuxer.
    async fn concat(&self, manifest: &Path, output: &Path) -> MediaResult<()>;

    /// Stream-copy the whole input to `output` unchanged.
    async fn remux(&self, input: &Path, output: &Path) -> MediaResult<()>;

    /// Burn the subtitle track into the video stream, copying audio.
    async fn burn_subtitles(
        &self,
        input: &Path,
        subtitles: &Path,
        output: &Path,
        style: &CaptionStyle,
    ) -> MediaResult<()>;
}

/// FFmpeg/FFprobe-backed implementation.
#[derive(Debug, Clone, Default)]
pub struct FfmpegToolClient {
    runner: FfmpegRunner,
}

impl FfmpegToolClient {
    /// Client with a default runner (no timeout, no cancellation).
    pub fn new() -> Self {
        Self::default()
    }

    /// Client using a preconfigured runner (cancel token, timeout).
    pub fn with_runner(runner: FfmpegRunner) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl MediaToolClient for FfmpegToolClient {
    async fn probe(&self, path: &Path) -> MediaResult<MediaInfo> {
        probe_media(path).await
    }

    async fn run_silencedetect(
        &self,
        input: &Path,
        noise_floor_db: f64,
        min_silence_secs: f64,
    ) -> MediaResult<String> {
        // silencedetect logs its markers at info level
        let cmd = FfmpegCommand::new(input, "-")
            .log_level("info")
            .audio_filter(silencedetect_filter(noise_floor_db, min_silence_secs))
            .format("null");

        let output = self.runner.run_capture(&cmd).await?;

        if output.stderr.trim().is_empty() && !output.success() {
            return Err(MediaError::tool_failed(
                "silence detection produced no diagnostic output",
                Some(output.stderr),
                output.exit_code,
            ));
        }

        debug!(
            exit_code = ?output.exit_code,
            bytes = output.stderr.len(),
            "silencedetect diagnostic stream captured"
        );
        Ok(output.stderr)
    }

    async fn cut(
        &self,
        input: &Path,
        output: &Path,
        start_secs: f64,
        end_secs: f64,
    ) -> MediaResult<()> {
        let cmd = FfmpegCommand::new(input, output)
            .seek(start_secs)
            .duration(end_secs - start_secs)
            .codec_copy()
            .output_args(["-avoid_negative_ts", "make_zero"]);

        self.runner.run(&cmd).await
    }

    async fn concat(&self, manifest: &Path, output: &Path) -> MediaResult<()> {
        let cmd = FfmpegCommand::new(manifest, output)
            .input_args(["-f", "concat", "-safe", "0"])
            .codec_copy()
            .output_args(["-movflags", "+faststart"]);

        self.runner.run(&cmd).await
    }

    async fn remux(&self, input: &Path, output: &Path) -> MediaResult<()> {
        let cmd = FfmpegCommand::new(input, output).codec_copy();
        self.runner.run(&cmd).await
    }

    async fn burn_subtitles(
        &self,
        input: &Path,
        subtitles: &Path,
        output: &Path,
        style: &CaptionStyle,
    ) -> MediaResult<()> {
        let filter = format!(
            "subtitles='{}':force_style='{}'",
            escape_subtitles_path(subtitles),
            style.force_style()
        );

        let cmd = FfmpegCommand::new(input, output)
            .video_filter(filter)
            .audio_codec("copy");

        self.runner.run(&cmd).await
    }
}

/// Build the silencedetect audio-filter string.
fn silencedetect_filter(noise_floor_db: f64, min_silence_secs: f64) -> String {
    format!("silencedetect=noise={noise_floor_db}dB:d={min_silence_secs}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silencedetect_filter() {
        assert_eq!(
            silencedetect_filter(-35.0, 0.5),
            "silencedetect=noise=-35dB:d=0.5"
        );
        assert_eq!(
            silencedetect_filter(-42.5, 1.0),
            "silencedetect=noise=-42.5dB:d=1"
        );
    }
}
