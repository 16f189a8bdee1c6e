//! Silence removal orchestration.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use reelkit_models::format_seconds;

use crate::concat::concat_segments;
use crate::error::{MediaError, MediaResult};
use crate::temp::TempFileProvider;
use crate::tool::MediaToolClient;

use super::config::SilenceRemovalConfig;
use super::detect::detect_silence_intervals;
use super::segments::speech_segments;

/// Outcome of a silence-removal run.
#[derive(Debug, Clone)]
pub struct SilenceRemovalReport {
    /// Path of the trimmed output.
    pub output_path: PathBuf,
    /// Number of silence intervals removed.
    pub segments_removed: usize,
    /// Duration of the input in seconds.
    pub original_duration_secs: f64,
    /// Duration of the output in seconds, re-measured from the file.
    pub new_duration_secs: f64,
}

/// Remove dead air from `input`, writing the trimmed result to `output`.
///
/// When no silence is detected the input is stream-copied to the output
/// unchanged and the report shows zero removed segments. Otherwise the
/// complement of the detected intervals, padded by the configured guard,
/// is cut and concatenated, and the output is re-probed for its
/// authoritative duration (arithmetic estimates drift with keyframe
/// alignment and encoder rounding). An input whose silence covers the
/// whole duration yields [`MediaError::NoSpeechToKeep`] before any cut
/// is attempted.
pub async fn remove_silence(
    tool: &dyn MediaToolClient,
    temp: &dyn TempFileProvider,
    input: &Path,
    output: &Path,
    config: &SilenceRemovalConfig,
) -> MediaResult<SilenceRemovalReport> {
    let original_duration_secs = tool.probe(input).await?.duration;
    debug!(
        input = %input.display(),
        duration = %format_seconds(original_duration_secs),
        "probed input for silence removal"
    );

    let silences = detect_silence_intervals(tool, input, config).await?;

    if silences.is_empty() {
        info!(input = %input.display(), "no silence detected, copying input unchanged");
        tool.remux(input, output).await?;
        return Ok(SilenceRemovalReport {
            output_path: output.to_path_buf(),
            segments_removed: 0,
            original_duration_secs,
            new_duration_secs: original_duration_secs,
        });
    }

    let segments = speech_segments(&silences, original_duration_secs, config.padding_secs);
    if segments.is_empty() {
        warn!(
            input = %input.display(),
            "silence spans the entire input, nothing to keep"
        );
        return Err(MediaError::NoSpeechToKeep);
    }

    concat_segments(tool, temp, input, output, &segments).await?;

    let new_duration_secs = tool.probe(output).await?.duration;

    info!(
        output = %output.display(),
        removed = silences.len(),
        original = %format_seconds(original_duration_secs),
        trimmed = %format_seconds(new_duration_secs),
        "silence removal complete"
    );

    Ok(SilenceRemovalReport {
        output_path: output.to_path_buf(),
        segments_removed: silences.len(),
        original_duration_secs,
        new_duration_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::MediaInfo;
    use crate::temp::SystemTempProvider;
    use crate::tool::MockMediaToolClient;
    use tempfile::TempDir;

    fn info(duration: f64) -> MediaInfo {
        MediaInfo {
            duration,
            width: Some(1920),
            height: Some(1080),
            has_video: true,
            has_audio: true,
        }
    }

    #[tokio::test]
    async fn test_fast_path_when_no_silence() {
        let dir = TempDir::new().unwrap();
        let temp = SystemTempProvider::in_dir(dir.path());

        let mut tool = MockMediaToolClient::new();
        tool.expect_probe().times(1).returning(|_| Ok(info(30.0)));
        tool.expect_run_silencedetect()
            .times(1)
            .returning(|_, _, _| Ok("frame= 100 fps=0.0\n".to_string()));
        tool.expect_remux().times(1).returning(|_, _| Ok(()));
        tool.expect_cut().never();
        tool.expect_concat().never();

        let report = remove_silence(
            &tool,
            &temp,
            Path::new("in.mp4"),
            Path::new("out.mp4"),
            &SilenceRemovalConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(report.segments_removed, 0);
        assert_eq!(report.new_duration_secs, report.original_duration_secs);
    }

    #[tokio::test]
    async fn test_full_run_cuts_padded_complement() {
        let dir = TempDir::new().unwrap();
        let temp = SystemTempProvider::in_dir(dir.path().join("tmp"));
        let output = dir.path().join("out.mp4");

        let mut tool = MockMediaToolClient::new();

        // First probe: input duration. Second probe: trimmed output.
        let mut probes = 0usize;
        tool.expect_probe().times(2).returning(move |_| {
            probes += 1;
            Ok(info(if probes == 1 { 20.0 } else { 17.7 }))
        });

        tool.expect_run_silencedetect().times(1).returning(|_, _, _| {
            Ok("silence_start: 5.0\nsilence_end: 7.0 | silence_duration: 2.0\n".to_string())
        });

        // Expect the padded complement: [0, 4.85] and [7.15, 20]
        tool.expect_cut()
            .times(2)
            .withf(|_, _, start, end| {
                ((start - 0.0).abs() < 1e-9 && (end - 4.85).abs() < 1e-9)
                    || ((start - 7.15).abs() < 1e-9 && (end - 20.0).abs() < 1e-9)
            })
            .returning(|_, part, _, _| {
                std::fs::write(part, b"part").unwrap();
                Ok(())
            });

        tool.expect_concat().times(1).returning(|_, staging| {
            std::fs::write(staging, b"joined").unwrap();
            Ok(())
        });
        tool.expect_remux().never();

        let report = remove_silence(
            &tool,
            &temp,
            Path::new("in.mp4"),
            &output,
            &SilenceRemovalConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(report.segments_removed, 1);
        assert!((report.original_duration_secs - 20.0).abs() < 1e-9);
        assert!((report.new_duration_secs - 17.7).abs() < 1e-9);
        assert!(report.new_duration_secs <= report.original_duration_secs);
        assert!(output.exists());
    }

    #[tokio::test]
    async fn test_fully_silent_input_reports_no_speech() {
        let dir = TempDir::new().unwrap();
        let temp = SystemTempProvider::in_dir(dir.path());

        let mut tool = MockMediaToolClient::new();
        tool.expect_probe().times(1).returning(|_| Ok(info(10.0)));
        tool.expect_run_silencedetect().times(1).returning(|_, _, _| {
            Ok("silence_start: 0.0\nsilence_end: 10.0 | silence_duration: 10.0\n".to_string())
        });
        tool.expect_cut().never();
        tool.expect_concat().never();
        tool.expect_remux().never();

        let err = remove_silence(
            &tool,
            &temp,
            Path::new("in.mp4"),
            Path::new("out.mp4"),
            &SilenceRemovalConfig::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, MediaError::NoSpeechToKeep));
    }

    #[tokio::test]
    async fn test_detection_failure_propagates_before_any_cut() {
        let dir = TempDir::new().unwrap();
        let temp = SystemTempProvider::in_dir(dir.path());

        let mut tool = MockMediaToolClient::new();
        tool.expect_probe().times(1).returning(|_| Ok(info(30.0)));
        tool.expect_run_silencedetect().times(1).returning(|_, _, _| {
            Err(crate::error::MediaError::tool_failed(
                "silence detection produced no diagnostic output",
                None,
                Some(1),
            ))
        });
        tool.expect_cut().never();
        tool.expect_remux().never();

        let err = remove_silence(
            &tool,
            &temp,
            Path::new("in.mp4"),
            Path::new("out.mp4"),
            &SilenceRemovalConfig::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, crate::error::MediaError::ToolFailed { .. }));
    }
}
