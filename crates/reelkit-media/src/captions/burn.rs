//! Subtitle burn-in.

use std::path::{Path, PathBuf};

use tracing::info;

use reelkit_models::{CaptionStyle, TranscriptWord};

use crate::error::{MediaError, MediaResult};
use crate::temp::{TempBatch, TempFileProvider};
use crate::tool::MediaToolClient;

use super::srt::words_to_srt;

/// Outcome of a caption burn run.
#[derive(Debug, Clone)]
pub struct CaptionReport {
    /// Path of the captioned output.
    pub output_path: PathBuf,
    /// Duration of the output in seconds, re-measured from the file.
    pub duration_secs: f64,
}

/// Burn word-level captions into `input`, writing the result to `output`.
///
/// The SRT track is written to a temp file for the duration of the burn and
/// released afterwards on every exit path. The output is re-probed rather
/// than assuming the burn preserved duration; the filter re-encodes video
/// and the container may round.
pub async fn burn_word_captions(
    tool: &dyn MediaToolClient,
    temp: &dyn TempFileProvider,
    input: &Path,
    output: &Path,
    words: &[TranscriptWord],
    style: &CaptionStyle,
) -> MediaResult<CaptionReport> {
    if words.is_empty() {
        return Err(MediaError::invalid_input("no word timestamps to caption"));
    }

    let mut batch = TempBatch::new(temp);
    let srt_path = batch.allocate("captions.srt")?;
    tokio::fs::write(&srt_path, words_to_srt(words)).await?;

    tool.burn_subtitles(input, &srt_path, output, style).await?;

    let duration_secs = tool.probe(output).await?.duration;

    info!(
        output = %output.display(),
        cues = words.len(),
        "caption burn complete"
    );

    Ok(CaptionReport {
        output_path: output.to_path_buf(),
        duration_secs,
    })
}

/// Escape a subtitle-file path for embedding in a filter-graph argument.
///
/// The subtitles filter treats backslashes and quotes specially even on
/// platforms where they are path characters: backslashes become forward
/// slashes and single quotes are backslash-escaped.
pub fn escape_subtitles_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::MediaInfo;
    use crate::temp::SystemTempProvider;
    use crate::tool::MockMediaToolClient;
    use tempfile::TempDir;

    #[test]
    fn test_escape_forward_slashes_and_quotes() {
        let escaped = escape_subtitles_path(Path::new(r"C:\media\it's.srt"));
        assert_eq!(escaped, r"C:/media/it\'s.srt");
    }

    #[test]
    fn test_escape_round_trips() {
        let original = r"C:\media\it's.srt";
        let escaped = escape_subtitles_path(Path::new(original));

        // Reverse the convention: unescape quotes, then restore separators
        let unescaped = escaped.replace("\\'", "'").replace('/', "\\");
        assert_eq!(unescaped, original);
    }

    #[test]
    fn test_escape_plain_unix_path_unchanged() {
        let escaped = escape_subtitles_path(Path::new("/tmp/captions.srt"));
        assert_eq!(escaped, "/tmp/captions.srt");
    }

    #[tokio::test]
    async fn test_empty_words_is_invalid_input() {
        let tool = MockMediaToolClient::new();
        let dir = TempDir::new().unwrap();
        let temp = SystemTempProvider::in_dir(dir.path());

        let err = burn_word_captions(
            &tool,
            &temp,
            Path::new("in.mp4"),
            Path::new("out.mp4"),
            &[],
            &CaptionStyle::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, MediaError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_srt_exists_during_burn_and_is_released_after() {
        let dir = TempDir::new().unwrap();
        let temp = SystemTempProvider::in_dir(dir.path());

        let mut tool = MockMediaToolClient::new();
        tool.expect_burn_subtitles()
            .times(1)
            .returning(|_, srt, _, _| {
                let track = std::fs::read_to_string(srt).unwrap();
                assert!(track.starts_with("1\n00:00:01,000 --> 00:00:01,400\nhello\n"));
                Ok(())
            });
        tool.expect_probe().times(1).returning(|_| {
            Ok(MediaInfo {
                duration: 9.5,
                width: Some(1080),
                height: Some(1920),
                has_video: true,
                has_audio: true,
            })
        });

        let words = vec![TranscriptWord::new("hello", 1.0, 1.4)];
        let report = burn_word_captions(
            &tool,
            &temp,
            Path::new("in.mp4"),
            Path::new("out.mp4"),
            &words,
            &CaptionStyle::default(),
        )
        .await
        .unwrap();

        assert!((report.duration_secs - 9.5).abs() < 1e-9);
        assert_eq!(
            std::fs::read_dir(dir.path()).unwrap().count(),
            0,
            "temp SRT should be released"
        );
    }

    #[tokio::test]
    async fn test_failed_burn_still_releases_srt() {
        let dir = TempDir::new().unwrap();
        let temp = SystemTempProvider::in_dir(dir.path());

        let mut tool = MockMediaToolClient::new();
        tool.expect_burn_subtitles()
            .times(1)
            .returning(|_, _, _, _| Err(MediaError::tool_failed("burn blew up", None, Some(1))));
        tool.expect_probe().never();

        let words = vec![TranscriptWord::new("hello", 1.0, 1.4)];
        let err = burn_word_captions(
            &tool,
            &temp,
            Path::new("in.mp4"),
            Path::new("out.mp4"),
            &words,
            &CaptionStyle::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, MediaError::ToolFailed { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
