//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Maximum length of a captured stderr snippet, in bytes.
///
/// FFmpeg can emit pages of diagnostics on a bad input; the error only
/// carries the tail, which holds the actual failure message.
const STDERR_SNIPPET_LEN: usize = 2048;

/// Errors that can occur during media processing.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("Probe failed: {message}")]
    ProbeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No speech content to keep after silence removal")]
    NoSpeechToKeep,

    #[error("Media tool failed: {message}")]
    ToolFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create a probe failure error.
    pub fn probe_failed(message: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ProbeFailed {
            message: message.into(),
            stderr: stderr.map(|s| truncate_stderr(&s)),
        }
    }

    /// Create an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a tool failure error with a truncated stderr snippet.
    pub fn tool_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::ToolFailed {
            message: message.into(),
            stderr: stderr.map(|s| truncate_stderr(&s)),
            exit_code,
        }
    }
}

/// Keep only the tail of a stderr capture for error reporting.
pub(crate) fn truncate_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.len() <= STDERR_SNIPPET_LEN {
        return trimmed.to_string();
    }
    let mut cut = trimmed.len() - STDERR_SNIPPET_LEN;
    while !trimmed.is_char_boundary(cut) {
        cut += 1;
    }
    trimmed[cut..].to_string()
}
