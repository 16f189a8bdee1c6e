//! Transcription payload models.
//!
//! These mirror the JSON document the transcription service returns for a
//! media upload: full text, word-level timestamps, and sentence-level
//! segments. The editing pipeline only consumes `words`; the rest is kept
//! so callers can deserialize the provider response in one step.

use serde::{Deserialize, Serialize};

/// A single transcribed word with its timing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptWord {
    /// The spoken word as transcribed.
    pub word: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
}

impl TranscriptWord {
    /// Create a word timestamp.
    pub fn new(word: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            word: word.into(),
            start,
            end,
        }
    }

    /// Duration of the word in seconds.
    pub fn duration_secs(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// A sentence-level transcript segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Segment text.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
}

/// Full transcription result as delivered by the transcription service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcription {
    /// Complete transcript text.
    #[serde(default)]
    pub text: String,
    /// Word-level timestamps, ordered by start time.
    #[serde(default)]
    pub words: Vec<TranscriptWord>,
    /// Sentence-level segments.
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
}

impl Transcription {
    /// Whether the transcription carries usable word timestamps.
    pub fn has_words(&self) -> bool {
        !self.words.is_empty()
    }
}
