//! Speech segment computation (complement of silence intervals).

use super::detect::SilenceInterval;

/// A time range to keep in the output, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeechSegment {
    /// Start of the segment.
    pub start: f64,
    /// End of the segment.
    pub end: f64,
}

impl SpeechSegment {
    /// Length of the segment in seconds.
    pub fn duration_secs(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// Compute padded speech segments from silence intervals.
///
/// Walks the intervals in order keeping a running `prev_end`. Each silence
/// `[s, e]` yields a speech segment `[prev_end, s - padding]` when that has
/// positive length; the lower bound of the padded start is clamped to
/// `prev_end` so closely spaced silences never produce a negative-length
/// segment. Such degenerate candidates are dropped, not errored. A trailing
/// segment covers `[prev_end, total_duration]` when audio remains after the
/// last silence.
pub fn speech_segments(
    silences: &[SilenceInterval],
    total_duration_secs: f64,
    padding_secs: f64,
) -> Vec<SpeechSegment> {
    let mut segments = Vec::new();
    let mut prev_end = 0.0f64;

    for silence in silences {
        let start = prev_end.max(0.0);
        let end = (silence.start - padding_secs).max(prev_end);
        if end > start {
            segments.push(SpeechSegment { start, end });
        }
        prev_end = silence.end + padding_secs;
    }

    if prev_end < total_duration_secs {
        segments.push(SpeechSegment {
            start: prev_end,
            end: total_duration_secs,
        });
    }

    segments
}
