//! Silence interval detection from the silencedetect diagnostic stream.

use std::path::Path;

use tracing::debug;

use crate::error::MediaResult;
use crate::tool::MediaToolClient;

use super::config::SilenceRemovalConfig;

/// Synthesized interval length when the input ends mid-silence and no
/// matching `silence_end` marker is emitted.
const TRAILING_SILENCE_GUARD_SECS: f64 = 1.0;

/// A detected silence interval, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilenceInterval {
    /// Start of the silence.
    pub start: f64,
    /// End of the silence.
    pub end: f64,
}

impl SilenceInterval {
    /// Length of the interval in seconds.
    pub fn duration_secs(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// Detect silence intervals in a media file.
///
/// Returns intervals in time-ascending order as the detector streams them.
pub async fn detect_silence_intervals(
    tool: &dyn MediaToolClient,
    input: &Path,
    config: &SilenceRemovalConfig,
) -> MediaResult<Vec<SilenceInterval>> {
    let log = tool
        .run_silencedetect(input, config.noise_floor_db, config.min_silence_secs)
        .await?;

    let intervals = parse_silence_log(&log);
    debug!(
        input = %input.display(),
        intervals = intervals.len(),
        "silence detection complete"
    );
    Ok(intervals)
}

/// Parse `silence_start:` / `silence_end:` markers from the detector's
/// diagnostic stream.
///
/// Markers are paired in emission order. A trailing `silence_start` without
/// a matching end means the input ended while still silent; that interval
/// gets a synthesized one-second end rather than being dropped.
pub fn parse_silence_log(log: &str) -> Vec<SilenceInterval> {
    let mut starts = Vec::new();
    let mut ends = Vec::new();

    for line in log.lines() {
        if let Some(value) = extract_marker(line, "silence_start:") {
            starts.push(value);
        }
        if let Some(value) = extract_marker(line, "silence_end:") {
            ends.push(value);
        }
    }

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| SilenceInterval {
            start,
            end: ends
                .get(i)
                .copied()
                .unwrap_or(start + TRAILING_SILENCE_GUARD_SECS),
        })
        .collect()
}

/// Extract the float following `marker` on a log line.
///
/// Lines look like `[silencedetect @ 0x...] silence_end: 4.0 | silence_duration: 1.48`.
fn extract_marker(line: &str, marker: &str) -> Option<f64> {
    let rest = line.split(marker).nth(1)?;
    rest.split_whitespace().next()?.parse().ok()
}
