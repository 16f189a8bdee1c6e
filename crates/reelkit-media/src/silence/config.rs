//! Configuration for silence removal.

use serde::{Deserialize, Serialize};

/// Parameters controlling silence detection and cut padding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SilenceRemovalConfig {
    /// Noise floor in dB; audio below this level counts as silence.
    ///
    /// - -30: aggressive, quiet speech may be cut
    /// - -35: default, works for typical voice recordings
    /// - -45: conservative, only near-digital-silence is cut
    pub noise_floor_db: f64,

    /// Minimum silence duration in seconds before an interval is reported.
    ///
    /// Shorter gaps are natural pauses and are never cut.
    pub min_silence_secs: f64,

    /// Guard padding in seconds kept on each side of a cut.
    ///
    /// Detection finds the exact energy zero-crossing, but speech has
    /// low-energy lead-in and trailing sounds; padding keeps them.
    pub padding_secs: f64,
}

impl Default for SilenceRemovalConfig {
    fn default() -> Self {
        Self {
            noise_floor_db: -35.0,
            min_silence_secs: 0.5,
            padding_secs: 0.15,
        }
    }
}

impl SilenceRemovalConfig {
    /// Builder-style setter for the noise floor.
    pub fn with_noise_floor_db(mut self, db: f64) -> Self {
        self.noise_floor_db = db;
        self
    }

    /// Builder-style setter for the minimum silence duration.
    pub fn with_min_silence_secs(mut self, secs: f64) -> Self {
        self.min_silence_secs = secs.max(0.0);
        self
    }

    /// Builder-style setter for the cut padding.
    pub fn with_padding_secs(mut self, secs: f64) -> Self {
        self.padding_secs = secs.max(0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SilenceRemovalConfig::default();
        assert!((config.noise_floor_db + 35.0).abs() < f64::EPSILON);
        assert!((config.min_silence_secs - 0.5).abs() < f64::EPSILON);
        assert!((config.padding_secs - 0.15).abs() < f64::EPSILON);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SilenceRemovalConfig::default()
            .with_noise_floor_db(-40.0)
            .with_min_silence_secs(1.0);

        assert!((config.noise_floor_db + 40.0).abs() < f64::EPSILON);
        assert!((config.min_silence_secs - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_durations_clamped() {
        let config = SilenceRemovalConfig::default().with_padding_secs(-1.0);
        assert_eq!(config.padding_secs, 0.0);
    }
}
