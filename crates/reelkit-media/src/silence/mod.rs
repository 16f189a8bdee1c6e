//! Silence-based auto-editing.
//!
//! The "remove dead air" pipeline:
//!
//! 1. Probe the original duration.
//! 2. Run silencedetect and parse its diagnostic stream into intervals.
//! 3. Complement the intervals into padded speech segments.
//! 4. Cut and concatenate the speech segments via stream copy.
//! 5. Re-probe the output for the authoritative new duration.

mod config;
mod detect;
mod remove;
mod segments;

pub use config::SilenceRemovalConfig;
pub use detect::{detect_silence_intervals, parse_silence_log, SilenceInterval};
pub use remove::{remove_silence, SilenceRemovalReport};
pub use segments::{speech_segments, SpeechSegment};
