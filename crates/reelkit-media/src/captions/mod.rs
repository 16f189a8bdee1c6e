//! Word-level caption generation and burn-in.
//!
//! The "add captions" pipeline: word timestamps from the transcription
//! service become one subtitle cue per word (karaoke granularity), the cue
//! track is written as SRT to a temp file, and the subtitles filter burns
//! it into the video stream while the audio is stream-copied.

mod burn;
mod srt;

pub use burn::{burn_word_captions, escape_subtitles_path, CaptionReport};
pub use srt::{format_srt_timestamp, words_to_srt};
