#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper for the ReelKit video editing pipeline.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with cancellation support
//! - Media probing (duration, stream presence)
//! - Silence detection and dead-air removal via stream-copy cut + concat
//! - Word-level caption generation and subtitle burn-in
//!
//! All subprocess operations go through the [`tool::MediaToolClient`] seam;
//! pipeline code never builds argument vectors itself.

pub mod captions;
pub mod command;
pub mod concat;
pub mod error;
pub mod fs_utils;
pub mod probe;
pub mod silence;
pub mod temp;
pub mod tool;

pub use captions::{burn_word_captions, words_to_srt, CaptionReport};
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner, ToolOutput};
pub use concat::concat_segments;
pub use error::{MediaError, MediaResult};
pub use probe::{get_duration, probe_media, MediaInfo};
pub use silence::{
    remove_silence, SilenceInterval, SilenceRemovalConfig, SilenceRemovalReport, SpeechSegment,
};
pub use temp::{SystemTempProvider, TempBatch, TempFileProvider};
pub use tool::{FfmpegToolClient, MediaToolClient};
