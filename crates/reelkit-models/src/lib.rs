//! Shared data models for the ReelKit video editing pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Transcription payloads with word-level timestamps
//! - Caption styling for subtitle burn-in
//! - Timestamp formatting utilities

pub mod caption_style;
pub mod timestamp;
pub mod transcript;

// Re-export common types
pub use caption_style::CaptionStyle;
pub use timestamp::format_seconds;
pub use transcript::{Transcription, TranscriptSegment, TranscriptWord};
