//! SRT subtitle track generation from word timestamps.

use reelkit_models::TranscriptWord;

/// Serialize word timestamps as an SRT subtitle track.
///
/// One cue per word, indices starting at 1, each cue timed to the word's
/// own start/end. Deliberately word-level rather than sentence-grouped.
pub fn words_to_srt(words: &[TranscriptWord]) -> String {
    let mut track = String::new();

    for (i, word) in words.iter().enumerate() {
        let text = word.word.replace(['\r', '\n'], " ");
        track.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_srt_timestamp(word.start),
            format_srt_timestamp(word.end),
            text.trim()
        ));
    }

    track
}

/// Format seconds as an SRT timestamp, `HH:MM:SS,mmm`.
pub fn format_srt_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0);
    let mut whole = total.floor() as u64;
    let mut millis = ((total - total.floor()) * 1000.0).round() as u64;
    if millis >= 1000 {
        whole += 1;
        millis = 0;
    }

    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}
