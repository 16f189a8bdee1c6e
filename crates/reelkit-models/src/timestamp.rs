//! Timestamp formatting utilities.

/// Format seconds into an HH:MM:SS or HH:MM:SS.mmm string.
///
/// Used for human-readable duration reporting in logs.
///
/// # Examples
/// ```
/// use reelkit_models::timestamp::format_seconds;
/// assert_eq!(format_seconds(90.0), "00:01:30");
/// assert_eq!(format_seconds(3661.5), "01:01:01.500");
/// ```
pub fn format_seconds(total_secs: f64) -> String {
    let hours = (total_secs / 3600.0).floor() as u32;
    let mins = ((total_secs % 3600.0) / 60.0).floor() as u32;
    let secs = total_secs % 60.0;

    // Include milliseconds if present
    if (secs - secs.floor()).abs() > 0.0001 {
        format!("{:02}:{:02}:{:06.3}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, mins, secs.floor() as u32)
    }
}
