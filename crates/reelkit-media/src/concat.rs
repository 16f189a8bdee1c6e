//! Lossless segment extraction and concatenation.
//!
//! Each kept segment is stream-copied to a temporary part file, the parts
//! are listed in a concat-demuxer manifest, and the manifest is joined into
//! one output, again via stream copy. Part files and the manifest are
//! released on every exit path by a [`TempBatch`] guard, and the joined
//! file reaches the destination path only after the concat step succeeded.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};
use crate::fs_utils::move_into_place;
use crate::silence::SpeechSegment;
use crate::temp::{TempBatch, TempFileProvider};
use crate::tool::MediaToolClient;

/// Cut the given segments out of `input` and join them into `output`.
///
/// Zero-length candidates are dropped up front; an effectively empty
/// segment list is an input error and no subprocess is invoked. Segments
/// must be ordered ascending and non-overlapping.
pub async fn concat_segments(
    tool: &dyn MediaToolClient,
    temp: &dyn TempFileProvider,
    input: &Path,
    output: &Path,
    segments: &[SpeechSegment],
) -> MediaResult<()> {
    let kept: Vec<&SpeechSegment> = segments
        .iter()
        .filter(|s| s.duration_secs() > 0.0)
        .collect();

    if kept.is_empty() {
        return Err(MediaError::invalid_input(
            "no segments with positive duration to concatenate",
        ));
    }

    for pair in kept.windows(2) {
        if pair[1].start < pair[0].end {
            return Err(MediaError::invalid_input(format!(
                "segments must be ordered and non-overlapping: [{:.3}, {:.3}] then [{:.3}, {:.3}]",
                pair[0].start, pair[0].end, pair[1].start, pair[1].end
            )));
        }
    }

    let mut batch = TempBatch::new(temp);

    let mut part_paths = Vec::with_capacity(kept.len());
    for (i, segment) in kept.iter().enumerate() {
        let part = batch.allocate(&format!("part_{i:04}.mp4"))?;
        debug!(
            part = i,
            start = segment.start,
            end = segment.end,
            "extracting segment"
        );
        tool.cut(input, &part, segment.start, segment.end).await?;
        part_paths.push(part);
    }

    let manifest = batch.allocate("concat.txt")?;
    let mut listing = String::new();
    for part in &part_paths {
        listing.push_str(&format!("file '{}'\n", escape_manifest_path(part)));
    }
    tokio::fs::write(&manifest, listing).await?;

    // Join into a staging file first; a failed concat must not leave a
    // partial file at the destination path
    let staging = batch.allocate("joined.mp4")?;
    tool.concat(&manifest, &staging).await?;
    move_into_place(&staging, output).await?;

    info!(
        parts = part_paths.len(),
        output = %output.display(),
        "segment concat complete"
    );
    Ok(())
}

/// Escape a part-file path for a concat-demuxer manifest line.
///
/// Manifest entries are single-quoted; an embedded quote closes the string,
/// emits an escaped quote, and reopens it.
fn escape_manifest_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', r"'\''")
}
