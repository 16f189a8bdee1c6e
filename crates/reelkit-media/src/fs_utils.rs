//! Filesystem helpers for staging pipeline outputs.

use std::path::Path;
use tokio::fs;

use crate::error::{MediaError, MediaResult};

/// Move a finished artifact from `src` into its final location.
///
/// Tries a rename first; on EXDEV (temp dir and destination on different
/// filesystems) falls back to copying to a sibling temp file and renaming,
/// so the destination only ever sees a complete file.
pub async fn move_into_place(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> MediaResult<()> {
    let src = src.as_ref();
    let dst = dst.as_ref();

    if let Some(parent) = dst.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    match fs::rename(src, dst).await {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device_error(&e) => {
            tracing::debug!(
                src = %src.display(),
                dst = %dst.display(),
                "cross-device rename, falling back to copy+delete"
            );
            copy_and_delete(src, dst).await
        }
        Err(e) => Err(MediaError::from(e)),
    }
}

/// Check if an IO error is EXDEV (cross-device link).
fn is_cross_device_error(e: &std::io::Error) -> bool {
    e.raw_os_error() == Some(18)
}

async fn copy_and_delete(src: &Path, dst: &Path) -> MediaResult<()> {
    // Copy to a temp file beside dst so the final rename stays atomic
    let tmp_dst = dst.with_extension("tmp");
    fs::copy(src, &tmp_dst).await?;

    if let Err(e) = fs::rename(&tmp_dst, dst).await {
        let _ = std::fs::remove_file(&tmp_dst);
        return Err(MediaError::from(e));
    }

    // Source removal is best effort; the move itself already succeeded
    if let Err(e) = fs::remove_file(src).await {
        tracing::warn!(src = %src.display(), error = %e, "failed to remove source after move");
    }

    Ok(())
}
