//! Temp-file allocation and guaranteed cleanup.
//!
//! Cut/concat runs create part files and a manifest that must never outlive
//! the operation, success or failure. Allocation goes through an injected
//! [`TempFileProvider`] so tests can sandbox it, and [`TempBatch`] releases
//! everything it allocated when it goes out of scope.

use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

use crate::error::MediaResult;

/// Capability for allocating and releasing temp-file paths.
pub trait TempFileProvider: Send + Sync {
    /// Allocate a unique path for `file_name`. The file is not created.
    fn allocate(&self, file_name: &str) -> MediaResult<PathBuf>;

    /// Delete the file at `path` if it exists. Failure to delete is logged
    /// and never surfaced; it must not mask the operation's own result.
    fn release(&self, path: &Path);
}

/// Provider backed by a base directory (the system temp dir by default).
///
/// Allocated names carry a random token so concurrent pipeline invocations
/// sharing one temp directory cannot collide.
#[derive(Debug, Clone)]
pub struct SystemTempProvider {
    base: PathBuf,
}

impl SystemTempProvider {
    /// Provider rooted at the system temp directory.
    pub fn new() -> Self {
        Self::in_dir(std::env::temp_dir())
    }

    /// Provider rooted at a specific directory.
    pub fn in_dir(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl Default for SystemTempProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TempFileProvider for SystemTempProvider {
    fn allocate(&self, file_name: &str) -> MediaResult<PathBuf> {
        std::fs::create_dir_all(&self.base)?;
        let token = Uuid::new_v4().simple();
        Ok(self.base.join(format!("reelkit_{token}_{file_name}")))
    }

    fn release(&self, path: &Path) {
        if let Err(e) = std::fs::remove_file(path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "failed to remove temp file");
            }
        }
    }
}

/// Scope guard over a batch of temp allocations.
///
/// Every path allocated through the batch is released on drop, which covers
/// early returns, subprocess failures, and cancellation alike.
pub struct TempBatch<'a> {
    provider: &'a dyn TempFileProvider,
    paths: Vec<PathBuf>,
}

impl<'a> TempBatch<'a> {
    /// Create an empty batch over `provider`.
    pub fn new(provider: &'a dyn TempFileProvider) -> Self {
        Self {
            provider,
            paths: Vec::new(),
        }
    }

    /// Allocate a path tracked by this batch.
    pub fn allocate(&mut self, file_name: &str) -> MediaResult<PathBuf> {
        let path = self.provider.allocate(file_name)?;
        self.paths.push(path.clone());
        Ok(path)
    }
}

impl Drop for TempBatch<'_> {
    fn drop(&mut self) {
        for path in &self.paths {
            self.provider.release(path);
        }
    }
}
