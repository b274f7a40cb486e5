//! Filesystem helpers for intermediate media files.

use std::path::Path;

use tokio::fs;
use tracing::warn;

use crate::error::{MediaError, MediaResult};

/// Fail with `FileNotFound` unless `path` is an existing file.
pub async fn require_file(path: &Path) -> MediaResult<()> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(MediaError::FileNotFound(path.to_path_buf())),
    }
}

/// Delete a consumed intermediate file.
///
/// Best effort: a failure is logged and reported as `false`, never raised.
pub async fn remove_quietly(path: &Path) -> bool {
    match fs::remove_file(path).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Could not delete {}: {}", path.display(), e);
            false
        }
    }
}

/// Create `dir` (and parents) if it does not exist yet.
pub async fn ensure_dir(dir: &Path) -> MediaResult<()> {
    fs::create_dir_all(dir).await?;
    Ok(())
}
