//! Lossless concatenation of uniform clips.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::{remove_quietly, require_file};

/// Format one concat demuxer line for `path`.
///
/// Single quotes are closed, escaped and reopened as the demuxer expects.
pub fn concat_list_entry(path: &Path) -> String {
    let escaped = path.to_string_lossy().replace('\'', "'\\''");
    format!("file '{}'\n", escaped)
}

/// Write the concat list for `clips` to a temporary file.
fn write_concat_list(clips: &[PathBuf]) -> MediaResult<tempfile::NamedTempFile> {
    let mut list = tempfile::Builder::new()
        .prefix("concat_")
        .suffix(".txt")
        .tempfile()?;
    for clip in clips {
        list.write_all(concat_list_entry(clip).as_bytes())?;
    }
    list.flush()?;
    Ok(list)
}

/// Join `clips` in order into `output` without re-encoding.
///
/// All clips must share codec and container parameters. On success the
/// input clips are deleted.
pub async fn concatenate(
    clips: &[PathBuf],
    output: &Path,
    runner: &FfmpegRunner,
) -> MediaResult<()> {
    if clips.is_empty() {
        return Err(MediaError::EmptyInput);
    }

    let mut absolute = Vec::with_capacity(clips.len());
    for clip in clips {
        require_file(clip).await?;
        absolute.push(tokio::fs::canonicalize(clip).await?);
    }

    info!(
        "Concatenating {} clips -> {}",
        absolute.len(),
        output.display()
    );

    // Removed when `list` drops, on both paths
    let list = write_concat_list(&absolute)?;

    let cmd = FfmpegCommand::new(output)
        .concat_list(list.path())
        .codec_copy();

    runner.run(&cmd).await?;

    for clip in clips {
        remove_quietly(clip).await;
    }

    Ok(())
}
