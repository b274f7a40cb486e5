//! Still image + narration composition.

use std::path::Path;

use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;
use crate::fs_utils::{remove_quietly, require_file};
use crate::probe::probe_duration;

/// Default fade-in / fade-out length in seconds.
pub const DEFAULT_FADE_SECS: f64 = 1.0;

/// Build the fade filter for a clip of `duration` seconds.
///
/// The fade-out starts `fade` seconds before the end, clamped at zero for
/// narration shorter than the fade.
pub fn fade_filter(duration: f64, fade: f64) -> String {
    let fade_out_start = (duration - fade).max(0.0);
    format!(
        "[0:v]fade=t=in:st=0:d={fade},fade=t=out:st={start:.3}:d={fade}[v]",
        fade = fade,
        start = fade_out_start
    )
}

/// Render a clip showing `image` for the length of `audio`, with fades.
///
/// The clip lasts exactly as long as the narration. On success both inputs
/// are consumed: they are deleted and the caller must not reuse them.
pub async fn compose_with_fade(
    image: &Path,
    audio: &Path,
    output: &Path,
    fade_secs: f64,
    runner: &FfmpegRunner,
) -> MediaResult<()> {
    require_file(image).await?;
    require_file(audio).await?;

    let duration = probe_duration(audio).await?;

    info!(
        "Composing clip: {} + {} -> {} ({:.2}s)",
        image.display(),
        audio.display(),
        output.display(),
        duration
    );

    let cmd = FfmpegCommand::new(output)
        .looped_image(image)
        .input(audio)
        .filter_complex(fade_filter(duration, fade_secs))
        .map("[v]")
        .map("1:a")
        .duration(duration)
        .video_codec("libx264")
        .pixel_format("yuv420p")
        .audio_codec("aac");

    runner.run(&cmd).await?;

    remove_quietly(audio).await;
    remove_quietly(image).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediaError;
    use tempfile::TempDir;

    #[test]
    fn test_fade_filter() {
        let filter = fade_filter(5.0, 1.0);
        assert_eq!(
            filter,
            "[0:v]fade=t=in:st=0:d=1,fade=t=out:st=4.000:d=1[v]"
        );
    }

    #[test]
    fn test_fade_filter_clamps_short_audio() {
        let filter = fade_filter(0.5, 1.0);
        assert!(filter.contains("fade=t=out:st=0.000"));
    }

    #[tokio::test]
    async fn test_compose_requires_inputs() {
        let dir = TempDir::new().unwrap();
        let image = dir.path().join("image.jpg");
        let audio = dir.path().join("audio.mp3");
        tokio::fs::write(&image, b"jpg").await.unwrap();

        let result = compose_with_fade(
            &image,
            &audio,
            &dir.path().join("clip.mp4"),
            DEFAULT_FADE_SECS,
            &FfmpegRunner::new(),
        )
        .await;

        match result {
            Err(MediaError::FileNotFound(path)) => assert_eq!(path, audio),
            other => panic!("expected FileNotFound, got {:?}", other),
        }
        // Inputs are only consumed on success
        assert!(image.exists());
    }
}
