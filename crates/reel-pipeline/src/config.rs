//! Pipeline configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory for intermediate images, narration and clips
    pub work_dir: PathBuf,
    /// Directory final artifacts are written to and served from
    pub output_dir: PathBuf,
    /// Sentences (and therefore segments) per job
    pub segment_count: usize,
    /// Retry policy for image synthesis
    pub image_retry: RetryPolicy,
    /// Retry policy for narration synthesis; `None` means a single attempt
    pub audio_retry: Option<RetryPolicy>,
    /// Delay between launching consecutive segment tasks
    pub stagger: Duration,
    /// Fade-in / fade-out length for each clip, in seconds
    pub fade_secs: f64,
    /// Upper bound on a single FFmpeg invocation
    pub ffmpeg_timeout: Option<Duration>,
    /// Prepare the next job in the background after serving one
    pub preload_enabled: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("/tmp/reelforge"),
            output_dir: PathBuf::from("videos"),
            segment_count: 4,
            image_retry: RetryPolicy::new("image"),
            audio_retry: None,
            stagger: Duration::from_secs(1),
            fade_secs: 1.0,
            ffmpeg_timeout: Some(Duration::from_secs(600)),
            preload_enabled: true,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let image_retry = RetryPolicy::new("image")
            .with_max_retries(
                std::env::var("PIPELINE_IMAGE_MAX_RETRIES")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.image_retry.max_retries),
            )
            .with_delay(Duration::from_secs(
                std::env::var("PIPELINE_IMAGE_RETRY_DELAY_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(15),
            ));

        // Audio retry stays off unless a retry count is configured
        let audio_retry = std::env::var("PIPELINE_AUDIO_MAX_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .map(|max_retries| {
                RetryPolicy::new("audio")
                    .with_max_retries(max_retries)
                    .with_delay(Duration::from_secs(
                        std::env::var("PIPELINE_AUDIO_RETRY_DELAY_SECS")
                            .ok()
                            .and_then(|s| s.parse().ok())
                            .unwrap_or(15),
                    ))
            });

        let ffmpeg_timeout_secs: u64 = std::env::var("PIPELINE_FFMPEG_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(600);

        Self {
            work_dir: std::env::var("PIPELINE_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            output_dir: std::env::var("PIPELINE_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            segment_count: std::env::var("PIPELINE_SEGMENT_COUNT")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.segment_count),
            image_retry,
            audio_retry,
            stagger: Duration::from_millis(
                std::env::var("PIPELINE_STAGGER_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1000),
            ),
            fade_secs: std::env::var("PIPELINE_FADE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|f: &f64| *f >= 0.0)
                .unwrap_or(defaults.fade_secs),
            // 0 disables the timeout
            ffmpeg_timeout: (ffmpeg_timeout_secs > 0).then(|| Duration::from_secs(ffmpeg_timeout_secs)),
            preload_enabled: std::env::var("PIPELINE_PRELOAD")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.preload_enabled),
        }
    }

    pub fn images_dir(&self) -> PathBuf {
        self.work_dir.join("images")
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.work_dir.join("audio")
    }

    pub fn clips_dir(&self) -> PathBuf {
        self.work_dir.join("clips")
    }
}
