//! Clip rendering and stitching backed by FFmpeg.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use reel_media::fs_utils::ensure_dir;
use reel_media::{compose_with_fade, concatenate, FfmpegRunner};

use crate::error::StageResult;
use crate::ports::{Stitcher, VideoComposer};

pub struct FfmpegComposer {
    runner: FfmpegRunner,
    clips_dir: PathBuf,
    fade_secs: f64,
}

impl FfmpegComposer {
    pub fn new(runner: FfmpegRunner, clips_dir: PathBuf, fade_secs: f64) -> Self {
        Self {
            runner,
            clips_dir,
            fade_secs,
        }
    }
}

#[async_trait]
impl VideoComposer for FfmpegComposer {
    async fn compose_with_fade(&self, image: &Path, audio: &Path) -> StageResult<PathBuf> {
        ensure_dir(&self.clips_dir).await?;
        let output = self.clips_dir.join(format!("clip_{}.mp4", Uuid::new_v4()));
        compose_with_fade(image, audio, &output, self.fade_secs, &self.runner).await?;
        Ok(output)
    }
}

pub struct FfmpegStitcher {
    runner: FfmpegRunner,
    output_dir: PathBuf,
}

impl FfmpegStitcher {
    pub fn new(runner: FfmpegRunner, output_dir: PathBuf) -> Self {
        Self { runner, output_dir }
    }
}

#[async_trait]
impl Stitcher for FfmpegStitcher {
    async fn concatenate(&self, clips: &[PathBuf]) -> StageResult<PathBuf> {
        ensure_dir(&self.output_dir).await?;
        let output = self.output_dir.join(format!("combined_{}.mp4", Uuid::new_v4()));
        concatenate(clips, &output, &self.runner).await?;
        Ok(output)
    }
}
