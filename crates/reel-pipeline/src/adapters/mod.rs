//! Production collaborators.

mod ffmpeg;
mod gemini;
mod openai;
mod tts;

use std::sync::Arc;

use reel_ai_client::{AiConfig, AiResult, GeminiClient, ImageClient, TtsClient};
use reel_media::FfmpegRunner;

pub use ffmpeg::{FfmpegComposer, FfmpegStitcher};
pub use gemini::GeminiScriptSelector;
pub use openai::OpenAiImageSynthesis;
pub use tts::GoogleTtsSynthesis;

use crate::config::PipelineConfig;
use crate::ports::Collaborators;

/// Wire the upstream clients and FFmpeg into a collaborator bundle.
pub fn production_collaborators(
    pipeline: &PipelineConfig,
    ai: &AiConfig,
) -> AiResult<Collaborators> {
    let mut runner = FfmpegRunner::new();
    if let Some(timeout) = pipeline.ffmpeg_timeout {
        runner = runner.with_timeout(timeout);
    }

    Ok(Collaborators {
        scripts: Arc::new(GeminiScriptSelector::new(
            GeminiClient::new(ai)?,
            pipeline.segment_count,
        )),
        images: Arc::new(OpenAiImageSynthesis::new(
            ImageClient::new(ai)?,
            pipeline.images_dir(),
        )),
        audio: Arc::new(GoogleTtsSynthesis::new(
            TtsClient::new(ai)?,
            pipeline.audio_dir(),
        )),
        composer: Arc::new(FfmpegComposer::new(
            runner.clone(),
            pipeline.clips_dir(),
            pipeline.fade_secs,
        )),
        stitcher: Arc::new(FfmpegStitcher::new(runner, pipeline.output_dir.clone())),
    })
}
