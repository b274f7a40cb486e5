//! Collaborator seams.
//!
//! Each upstream capability the pipeline consumes is a trait object so the
//! orchestrator can run against production adapters or test fakes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use reel_models::Voice;

use crate::error::StageResult;

/// A generated script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    /// Topic picked from the caller's list
    pub topic: String,
    /// Specific subtopic the script explains
    pub title: String,
    /// Ordered narration sentences
    pub sentences: Vec<String>,
}

/// A synthesized image on local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub path: PathBuf,
    /// Remote reference shown next to the script, when the service gives one
    pub url: Option<String>,
}

/// Picks a topic and writes the script for it.
#[async_trait]
pub trait ScriptSelector: Send + Sync {
    /// `used_topics` lists subtopics to steer away from.
    async fn select_and_generate(
        &self,
        topics: &[String],
        used_topics: &[String],
    ) -> StageResult<Script>;
}

/// Text-to-image.
#[async_trait]
pub trait ImageSynthesis: Send + Sync {
    /// Fails with `Transient` when rate limited.
    async fn generate(&self, prompt: &str) -> StageResult<GeneratedImage>;
}

/// Text-to-speech.
#[async_trait]
pub trait AudioSynthesis: Send + Sync {
    async fn synthesize(&self, text: &str, voice: Voice) -> StageResult<PathBuf>;
}

/// Image + narration to clip.
#[async_trait]
pub trait VideoComposer: Send + Sync {
    /// The clip lasts as long as the narration. Both inputs are consumed on
    /// success.
    async fn compose_with_fade(&self, image: &Path, audio: &Path) -> StageResult<PathBuf>;
}

/// Ordered clips to final artifact.
#[async_trait]
pub trait Stitcher: Send + Sync {
    /// Inputs must share codec and container. They are consumed on success.
    async fn concatenate(&self, clips: &[PathBuf]) -> StageResult<PathBuf>;
}

/// Every collaborator the pipeline needs.
#[derive(Clone)]
pub struct Collaborators {
    pub scripts: Arc<dyn ScriptSelector>,
    pub images: Arc<dyn ImageSynthesis>,
    pub audio: Arc<dyn AudioSynthesis>,
    pub composer: Arc<dyn VideoComposer>,
    pub stitcher: Arc<dyn Stitcher>,
}
