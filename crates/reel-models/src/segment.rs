//! Segment specifications and outcomes.

use std::fmt;
use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input for one segment: a sentence and the prompt for its image.
///
/// `index` is fixed when the job is created and defines final ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SegmentSpec {
    pub index: usize,
    pub sentence: String,
    pub image_prompt: String,
}

impl SegmentSpec {
    pub fn new(index: usize, sentence: impl Into<String>, image_prompt: impl Into<String>) -> Self {
        Self {
            index,
            sentence: sentence.into(),
            image_prompt: image_prompt.into(),
        }
    }
}

/// Stage of the per-segment pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SegmentStage {
    /// Image synthesis
    Image,
    /// Narration synthesis
    Audio,
    /// Image + narration rendered into a clip
    Compose,
}

impl SegmentStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentStage::Image => "image",
            SegmentStage::Audio => "audio",
            SegmentStage::Compose => "compose",
        }
    }
}

impl fmt::Display for SegmentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a segment did not produce a clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SegmentFailure {
    pub stage: SegmentStage,
    pub reason: String,
}

impl SegmentFailure {
    pub fn new(stage: SegmentStage, reason: impl Into<String>) -> Self {
        Self {
            stage,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SegmentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stage failed: {}", self.stage, self.reason)
    }
}

/// A segment that made it through every stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RenderedSegment {
    pub clip_path: PathBuf,
    /// Reference to the generated image (remote URL when the provider returns one)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

/// Terminal result of one segment task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SegmentOutcome {
    Rendered(RenderedSegment),
    Failed(SegmentFailure),
    /// Cancellation was observed before `stage` started
    Cancelled { stage: SegmentStage },
}

impl SegmentOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, SegmentOutcome::Rendered(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SegmentOutcome::Cancelled { .. })
    }

    pub fn clip_path(&self) -> Option<&PathBuf> {
        match self {
            SegmentOutcome::Rendered(r) => Some(&r.clip_path),
            _ => None,
        }
    }

    /// Short label used for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            SegmentOutcome::Rendered(_) => "rendered",
            SegmentOutcome::Failed(_) => "failed",
            SegmentOutcome::Cancelled { .. } => "cancelled",
        }
    }
}
