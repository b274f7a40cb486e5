//! Job definitions for video generation runs.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::segment::SegmentOutcome;

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a single generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Script is being selected
    #[default]
    Pending,
    /// Segments are being rendered
    Rendering,
    /// Rendered clips are being stitched
    Assembling,
    /// Final video is available
    Completed,
    /// One or more stages failed
    Failed,
    /// A reset was observed before completion
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Rendering => "rendering",
            JobStatus::Assembling => "assembling",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

/// One complete video generation run.
///
/// Slot vectors (`image_refs`, `clip_paths`) are sized to the sentence count
/// when the job is created and indexed by segment index.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    /// Unique job ID
    pub id: JobId,

    /// Topic picked from the caller's list
    pub topic: String,

    /// Specific subtopic the script explains
    pub title: String,

    /// Ordered narration sentences
    pub sentences: Vec<String>,

    /// Per-sentence image reference shown alongside the script
    pub image_refs: Vec<Option<String>>,

    /// Per-sentence rendered clip
    pub clip_paths: Vec<Option<PathBuf>>,

    /// Stitched artifact, set by assembly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_video: Option<PathBuf>,

    pub status: JobStatus,

    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Create a job for a freshly generated script.
    pub fn new(topic: impl Into<String>, title: impl Into<String>, sentences: Vec<String>) -> Self {
        let slots = sentences.len();
        Self {
            id: JobId::new(),
            topic: topic.into(),
            title: title.into(),
            sentences,
            image_refs: vec![None; slots],
            clip_paths: vec![None; slots],
            final_video: None,
            status: JobStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Number of segments in this job.
    pub fn segment_count(&self) -> usize {
        self.sentences.len()
    }

    /// Copy ordered segment outcomes into the job's slots.
    ///
    /// Outcome `i` lands in slot `i`; slots without a rendered clip stay empty.
    pub fn record_outcomes(&mut self, outcomes: &[SegmentOutcome]) {
        for (index, outcome) in outcomes.iter().enumerate().take(self.segment_count()) {
            if let SegmentOutcome::Rendered(rendered) = outcome {
                self.clip_paths[index] = Some(rendered.clip_path.clone());
                self.image_refs[index] = rendered.image_ref.clone();
            }
        }
    }

    /// Mark the job as finished with the given artifact.
    pub fn complete(&mut self, final_video: PathBuf) {
        self.final_video = Some(final_video);
        self.status = JobStatus::Completed;
    }

    /// File name of the final artifact, if assembled.
    pub fn artifact_name(&self) -> Option<String> {
        self.final_video
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
    }

    /// True when the job holds a finished artifact.
    pub fn is_complete(&self) -> bool {
        self.status == JobStatus::Completed && self.final_video.is_some()
    }
}
