//! Payload handed to the player for a served job.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::job::{Job, JobId};

/// Prefix under which final artifacts are fetched.
pub const VIDEO_ROUTE_PREFIX: &str = "/videos";

/// A served video: script text, image references and artifact reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedVideo {
    pub job_id: JobId,
    pub topic: String,
    pub script: Vec<String>,
    pub image_urls: Vec<Option<String>>,
    pub video_url: String,
}

impl GeneratedVideo {
    /// Build the payload from an assembled job.
    ///
    /// Returns `None` if the job has no final artifact.
    pub fn from_job(job: &Job) -> Option<Self> {
        let name = job.artifact_name()?;
        Some(Self {
            job_id: job.id.clone(),
            topic: job.topic.clone(),
            script: job.sentences.clone(),
            image_urls: job.image_refs.clone(),
            video_url: format!("{}/{}", VIDEO_ROUTE_PREFIX, name),
        })
    }
}
