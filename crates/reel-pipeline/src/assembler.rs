//! Joins rendered clips into the final artifact.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use reel_media::fs_utils::remove_quietly;
use reel_models::SegmentOutcome;

use crate::error::{PipelineError, PipelineResult};
use crate::ports::Stitcher;

/// Hands ordered clip paths to the [`Stitcher`].
///
/// The stitcher needs every input present, so a job with any segment that
/// did not render fails as a whole before the stitcher is called. Whenever a
/// job is not assembled, the clips that did render are deleted.
pub struct Assembler {
    stitcher: Arc<dyn Stitcher>,
}

impl Assembler {
    pub fn new(stitcher: Arc<dyn Stitcher>) -> Self {
        Self { stitcher }
    }

    pub async fn assemble(&self, outcomes: &[SegmentOutcome]) -> PipelineResult<PathBuf> {
        if outcomes.is_empty() {
            return Err(PipelineError::stitch_failed("no segments to assemble"));
        }

        let missing: Vec<usize> = outcomes
            .iter()
            .enumerate()
            .filter(|(_, outcome)| !outcome.is_rendered())
            .map(|(index, _)| index)
            .collect();

        if !missing.is_empty() {
            self.release(outcomes).await;

            let any_failed = outcomes
                .iter()
                .any(|o| matches!(o, SegmentOutcome::Failed(_)));
            if !any_failed {
                return Err(PipelineError::Cancelled);
            }

            warn!("Not assembling, segments without a clip: {:?}", missing);
            return Err(PipelineError::PartialFailure { failed: missing });
        }

        let clips: Vec<PathBuf> = outcomes
            .iter()
            .filter_map(|o| o.clip_path().cloned())
            .collect();

        info!("Assembling {} clips", clips.len());

        match self.stitcher.concatenate(&clips).await {
            Ok(path) => Ok(path),
            Err(e) => {
                // Inputs are only consumed on success
                self.release(outcomes).await;
                Err(PipelineError::stitch_failed(e.to_string()))
            }
        }
    }

    /// Delete the clips of rendered segments in a job that will not be
    /// assembled.
    pub async fn release(&self, outcomes: &[SegmentOutcome]) {
        for path in outcomes.iter().filter_map(|o| o.clip_path()) {
            remove_quietly(path).await;
        }
    }
}
