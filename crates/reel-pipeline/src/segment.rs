//! Per-sentence pipeline: image, narration, clip.

use rand::prelude::IndexedRandom;
use tracing::{debug, info, warn};

use reel_media::fs_utils::remove_quietly;
use reel_models::{
    Accent, Gender, RenderedSegment, SegmentFailure, SegmentOutcome, SegmentSpec, SegmentStage,
    Voice,
};

use crate::cancel::CancelObserver;
use crate::error::RetryError;
use crate::ports::Collaborators;
use crate::retry::RetryPolicy;

/// Draw accent and gender independently and uniformly.
pub fn random_voice() -> Voice {
    let mut rng = rand::rng();
    let accent = Accent::ALL.choose(&mut rng).copied().unwrap_or(Accent::Us);
    let gender = Gender::ALL.choose(&mut rng).copied().unwrap_or(Gender::Neutral);
    Voice::new(accent, gender)
}

/// Runs one segment through its stages.
///
/// The cancellation observer is sampled before each stage; once it reports
/// cancelled no further collaborator call is made. A call already in flight
/// runs to completion.
pub struct SegmentTask {
    collaborators: Collaborators,
    image_retry: RetryPolicy,
    audio_retry: Option<RetryPolicy>,
}

impl SegmentTask {
    pub fn new(
        collaborators: Collaborators,
        image_retry: RetryPolicy,
        audio_retry: Option<RetryPolicy>,
    ) -> Self {
        Self {
            collaborators,
            image_retry,
            audio_retry,
        }
    }

    pub async fn run(&self, spec: &SegmentSpec, observer: &CancelObserver) -> SegmentOutcome {
        let index = spec.index;

        if observer.is_cancelled() {
            return cancelled(index, SegmentStage::Image);
        }

        let images = &self.collaborators.images;
        let prompt = spec.image_prompt.as_str();
        let image = match self
            .image_retry
            .execute_observed(observer, move || images.generate(prompt))
            .await
        {
            Ok(image) => image,
            Err(RetryError::Cancelled { .. }) => return cancelled(index, SegmentStage::Image),
            Err(e) => return failed(index, SegmentStage::Image, e),
        };
        debug!(segment = index, "Image ready: {}", image.path.display());

        if observer.is_cancelled() {
            remove_quietly(&image.path).await;
            return cancelled(index, SegmentStage::Audio);
        }

        let voice = random_voice();
        let audio = &self.collaborators.audio;
        let text = spec.sentence.as_str();
        let narration = match &self.audio_retry {
            Some(policy) => {
                policy
                    .execute_observed(observer, move || audio.synthesize(text, voice))
                    .await
            }
            None => audio.synthesize(text, voice).await.map_err(RetryError::from),
        };
        let narration = match narration {
            Ok(path) => path,
            Err(e) => {
                remove_quietly(&image.path).await;
                return match e {
                    RetryError::Cancelled { .. } => cancelled(index, SegmentStage::Audio),
                    e => failed(index, SegmentStage::Audio, e),
                };
            }
        };
        debug!(segment = index, voice = %voice, "Narration ready: {}", narration.display());

        if observer.is_cancelled() {
            remove_quietly(&image.path).await;
            remove_quietly(&narration).await;
            return cancelled(index, SegmentStage::Compose);
        }

        match self
            .collaborators
            .composer
            .compose_with_fade(&image.path, &narration)
            .await
        {
            Ok(clip_path) => {
                info!(segment = index, "Clip rendered: {}", clip_path.display());
                SegmentOutcome::Rendered(RenderedSegment {
                    clip_path,
                    image_ref: image.url,
                })
            }
            Err(e) => {
                remove_quietly(&image.path).await;
                remove_quietly(&narration).await;
                failed(index, SegmentStage::Compose, RetryError::from(e))
            }
        }
    }
}

fn cancelled(index: usize, stage: SegmentStage) -> SegmentOutcome {
    info!(segment = index, stage = %stage, "Segment cancelled");
    SegmentOutcome::Cancelled { stage }
}

fn failed(index: usize, stage: SegmentStage, error: RetryError) -> SegmentOutcome {
    warn!(segment = index, stage = %stage, "Segment failed: {}", error);
    SegmentOutcome::Failed(SegmentFailure::new(stage, error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_random_voice_covers_table() {
        let seen: HashSet<Voice> = (0..500).map(|_| random_voice()).collect();
        // 6 combinations; 500 draws miss one with negligible probability
        assert_eq!(seen.len(), 6);
    }
}
