//! Segment task and fan-out behavior against in-memory collaborators.

mod common;

use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use reel_models::{SegmentOutcome, SegmentSpec, SegmentStage, Voice};
use reel_pipeline::{
    AudioSynthesis, CancellationSignal, Collaborators, FanOutScheduler, GeneratedImage,
    ImageSynthesis, RetryPolicy, SegmentTask, StageError, StageResult, VideoComposer,
};

use common::{clip_for, sentences, FakeImages, Fakes};

fn fast_retry() -> RetryPolicy {
    RetryPolicy::new("image")
        .with_max_retries(3)
        .with_delay(Duration::from_millis(1))
}

fn specs(sentences: &[String]) -> Vec<SegmentSpec> {
    sentences
        .iter()
        .enumerate()
        .map(|(i, s)| SegmentSpec::new(i, s.clone(), format!("{} style prompt", s)))
        .collect()
}

#[tokio::test]
async fn test_cancelled_before_first_stage_makes_no_calls() {
    let fakes = Fakes::new(FakeImages::default());
    let task = SegmentTask::new(fakes.collaborators(), fast_retry(), None);

    let signal = CancellationSignal::new();
    let observer = signal.observer();
    signal.set();

    let spec = SegmentSpec::new(0, "S0.", "S0. prompt");
    let outcome = task.run(&spec, &observer).await;

    assert_eq!(
        outcome,
        SegmentOutcome::Cancelled {
            stage: SegmentStage::Image
        }
    );
    assert_eq!(fakes.images.calls.load(Ordering::SeqCst), 0);
    assert_eq!(fakes.audio.calls.load(Ordering::SeqCst), 0);
    assert_eq!(fakes.composer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_rendered_segment_carries_image_ref() {
    let fakes = Fakes::new(FakeImages::default());
    let task = SegmentTask::new(fakes.collaborators(), fast_retry(), None);
    let signal = CancellationSignal::new();

    let spec = SegmentSpec::new(1, "S1.", "S1. prompt");
    match task.run(&spec, &signal.observer()).await {
        SegmentOutcome::Rendered(rendered) => {
            assert_eq!(rendered.clip_path, clip_for("S1."));
            assert_eq!(rendered.image_ref.as_deref(), Some("https://images.test/S1."));
        }
        other => panic!("expected Rendered, got {:?}", other),
    }
    assert_eq!(fakes.audio.calls.load(Ordering::SeqCst), 1);
    assert_eq!(fakes.composer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_image_rate_limit_exhausts_retries_and_skips_later_stages() {
    let fakes = Fakes::new(FakeImages {
        rate_limited: vec!["S0.".to_string()],
        ..Default::default()
    });
    let task = SegmentTask::new(fakes.collaborators(), fast_retry(), None);
    let signal = CancellationSignal::new();

    let outcome = task
        .run(&SegmentSpec::new(0, "S0.", "S0. prompt"), &signal.observer())
        .await;

    match outcome {
        SegmentOutcome::Failed(failure) => assert_eq!(failure.stage, SegmentStage::Image),
        other => panic!("expected Failed, got {:?}", other),
    }
    // First attempt plus three retries
    assert_eq!(fakes.images.calls.load(Ordering::SeqCst), 4);
    assert_eq!(fakes.audio.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_fatal_image_failure_is_not_retried() {
    let fakes = Fakes::new(FakeImages {
        fatal: vec!["S0.".to_string()],
        ..Default::default()
    });
    let task = SegmentTask::new(fakes.collaborators(), fast_retry(), None);
    let signal = CancellationSignal::new();

    let outcome = task
        .run(&SegmentSpec::new(0, "S0.", "S0. prompt"), &signal.observer())
        .await;

    assert!(matches!(outcome, SegmentOutcome::Failed(_)));
    assert_eq!(fakes.images.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_fan_out_preserves_order_under_shuffled_latency() {
    for n in 1..=8 {
        let sentences = sentences(n);

        let mut delays: Vec<u64> = (0..n as u64).map(|i| i * 3).collect();
        delays.shuffle(&mut rand::rng());
        let delays: HashMap<String, Duration> = sentences
            .iter()
            .cloned()
            .zip(delays.into_iter().map(Duration::from_millis))
            .collect();

        let fakes = Fakes::new(FakeImages {
            delays,
            ..Default::default()
        });
        let task = Arc::new(SegmentTask::new(fakes.collaborators(), fast_retry(), None));
        let scheduler = FanOutScheduler::new(task, Duration::ZERO);
        let signal = CancellationSignal::new();

        let outcomes = scheduler
            .run_all(specs(&sentences), &signal.observer())
            .await;

        assert_eq!(outcomes.len(), n);
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.clip_path(), Some(&clip_for(&sentences[i])));
        }
    }
}

#[tokio::test]
async fn test_one_failing_segment_does_not_stop_siblings() {
    let fakes = Fakes::new(FakeImages {
        rate_limited: vec!["S2.".to_string()],
        ..Default::default()
    });
    let task = Arc::new(SegmentTask::new(fakes.collaborators(), fast_retry(), None));
    let scheduler = FanOutScheduler::new(task, Duration::ZERO);
    let signal = CancellationSignal::new();

    let outcomes = scheduler
        .run_all(specs(&sentences(4)), &signal.observer())
        .await;

    assert_eq!(outcomes.len(), 4);
    assert!(outcomes[0].is_rendered());
    assert!(outcomes[1].is_rendered());
    assert!(matches!(outcomes[2], SegmentOutcome::Failed(_)));
    assert!(outcomes[3].is_rendered());
    assert_eq!(fakes.composer.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_staggered_launch() {
    let fakes = Fakes::new(FakeImages::default());
    let task = Arc::new(SegmentTask::new(fakes.collaborators(), fast_retry(), None));
    let scheduler = FanOutScheduler::new(task, Duration::from_millis(20));
    let signal = CancellationSignal::new();

    let started = std::time::Instant::now();
    let outcomes = scheduler
        .run_all(specs(&sentences(4)), &signal.observer())
        .await;

    assert!(outcomes.iter().all(|o| o.is_rendered()));
    assert!(started.elapsed() >= Duration::from_millis(60));
}

struct DiskImages(std::path::PathBuf);

#[async_trait::async_trait]
impl ImageSynthesis for DiskImages {
    async fn generate(&self, _prompt: &str) -> StageResult<GeneratedImage> {
        let path = self.0.join("image.jpg");
        tokio::fs::write(&path, b"jpg").await?;
        Ok(GeneratedImage { path, url: None })
    }
}

struct DiskAudio(std::path::PathBuf);

#[async_trait::async_trait]
impl AudioSynthesis for DiskAudio {
    async fn synthesize(&self, _text: &str, _voice: Voice) -> StageResult<std::path::PathBuf> {
        let path = self.0.join("narration.mp3");
        tokio::fs::write(&path, b"mp3").await?;
        Ok(path)
    }
}

struct BrokenComposer;

#[async_trait::async_trait]
impl VideoComposer for BrokenComposer {
    async fn compose_with_fade(
        &self,
        _image: &std::path::Path,
        _audio: &std::path::Path,
    ) -> StageResult<std::path::PathBuf> {
        Err(StageError::fatal("ffmpeg exited with status 1"))
    }
}

#[tokio::test]
async fn test_compose_failure_removes_inputs() {
    let dir = tempfile::TempDir::new().unwrap();
    let fakes = Fakes::new(FakeImages::default());
    let collaborators = Collaborators {
        images: Arc::new(DiskImages(dir.path().to_path_buf())),
        audio: Arc::new(DiskAudio(dir.path().to_path_buf())),
        composer: Arc::new(BrokenComposer),
        ..fakes.collaborators()
    };
    let task = SegmentTask::new(collaborators, fast_retry(), None);
    let signal = CancellationSignal::new();

    let outcome = task
        .run(&SegmentSpec::new(0, "S0.", "S0. prompt"), &signal.observer())
        .await;

    match outcome {
        SegmentOutcome::Failed(failure) => assert_eq!(failure.stage, SegmentStage::Compose),
        other => panic!("expected compose failure, got {:?}", other),
    }
    assert!(!dir.path().join("image.jpg").exists());
    assert!(!dir.path().join("narration.mp3").exists());
}
