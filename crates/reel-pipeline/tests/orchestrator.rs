//! End-to-end orchestrator scenarios against in-memory collaborators.

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use reel_pipeline::{
    CacheState, ErrorKind, JobOrchestrator, OrchestratorState, PipelineConfig, PipelineError,
};
use tempfile::TempDir;

use common::{clip_for, sentences, test_config, wait_until, FakeImages, Fakes};

fn topics(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn orchestrator(fakes: &Fakes, config: PipelineConfig) -> JobOrchestrator {
    JobOrchestrator::new(config, fakes.collaborators())
}

#[tokio::test]
async fn test_fresh_job_stitches_clips_in_sentence_order() {
    let dir = TempDir::new().unwrap();
    let fakes = Fakes::new(FakeImages::default());
    let config = PipelineConfig {
        preload_enabled: false,
        ..test_config(dir.path())
    };
    let orchestrator = orchestrator(&fakes, config);

    let video = orchestrator.generate(&topics(&["black holes"])).await.unwrap();

    let calls = fakes.stitcher.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0],
        sentences(4).iter().map(|s| clip_for(s)).collect::<Vec<_>>()
    );

    assert_eq!(video.script, sentences(4));
    assert_eq!(video.topic, "black holes");
    assert_eq!(video.video_url, "/videos/combined_1.mp4");
    assert_eq!(
        video.image_urls,
        sentences(4)
            .iter()
            .map(|s| Some(format!("https://images.test/{}", s)))
            .collect::<Vec<_>>()
    );
    assert_eq!(orchestrator.state(), OrchestratorState::Served);
    assert_eq!(orchestrator.used_topics(), vec!["black holes #0".to_string()]);
}

#[tokio::test]
async fn test_exhausted_image_retries_fail_the_job() {
    let dir = TempDir::new().unwrap();
    let fakes = Fakes::new(FakeImages {
        rate_limited: vec!["S2.".to_string()],
        ..Default::default()
    });
    let config = PipelineConfig {
        preload_enabled: false,
        ..test_config(dir.path())
    };
    let orchestrator = orchestrator(&fakes, config);

    let err = orchestrator
        .generate(&topics(&["black holes"]))
        .await
        .unwrap_err();

    match &err {
        PipelineError::PartialFailure { failed } => assert_eq!(failed, &vec![2]),
        other => panic!("expected PartialFailure, got {:?}", other),
    }
    assert_eq!(err.kind(), ErrorKind::PartialFailure);
    // Siblings still rendered; the stitcher was never asked
    assert_eq!(fakes.composer.calls.load(Ordering::SeqCst), 3);
    assert_eq!(fakes.stitcher.call_count(), 0);
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
}

#[tokio::test]
async fn test_second_request_is_served_from_preload() {
    let dir = TempDir::new().unwrap();
    let fakes = Fakes::new(FakeImages::default());
    let orchestrator = orchestrator(&fakes, test_config(dir.path()));

    let first = orchestrator.generate(&topics(&["oceans"])).await.unwrap();
    orchestrator.wait_for_preload().await;
    assert_eq!(orchestrator.cache_state(), CacheState::Filled);
    assert_eq!(fakes.scripts.calls.load(Ordering::SeqCst), 2);

    let second = orchestrator.generate(&topics(&["oceans"])).await.unwrap();
    assert_ne!(first.job_id, second.job_id);
    assert_eq!(second.video_url, "/videos/combined_2.mp4");

    // The preload's script request saw the first job's subtopic
    let seen = fakes.scripts.seen_used_topics.lock().unwrap().clone();
    assert_eq!(seen[1], vec!["oceans #0".to_string()]);

    orchestrator.wait_for_preload().await;
    assert_eq!(fakes.stitcher.call_count(), 3);
}

#[tokio::test]
async fn test_reset_mid_fill_stops_further_calls() {
    let dir = TempDir::new().unwrap();
    let fakes = Fakes::new(FakeImages::default());
    let orchestrator = orchestrator(&fakes, test_config(dir.path()));

    orchestrator.generate(&topics(&["black holes"])).await.unwrap();

    // The first job made 4 narration calls; hold the preload inside narration
    fakes.audio.set_delay(Duration::from_millis(100));
    let audio = fakes.audio.clone();
    wait_until(|| audio.calls.load(Ordering::SeqCst) > 4).await;

    orchestrator.reset().await;
    assert_eq!(orchestrator.state(), OrchestratorState::Resetting);
    orchestrator.wait_for_preload().await;

    // In-flight narration finished, but no clip was rendered or stitched
    assert_eq!(fakes.composer.calls.load(Ordering::SeqCst), 4);
    assert_eq!(fakes.stitcher.call_count(), 1);
    assert_eq!(orchestrator.cache_state(), CacheState::Empty);
    assert!(orchestrator.used_topics().is_empty());
}

#[tokio::test]
async fn test_reset_twice_equals_once() {
    let dir = TempDir::new().unwrap();
    let fakes = Fakes::new(FakeImages::default());
    let orchestrator = orchestrator(&fakes, test_config(dir.path()));

    orchestrator.generate(&topics(&["volcanoes"])).await.unwrap();
    orchestrator.wait_for_preload().await;
    assert_eq!(orchestrator.cache_state(), CacheState::Filled);

    orchestrator.reset().await;
    orchestrator.reset().await;

    assert!(orchestrator.used_topics().is_empty());
    assert_eq!(orchestrator.cache_state(), CacheState::Empty);
    assert!(orchestrator.is_cancel_pending());

    // The next request clears the signal and runs fresh
    let video = orchestrator.generate(&topics(&["volcanoes"])).await.unwrap();
    assert!(!orchestrator.is_cancel_pending());
    assert_eq!(video.video_url, "/videos/combined_3.mp4");
    assert_eq!(orchestrator.used_topics()[0], "volcanoes #2");
}

#[tokio::test]
async fn test_invalid_topics_are_rejected_before_any_work() {
    let dir = TempDir::new().unwrap();
    let fakes = Fakes::new(FakeImages::default());
    let orchestrator = orchestrator(&fakes, test_config(dir.path()));

    assert!(matches!(
        orchestrator.generate(&[]).await,
        Err(PipelineError::InvalidTopics(_))
    ));
    assert!(matches!(
        orchestrator.generate(&topics(&["  "])).await,
        Err(PipelineError::InvalidTopics(_))
    ));
    assert_eq!(fakes.scripts.calls.load(Ordering::SeqCst), 0);
}
