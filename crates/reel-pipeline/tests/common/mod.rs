//! In-memory collaborators with call counters.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reel_models::Voice;
use reel_pipeline::{
    AudioSynthesis, Collaborators, GeneratedImage, ImageSynthesis, PipelineConfig, RetryPolicy,
    Script, ScriptSelector, StageError, StageResult, Stitcher, VideoComposer,
};

/// Marker sentences; the first word of an image prompt identifies its segment.
pub fn sentences(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("S{}.", i)).collect()
}

fn marker(text: &str) -> String {
    text.split_whitespace().next().unwrap_or_default().to_string()
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub fn clip_for(sentence: &str) -> PathBuf {
    PathBuf::from(format!("/fake/clips/{}.mp4", marker(sentence)))
}

pub struct FakeScripts {
    pub calls: AtomicUsize,
    pub seen_used_topics: Mutex<Vec<Vec<String>>>,
    sentences: Vec<String>,
}

impl FakeScripts {
    pub fn new(sentences: Vec<String>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            seen_used_topics: Mutex::new(Vec::new()),
            sentences,
        }
    }
}

#[async_trait]
impl ScriptSelector for FakeScripts {
    async fn select_and_generate(
        &self,
        topics: &[String],
        used_topics: &[String],
    ) -> StageResult<Script> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_used_topics
            .lock()
            .unwrap()
            .push(used_topics.to_vec());
        let topic = topics
            .first()
            .cloned()
            .ok_or_else(|| StageError::fatal("no topics"))?;
        Ok(Script {
            title: format!("{} #{}", topic, n),
            topic,
            sentences: self.sentences.clone(),
        })
    }
}

#[derive(Default)]
pub struct FakeImages {
    pub calls: AtomicUsize,
    /// Segments (by marker) that are always rate limited
    pub rate_limited: Vec<String>,
    /// Segments (by marker) that fail fatally
    pub fatal: Vec<String>,
    /// Per-segment latency
    pub delays: HashMap<String, Duration>,
}

#[async_trait]
impl ImageSynthesis for FakeImages {
    async fn generate(&self, prompt: &str) -> StageResult<GeneratedImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = marker(prompt);
        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }
        if self.rate_limited.contains(&key) {
            return Err(StageError::transient("429 Too Many Requests"));
        }
        if self.fatal.contains(&key) {
            return Err(StageError::fatal("content policy violation"));
        }
        Ok(GeneratedImage {
            path: PathBuf::from(format!("/fake/images/{}.jpg", key)),
            url: Some(format!("https://images.test/{}", key)),
        })
    }
}

#[derive(Default)]
pub struct FakeAudio {
    pub calls: AtomicUsize,
    delay_ms: AtomicU64,
}

impl FakeAudio {
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

#[async_trait]
impl AudioSynthesis for FakeAudio {
    async fn synthesize(&self, text: &str, _voice: Voice) -> StageResult<PathBuf> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        Ok(PathBuf::from(format!("/fake/audio/{}.mp3", marker(text))))
    }
}

#[derive(Default)]
pub struct FakeComposer {
    pub calls: AtomicUsize,
}

#[async_trait]
impl VideoComposer for FakeComposer {
    async fn compose_with_fade(&self, image: &Path, _audio: &Path) -> StageResult<PathBuf> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(PathBuf::from(format!("/fake/clips/{}.mp4", stem(image))))
    }
}

#[derive(Default)]
pub struct FakeStitcher {
    pub calls: Mutex<Vec<Vec<PathBuf>>>,
}

impl FakeStitcher {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Stitcher for FakeStitcher {
    async fn concatenate(&self, clips: &[PathBuf]) -> StageResult<PathBuf> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(clips.to_vec());
        Ok(PathBuf::from(format!("/fake/out/combined_{}.mp4", calls.len())))
    }
}

/// Fakes plus the bundle built from them.
pub struct Fakes {
    pub scripts: Arc<FakeScripts>,
    pub images: Arc<FakeImages>,
    pub audio: Arc<FakeAudio>,
    pub composer: Arc<FakeComposer>,
    pub stitcher: Arc<FakeStitcher>,
}

impl Fakes {
    pub fn new(images: FakeImages) -> Self {
        Self {
            scripts: Arc::new(FakeScripts::new(sentences(4))),
            images: Arc::new(images),
            audio: Arc::new(FakeAudio::default()),
            composer: Arc::new(FakeComposer::default()),
            stitcher: Arc::new(FakeStitcher::default()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            scripts: self.scripts.clone(),
            images: self.images.clone(),
            audio: self.audio.clone(),
            composer: self.composer.clone(),
            stitcher: self.stitcher.clone(),
        }
    }
}

/// Fast config: no stagger, millisecond retry delay.
pub fn test_config(work_dir: &Path) -> PipelineConfig {
    PipelineConfig {
        work_dir: work_dir.join("work"),
        output_dir: work_dir.join("out"),
        image_retry: RetryPolicy::new("image")
            .with_max_retries(3)
            .with_delay(Duration::from_millis(1)),
        stagger: Duration::ZERO,
        ..Default::default()
    }
}

/// Poll `condition` until it holds or a second passes.
pub async fn wait_until(condition: impl Fn() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached in time"
        );
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}
