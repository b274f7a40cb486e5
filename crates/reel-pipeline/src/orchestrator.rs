//! Job orchestrator.
//!
//! Owns the session state (used topics, preload cache, cancellation signal)
//! and decides for each request whether to serve the cached next job or run a
//! fresh one. After serving, it starts one background fill for the request
//! after that.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn, Instrument};

use reel_media::fs_utils::remove_quietly;
use reel_models::{GeneratedVideo, Job, JobStatus, SegmentOutcome, SegmentSpec};

use crate::assembler::Assembler;
use crate::cancel::{CancelObserver, CancellationSignal};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::logging::JobLogger;
use crate::metrics;
use crate::ports::Collaborators;
use crate::preload::{CacheState, FillOutcome, PreloadCache};
use crate::scheduler::FanOutScheduler;
use crate::script::fit_sentences;
use crate::segment::SegmentTask;
use crate::styles::{image_prompt, random_style};
use crate::topics::{validate_topics, UsedTopics};

/// Where the orchestrator is in serving a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrchestratorState {
    #[default]
    Idle,
    ServingFromCache,
    ServingFresh,
    Served,
    Resetting,
}

impl OrchestratorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrchestratorState::Idle => "idle",
            OrchestratorState::ServingFromCache => "serving_from_cache",
            OrchestratorState::ServingFresh => "serving_fresh",
            OrchestratorState::Served => "served",
            OrchestratorState::Resetting => "resetting",
        }
    }
}

struct OrchestratorInner {
    config: PipelineConfig,
    collaborators: Collaborators,
    scheduler: FanOutScheduler,
    assembler: Assembler,
    cache: PreloadCache,
    signal: CancellationSignal,
    used_topics: Mutex<UsedTopics>,
    state: Mutex<OrchestratorState>,
    preload: Mutex<Option<JoinHandle<()>>>,
}

/// Session context shared by request handlers. Cheap to clone.
#[derive(Clone)]
pub struct JobOrchestrator {
    inner: Arc<OrchestratorInner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl JobOrchestrator {
    pub fn new(config: PipelineConfig, collaborators: Collaborators) -> Self {
        let task = Arc::new(SegmentTask::new(
            collaborators.clone(),
            config.image_retry.clone(),
            config.audio_retry.clone(),
        ));
        let scheduler = FanOutScheduler::new(task, config.stagger);
        let assembler = Assembler::new(Arc::clone(&collaborators.stitcher));

        Self {
            inner: Arc::new(OrchestratorInner {
                config,
                collaborators,
                scheduler,
                assembler,
                cache: PreloadCache::new(),
                signal: CancellationSignal::new(),
                used_topics: Mutex::new(UsedTopics::new()),
                state: Mutex::new(OrchestratorState::Idle),
                preload: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.inner.config
    }

    pub fn state(&self) -> OrchestratorState {
        *lock(&self.inner.state)
    }

    pub fn cache_state(&self) -> CacheState {
        self.inner.cache.state()
    }

    /// Snapshot of the subtopics covered this session.
    pub fn used_topics(&self) -> Vec<String> {
        lock(&self.inner.used_topics).as_slice().to_vec()
    }

    pub fn is_cancel_pending(&self) -> bool {
        self.inner.signal.is_set()
    }

    fn set_state(&self, state: OrchestratorState) {
        *lock(&self.inner.state) = state;
    }

    /// Serve the next video for `topics`.
    ///
    /// Serves the preloaded job when one is ready, otherwise runs a job now.
    /// Either way a background fill for the following request is started.
    pub async fn generate(&self, topics: &[String]) -> PipelineResult<GeneratedVideo> {
        let topics = validate_topics(topics)?;

        // A new request ends any pending reset
        if self.inner.signal.is_set() {
            debug!("Clearing cancellation from previous reset");
            self.inner.signal.clear();
        }
        self.set_state(OrchestratorState::Idle);

        let started = Instant::now();
        let (job, source) = match self.inner.cache.take_if_filled() {
            Some(job) => {
                self.set_state(OrchestratorState::ServingFromCache);
                info!(job_id = %job.id, "Serving preloaded job");
                (job, "cache")
            }
            None => {
                self.set_state(OrchestratorState::ServingFresh);
                let observer = self.inner.signal.observer();
                match self.run_job(&topics, &observer, "fresh").await {
                    Ok(job) => (job, "fresh"),
                    Err(e) => {
                        metrics::record_job(
                            "fresh",
                            e.kind().as_str(),
                            started.elapsed().as_secs_f64(),
                        );
                        if !self.inner.signal.is_set() {
                            self.set_state(OrchestratorState::Idle);
                        }
                        return Err(e);
                    }
                }
            }
        };

        let video = GeneratedVideo::from_job(&job)
            .ok_or_else(|| PipelineError::stitch_failed("job has no final artifact"))?;

        metrics::record_job(source, "success", started.elapsed().as_secs_f64());
        self.set_state(OrchestratorState::Served);

        self.start_preload(topics);

        Ok(video)
    }

    /// Cancel in-flight work and forget the session.
    ///
    /// Raises the cancellation signal, clears used topics and drops the cached
    /// job. The signal stays raised until the next `generate`. Calling this
    /// twice is the same as calling it once.
    pub async fn reset(&self) {
        self.set_state(OrchestratorState::Resetting);
        self.inner.signal.set();
        lock(&self.inner.used_topics).clear();

        if let Some(job) = self.inner.cache.reset() {
            info!(job_id = %job.id, "Discarding preloaded job");
            discard_artifact(&job).await;
        }

        info!("Session reset");
    }

    /// Wait for the most recently started background fill to finish.
    pub async fn wait_for_preload(&self) {
        let handle = lock(&self.inner.preload).take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!("Preload task ended abnormally: {}", e);
            }
        }
    }

    fn start_preload(&self, topics: Vec<String>) {
        if !self.inner.config.preload_enabled {
            return;
        }
        if self.inner.cache.state() != CacheState::Empty {
            debug!("Preload already in progress, not starting another");
            return;
        }

        let observer = self.inner.signal.observer();
        let this = self.clone();
        let handle = tokio::spawn(
            async move {
                let started = Instant::now();
                let job = this.run_job(&topics, &observer, "preload");
                match this.inner.cache.fill(&observer, job).await {
                    FillOutcome::Stored => {
                        info!(
                            "Next job preloaded in {:.1}s",
                            started.elapsed().as_secs_f64()
                        );
                        metrics::record_preload("stored");
                    }
                    FillOutcome::Skipped => {
                        debug!("Preload skipped");
                        metrics::record_preload("skipped");
                    }
                    FillOutcome::Discarded(job) => {
                        info!(job_id = %job.id, "Preloaded job discarded after reset");
                        discard_artifact(&job).await;
                        metrics::record_preload("discarded");
                    }
                    FillOutcome::Failed(e) if e.is_cancelled() => {
                        info!("Preload cancelled");
                        metrics::record_preload("cancelled");
                    }
                    FillOutcome::Failed(e) => {
                        warn!("Preload failed: {}", e);
                        metrics::record_preload("failed");
                    }
                }
            }
            .instrument(tracing::info_span!("preload")),
        );

        *lock(&self.inner.preload) = Some(handle);
    }

    /// Run one job end to end: script, segments, assembly.
    async fn run_job(
        &self,
        topics: &[String],
        observer: &CancelObserver,
        operation: &str,
    ) -> PipelineResult<Job> {
        if observer.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        let config = &self.inner.config;
        tokio::fs::create_dir_all(&config.work_dir).await?;

        let used = self.used_topics();
        let script = self
            .inner
            .collaborators
            .scripts
            .select_and_generate(topics, &used)
            .await
            .map_err(PipelineError::ScriptFailed)?;

        if !lock(&self.inner.used_topics).record(script.title.clone(), observer) {
            return Err(PipelineError::Cancelled);
        }

        let sentences = fit_sentences(script.sentences, config.segment_count, &script.topic);
        let mut job = Job::new(script.topic, script.title, sentences);
        let logger = JobLogger::new(&job.id, operation);
        let span = logger.create_span();

        async {
            logger.log_start(&format!("'{}' ({})", job.title, job.topic));

            let style = random_style();
            let specs: Vec<SegmentSpec> = job
                .sentences
                .iter()
                .enumerate()
                .map(|(index, sentence)| {
                    SegmentSpec::new(index, sentence.clone(), image_prompt(sentence, style, &job.title))
                })
                .collect();

            job.status = JobStatus::Rendering;
            let outcomes = self.inner.scheduler.run_all(specs, observer).await;
            job.record_outcomes(&outcomes);

            for (index, outcome) in outcomes.iter().enumerate() {
                if let SegmentOutcome::Failed(failure) = outcome {
                    logger.log_warning(&format!("segment {}: {}", index, failure));
                }
            }

            job.status = JobStatus::Assembling;
            let assembled = if observer.is_cancelled() {
                self.inner.assembler.release(&outcomes).await;
                Err(PipelineError::Cancelled)
            } else {
                self.inner.assembler.assemble(&outcomes).await
            };

            match assembled {
                Ok(path) => {
                    job.complete(path);
                    logger.log_completion(&format!(
                        "{} segments -> {}",
                        job.segment_count(),
                        job.artifact_name().unwrap_or_default()
                    ));
                    Ok(job)
                }
                Err(e) => {
                    job.status = if e.is_cancelled() {
                        JobStatus::Cancelled
                    } else {
                        JobStatus::Failed
                    };
                    if e.is_cancelled() {
                        logger.log_progress("cancelled before assembly");
                    } else {
                        logger.log_error(&e.to_string());
                    }
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }
}

async fn discard_artifact(job: &Job) {
    if let Some(path) = job.final_video.as_deref() {
        remove_artifact(path).await;
    }
}

async fn remove_artifact(path: &Path) {
    if remove_quietly(path).await {
        debug!("Removed artifact {}", path.display());
    }
}
