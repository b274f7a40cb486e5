//! Single-slot cache for the next job.
//!
//! The slot moves Empty -> Filling -> Filled and back to Empty when the job
//! is taken. A Filled slot only ever holds a fully assembled job.
//!
//! Every fill holds a [`FillTicket`] stamped with the cache generation.
//! `reset()` advances the generation, so a fill that was running during a
//! reset can never store its result.

use std::future::Future;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use reel_models::Job;

use crate::cancel::CancelObserver;
use crate::error::{PipelineError, PipelineResult};

#[derive(Debug, Default)]
enum Slot {
    #[default]
    Empty,
    Filling,
    Filled(Job),
}

#[derive(Debug, Default)]
struct CacheInner {
    slot: Slot,
    generation: u64,
}

/// Observable slot state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Filling,
    Filled,
}

/// Permission to store one fill result.
#[derive(Debug)]
#[must_use]
pub struct FillTicket {
    generation: u64,
}

/// How a call to [`PreloadCache::fill`] ended.
#[derive(Debug)]
pub enum FillOutcome {
    /// The job is in the slot.
    Stored,
    /// Another fill was running, the slot was already full, or the work was
    /// cancelled before it started.
    Skipped,
    /// The job finished but was not stored because a reset happened first.
    /// The caller owns the job and its artifact.
    Discarded(Job),
    /// The job failed; the slot is Empty again.
    Failed(PipelineError),
}

#[derive(Debug, Default)]
pub struct PreloadCache {
    inner: Mutex<CacheInner>,
}

impl PreloadCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        // A panic while holding this lock cannot leave the slot half-written
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> CacheState {
        match self.lock().slot {
            Slot::Empty => CacheState::Empty,
            Slot::Filling => CacheState::Filling,
            Slot::Filled(_) => CacheState::Filled,
        }
    }

    /// Move Empty -> Filling. `None` if the slot is not Empty.
    pub fn begin_fill(&self) -> Option<FillTicket> {
        let mut inner = self.lock();
        match inner.slot {
            Slot::Empty => {
                inner.slot = Slot::Filling;
                Some(FillTicket {
                    generation: inner.generation,
                })
            }
            _ => None,
        }
    }

    /// Finish a fill. Returns the job back if it was not stored.
    ///
    /// A stale ticket leaves the slot alone: it may belong to a newer fill.
    pub fn complete_fill(&self, ticket: FillTicket, job: Option<Job>) -> Option<Job> {
        let mut inner = self.lock();
        if ticket.generation != inner.generation {
            debug!("Dropping fill result from a previous generation");
            return job;
        }
        match job {
            Some(job) => {
                inner.slot = Slot::Filled(job);
                None
            }
            None => {
                inner.slot = Slot::Empty;
                None
            }
        }
    }

    /// Take the cached job, leaving the slot Empty. `None` if Empty or Filling.
    pub fn take_if_filled(&self) -> Option<Job> {
        let mut inner = self.lock();
        match std::mem::take(&mut inner.slot) {
            Slot::Filled(job) => Some(job),
            other => {
                inner.slot = other;
                None
            }
        }
    }

    /// Empty the slot and invalidate every outstanding ticket.
    ///
    /// Returns the job that was cached, if any.
    pub fn reset(&self) -> Option<Job> {
        let mut inner = self.lock();
        inner.generation += 1;
        match std::mem::take(&mut inner.slot) {
            Slot::Filled(job) => Some(job),
            _ => None,
        }
    }

    /// Run `job` and store its result.
    ///
    /// A result is stored only if it succeeded, `observer` is still live and
    /// no reset happened meanwhile.
    pub async fn fill<Fut>(&self, observer: &CancelObserver, job: Fut) -> FillOutcome
    where
        Fut: Future<Output = PipelineResult<Job>>,
    {
        if observer.is_cancelled() {
            return FillOutcome::Skipped;
        }
        let Some(ticket) = self.begin_fill() else {
            return FillOutcome::Skipped;
        };

        match job.await {
            Ok(job) if !observer.is_cancelled() => match self.complete_fill(ticket, Some(job)) {
                None => FillOutcome::Stored,
                Some(job) => FillOutcome::Discarded(job),
            },
            Ok(job) => {
                let _ = self.complete_fill(ticket, None);
                FillOutcome::Discarded(job)
            }
            Err(e) => {
                let _ = self.complete_fill(ticket, None);
                FillOutcome::Failed(e)
            }
        }
    }
}
