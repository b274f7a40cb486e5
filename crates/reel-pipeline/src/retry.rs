//! Bounded retry for rate-limited upstream calls.
//!
//! Transient failures are retried after a fixed delay; fatal failures are
//! returned at once. The policy holds no mutable state, so one policy can be
//! shared by any number of concurrent callers.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cancel::CancelObserver;
use crate::error::{RetryError, StageError, StageResult};
use crate::metrics;

/// Retry configuration for one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; the operation runs at most
    /// `max_retries + 1` times.
    pub max_retries: u32,
    /// Fixed wait between attempts.
    pub delay: Duration,
    /// Stage name for logging and metrics.
    pub operation_name: String,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(15),
            operation_name: "operation".to_string(),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with default limits for the named operation.
    pub fn new(operation_name: impl Into<String>) -> Self {
        Self {
            operation_name: operation_name.into(),
            ..Default::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Run `operation` until it succeeds, fails fatally, or the retry budget
    /// is spent.
    pub async fn execute<F, Fut, T>(&self, operation: F) -> Result<T, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = StageResult<T>>,
    {
        self.run(None, operation).await
    }

    /// Like [`execute`](Self::execute), but gives up before the next attempt
    /// once `observer` reports cancelled. A pending wait is cut short.
    pub async fn execute_observed<F, Fut, T>(
        &self,
        observer: &CancelObserver,
        operation: F,
    ) -> Result<T, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = StageResult<T>>,
    {
        self.run(Some(observer), operation).await
    }

    async fn run<F, Fut, T>(
        &self,
        observer: Option<&CancelObserver>,
        mut operation: F,
    ) -> Result<T, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = StageResult<T>>,
    {
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => return Ok(value),
                Err(StageError::Fatal(reason)) => {
                    debug!(
                        operation = %self.operation_name,
                        attempt,
                        "Fatal failure, not retrying: {}", reason
                    );
                    return Err(RetryError::Fatal(reason));
                }
                Err(StageError::Transient(reason)) if attempt <= self.max_retries => {
                    warn!(
                        operation = %self.operation_name,
                        attempt,
                        "Rate limited, retrying in {:?}: {}", self.delay, reason
                    );
                    metrics::record_stage_retry(&self.operation_name);

                    match observer {
                        Some(observer) => {
                            let mut waiter = observer.clone();
                            tokio::select! {
                                _ = tokio::time::sleep(self.delay) => {}
                                _ = waiter.cancelled() => {}
                            }
                            if observer.is_cancelled() {
                                return Err(RetryError::Cancelled { attempts: attempt });
                            }
                        }
                        None => tokio::time::sleep(self.delay).await,
                    }
                }
                Err(StageError::Transient(last)) => {
                    warn!(
                        operation = %self.operation_name,
                        attempts = attempt,
                        "Retries exhausted: {}", last
                    );
                    return Err(RetryError::RateLimited {
                        attempts: attempt,
                        last,
                    });
                }
            }
        }
    }
}
