//! Topic validation and the used-topics hint list.

use crate::cancel::CancelObserver;
use crate::error::{PipelineError, PipelineResult};

pub const MISSING_TOPICS: &str = "Invalid or missing 'topics' list";
pub const NO_VALID_TOPICS: &str = "No valid topics provided";

/// Trim `topics` and drop blank entries.
///
/// Fails if the list is empty or nothing survives trimming.
pub fn validate_topics(topics: &[String]) -> PipelineResult<Vec<String>> {
    if topics.is_empty() {
        return Err(PipelineError::invalid_topics(MISSING_TOPICS));
    }

    let valid: Vec<String> = topics
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    if valid.is_empty() {
        return Err(PipelineError::invalid_topics(NO_VALID_TOPICS));
    }
    Ok(valid)
}

/// Subtopics already covered this session, oldest first.
///
/// Only steers script generation away from repeats; nothing depends on it
/// for correctness.
#[derive(Debug, Clone, Default)]
pub struct UsedTopics {
    topics: Vec<String>,
}

impl UsedTopics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `topic` unless the work that produced it was cancelled.
    ///
    /// Callers hold the same lock `clear()` runs under, which keeps a reset
    /// and a late append from interleaving.
    pub fn record(&mut self, topic: impl Into<String>, observer: &CancelObserver) -> bool {
        if observer.is_cancelled() {
            return false;
        }
        self.topics.push(topic.into());
        true
    }

    pub fn clear(&mut self) {
        self.topics.clear();
    }

    pub fn as_slice(&self) -> &[String] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}
