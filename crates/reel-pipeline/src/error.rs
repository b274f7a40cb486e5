//! Pipeline error types.

use thiserror::Error;

pub type StageResult<T> = Result<T, StageError>;
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Failure reported by an upstream collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    /// Rate or quota limited; worth retrying after a delay.
    #[error("Transient failure: {0}")]
    Transient(String),

    /// Anything else. Never retried.
    #[error("{0}")]
    Fatal(String),
}

impl StageError {
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient(msg.into())
    }

    pub fn fatal(msg: impl Into<String>) -> Self {
        Self::Fatal(msg.into())
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, StageError::Transient(_))
    }
}

impl From<reel_ai_client::AiError> for StageError {
    fn from(e: reel_ai_client::AiError) -> Self {
        if e.is_transient() {
            Self::Transient(e.to_string())
        } else {
            Self::Fatal(e.to_string())
        }
    }
}

impl From<reel_media::MediaError> for StageError {
    fn from(e: reel_media::MediaError) -> Self {
        Self::Fatal(e.to_string())
    }
}

impl From<std::io::Error> for StageError {
    fn from(e: std::io::Error) -> Self {
        Self::Fatal(e.to_string())
    }
}

/// Result of running an operation under a [`crate::RetryPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError {
    #[error("Rate limited after {attempts} attempts: {last}")]
    RateLimited { attempts: u32, last: String },

    #[error("{0}")]
    Fatal(String),

    #[error("Cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },
}

impl From<StageError> for RetryError {
    fn from(e: StageError) -> Self {
        match e {
            StageError::Transient(last) => RetryError::RateLimited { attempts: 1, last },
            StageError::Fatal(reason) => RetryError::Fatal(reason),
        }
    }
}

/// Coarse failure class of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transient,
    Fatal,
    Cancelled,
    PartialFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Transient => "transient",
            ErrorKind::Fatal => "fatal",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::PartialFailure => "partial_failure",
        }
    }
}

/// Job-level failure.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid topics: {0}")]
    InvalidTopics(String),

    #[error("Script generation failed: {0}")]
    ScriptFailed(StageError),

    #[error("Segments failed: {failed:?}")]
    PartialFailure { failed: Vec<usize> },

    #[error("Stitching failed: {0}")]
    StitchFailed(String),

    #[error("Job cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn invalid_topics(msg: impl Into<String>) -> Self {
        Self::InvalidTopics(msg.into())
    }

    pub fn stitch_failed(msg: impl Into<String>) -> Self {
        Self::StitchFailed(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::ScriptFailed(e) if e.is_transient() => ErrorKind::Transient,
            PipelineError::PartialFailure { .. } => ErrorKind::PartialFailure,
            PipelineError::Cancelled => ErrorKind::Cancelled,
            _ => ErrorKind::Fatal,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, PipelineError::Cancelled)
    }
}
