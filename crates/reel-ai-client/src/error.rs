//! Upstream client error types.

use reqwest::StatusCode;
use thiserror::Error;

pub type AiResult<T> = Result<T, AiError>;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AiError {
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Map a non-success HTTP status to an error.
    ///
    /// 429 means the service is shedding load or the quota is spent; both
    /// clear up with time, so only 429 is transient.
    pub fn from_status(service: &str, status: StatusCode, body: &str) -> Self {
        if status == StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimited(format!("{} returned {}: {}", service, status, body))
        } else {
            Self::RequestFailed(format!("{} returned {}: {}", service, status, body))
        }
    }

    /// Check if the failure is worth retrying later.
    pub fn is_transient(&self) -> bool {
        matches!(self, AiError::RateLimited(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classification() {
        let limited = AiError::from_status("images", StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(limited.is_transient());

        let bad = AiError::from_status("images", StatusCode::BAD_REQUEST, "content policy");
        assert!(!bad.is_transient());
        assert!(bad.to_string().contains("400"));

        let down = AiError::from_status("tts", StatusCode::SERVICE_UNAVAILABLE, "");
        assert!(!down.is_transient());
    }
}
