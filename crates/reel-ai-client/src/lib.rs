//! Clients for the upstream generation services.
//!
//! This crate provides:
//! - Gemini text generation (script writing)
//! - OpenAI image generation and image download
//! - Google Cloud text-to-speech (WaveNet narration)
//!
//! Rate-limit responses surface as [`AiError::RateLimited`] so callers can
//! tell retryable failures from fatal ones.

pub mod config;
pub mod error;
pub mod gemini;
pub mod images;
pub mod tts;
pub mod types;

pub use config::AiConfig;
pub use error::{AiError, AiResult};
pub use gemini::GeminiClient;
pub use images::ImageClient;
pub use tts::TtsClient;
