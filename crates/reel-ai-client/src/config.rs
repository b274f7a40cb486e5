//! Upstream service configuration.

use std::time::Duration;

use tracing::warn;

use crate::error::{AiError, AiResult};

/// Credentials and endpoints for the generation services.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Gemini API key
    pub gemini_api_key: String,
    /// Gemini model used for scripts
    pub gemini_model: String,
    /// Gemini API base URL
    pub gemini_base_url: String,
    /// OpenAI API key
    pub openai_api_key: String,
    /// OpenAI API base URL
    pub openai_base_url: String,
    /// Image model
    pub image_model: String,
    /// Image size, e.g. "1024x1024"
    pub image_size: String,
    /// Image quality ("standard" or "hd")
    pub image_quality: String,
    /// Text-to-speech API key
    pub tts_api_key: String,
    /// Text-to-speech API base URL
    pub tts_base_url: String,
    /// Narration speaking rate (1.0 is normal speed)
    pub speaking_rate: f64,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: String::new(),
            gemini_model: "gemini-1.5-flash".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            openai_api_key: String::new(),
            openai_base_url: "https://api.openai.com".to_string(),
            image_model: "dall-e-3".to_string(),
            image_size: "1024x1024".to_string(),
            image_quality: "standard".to_string(),
            tts_api_key: String::new(),
            tts_base_url: "https://texttospeech.googleapis.com".to_string(),
            speaking_rate: 1.0,
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl AiConfig {
    /// Create config from environment variables.
    ///
    /// `GEMINI_API_KEY` is required. `OPENAI_API_KEY` and `TTS_API_KEY` fall
    /// back to the Gemini key when unset.
    pub fn from_env() -> AiResult<Self> {
        let defaults = Self::default();

        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AiError::config("GEMINI_API_KEY not set"))?;

        let openai_api_key = match std::env::var("OPENAI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => key,
            _ => {
                warn!("OPENAI_API_KEY not set, using GEMINI_API_KEY for image generation");
                gemini_api_key.clone()
            }
        };

        let tts_api_key = std::env::var("TTS_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| gemini_api_key.clone());

        Ok(Self {
            gemini_model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: std::env::var("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            openai_base_url: std::env::var("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            image_model: std::env::var("OPENAI_IMAGE_MODEL").unwrap_or(defaults.image_model),
            image_size: std::env::var("OPENAI_IMAGE_SIZE").unwrap_or(defaults.image_size),
            image_quality: std::env::var("OPENAI_IMAGE_QUALITY").unwrap_or(defaults.image_quality),
            tts_base_url: std::env::var("TTS_BASE_URL").unwrap_or(defaults.tts_base_url),
            speaking_rate: std::env::var("TTS_SPEAKING_RATE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.speaking_rate),
            request_timeout: Duration::from_secs(
                std::env::var("AI_REQUEST_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
            gemini_api_key,
            openai_api_key,
            tts_api_key,
        })
    }

    /// Config pointing every service at one base URL (used against mock servers).
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            gemini_api_key: "test-key".to_string(),
            openai_api_key: "test-key".to_string(),
            tts_api_key: "test-key".to_string(),
            gemini_base_url: base_url.clone(),
            openai_base_url: base_url.clone(),
            tts_base_url: base_url,
            request_timeout: Duration::from_secs(5),
            ..Self::default()
        }
    }
}
