//! Google Cloud text-to-speech client.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reel_models::Voice;
use reqwest::Client;
use tracing::{debug, info};

use crate::config::AiConfig;
use crate::error::{AiError, AiResult};
use crate::types::{AudioConfig, SynthesisInput, SynthesizeRequest, SynthesizeResponse, VoiceSelection};

/// Client for the `text:synthesize` endpoint. Audio is always MP3.
#[derive(Clone)]
pub struct TtsClient {
    client: Client,
    api_key: String,
    base_url: String,
    speaking_rate: f64,
}

impl TtsClient {
    pub fn new(config: &AiConfig) -> AiResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(AiError::Network)?;

        Ok(Self {
            client,
            api_key: config.tts_api_key.clone(),
            base_url: config.tts_base_url.trim_end_matches('/').to_string(),
            speaking_rate: config.speaking_rate,
        })
    }

    /// Synthesize `text` with `voice`, returning MP3 bytes.
    pub async fn synthesize(&self, text: &str, voice: Voice) -> AiResult<Vec<u8>> {
        let request = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceSelection {
                language_code: voice.accent.language_code(),
                name: voice.wavenet_name(),
                ssml_gender: voice.gender.as_str(),
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
                speaking_rate: self.speaking_rate,
            },
        };

        debug!(voice = %voice, "Synthesizing narration ({} chars)", text.len());

        let response = self
            .client
            .post(format!("{}/v1/text:synthesize", self.base_url))
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::from_status("Text-to-speech", status, &body));
        }

        let body: SynthesizeResponse = response.json().await?;
        let encoded = body
            .audio_content
            .ok_or_else(|| AiError::invalid_response("Speech response carried no audio"))?;

        STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| AiError::Decode(e.to_string()))
    }

    /// Synthesize `text` and write the MP3 to `dest`.
    pub async fn synthesize_to_file(&self, text: &str, voice: Voice, dest: &Path) -> AiResult<()> {
        let audio = self.synthesize(text, voice).await?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &audio).await?;
        info!("Narration saved ({} bytes) -> {}", audio.len(), dest.display());
        Ok(())
    }
}
