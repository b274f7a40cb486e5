//! Narration backed by Google Cloud text-to-speech.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use reel_ai_client::TtsClient;
use reel_models::Voice;

use crate::error::StageResult;
use crate::ports::AudioSynthesis;

pub struct GoogleTtsSynthesis {
    client: TtsClient,
    audio_dir: PathBuf,
}

impl GoogleTtsSynthesis {
    pub fn new(client: TtsClient, audio_dir: PathBuf) -> Self {
        Self { client, audio_dir }
    }
}

#[async_trait]
impl AudioSynthesis for GoogleTtsSynthesis {
    async fn synthesize(&self, text: &str, voice: Voice) -> StageResult<PathBuf> {
        let path = self.audio_dir.join(format!(
            "narration_{}_{}.mp3",
            Utc::now().format("%Y%m%d_%H%M%S"),
            Uuid::new_v4()
        ));
        self.client.synthesize_to_file(text, voice, &path).await?;
        Ok(path)
    }
}
