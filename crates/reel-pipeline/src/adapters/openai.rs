//! Image synthesis backed by the OpenAI images API.

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use reel_ai_client::ImageClient;

use crate::error::{StageError, StageResult};
use crate::ports::{GeneratedImage, ImageSynthesis};

pub struct OpenAiImageSynthesis {
    client: ImageClient,
    images_dir: PathBuf,
}

impl OpenAiImageSynthesis {
    pub fn new(client: ImageClient, images_dir: PathBuf) -> Self {
        Self { client, images_dir }
    }
}

#[async_trait]
impl ImageSynthesis for OpenAiImageSynthesis {
    async fn generate(&self, prompt: &str) -> StageResult<GeneratedImage> {
        let url = self.client.generate(prompt).await?;
        let path = self.images_dir.join(format!("image_{}.jpg", Uuid::new_v4()));
        // Never retried: a retry would generate a new image
        self.client
            .download(&url, &path)
            .await
            .map_err(|e| StageError::fatal(format!("image download failed: {}", e)))?;

        Ok(GeneratedImage {
            path,
            url: Some(url),
        })
    }
}
