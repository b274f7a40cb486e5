//! OpenAI image generation client.

use std::path::Path;

use reqwest::Client;
use tracing::{debug, info};

use crate::config::AiConfig;
use crate::error::{AiError, AiResult};
use crate::types::{ImageRequest, ImageResponse};

/// Client for `/v1/images/generations` plus the follow-up download.
#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    size: String,
    quality: String,
}

impl ImageClient {
    pub fn new(config: &AiConfig) -> AiResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(AiError::Network)?;

        Ok(Self {
            client,
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            model: config.image_model.clone(),
            size: config.image_size.clone(),
            quality: config.image_quality.clone(),
        })
    }

    /// Generate one image for `prompt` and return its remote URL.
    ///
    /// A 429 maps to [`AiError::RateLimited`]; every other failure is fatal.
    pub async fn generate(&self, prompt: &str) -> AiResult<String> {
        let request = ImageRequest {
            model: &self.model,
            prompt,
            size: &self.size,
            quality: &self.quality,
            n: 1,
            response_format: "url",
        };

        debug!(model = %self.model, "Requesting image ({} chars)", prompt.len());

        let response = self
            .client
            .post(format!("{}/v1/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::from_status("Image generation", status, &body));
        }

        let body: ImageResponse = response.json().await?;
        body.data
            .into_iter()
            .find_map(|d| d.url)
            .ok_or_else(|| AiError::invalid_response("Image response carried no URL"))
    }

    /// Download `url` to `dest`, returning the number of bytes written.
    pub async fn download(&self, url: &str, dest: &Path) -> AiResult<u64> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::from_status("Image download", status, &body));
        }

        let bytes = response.bytes().await?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &bytes).await?;

        info!("Downloaded image ({} bytes) -> {}", bytes.len(), dest.display());
        Ok(bytes.len() as u64)
    }
}
