//! Gemini text generation client.

use reqwest::Client;
use tracing::debug;

use crate::config::AiConfig;
use crate::error::{AiError, AiResult};
use crate::types::{GeminiRequest, GeminiResponse};

/// Client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &AiConfig) -> AiResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(AiError::Network)?;

        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    /// Send `prompt` and return the text of the first candidate.
    pub async fn generate_text(&self, prompt: &str) -> AiResult<String> {
        debug!(model = %self.model, "Sending Gemini request ({} chars)", prompt.len());

        let response = self
            .client
            .post(self.endpoint())
            .json(&GeminiRequest::from_prompt(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::from_status("Gemini", status, &body));
        }

        let body: GeminiResponse = response.json().await?;
        body.first_text()
            .ok_or_else(|| AiError::invalid_response("Gemini returned no text candidates"))
    }
}
