//! Video generation handler.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use reel_models::GeneratedVideo;
use reel_pipeline::topics::MISSING_TOPICS;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Response body for `POST /generate`.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub script: Vec<String>,
    pub image_urls: Vec<Option<String>>,
    pub video_url: String,
}

impl From<GeneratedVideo> for GenerateResponse {
    fn from(video: GeneratedVideo) -> Self {
        Self {
            script: video.script,
            image_urls: video.image_urls,
            video_url: video.video_url,
        }
    }
}

/// Pull the `topics` list out of a request body.
///
/// Non-string entries are skipped; blank entries are left for the
/// orchestrator to reject.
pub fn parse_topics(body: &[u8]) -> ApiResult<Vec<String>> {
    let value: Value =
        serde_json::from_slice(body).map_err(|_| ApiError::bad_request(MISSING_TOPICS))?;

    let topics = value
        .get("topics")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or_else(|| ApiError::bad_request(MISSING_TOPICS))?;

    Ok(topics
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect())
}

/// Serve the next video for the requested topics.
///
/// Ends the view of the previously served video first.
pub async fn generate_video(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<GenerateResponse>> {
    state.watch.end_and_log().await;

    let topics = parse_topics(&body)?;

    let video = match state.orchestrator.generate(&topics).await {
        Ok(video) => video,
        Err(e) => {
            warn!("Generation failed: {}", e);
            return Err(e.into());
        }
    };

    info!(
        job_id = %video.job_id,
        topic = %video.topic,
        "Serving {}",
        video.video_url
    );
    state.watch.begin(video.topic.clone());

    Ok(Json(video.into()))
}
