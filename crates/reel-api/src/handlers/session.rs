//! Session handlers.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::state::AppState;

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Cancel in-flight work and forget the session's used topics.
pub async fn reset_topics(State(state): State<AppState>) -> Json<MessageResponse> {
    state.orchestrator.reset().await;
    info!("Used topics reset");

    Json(MessageResponse {
        message: "Used topics reset successfully".to_string(),
    })
}
