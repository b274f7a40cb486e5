//! Artifact serving.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Reject names that could escape the output directory.
pub fn validate_filename(filename: &str) -> ApiResult<&str> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(ApiError::bad_request("Invalid filename"));
    }
    Ok(filename)
}

/// Serve a finished video from the output directory.
pub async fn serve_video(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let filename = validate_filename(&filename)?;
    let path = state.orchestrator.config().output_dir.join(filename);

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::not_found(filename));
        }
        Err(e) => return Err(e.into()),
    };

    debug!("Serving {} ({} bytes)", path.display(), bytes.len());

    Ok(([(header::CONTENT_TYPE, "video/mp4")], bytes))
}
