//! Application state.

use std::sync::Arc;

use reel_pipeline::JobOrchestrator;

use crate::config::ApiConfig;
use crate::watch::WatchTracker;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub orchestrator: JobOrchestrator,
    pub watch: Arc<WatchTracker>,
}

impl AppState {
    pub fn new(config: ApiConfig, orchestrator: JobOrchestrator) -> Self {
        let watch = Arc::new(WatchTracker::new(
            config.watch_log_path.clone(),
            config.nominal_video_duration,
        ));
        Self {
            config,
            orchestrator,
            watch,
        }
    }
}
