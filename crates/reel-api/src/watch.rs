//! Watch-time logging.
//!
//! Serving a video starts a view. The next `/generate` ends it and appends
//! `"<topic>",<ratio>` to a CSV file, where ratio is the watched time over the
//! nominal video duration.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

#[derive(Debug)]
struct ActiveView {
    topic: String,
    started: Instant,
}

/// A finished view.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchRecord {
    pub topic: String,
    pub watched: Duration,
    pub ratio: f64,
}

impl WatchRecord {
    /// One CSV row, newline terminated.
    pub fn csv_row(&self) -> String {
        format!("\"{}\",{:.4}\n", self.topic.replace('"', "\"\""), self.ratio)
    }
}

/// Tracks the view in progress and appends finished views to the log.
#[derive(Debug)]
pub struct WatchTracker {
    log_path: PathBuf,
    nominal: Duration,
    active: Mutex<Option<ActiveView>>,
}

impl WatchTracker {
    pub fn new(log_path: impl Into<PathBuf>, nominal: Duration) -> Self {
        Self {
            log_path: log_path.into(),
            nominal,
            active: Mutex::new(None),
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Start timing a view of a video about `topic`, replacing any open view.
    pub fn begin(&self, topic: impl Into<String>) {
        let view = ActiveView {
            topic: topic.into(),
            started: Instant::now(),
        };
        *self.active.lock().unwrap_or_else(|p| p.into_inner()) = Some(view);
    }

    /// End the open view, if any.
    pub fn end(&self) -> Option<WatchRecord> {
        let view = self.active.lock().unwrap_or_else(|p| p.into_inner()).take()?;
        let watched = view.started.elapsed();
        // Centisecond resolution
        let secs = (watched.as_secs_f64() * 100.0).round() / 100.0;
        let nominal = self.nominal.as_secs_f64();
        let ratio = if nominal > 0.0 { secs / nominal } else { 0.0 };
        Some(WatchRecord {
            topic: view.topic,
            watched,
            ratio,
        })
    }

    /// End the open view and append it to the log.
    ///
    /// Write failures are logged and swallowed.
    pub async fn end_and_log(&self) -> Option<WatchRecord> {
        let record = self.end()?;
        match append_row(&self.log_path, &record.csv_row()).await {
            Ok(()) => debug!(
                topic = %record.topic,
                "Logged watch ratio {:.2}",
                record.ratio
            ),
            Err(e) => warn!(
                "Failed to append watch time to {}: {}",
                self.log_path.display(),
                e
            ),
        }
        Some(record)
    }
}

async fn append_row(path: &Path, row: &str) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(row.as_bytes()).await?;
    file.flush().await
}
