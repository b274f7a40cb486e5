//! Pipeline metrics.
//!
//! Recorded through the `metrics` facade; the binary decides whether an
//! exporter is installed.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const SEGMENTS_TOTAL: &str = "reel_segments_total";
    pub const STAGE_RETRIES_TOTAL: &str = "reel_stage_retries_total";
    pub const JOBS_TOTAL: &str = "reel_jobs_total";
    pub const JOB_DURATION_SECONDS: &str = "reel_job_duration_seconds";
    pub const PRELOADS_TOTAL: &str = "reel_preloads_total";
}

/// Record one segment outcome (`rendered`, `failed`, `cancelled`).
pub fn record_segment(outcome: &str) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::SEGMENTS_TOTAL, &labels).increment(1);
}

/// Record a retry of a stage after a transient failure.
pub fn record_stage_retry(stage: &str) {
    let labels = [("stage", stage.to_string())];
    counter!(names::STAGE_RETRIES_TOTAL, &labels).increment(1);
}

/// Record a served or failed request.
///
/// `source` is `cache` or `fresh`; `result` is `success` or an error kind.
pub fn record_job(source: &str, result: &str, duration_secs: f64) {
    let labels = [
        ("source", source.to_string()),
        ("result", result.to_string()),
    ];
    counter!(names::JOBS_TOTAL, &labels).increment(1);
    histogram!(names::JOB_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record how a background fill ended.
pub fn record_preload(result: &str) {
    let labels = [("result", result.to_string())];
    counter!(names::PRELOADS_TOTAL, &labels).increment(1);
}
