//! Shared data models for the reelforge backend.
//!
//! This crate provides Serde-serializable types for:
//! - Jobs and their lifecycle status
//! - Segment specifications and outcomes
//! - Narration voices
//! - The payload returned to the player

pub mod job;
pub mod segment;
pub mod video;
pub mod voice;

// Re-export common types
pub use job::{Job, JobId, JobStatus};
pub use segment::{RenderedSegment, SegmentFailure, SegmentOutcome, SegmentSpec, SegmentStage};
pub use video::{GeneratedVideo, VIDEO_ROUTE_PREFIX};
pub use voice::{Accent, Gender, Voice};
