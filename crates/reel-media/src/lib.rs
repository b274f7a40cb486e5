//! FFmpeg CLI wrapper for narrated clip rendering.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with multiple inputs
//! - A runner with timeout handling
//! - Audio duration probing via FFprobe
//! - Still image + narration composition with fades
//! - Lossless concatenation of uniform clips

pub mod command;
pub mod compose;
pub mod concat;
pub mod error;
pub mod fs_utils;
pub mod probe;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use compose::{compose_with_fade, fade_filter, DEFAULT_FADE_SECS};
pub use concat::concatenate;
pub use error::{MediaError, MediaResult};
pub use probe::probe_duration;
