//! Narrated video pipeline.
//!
//! This crate provides:
//! - Bounded retry for rate-limited upstream calls
//! - Cooperative cancellation observed at stage boundaries
//! - Per-sentence segment tasks fanned out concurrently and joined in order
//! - Assembly of rendered clips into one artifact
//! - A single-slot preload cache for the next job
//! - The job orchestrator tying these together
//!
//! Upstream capabilities sit behind the traits in [`ports`]; production
//! implementations live in [`adapters`].

pub mod adapters;
pub mod assembler;
pub mod cancel;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod orchestrator;
pub mod ports;
pub mod preload;
pub mod retry;
pub mod scheduler;
pub mod script;
pub mod segment;
pub mod styles;
pub mod topics;

pub use assembler::Assembler;
pub use cancel::{CancelObserver, CancellationSignal};
pub use config::PipelineConfig;
pub use error::{ErrorKind, PipelineError, PipelineResult, RetryError, StageError, StageResult};
pub use logging::JobLogger;
pub use orchestrator::{JobOrchestrator, OrchestratorState};
pub use ports::{
    AudioSynthesis, Collaborators, GeneratedImage, ImageSynthesis, Script, ScriptSelector,
    Stitcher, VideoComposer,
};
pub use preload::{CacheState, FillOutcome, FillTicket, PreloadCache};
pub use retry::RetryPolicy;
pub use scheduler::FanOutScheduler;
pub use segment::SegmentTask;
pub use topics::UsedTopics;
