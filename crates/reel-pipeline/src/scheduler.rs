//! Fan-out of segment tasks with an ordered join.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{info, info_span, warn, Instrument};

use reel_models::{SegmentFailure, SegmentOutcome, SegmentSpec, SegmentStage};

use crate::cancel::CancelObserver;
use crate::metrics;
use crate::segment::SegmentTask;

/// Launches one task per segment and joins them all.
///
/// Outcome `i` always belongs to `specs[i]`, whatever order the tasks finish
/// in. There is no join timeout.
pub struct FanOutScheduler {
    task: Arc<SegmentTask>,
    stagger: Duration,
}

impl FanOutScheduler {
    pub fn new(task: Arc<SegmentTask>, stagger: Duration) -> Self {
        Self { task, stagger }
    }

    pub async fn run_all(
        &self,
        specs: Vec<SegmentSpec>,
        observer: &CancelObserver,
    ) -> Vec<SegmentOutcome> {
        let count = specs.len();
        info!("Launching {} segment tasks", count);

        let mut handles = Vec::with_capacity(count);
        for (position, spec) in specs.into_iter().enumerate() {
            // Spread launches so upstream rate limits see a ramp, not a burst
            if position > 0 && !self.stagger.is_zero() {
                tokio::time::sleep(self.stagger).await;
            }

            let task = Arc::clone(&self.task);
            let observer = observer.clone();
            let span = info_span!("segment", segment = spec.index);
            handles.push(tokio::spawn(
                async move { task.run(&spec, &observer).await }.instrument(span),
            ));
        }

        let outcomes: Vec<SegmentOutcome> = join_all(handles)
            .await
            .into_iter()
            .enumerate()
            .map(|(position, joined)| match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(segment = position, "Segment task aborted: {}", e);
                    SegmentOutcome::Failed(SegmentFailure::new(
                        SegmentStage::Compose,
                        format!("task aborted: {}", e),
                    ))
                }
            })
            .collect();

        for outcome in &outcomes {
            metrics::record_segment(outcome.label());
        }

        let rendered = outcomes.iter().filter(|o| o.is_rendered()).count();
        info!("Segments joined: {}/{} rendered", rendered, count);

        outcomes
    }
}
