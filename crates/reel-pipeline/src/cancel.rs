//! Cooperative cancellation.
//!
//! A [`CancellationSignal`] is shared by the orchestrator and every task it
//! starts. Tasks do not hold the signal itself; they hold a [`CancelObserver`]
//! taken when the work began, and sample it between stages.
//!
//! The signal carries an epoch that advances on every `set()`. An observer
//! remembers the epoch it was created in and reports cancelled once the epoch
//! moves, so work begun before a reset stays cancelled after the signal is
//! cleared for the next job.

use std::sync::Arc;

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SignalState {
    epoch: u64,
    cancelled: bool,
}

/// Process-wide cancellation flag with explicit set / clear.
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    tx: Arc<watch::Sender<SignalState>>,
}

impl Default for CancellationSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SignalState::default());
        Self { tx: Arc::new(tx) }
    }

    /// Raise the flag. Every observer taken so far reports cancelled from now on.
    pub fn set(&self) {
        self.tx.send_modify(|state| {
            state.cancelled = true;
            state.epoch += 1;
        });
    }

    /// Lower the flag so new work can start.
    pub fn clear(&self) {
        self.tx.send_if_modified(|state| {
            let was_set = state.cancelled;
            state.cancelled = false;
            was_set
        });
    }

    pub fn is_set(&self) -> bool {
        self.tx.borrow().cancelled
    }

    /// Observer bound to the current epoch.
    pub fn observer(&self) -> CancelObserver {
        let rx = self.tx.subscribe();
        let epoch = rx.borrow().epoch;
        CancelObserver { rx, epoch }
    }
}

/// Read side of a [`CancellationSignal`], bound to one epoch.
#[derive(Debug, Clone)]
pub struct CancelObserver {
    rx: watch::Receiver<SignalState>,
    epoch: u64,
}

impl CancelObserver {
    pub fn is_cancelled(&self) -> bool {
        let state = *self.rx.borrow();
        state.cancelled || state.epoch != self.epoch
    }

    /// Resolve once this observer reports cancelled.
    ///
    /// Never resolves if the signal is dropped without being set.
    pub async fn cancelled(&mut self) {
        loop {
            if self.is_cancelled() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
