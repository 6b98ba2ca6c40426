//! # Scroll-Triggered Scheduler
//!
//! Decides when a filtering pass runs. The loop polls the scroll position
//! while idle; a change means new posts may have been rendered, so after a
//! settle delay it runs exactly one pass.
//!
//! ```text
//!   startup pass
//!        |
//!        v
//!      Idle --(scroll changed)--> Settling --(settle delay)--> Filtering
//!        ^                                                        |
//!        +--------------------------------------------------------+
//! ```
//!
//! Everything runs on the calling task. The poll tick and the settle delay are
//! the only suspension points, and both race the cancellation token.

use std::time::Duration;

use feed_model::{RenderedView, ViewError};
use tokio::sync::watch;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::SchedulerConfig;
use crate::engine::FilterEngine;
use crate::error::EngineError;

/// Where the scheduler loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Settling,
    Filtering,
}

/// Totals for a finished session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerSummary {
    /// Passes that completed (including the startup pass)
    pub passes: u32,
    /// Passes aborted by a view-scoped failure
    pub failed_passes: u32,
    /// Posts removed over the session
    pub suppressed: usize,
    /// Fingerprints in the processed set when the loop stopped
    pub processed: usize,
}

/// Drives a [`FilterEngine`] from scroll movement of a view
pub struct ScrollScheduler<V: RenderedView> {
    view: V,
    engine: FilterEngine,
    poll_interval: Duration,
    settle_delay: Duration,
    max_consecutive_failures: u32,
    state: watch::Sender<SchedulerState>,
    summary: SchedulerSummary,
    failed_scroll_reads: u32,
    consecutive_failed_passes: u32,
}

impl<V: RenderedView> ScrollScheduler<V> {
    pub fn new(view: V, engine: FilterEngine, config: &SchedulerConfig) -> Self {
        let (state, _) = watch::channel(SchedulerState::Idle);
        Self {
            view,
            engine,
            poll_interval: config.poll_interval(),
            settle_delay: config.settle_delay(),
            max_consecutive_failures: config.max_consecutive_failures,
            state,
            summary: SchedulerSummary::default(),
            failed_scroll_reads: 0,
            consecutive_failed_passes: 0,
        }
    }

    /// Current state of the loop
    pub fn state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    /// Receiver that observes every state transition
    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state.subscribe()
    }

    fn enter(&self, state: SchedulerState) {
        self.state.send_replace(state);
    }

    /// Run until `cancel` fires or the view is lost
    ///
    /// # Returns
    /// * `Ok(summary)` - The session was cancelled
    /// * `Err(EngineError)` - The view disconnected, or kept failing for more
    ///   than `max_consecutive_failures` attempts in a row
    pub async fn run(mut self, cancel: CancellationToken) -> Result<SchedulerSummary, EngineError> {
        info!(
            "Scheduler started (poll every {:?}, settle {:?})",
            self.poll_interval, self.settle_delay
        );

        self.enter(SchedulerState::Filtering);
        self.filter(&cancel)?;
        self.enter(SchedulerState::Idle);

        let mut last_observed = self.read_scroll()?;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = sleep(self.poll_interval) => {}
            }

            let Some(current) = self.read_scroll()? else {
                continue;
            };
            let Some(previous) = last_observed else {
                last_observed = Some(current);
                continue;
            };
            if current == previous {
                continue;
            }

            debug!("Scroll moved from {} to {}, settling", previous, current);
            self.enter(SchedulerState::Settling);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = sleep(self.settle_delay) => {}
            }

            self.enter(SchedulerState::Filtering);
            self.filter(&cancel)?;
            last_observed = Some(current);
            self.enter(SchedulerState::Idle);
        }

        self.summary.processed = self.engine.processed().len();
        info!(
            "Scheduler stopped: {} passes ({} failed), {} posts suppressed, {} processed",
            self.summary.passes,
            self.summary.failed_passes,
            self.summary.suppressed,
            self.summary.processed
        );
        Ok(self.summary)
    }

    /// Read the scroll offset; `Ok(None)` when the read failed but may be retried
    fn read_scroll(&mut self) -> Result<Option<f64>, EngineError> {
        let read = self.view.scroll_offset().and_then(|offset| {
            if offset.is_finite() {
                Ok(offset)
            } else {
                Err(ViewError::Unavailable(format!("scroll offset is {}", offset)))
            }
        });
        match read {
            Ok(offset) => {
                self.failed_scroll_reads = 0;
                Ok(Some(offset))
            }
            Err(e) if e.is_permanent() => {
                error!("View lost while reading scroll position: {}", e);
                Err(EngineError::ViewLost(e))
            }
            Err(e) => {
                self.failed_scroll_reads += 1;
                self.check_failures("scroll read", self.failed_scroll_reads, e)?;
                Ok(None)
            }
        }
    }

    /// Run one pass, absorbing failures the loop can survive
    fn filter(&mut self, cancel: &CancellationToken) -> Result<(), EngineError> {
        match self.engine.run_pass(&self.view, cancel) {
            Ok(report) => {
                self.consecutive_failed_passes = 0;
                self.summary.passes += 1;
                self.summary.suppressed += report.suppressed;
                Ok(())
            }
            Err(e) if e.is_permanent() => {
                error!("View lost during filtering pass: {}", e);
                Err(EngineError::ViewLost(e))
            }
            Err(e) => {
                self.summary.failed_passes += 1;
                self.consecutive_failed_passes += 1;
                self.check_failures("pass", self.consecutive_failed_passes, e)
            }
        }
    }

    fn check_failures(
        &self,
        operation: &'static str,
        count: u32,
        last: ViewError,
    ) -> Result<(), EngineError> {
        if count > self.max_consecutive_failures {
            error!("Giving up after {} consecutive {} failures: {}", count, operation, last);
            return Err(EngineError::TooManyFailures {
                operation,
                count,
                last,
            });
        }
        warn!("{} failed ({} in a row): {}", operation, count, last);
        Ok(())
    }
}
