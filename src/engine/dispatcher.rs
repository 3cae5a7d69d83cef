// src/engine/dispatcher.rs

use std::fmt;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::engine::{Decision, DispatchCore, DispatchStats};
use crate::exec::ExecutorBackend;
use crate::watch::ChangeEvent;

/// Reads [`ChangeEvent`]s, asks the [`DispatchCore`] what to do, and hands
/// accepted events to an [`ExecutorBackend`].
///
/// Executions are launched and forgotten; the loop never waits for a
/// command to finish.
pub struct Dispatcher<E: ExecutorBackend> {
    core: DispatchCore,
    event_rx: mpsc::Receiver<ChangeEvent>,
    executor: E,
    cancel: CancellationToken,
    verbose: bool,
}

impl<E: ExecutorBackend> fmt::Debug for Dispatcher<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("core", &self.core)
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend> Dispatcher<E> {
    pub fn new(
        core: DispatchCore,
        event_rx: mpsc::Receiver<ChangeEvent>,
        executor: E,
        cancel: CancellationToken,
        verbose: bool,
    ) -> Self {
        Self {
            core,
            event_rx,
            executor,
            cancel,
            verbose,
        }
    }

    /// Main event loop.
    ///
    /// Returns when every source has dropped its sender or `cancel` fires.
    pub async fn run(mut self) -> DispatchStats {
        debug!(debounce = self.core.is_debouncing(), "dispatcher started");

        loop {
            let event = tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("shutdown requested; stopping dispatcher");
                    break;
                }
                maybe = self.event_rx.recv() => match maybe {
                    Some(event) => event,
                    None => {
                        info!("all watchers stopped; exiting");
                        break;
                    }
                },
            };

            let path = event.path.clone();
            let strategy = event.strategy;

            match self.core.step(event) {
                Decision::Suppress => {
                    debug!(?path, "duplicate event suppressed");
                }
                Decision::Execute(request) => {
                    if self.verbose {
                        info!(?path, %strategy, "file changed");
                    } else {
                        debug!(?path, %strategy, "file changed");
                    }

                    if let Err(err) = self.executor.launch(request) {
                        warn!(?path, error = %err, "failed to launch command");
                        self.core.record_launch_failure();
                    }
                }
            }
        }

        let stats = self.core.stats();
        info!(
            received = stats.received,
            accepted = stats.accepted,
            suppressed = stats.suppressed,
            "dispatcher finished"
        );
        stats
    }
}
