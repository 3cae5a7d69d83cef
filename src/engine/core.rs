// src/engine/core.rs

//! Pure dispatch decisions.
//!
//! [`DispatchCore`] consumes [`ChangeEvent`]s and answers "execute or
//! suppress". It has no channels, no Tokio types, and performs no IO, so it
//! can be unit tested with synthetic timestamps.

use crate::engine::{Decision, DispatchStats};
use crate::exec::ExecutionRequest;
use crate::types::Strategy;
use crate::watch::{ChangeEvent, Debouncer};

#[derive(Debug)]
pub struct DispatchCore {
    /// Only present in notification mode.
    debouncer: Option<Debouncer>,
    stats: DispatchStats,
}

impl DispatchCore {
    /// Core for `strategy`, with the default debounce window when needed.
    pub fn for_strategy(strategy: Strategy) -> Self {
        let debouncer = strategy.needs_debounce().then(Debouncer::new);
        Self::new(debouncer)
    }

    pub fn new(debouncer: Option<Debouncer>) -> Self {
        Self {
            debouncer,
            stats: DispatchStats::default(),
        }
    }

    pub fn is_debouncing(&self) -> bool {
        self.debouncer.is_some()
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Decide what to do with one event.
    ///
    /// The event's own `observed_at` is the debounce clock, so the decision
    /// does not depend on how long the event sat in the channel.
    pub fn step(&mut self, event: ChangeEvent) -> Decision {
        self.stats.received += 1;

        if let Some(debouncer) = self.debouncer.as_mut() {
            if !debouncer.accept(&event.path, event.observed_at) {
                self.stats.suppressed += 1;
                return Decision::Suppress;
            }
        }

        self.stats.accepted += 1;
        Decision::Execute(ExecutionRequest {
            path: event.path,
            accepted_at: event.observed_at,
        })
    }

    /// Record that launching an accepted request failed.
    pub fn record_launch_failure(&mut self) {
        self.stats.launch_failures += 1;
    }
}
