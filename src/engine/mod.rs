// src/engine/mod.rs

//! Dispatch engine for watchrun.
//!
//! This module sits between the change sources and the executor:
//! - it receives [`ChangeEvent`](crate::watch::ChangeEvent)s from whichever
//!   source is active
//! - applies duplicate suppression when the strategy needs it
//! - launches one command execution per accepted event, without waiting
//!
//! The pure decision logic lives in [`core`]; the async/IO shell is
//! implemented in [`dispatcher`].

use crate::exec::ExecutionRequest;

/// Outcome of feeding one event to the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Run the command for this request.
    Execute(ExecutionRequest),
    /// Dropped as a duplicate inside the debounce window.
    Suppress,
}

/// Counters reported when the dispatcher stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub received: u64,
    pub accepted: u64,
    pub suppressed: u64,
    /// Accepted events whose launch returned an error.
    pub launch_failures: u64,
}

pub mod core;
pub mod dispatcher;

pub use self::core::DispatchCore;
pub use self::dispatcher::Dispatcher;
