// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - The fixed registry of watched paths ([`WatchTargets`]).
//! - Two interchangeable change sources behind [`ChangeSource`]:
//!   per-file mtime polling ([`poll`]) and OS notifications
//!   ([`notification`]).
//! - Duplicate suppression for notification mode ([`debounce`]).
//!
//! It does **not** run commands; it only turns filesystem changes into
//! [`ChangeEvent`]s for the dispatcher.

pub mod debounce;
pub mod notification;
pub mod poll;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::types::Strategy;

pub use debounce::{Debouncer, DEFAULT_DEBOUNCE_WINDOW};
pub use notification::{forward_notifications, is_write_event, NotificationSource};
pub use poll::{watch_file, PollSource, PollState};

/// The fixed set of absolute paths watched for the lifetime of the process.
///
/// Cheap to clone; the list itself is never mutated after startup.
#[derive(Debug, Clone, Default)]
pub struct WatchTargets {
    paths: Arc<[PathBuf]>,
}

impl WatchTargets {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths: paths.into(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// A detected modification of one watched path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub observed_at: Instant,
    /// Which strategy produced the event (for logging only).
    pub strategy: Strategy,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, strategy: Strategy) -> Self {
        Self {
            path: path.into(),
            observed_at: Instant::now(),
            strategy,
        }
    }
}

/// Why a watcher task stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatcherExit {
    /// Polled file no longer exists.
    Missing(PathBuf),
    /// Polled file could not be stat'ed for another reason.
    StatFailed(PathBuf),
    /// The OS event stream ended.
    StreamClosed,
    /// The dispatcher stopped receiving events.
    DispatcherGone,
    Cancelled,
}

/// A strategy that turns filesystem activity into [`ChangeEvent`]s.
///
/// Implementations spawn their own tasks and move `events` into them, so the
/// event channel closes exactly when every producer has stopped.
pub trait ChangeSource: Send {
    fn strategy(&self) -> Strategy;

    /// Start producing events.
    ///
    /// Errors returned here are setup failures and are fatal to the caller.
    fn start(
        self: Box<Self>,
        events: mpsc::Sender<ChangeEvent>,
        cancel: CancellationToken,
    ) -> Result<SourceHandle>;
}

/// Pick the change source for `strategy`.
pub fn select_source(
    strategy: Strategy,
    targets: WatchTargets,
    fs: Arc<dyn FileSystem>,
) -> Box<dyn ChangeSource> {
    match strategy {
        Strategy::Poll { period } => Box::new(PollSource::new(targets, fs, period)),
        Strategy::Notification => Box::new(NotificationSource::new(targets)),
    }
}

/// Running change source.
///
/// Owns the producer tasks and anything that must stay alive while they run
/// (the OS watcher in notification mode). Dropping the handle aborts the
/// tasks and stops OS notifications.
pub struct SourceHandle {
    tasks: JoinSet<WatcherExit>,
    _keep_alive: Option<Box<dyn Send>>,
}

impl std::fmt::Debug for SourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceHandle")
            .field("tasks", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

impl SourceHandle {
    pub fn new(tasks: JoinSet<WatcherExit>) -> Self {
        Self {
            tasks,
            _keep_alive: None,
        }
    }

    /// Keep `guard` alive for as long as this handle exists.
    pub fn with_guard(mut self, guard: impl Send + 'static) -> Self {
        self._keep_alive = Some(Box::new(guard));
        self
    }

    /// Wait for every producer task and collect their exit reasons.
    pub async fn join(mut self) -> Vec<WatcherExit> {
        let mut exits = Vec::with_capacity(self.tasks.len());
        while let Some(res) = self.tasks.join_next().await {
            match res {
                Ok(exit) => exits.push(exit),
                Err(err) => warn!(error = %err, "watcher task did not finish cleanly"),
            }
        }
        exits
    }
}
