// src/watch/poll.rs

//! Modification-time polling, one task per watched file.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::types::Strategy;
use crate::watch::{ChangeEvent, ChangeSource, SourceHandle, WatchTargets, WatcherExit};

/// Last observed modification time of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    path: PathBuf,
    last_mod_time: Option<SystemTime>,
}

impl PollState {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_mod_time: None,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn last_mod_time(&self) -> Option<SystemTime> {
        self.last_mod_time
    }

    /// Record a freshly stat'ed modification time.
    ///
    /// Returns `true` when it counts as a change: strictly later than the
    /// stored time. The first observation only primes the state.
    pub fn observe(&mut self, mod_time: SystemTime) -> bool {
        match self.last_mod_time {
            None => {
                self.last_mod_time = Some(mod_time);
                false
            }
            Some(last) if mod_time > last => {
                self.last_mod_time = Some(mod_time);
                true
            }
            Some(_) => false,
        }
    }
}

/// Poll a single file until it disappears, cannot be stat'ed, the
/// dispatcher goes away, or `cancel` fires.
pub async fn watch_file(
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
    period: Duration,
    events: mpsc::Sender<ChangeEvent>,
    cancel: CancellationToken,
) -> WatcherExit {
    let strategy = Strategy::Poll { period };
    let mut state = PollState::new(path);

    loop {
        if cancel.is_cancelled() {
            return WatcherExit::Cancelled;
        }

        match fs.modified(state.path()) {
            Ok(mod_time) => {
                if state.observe(mod_time) {
                    trace!(path = ?state.path(), "modification time advanced");
                    let event = ChangeEvent::new(state.path(), strategy);
                    tokio::select! {
                        _ = cancel.cancelled() => return WatcherExit::Cancelled,
                        sent = events.send(event) => {
                            if sent.is_err() {
                                debug!(path = ?state.path(), "event channel closed; stopping watcher");
                                return WatcherExit::DispatcherGone;
                            }
                        }
                    }
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!(path = ?state.path(), "file does not exist; stopping watcher");
                return WatcherExit::Missing(state.path().to_path_buf());
            }
            Err(err) => {
                warn!(path = ?state.path(), error = %err, "error statting file; stopping watcher");
                return WatcherExit::StatFailed(state.path().to_path_buf());
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => return WatcherExit::Cancelled,
            _ = tokio::time::sleep(period) => {}
        }
    }
}

/// Polling change source: an independent [`watch_file`] task per target.
#[derive(Debug)]
pub struct PollSource {
    targets: WatchTargets,
    fs: Arc<dyn FileSystem>,
    period: Duration,
}

impl PollSource {
    pub fn new(targets: WatchTargets, fs: Arc<dyn FileSystem>, period: Duration) -> Self {
        Self {
            targets,
            fs,
            period,
        }
    }
}

impl ChangeSource for PollSource {
    fn strategy(&self) -> Strategy {
        Strategy::Poll {
            period: self.period,
        }
    }

    fn start(
        self: Box<Self>,
        events: mpsc::Sender<ChangeEvent>,
        cancel: CancellationToken,
    ) -> Result<SourceHandle> {
        let mut tasks = JoinSet::new();
        for path in self.targets.iter() {
            tasks.spawn(watch_file(
                path.to_path_buf(),
                Arc::clone(&self.fs),
                self.period,
                events.clone(),
                cancel.clone(),
            ));
        }

        info!(
            files = self.targets.len(),
            period = ?self.period,
            "polling watchers started"
        );

        // `events` is dropped here, so the channel closes once every
        // per-file task has stopped.
        Ok(SourceHandle::new(tasks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn first_observation_only_primes() {
        let mut state = PollState::new("/a");
        assert!(!state.observe(at(10)));
        assert_eq!(state.last_mod_time(), Some(at(10)));
    }

    #[test]
    fn only_strictly_later_times_emit() {
        let mut state = PollState::new("/a");
        state.observe(at(10));

        assert!(!state.observe(at(10)));
        assert!(!state.observe(at(5)));
        assert_eq!(state.last_mod_time(), Some(at(10)));

        assert!(state.observe(at(11)));
        assert_eq!(state.last_mod_time(), Some(at(11)));
    }
}
