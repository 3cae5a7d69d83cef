// src/watch/debounce.rs

//! Duplicate-event suppression for notification mode.
//!
//! Editors and the OS often report one save as several write events. The
//! [`Debouncer`] drops events for a path that arrive within a short window
//! of the previous event *seen* for that path. Every arrival re-anchors the
//! window, so a sustained burst is suppressed until it pauses for longer
//! than the window.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Suppression window used in notification mode.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(5);

/// Path → last-seen-event table.
///
/// Entries are never evicted; the table is bounded by the number of watched
/// paths because the target set is fixed after startup.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last_seen: HashMap<PathBuf, Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl Debouncer {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_DEBOUNCE_WINDOW)
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            last_seen: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Decide whether an event for `path` at `now` is accepted.
    ///
    /// The stored timestamp becomes `now` whether or not the event is
    /// accepted.
    pub fn accept(&mut self, path: &Path, now: Instant) -> bool {
        match self.last_seen.insert(path.to_path_buf(), now) {
            None => true,
            Some(previous) => now.saturating_duration_since(previous) >= self.window,
        }
    }

    /// Number of distinct paths seen so far.
    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }
}
