// src/watch/notification.rs

use notify::event::{AccessKind, AccessMode, ModifyKind};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::errors::Result;
use crate::types::Strategy;
use crate::watch::{ChangeEvent, ChangeSource, SourceHandle, WatchTargets, WatcherExit};

/// Whether a notify event represents a content write.
///
/// Metadata-only changes, creations, removals and renames are ignored.
pub fn is_write_event(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(ModifyKind::Data(_))
            | EventKind::Modify(ModifyKind::Any)
            | EventKind::Access(AccessKind::Close(AccessMode::Write))
    )
}

/// OS-notification change source.
///
/// One `RecommendedWatcher` registers every target; a single task reads its
/// event and error streams.
#[derive(Debug)]
pub struct NotificationSource {
    targets: WatchTargets,
}

impl NotificationSource {
    pub fn new(targets: WatchTargets) -> Self {
        Self { targets }
    }
}

impl ChangeSource for NotificationSource {
    fn strategy(&self) -> Strategy {
        Strategy::Notification
    }

    fn start(
        self: Box<Self>,
        events: mpsc::Sender<ChangeEvent>,
        cancel: CancellationToken,
    ) -> Result<SourceHandle> {
        // Channels from the blocking notify callback into the async world.
        let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
        let (error_tx, error_rx) = mpsc::unbounded_channel::<notify::Error>();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                // Send failures only happen once the reader has stopped.
                match res {
                    Ok(event) => {
                        let _ = event_tx.send(event);
                    }
                    Err(err) => {
                        let _ = error_tx.send(err);
                    }
                }
            },
            Config::default(),
        )?;

        for path in self.targets.iter() {
            watcher
                .watch(path, RecursiveMode::NonRecursive)
                .map_err(|e| e.add_path(path.to_path_buf()))?;
        }

        info!(files = self.targets.len(), "notification watcher started");

        let mut tasks = JoinSet::new();
        tasks.spawn(forward_notifications(event_rx, error_rx, events, cancel));

        Ok(SourceHandle::new(tasks).with_guard(watcher))
    }
}

/// Read the notify streams and forward write events as [`ChangeEvent`]s.
///
/// - closed event stream: stop quietly
/// - subscription error: log and keep going
/// - write event: one `ChangeEvent` per affected path
pub async fn forward_notifications(
    mut event_rx: mpsc::UnboundedReceiver<Event>,
    mut error_rx: mpsc::UnboundedReceiver<notify::Error>,
    events: mpsc::Sender<ChangeEvent>,
    cancel: CancellationToken,
) -> WatcherExit {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return WatcherExit::Cancelled,

            maybe_event = event_rx.recv() => {
                let Some(event) = maybe_event else {
                    debug!("notification stream closed");
                    return WatcherExit::StreamClosed;
                };

                if !is_write_event(&event.kind) {
                    trace!(?event, "ignoring non-write event");
                    continue;
                }

                for path in event.paths {
                    let change = ChangeEvent::new(path, Strategy::Notification);
                    tokio::select! {
                        _ = cancel.cancelled() => return WatcherExit::Cancelled,
                        sent = events.send(change) => {
                            if sent.is_err() {
                                debug!("event channel closed; stopping notification reader");
                                return WatcherExit::DispatcherGone;
                            }
                        }
                    }
                }
            }

            Some(err) = error_rx.recv() => {
                warn!(error = %err, "file watch error");
            }
        }
    }
}
