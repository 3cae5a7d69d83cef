use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use watchrun::errors::Result;
use watchrun::exec::{ExecutionRequest, ExecutorBackend};

/// A fake executor that:
/// - records every launched request
/// - wakes anyone waiting on `launched()`
///
/// It never runs a process.
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    launched: Arc<Mutex<Vec<ExecutionRequest>>>,
    notify: Arc<Notify>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything launched so far.
    pub fn requests(&self) -> Vec<ExecutionRequest> {
        self.launched.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.launched.lock().unwrap().len()
    }

    /// Wait until at least `n` requests have been launched.
    pub async fn wait_for(&self, n: usize) {
        loop {
            let notified = self.notify.notified();
            if self.count() >= n {
                return;
            }
            notified.await;
        }
    }
}

impl ExecutorBackend for RecordingExecutor {
    fn launch(&mut self, request: ExecutionRequest) -> Result<()> {
        self.launched.lock().unwrap().push(request);
        self.notify.notify_waiters();
        Ok(())
    }
}
