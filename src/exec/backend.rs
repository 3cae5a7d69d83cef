// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The dispatcher talks to an `ExecutorBackend` instead of spawning
//! processes itself. This makes it easy to swap in a recording executor in
//! tests while keeping the production implementation here.
//!
//! - `ShellExecutor` is the default implementation used by `watchrun`. Each
//!   launch becomes a detached Tokio task that sleeps for the configured
//!   delay and then runs the command through the platform shell.
//! - Tests can provide their own `ExecutorBackend` that, for example, only
//!   records which requests were launched.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;

use crate::config::Settings;
use crate::errors::Result;
use crate::types::ExecMode;

use super::command::run_shell;

/// One accepted change that should run the configured command.
///
/// The path is informational; the command itself is the same for every
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub path: PathBuf,
    pub accepted_at: Instant,
}

/// Trait abstracting how accepted changes are executed.
///
/// `launch` must not wait for the command: it returns as soon as the
/// execution has been handed off.
pub trait ExecutorBackend: Send {
    fn launch(&mut self, request: ExecutionRequest) -> Result<()>;
}

/// Real executor used in production.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    command: Arc<str>,
    delay: Duration,
    /// Present in [`ExecMode::Serial`]; held for the lifetime of each child.
    serial: Option<Arc<Mutex<()>>>,
}

impl ShellExecutor {
    pub fn new(command: impl Into<Arc<str>>, delay: Duration, mode: ExecMode) -> Self {
        let serial = match mode {
            ExecMode::Concurrent => None,
            ExecMode::Serial => Some(Arc::new(Mutex::new(()))),
        };
        Self {
            command: command.into(),
            delay,
            serial,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.command.as_str(), settings.delay, settings.exec_mode)
    }
}

impl ExecutorBackend for ShellExecutor {
    fn launch(&mut self, request: ExecutionRequest) -> Result<()> {
        let command = Arc::clone(&self.command);
        let delay = self.delay;
        let serial = self.serial.clone();

        // Detached: the JoinHandle is dropped and the outcome is never
        // reported back.
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let _turn = match &serial {
                Some(lock) => Some(lock.lock().await),
                None => None,
            };

            match run_shell(&command).await {
                Ok(status) => debug!(
                    path = ?request.path,
                    exit_code = ?status.code(),
                    success = status.success(),
                    "command exited"
                ),
                Err(err) => debug!(
                    path = ?request.path,
                    error = %err,
                    "command could not be run"
                ),
            }
        });

        Ok(())
    }
}
