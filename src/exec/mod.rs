// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the configured command,
//! using `tokio::process::Command`, whenever the dispatcher accepts a change.
//!
//! - [`command`] builds the platform shell invocation.
//! - [`backend`] provides the `ExecutorBackend` trait and the concrete
//!   fire-and-forget `ShellExecutor`, which tests can replace with a fake.

pub mod backend;
pub mod command;

pub use backend::{ExecutionRequest, ExecutorBackend, ShellExecutor};
pub use command::{run_shell, shell_command};
