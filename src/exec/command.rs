// src/exec/command.rs

//! Platform shell invocation.

use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use tokio::process::Command;

/// Build a shell command appropriate for the platform.
///
/// The child inherits our stdout and stderr, so its output interleaves
/// directly with any other running instance.
pub fn shell_command(cmd: &str) -> Command {
    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    };

    command
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    command
}

/// Run `cmd` through the platform shell and wait for it to exit.
pub async fn run_shell(cmd: &str) -> Result<ExitStatus> {
    let mut child = shell_command(cmd)
        .spawn()
        .with_context(|| format!("spawning shell for command '{cmd}'"))?;

    child
        .wait()
        .await
        .with_context(|| format!("waiting for command '{cmd}'"))
}
