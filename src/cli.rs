// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every setting that can also come from the config file is an `Option`, so
//! that `config::resolve_settings` can apply "flag > file > default".

use clap::{Parser, ValueEnum};

use crate::types::ExecMode;

/// Command-line arguments for `watchrun`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "watchrun",
    version,
    about = "Run a shell command whenever watched files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Directory (or single file) to scan for files to watch.
    ///
    /// Default: `./`.
    #[arg(long, value_name = "PATH")]
    pub path: Option<String>,

    /// Comma-separated file extensions to watch, e.g. `.rs,.toml`.
    ///
    /// Default: `.go`.
    #[arg(long, value_name = "EXTS")]
    pub types: Option<String>,

    /// Shell command to execute when a watched file changes.
    #[arg(long, value_name = "CMD")]
    pub command: Option<String>,

    /// Poll period (e.g. `300ms`). `0` selects OS change notifications.
    #[arg(long, value_name = "DURATION")]
    pub poll: Option<String>,

    /// Fixed delay before each command execution (e.g. `500ms`).
    #[arg(long, value_name = "DURATION")]
    pub delay: Option<String>,

    /// Whether command instances may overlap (`concurrent`) or run one at a
    /// time (`serial`).
    #[arg(long, value_name = "MODE")]
    pub exec_mode: Option<ExecMode>,

    /// Match file extensions ignoring case. Defaults to the host convention.
    #[arg(long, value_name = "BOOL")]
    pub case_insensitive_types: Option<bool>,

    /// Path to a TOML config file.
    ///
    /// If omitted, `Watchrun.toml` in the current directory is used when it
    /// exists.
    #[arg(long, value_name = "FILE")]
    pub config: Option<String>,

    /// Log every accepted file change.
    #[arg(long)]
    pub verbose: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve settings and list watched files, but don't watch or execute.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
