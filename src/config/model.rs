// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::types::{ExecMode, Strategy};

/// Configuration file as read from TOML.
///
/// ```toml
/// verbose = true
///
/// [watch]
/// path = "./"
/// types = [".rs", ".toml"]
/// poll = "250ms"
///
/// [exec]
/// command = "cargo test"
/// delay = "0ms"
/// mode = "concurrent"
/// ```
///
/// Every field is optional; missing values fall back to CLI flags or
/// built-in defaults during [`resolve_settings`](super::resolve_settings).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub exec: ExecSection,

    /// Log every accepted file change.
    #[serde(default)]
    pub verbose: Option<bool>,
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Directory (or single file) to scan.
    #[serde(default)]
    pub path: Option<String>,

    /// File extensions to watch, with or without the leading dot.
    #[serde(default)]
    pub types: Option<Vec<String>>,

    /// Poll period as a duration string; `"0"` selects notification mode.
    #[serde(default)]
    pub poll: Option<String>,

    #[serde(default)]
    pub case_insensitive_types: Option<bool>,
}

/// `[exec]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecSection {
    /// Shell command to run on change.
    #[serde(default)]
    pub command: Option<String>,

    /// Fixed delay before each execution.
    #[serde(default)]
    pub delay: Option<String>,

    #[serde(default)]
    pub mode: Option<ExecMode>,
}

/// Fully resolved, immutable settings.
///
/// Built once at startup and passed explicitly to every component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Root to discover watch targets under.
    pub root: PathBuf,
    /// Normalised extensions, each with a leading dot.
    pub types: Vec<String>,
    pub case_insensitive_types: bool,
    pub command: String,
    /// Zero selects notification mode.
    pub poll_period: Duration,
    pub delay: Duration,
    pub exec_mode: ExecMode,
    pub verbose: bool,
}

impl Settings {
    /// Change detection strategy implied by `poll_period`.
    pub fn strategy(&self) -> Strategy {
        Strategy::from_poll_period(self.poll_period)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_PATH),
            types: vec![DEFAULT_TYPES.to_string()],
            case_insensitive_types: host_is_case_insensitive(),
            command: DEFAULT_COMMAND.to_string(),
            poll_period: Duration::ZERO,
            delay: Duration::ZERO,
            exec_mode: ExecMode::Concurrent,
            verbose: false,
        }
    }
}

pub const DEFAULT_PATH: &str = "./";
pub const DEFAULT_TYPES: &str = ".go";
pub const DEFAULT_COMMAND: &str = "go run main.go";

/// Windows and macOS filesystems are case-insensitive by default.
pub fn host_is_case_insensitive() -> bool {
    cfg!(any(windows, target_os = "macos"))
}
