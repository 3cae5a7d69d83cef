// src/config/validate.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::CliArgs;
use crate::config::model::{
    DEFAULT_COMMAND, DEFAULT_PATH, DEFAULT_TYPES, RawConfigFile, Settings,
    host_is_case_insensitive,
};
use crate::errors::{Result, WatchrunError};
use crate::types::parse_duration;

/// Merge CLI flags over file values over defaults, and validate the result.
///
/// Precedence is per field: a flag that was given always wins, then the
/// config file, then the built-in default.
pub fn resolve_settings(cli: &CliArgs, file: RawConfigFile) -> Result<Settings> {
    let RawConfigFile {
        watch,
        exec,
        verbose,
    } = file;

    let root = cli
        .path
        .clone()
        .or(watch.path)
        .unwrap_or_else(|| DEFAULT_PATH.to_string());

    let types = match (&cli.types, watch.types) {
        (Some(flag), _) => split_types(flag),
        (None, Some(list)) => list,
        (None, None) => vec![DEFAULT_TYPES.to_string()],
    };
    let types = normalize_types(types)?;

    let command = cli
        .command
        .clone()
        .or(exec.command)
        .unwrap_or_else(|| DEFAULT_COMMAND.to_string());
    if command.trim().is_empty() {
        return Err(WatchrunError::ConfigError(
            "command must not be empty".to_string(),
        ));
    }

    let poll_period = resolve_duration("poll", cli.poll.as_deref(), watch.poll.as_deref())?;
    let delay = resolve_duration("delay", cli.delay.as_deref(), exec.delay.as_deref())?;

    Ok(Settings {
        root: PathBuf::from(root),
        types,
        case_insensitive_types: cli
            .case_insensitive_types
            .or(watch.case_insensitive_types)
            .unwrap_or_else(host_is_case_insensitive),
        command,
        poll_period,
        delay,
        exec_mode: cli.exec_mode.or(exec.mode).unwrap_or_default(),
        verbose: cli.verbose || verbose.unwrap_or(false),
    })
}

fn resolve_duration(name: &str, flag: Option<&str>, file: Option<&str>) -> Result<Duration> {
    match flag.or(file) {
        Some(raw) => parse_duration(raw)
            .map_err(|e| WatchrunError::ConfigError(format!("invalid {name} duration: {e}"))),
        None => Ok(Duration::ZERO),
    }
}

fn split_types(flag: &str) -> Vec<String> {
    flag.split(',').map(str::to_string).collect()
}

/// Trim, drop empties, and make sure every extension has a leading dot.
fn normalize_types(types: Vec<String>) -> Result<Vec<String>> {
    let normalized: Vec<String> = types
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && t != ".")
        .map(|t| if t.starts_with('.') { t } else { format!(".{t}") })
        .collect();

    if normalized.is_empty() {
        return Err(WatchrunError::ConfigError(
            "at least one file type must be given".to_string(),
        ));
    }
    Ok(normalized)
}
