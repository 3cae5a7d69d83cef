// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::RawConfigFile;
use crate::errors::Result;

/// Load a configuration file from a given path.
///
/// This only performs TOML deserialization; merging with CLI flags and
/// validation happen in [`resolve_settings`](super::resolve_settings).
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load the config file the user asked for, or the default one if present.
///
/// - An explicit path must exist and parse.
/// - Without an explicit path, a missing [`default_config_path`] simply
///   yields an empty config.
pub fn load_optional(explicit: Option<&Path>) -> Result<RawConfigFile> {
    if let Some(path) = explicit {
        debug!(?path, "loading config file");
        return load_from_path(path);
    }

    let default = default_config_path();
    if default.is_file() {
        debug!(path = ?default, "loading default config file");
        load_from_path(&default)
    } else {
        Ok(RawConfigFile::default())
    }
}

/// Default config location: `Watchrun.toml` in the current directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Watchrun.toml")
}
