// src/config/mod.rs

//! Configuration loading and validation for watchrun.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Merge CLI flags, file values and defaults into one immutable
//!   [`Settings`] value (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_from_path, load_optional};
pub use model::{ExecSection, RawConfigFile, Settings, WatchSection};
pub use validate::resolve_settings;
