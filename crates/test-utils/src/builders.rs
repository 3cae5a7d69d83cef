#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use watchrun::config::Settings;
use watchrun::types::ExecMode;

/// Builder for `Settings` to simplify test setup.
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    pub fn new(command: &str) -> Self {
        Self {
            settings: Settings {
                command: command.to_string(),
                ..Settings::default()
            },
        }
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.settings.root = root.into();
        self
    }

    pub fn types(mut self, types: &[&str]) -> Self {
        self.settings.types = types.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn case_insensitive_types(mut self, val: bool) -> Self {
        self.settings.case_insensitive_types = val;
        self
    }

    pub fn poll(mut self, period: Duration) -> Self {
        self.settings.poll_period = period;
        self
    }

    pub fn notification(mut self) -> Self {
        self.settings.poll_period = Duration::ZERO;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.settings.delay = delay;
        self
    }

    pub fn exec_mode(mut self, mode: ExecMode) -> Self {
        self.settings.exec_mode = mode;
        self
    }

    pub fn verbose(mut self, val: bool) -> Self {
        self.settings.verbose = val;
        self
    }

    pub fn build(self) -> Settings {
        self.settings
    }
}
