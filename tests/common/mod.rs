#![allow(dead_code)]

use std::path::Path;

pub use watchrun_test_utils::builders::SettingsBuilder;
pub use watchrun_test_utils::recording_executor::RecordingExecutor;
pub use watchrun_test_utils::{init_tracing, wait_until, with_timeout};

/// Count lines in `path` equal to `literal`; a missing file counts as zero.
pub fn count_lines(path: &Path, literal: &str) -> usize {
    std::fs::read_to_string(path)
        .map(|s| s.lines().filter(|l| l.trim() == literal).count())
        .unwrap_or(0)
}

/// Single-quote `path` for use inside an `sh -c` command.
pub fn sh_quote(path: &Path) -> String {
    format!("'{}'", path.display().to_string().replace('\'', r"'\''"))
}
