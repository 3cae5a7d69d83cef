// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use ignore::WalkBuilder;
use tracing::debug;

pub mod mock;

/// Abstract filesystem interface.
///
/// Stat-like calls return `io::Result` because callers branch on the error
/// kind (a vanished file is reported differently from other failures).
pub trait FileSystem: Send + Sync + Debug {
    /// Last modification time of `path`.
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Every regular file at or below `root`.
    ///
    /// Symlinks are not followed. Entries that cannot be read are skipped.
    fn walk_files(&self, root: &Path) -> Vec<PathBuf>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        fs::metadata(path)?.modified()
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }

    fn walk_files(&self, root: &Path) -> Vec<PathBuf> {
        // Every file counts, including hidden and git-ignored ones.
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .build();

        let mut files = Vec::new();
        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_some_and(|ft| ft.is_file()) {
                files.push(entry.into_path());
            }
        }
        files
    }
}
