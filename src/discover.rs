// src/discover.rs

//! Startup file enumeration.
//!
//! Walks the configured root once and keeps regular files whose extension is
//! in the configured type list. The result becomes the fixed
//! [`WatchTargets`] registry; files created later are never picked up.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result as AnyResult};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::info;

use crate::config::Settings;
use crate::errors::{Result, WatchrunError};
use crate::fs::FileSystem;
use crate::watch::WatchTargets;

/// Compiled extension filter.
///
/// Each type `.ext` becomes the glob `*.ext` matched against the file name,
/// optionally case-insensitively.
#[derive(Debug, Clone)]
pub struct TypeFilter {
    set: GlobSet,
}

impl TypeFilter {
    pub fn new(types: &[String], case_insensitive: bool) -> AnyResult<Self> {
        let mut builder = GlobSetBuilder::new();
        for ext in types {
            let pattern = format!("*{}", globset::escape(ext));
            let glob = GlobBuilder::new(&pattern)
                .case_insensitive(case_insensitive)
                .literal_separator(true)
                .build()
                .with_context(|| format!("invalid file type '{ext}'"))?;
            builder.add(glob);
        }
        let set = builder.build().context("building file type filter")?;
        Ok(Self { set })
    }

    pub fn matches(&self, path: &Path) -> bool {
        match path.file_name() {
            Some(name) => self.set.is_match(Path::new(name)),
            None => false,
        }
    }
}

/// Enumerate the watch targets for `settings`.
///
/// Failing to resolve the root is fatal; unreadable entries below it are
/// skipped. Symlinks are not followed, so each file is listed once.
pub fn discover_targets(fs: &dyn FileSystem, settings: &Settings) -> Result<WatchTargets> {
    let root = fs
        .canonicalize(&settings.root)
        .map_err(|source| WatchrunError::RootNotFound {
            path: settings.root.clone(),
            source,
        })?;

    let filter = TypeFilter::new(&settings.types, settings.case_insensitive_types)?;

    let mut files: Vec<PathBuf> = fs
        .walk_files(&root)
        .into_iter()
        .filter(|path| filter.matches(path))
        .collect();
    files.sort();
    files.dedup();

    info!(
        root = ?root,
        types = ?settings.types,
        count = files.len(),
        "discovered watch targets"
    );

    Ok(WatchTargets::new(files))
}
