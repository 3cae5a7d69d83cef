use super::FileSystem;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { modified: SystemTime },
    Dir,
    /// Stat on this path fails with the given error kind.
    Broken(io::ErrorKind),
}

/// In-memory filesystem whose modification times are set by the test.
///
/// Cloning shares the underlying table, so a test can keep one handle to
/// mutate files while a watcher holds another.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or overwrite) a file with the given modification time.
    /// Parent directories are created implicitly.
    pub fn add_file(&self, path: impl AsRef<Path>, modified: SystemTime) {
        self.insert(path.as_ref(), MockEntry::File { modified });
    }

    /// Set a new modification time on an existing or new file.
    pub fn touch(&self, path: impl AsRef<Path>, modified: SystemTime) {
        self.add_file(path, modified);
    }

    /// Make every following stat of `path` fail with `kind`.
    pub fn break_path(&self, path: impl AsRef<Path>, kind: io::ErrorKind) {
        self.insert(path.as_ref(), MockEntry::Broken(kind));
    }

    /// Remove a file.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let mut files = self.files.lock().unwrap();
        files.remove(path.as_ref());
    }

    fn insert(&self, path: &Path, entry: MockEntry) {
        let mut files = self.files.lock().unwrap();
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            files.entry(ancestor.to_path_buf()).or_insert(MockEntry::Dir);
        }
        files.insert(path.to_path_buf(), entry);
    }
}

impl FileSystem for MockFileSystem {
    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(MockEntry::File { modified }) => Ok(*modified),
            Some(MockEntry::Dir) => Ok(SystemTime::UNIX_EPOCH),
            Some(MockEntry::Broken(kind)) => Err(io::Error::new(*kind, "injected stat failure")),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {:?}", path),
            )),
        }
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        // Tests use stable absolute paths, so a known path is its own canonical form.
        let files = self.files.lock().unwrap();
        if files.contains_key(path) {
            Ok(path.to_path_buf())
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {:?}", path),
            ))
        }
    }

    fn walk_files(&self, root: &Path) -> Vec<PathBuf> {
        let files = self.files.lock().unwrap();
        files
            .iter()
            .filter(|(path, entry)| {
                matches!(entry, MockEntry::File { .. }) && path.starts_with(root)
            })
            .map(|(path, _)| path.clone())
            .collect()
    }
}
