//! Filesystem sink contract and implementations.
//!
//! # Responsibility
//! - Isolate every disk access of an export behind one trait.
//! - Provide an in-memory sink for previews and failure injection.
//!
//! # Invariants
//! - Sinks never retry; errors surface unchanged to the caller.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

/// Destination for exported files.
pub trait FileSink {
    /// Returns whether `path` already exists.
    fn exists(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// Sink backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSink;

impl FileSink for FsSink {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

/// Sink that keeps directories and files in memory.
///
/// Writes to a path containing any registered failure fragment return an
/// I/O error instead of being recorded.
#[derive(Debug, Default)]
pub struct MemorySink {
    dirs: RefCell<BTreeSet<PathBuf>>,
    files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
    failing: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes writes fail for paths containing `fragment`.
    pub fn fail_writes_matching(mut self, fragment: impl Into<String>) -> Self {
        self.failing.push(fragment.into());
        self
    }

    /// Marks `path` as already present.
    pub fn with_existing_dir(self, path: impl Into<PathBuf>) -> Self {
        self.dirs.borrow_mut().insert(path.into());
        self
    }

    pub fn file(&self, path: &Path) -> Option<String> {
        self.files
            .borrow()
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }

    pub fn dir_count(&self) -> usize {
        self.dirs.borrow().len()
    }

    pub fn file_count(&self) -> usize {
        self.files.borrow().len()
    }
}

impl FileSink for MemorySink {
    fn exists(&self, path: &Path) -> bool {
        self.dirs.borrow().contains(path) || self.files.borrow().contains_key(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut dirs = self.dirs.borrow_mut();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let rendered = path.to_string_lossy();
        if self
            .failing
            .iter()
            .any(|fragment| rendered.contains(fragment.as_str()))
        {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("write rejected for {rendered}"),
            ));
        }
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FileSink, FsSink, MemorySink};
    use std::path::Path;

    #[test]
    fn memory_sink_records_dirs_and_files() {
        let sink = MemorySink::new();
        sink.create_dir_all(Path::new("/vault/work")).unwrap();
        sink.write_file(Path::new("/vault/work/a.md"), b"hello")
            .unwrap();

        assert!(sink.exists(Path::new("/vault")));
        assert!(sink.exists(Path::new("/vault/work/a.md")));
        assert_eq!(sink.file(Path::new("/vault/work/a.md")).as_deref(), Some("hello"));
        assert_eq!(sink.file_count(), 1);
    }

    #[test]
    fn memory_sink_injects_failures() {
        let sink = MemorySink::new().fail_writes_matching("Home");
        let err = sink
            .write_file(Path::new("/vault/Home.md"), b"x")
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::PermissionDenied);
        assert_eq!(sink.file_count(), 0);
    }

    #[test]
    fn fs_sink_writes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("sub");
        FsSink.create_dir_all(&nested).unwrap();
        FsSink.write_file(&nested.join("a.md"), b"body").unwrap();

        assert!(FsSink.exists(&nested.join("a.md")));
        assert_eq!(std::fs::read_to_string(nested.join("a.md")).unwrap(), "body");
    }
}
