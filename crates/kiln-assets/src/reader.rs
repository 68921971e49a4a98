//! File access capability for the asset handler.
//!
//! The handler never touches the filesystem directly; it goes through
//! [`FileReader`] so tests can drive it from an in-memory tree.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Read access to the serving root.
#[async_trait]
pub trait FileReader: Send + Sync {
    /// Whether a regular file exists at `path`.
    async fn exists(&self, path: &Path) -> bool;

    /// Read the full contents of the file at `path`.
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Production reader backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskReader;

#[async_trait]
impl FileReader for DiskReader {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }
}

/// In-memory reader for tests and embedded fixtures.
#[derive(Debug, Clone, Default)]
pub struct MemoryReader {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryReader {
    /// Create an empty in-memory tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file at an absolute path.
    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }

    /// Number of registered files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[async_trait]
impl FileReader for MemoryReader {
    async fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}
