//! Folder selection collaborator
//!
//! Yields the flat stream of (relative path, text content) pairs a tree build
//! consumes. Browser hosts back this with a directory-handle picker or a
//! multi-file input fallback; `WalkdirSource` is the local-filesystem
//! implementation used by the CLI and integration tests.
//!
//! Exclusion of `node_modules` and hidden segments happens in the tree
//! builder, not here; a source lists everything it can see.

use crate::error::SourceError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Source of project files for one folder selection.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Relative slash-joined paths of every file, in discovery order.
    async fn list(&self) -> Result<Vec<String>, SourceError>;

    /// Full text content of one listed file.
    async fn read(&self, relative_path: &str) -> Result<String, SourceError>;
}

/// Local-filesystem source rooted at one directory.
///
/// Traversal is strictly depth-first and name-ordered so discovery order is
/// deterministic across runs.
pub struct WalkdirSource {
    root: PathBuf,
}

impl WalkdirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn relative(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let segments: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if segments.is_empty() {
            None
        } else {
            Some(segments.join("/"))
        }
    }
}

#[async_trait]
impl FileSource for WalkdirSource {
    async fn list(&self) -> Result<Vec<String>, SourceError> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                SourceError::Io(e.into_io_error().unwrap_or_else(|| {
                    std::io::Error::new(std::io::ErrorKind::Other, "walk error")
                }))
            })?;
            if entry.file_type().is_file() {
                if let Some(rel) = self.relative(entry.path()) {
                    paths.push(rel);
                }
            }
        }
        Ok(paths)
    }

    async fn read(&self, relative_path: &str) -> Result<String, SourceError> {
        let full = self.root.join(relative_path);
        let bytes = tokio::fs::read(&full).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
