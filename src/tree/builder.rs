//! Tree construction from a flat file listing.
//!
//! Construction is index-based: a flat slot table accumulates
//! nodes-under-construction keyed by path, children are linked by index, and
//! the table is frozen into an immutable [`FileNode`] tree at the end. File
//! contents are read concurrently and joined by a single completion barrier;
//! unreadable files are skipped and reported, never fatal on their own.

use crate::config::LoaderConfig;
use crate::error::TreeBuildError;
use crate::source::FileSource;
use crate::tree::{FileNode, NodeKind};
use futures::future::join_all;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Result of one tree build.
#[derive(Debug, Clone)]
pub struct BuiltTree {
    pub root: FileNode,
    /// Relative paths that could not be read and were left out of the tree.
    pub skipped: Vec<String>,
}

/// Builds a [`FileNode`] tree from a [`FileSource`].
pub struct TreeBuilder<'a> {
    source: &'a dyn FileSource,
    config: &'a LoaderConfig,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(source: &'a dyn FileSource, config: &'a LoaderConfig) -> Self {
        Self { source, config }
    }

    /// Build the tree for one folder selection.
    ///
    /// `folder_name` labels the displayed root: when the listing is rooted at
    /// a single directory (the usual shape from folder pickers) that
    /// directory is promoted to be the root; otherwise the synthetic root
    /// itself takes the name.
    pub async fn build(&self, folder_name: &str) -> Result<BuiltTree, TreeBuildError> {
        let listed = self.source.list().await?;
        let paths: Vec<String> = listed
            .into_iter()
            .filter(|p| !self.config.is_excluded_path(p))
            .collect();

        // One barrier over all pending reads; each read lands in its own slot
        // so completion order does not matter.
        let reads = paths
            .iter()
            .map(|path| async move { (path.as_str(), self.source.read(path).await) });
        let results = join_all(reads).await;

        let mut table = SlotTable::new();
        let mut skipped = Vec::new();
        let mut compatible = 0usize;
        for (path, result) in results {
            match result {
                Ok(content) => {
                    // Compatibility is only counted for files that actually
                    // enter the tree; duplicates and conflicts don't qualify.
                    let inserted = table.insert_file(path, content);
                    if inserted && self.config.is_compatible_path(path) {
                        compatible += 1;
                    }
                }
                Err(err) => {
                    warn!(path, error = %err, "skipping unreadable file");
                    skipped.push(path.to_string());
                }
            }
        }

        if compatible == 0 {
            return Err(TreeBuildError::NoCompatibleFiles);
        }

        let root = promote_root(table.freeze(), folder_name);
        Ok(BuiltTree { root, skipped })
    }
}

/// If the synthetic root's sole child is a directory, that child becomes the
/// displayed root; either way the displayed root takes the folder name.
fn promote_root(mut root: FileNode, folder_name: &str) -> FileNode {
    if root.children.len() == 1 && root.children[0].is_directory() {
        let mut promoted = root.children.remove(0);
        promoted.name = folder_name.to_string();
        return promoted;
    }
    root.name = folder_name.to_string();
    root
}

struct Slot {
    name: String,
    path: String,
    kind: NodeKind,
    content: String,
    children: Vec<usize>,
}

/// Flat node-under-construction table; index 0 is the synthetic root.
struct SlotTable {
    slots: Vec<Slot>,
    by_path: HashMap<String, usize>,
}

impl SlotTable {
    fn new() -> Self {
        let root = Slot {
            name: String::new(),
            path: String::new(),
            kind: NodeKind::Directory,
            content: String::new(),
            children: Vec::new(),
        };
        Self {
            slots: vec![root],
            by_path: HashMap::new(),
        }
    }

    /// Idempotent insertion: existing (parent, name) pairs are reused, and
    /// the first occurrence of a duplicate file path wins. Returns whether a
    /// new leaf actually entered the table.
    fn insert_file(&mut self, relative_path: &str, content: String) -> bool {
        let segments: Vec<&str> = relative_path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((leaf, dirs)) = segments.split_last() else {
            return false;
        };

        let mut parent = 0usize;
        for segment in dirs {
            match self.ensure_directory(parent, segment) {
                Some(idx) => parent = idx,
                None => {
                    debug!(path = relative_path, "path conflicts with an existing file node; skipping");
                    return false;
                }
            }
        }

        let path = self.child_path(parent, leaf);
        if self.by_path.contains_key(&path) {
            return false;
        }
        let idx = self.push_slot(leaf, path, NodeKind::File, content);
        self.slots[parent].children.push(idx);
        true
    }

    fn ensure_directory(&mut self, parent: usize, name: &str) -> Option<usize> {
        let path = self.child_path(parent, name);
        if let Some(&idx) = self.by_path.get(&path) {
            return match self.slots[idx].kind {
                NodeKind::Directory => Some(idx),
                NodeKind::File => None,
            };
        }
        let idx = self.push_slot(name, path, NodeKind::Directory, String::new());
        self.slots[parent].children.push(idx);
        Some(idx)
    }

    fn child_path(&self, parent: usize, name: &str) -> String {
        let parent_path = &self.slots[parent].path;
        if parent_path.is_empty() {
            name.to_string()
        } else {
            format!("{parent_path}/{name}")
        }
    }

    fn push_slot(&mut self, name: &str, path: String, kind: NodeKind, content: String) -> usize {
        let idx = self.slots.len();
        self.by_path.insert(path.clone(), idx);
        self.slots.push(Slot {
            name: name.to_string(),
            path,
            kind,
            content,
            children: Vec::new(),
        });
        idx
    }

    fn freeze(self) -> FileNode {
        freeze_slot(&self.slots, 0)
    }
}

fn freeze_slot(slots: &[Slot], idx: usize) -> FileNode {
    let slot = &slots[idx];
    FileNode {
        name: slot.name.clone(),
        path: slot.path.clone(),
        kind: slot.kind,
        content: slot.content.clone(),
        children: slot
            .children
            .iter()
            .map(|&child| freeze_slot(slots, child))
            .collect(),
    }
}
