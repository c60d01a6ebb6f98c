//! Project file tree
//!
//! Immutable rooted tree of file and directory nodes, built once per folder
//! selection and replaced wholesale on the next one.

pub mod builder;
pub mod entry;

pub use builder::{BuiltTree, TreeBuilder};
pub use entry::find_entry_point;

use serde::{Deserialize, Serialize};

/// Node type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

/// One file or directory in a loaded project tree.
///
/// `path` is the full slash-joined path from the root; the synthetic root's
/// path is the empty string and every non-root node's path is
/// `parent.path + "/" + name`. Children keep discovery order, not
/// alphabetical order. Files never carry children; directories always do,
/// possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    pub kind: NodeKind,
    /// Full text content for files; always empty for directories.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FileNode>,
}

impl FileNode {
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Depth-first traversal over this node and all descendants, visiting
    /// children in order. The node itself comes first.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Number of file (leaf) nodes in this subtree.
    pub fn file_count(&self) -> usize {
        self.walk().filter(|node| node.is_file()).count()
    }
}

/// Depth-first iterator over a subtree.
pub struct Walk<'a> {
    stack: Vec<&'a FileNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a FileNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reverse so the first child is popped first.
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
