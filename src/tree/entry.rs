//! Entry point resolution.

use crate::tree::FileNode;

/// Find the entry point: the first file literally named `index.html`
/// (ASCII case-insensitive) in depth-first, children-in-order traversal.
///
/// Deeper or later matches are ignored; that ambiguity is documented, not an
/// error. `None` means the caller must not proceed to materialization.
pub fn find_entry_point(root: &FileNode) -> Option<&FileNode> {
    root.walk()
        .find(|node| node.is_file() && node.name.eq_ignore_ascii_case("index.html"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;

    fn file(name: &str, path: &str) -> FileNode {
        FileNode {
            name: name.to_string(),
            path: path.to_string(),
            kind: NodeKind::File,
            content: String::new(),
            children: Vec::new(),
        }
    }

    fn dir(name: &str, path: &str, children: Vec<FileNode>) -> FileNode {
        FileNode {
            name: name.to_string(),
            path: path.to_string(),
            kind: NodeKind::Directory,
            content: String::new(),
            children,
        }
    }

    #[test]
    fn first_match_in_depth_first_sibling_order_wins() {
        let root = dir(
            "root",
            "",
            vec![
                dir("a", "a", vec![file("index.html", "a/index.html")]),
                dir(
                    "b",
                    "b",
                    vec![dir("c", "b/c", vec![file("index.html", "b/c/index.html")])],
                ),
            ],
        );
        let entry = find_entry_point(&root).unwrap();
        assert_eq!(entry.path, "a/index.html");
    }

    #[test]
    fn name_match_is_case_insensitive() {
        let root = dir("root", "", vec![file("Index.HTML", "Index.HTML")]);
        assert!(find_entry_point(&root).is_some());
    }

    #[test]
    fn directories_named_index_html_do_not_match() {
        let root = dir(
            "root",
            "",
            vec![dir("index.html", "index.html", vec![file("a.js", "index.html/a.js")])],
        );
        assert!(find_entry_point(&root).is_none());
    }

    #[test]
    fn missing_entry_point_is_none() {
        let root = dir("root", "", vec![file("main.js", "main.js")]);
        assert!(find_entry_point(&root).is_none());
    }
}
