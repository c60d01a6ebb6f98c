//! Asset materialization
//!
//! Walks the project tree and turns every file node into an in-memory,
//! URL-addressable blob with an inferred content type. TypeScript/TSX sources
//! go through the transpiler collaborator first; a transpile failure degrades
//! to blobbing the original source with a script MIME type rather than
//! failing the launch.

use crate::blob::BlobStore;
use crate::transpile::{TranspileOptions, Transpiler};
use crate::tree::FileNode;
use crate::types::BlobUrl;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// One materialized file: a fresh blob URL plus its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedAsset {
    pub url: BlobUrl,
    pub mime: String,
}

/// Blob-URL table keyed by root-relative path.
pub type AssetTable = BTreeMap<String, MaterializedAsset>;

/// Lowercased extension of a path's final segment, if any.
pub fn extension(path: &str) -> Option<String> {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())
}

/// MIME type inferred from a path's extension. Fixed table; unknown
/// extensions fall back to text/plain.
pub fn infer_mime(path: &str) -> &'static str {
    match extension(path).as_deref() {
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") => "image/jpg",
        Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "text/plain",
    }
}

/// Whether a path names a TypeScript/TSX source needing transpilation.
pub fn is_transpiled_source(path: &str) -> bool {
    matches!(extension(path).as_deref(), Some("ts" | "tsx"))
}

/// Whether a path names a script module that gets extension-less import-map
/// aliases.
pub fn is_script_module(path: &str) -> bool {
    matches!(extension(path).as_deref(), Some("js" | "jsx" | "ts" | "tsx"))
}

/// Materializes every file node of a tree exactly once.
pub struct AssetMaterializer<'a> {
    store: &'a dyn BlobStore,
    transpiler: &'a dyn Transpiler,
}

impl<'a> AssetMaterializer<'a> {
    pub fn new(store: &'a dyn BlobStore, transpiler: &'a dyn Transpiler) -> Self {
        Self { store, transpiler }
    }

    /// Produce the blob-URL table for one launch. Every call mints fresh
    /// URLs; nothing is reused from a previous launch.
    pub fn materialize(&self, root: &FileNode) -> AssetTable {
        let mut table = AssetTable::new();
        for node in root.walk().filter(|n| n.is_file()) {
            let key = relative_key(&node.path, &root.path);
            let asset = self.materialize_file(&key, &node.content);
            debug!(path = %key, url = %asset.url, mime = %asset.mime, "materialized");
            table.insert(key, asset);
        }
        table
    }

    fn materialize_file(&self, key: &str, content: &str) -> MaterializedAsset {
        if is_transpiled_source(key) {
            let options = TranspileOptions {
                typescript: true,
                jsx: extension(key).as_deref() == Some("tsx"),
            };
            let script = match self.transpiler.transpile(content, options) {
                Ok(script) => script,
                Err(err) => {
                    warn!(path = key, error = %err, "transpile failed; materializing original source");
                    content.to_string()
                }
            };
            return self.blob(script, "application/javascript");
        }
        self.blob(content.to_string(), infer_mime(key))
    }

    fn blob(&self, text: String, mime: &str) -> MaterializedAsset {
        MaterializedAsset {
            url: self.store.put(text.into_bytes(), mime),
            mime: mime.to_string(),
        }
    }
}

/// Strip the resolved root's path prefix so table keys are root-relative.
pub(crate) fn relative_key(path: &str, root_path: &str) -> String {
    if root_path.is_empty() {
        return path.to_string();
    }
    match path.strip_prefix(root_path) {
        // Only a whole-segment prefix counts: "app" must not strip "app2/x".
        Some(rest) if rest.starts_with('/') => rest[1..].to_string(),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MemoryBlobStore;
    use crate::error::TranspileError;
    use crate::transpile::PassthroughTranspiler;
    use crate::tree::{FileNode, NodeKind};

    struct FailingTranspiler;

    impl Transpiler for FailingTranspiler {
        fn transpile(&self, _source: &str, _options: TranspileOptions) -> Result<String, TranspileError> {
            Err(TranspileError("syntax error".to_string()))
        }
    }

    struct UppercaseTranspiler;

    impl Transpiler for UppercaseTranspiler {
        fn transpile(&self, source: &str, _options: TranspileOptions) -> Result<String, TranspileError> {
            Ok(source.to_ascii_uppercase())
        }
    }

    fn file(name: &str, path: &str, content: &str) -> FileNode {
        FileNode {
            name: name.to_string(),
            path: path.to_string(),
            kind: NodeKind::File,
            content: content.to_string(),
            children: Vec::new(),
        }
    }

    fn root_with(children: Vec<FileNode>, path: &str) -> FileNode {
        FileNode {
            name: "app".to_string(),
            path: path.to_string(),
            kind: NodeKind::Directory,
            content: String::new(),
            children,
        }
    }

    #[test]
    fn mime_table_is_fixed() {
        assert_eq!(infer_mime("index.html"), "text/html");
        assert_eq!(infer_mime("a/b/style.css"), "text/css");
        assert_eq!(infer_mime("app.js"), "application/javascript");
        assert_eq!(infer_mime("package.json"), "application/json");
        assert_eq!(infer_mime("logo.svg"), "image/svg+xml");
        assert_eq!(infer_mime("pic.PNG"), "image/png");
        assert_eq!(infer_mime("photo.jpg"), "image/jpg");
        assert_eq!(infer_mime("photo.jpeg"), "image/jpeg");
        assert_eq!(infer_mime("anim.gif"), "image/gif");
        assert_eq!(infer_mime("README"), "text/plain");
        assert_eq!(infer_mime("notes.md"), "text/plain");
    }

    #[test]
    fn keys_are_root_relative_after_promotion() {
        let root = root_with(
            vec![file("index.html", "app/index.html", "<html></html>")],
            "app",
        );
        let store = MemoryBlobStore::new();
        let table = AssetMaterializer::new(&store, &PassthroughTranspiler).materialize(&root);
        assert!(table.contains_key("index.html"));
        assert!(!table.contains_key("app/index.html"));
    }

    #[test]
    fn typescript_sources_are_transpiled_before_blobbing() {
        let root = root_with(vec![file("main.ts", "main.ts", "let x = 1;")], "");
        let store = MemoryBlobStore::new();
        let table = AssetMaterializer::new(&store, &UppercaseTranspiler).materialize(&root);

        let asset = &table["main.ts"];
        assert_eq!(asset.mime, "application/javascript");
        let (bytes, _) = store.get(&asset.url).unwrap();
        assert_eq!(bytes, b"LET X = 1;");
    }

    #[test]
    fn transpile_failure_degrades_to_original_source() {
        let root = root_with(vec![file("main.tsx", "main.tsx", "<App/>")], "");
        let store = MemoryBlobStore::new();
        let table = AssetMaterializer::new(&store, &FailingTranspiler).materialize(&root);

        let asset = &table["main.tsx"];
        assert_eq!(asset.mime, "application/javascript");
        let (bytes, _) = store.get(&asset.url).unwrap();
        assert_eq!(bytes, b"<App/>");
    }

    #[test]
    fn every_materialization_mints_a_fresh_url() {
        let root = root_with(vec![file("a.js", "a.js", "x")], "");
        let store = MemoryBlobStore::new();
        let materializer = AssetMaterializer::new(&store, &PassthroughTranspiler);
        let first = materializer.materialize(&root);
        let second = materializer.materialize(&root);
        assert_ne!(first["a.js"].url, second["a.js"].url);
    }
}
