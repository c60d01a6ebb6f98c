//! End-to-end pipeline tests: folder on disk → tree → launch → rewritten
//! entry document behind a revocable blob URL.

use sandcast::blob::MemoryBlobStore;
use sandcast::config::LoaderConfig;
use sandcast::error::LaunchError;
use sandcast::launcher::Launcher;
use sandcast::source::WalkdirSource;
use sandcast::transpile::PassthroughTranspiler;
use sandcast::tree::{find_entry_point, TreeBuilder};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn write(dir: &Path, rel: &str, content: &str) {
    let full = dir.join(rel);
    if let Some(parent) = full.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(full, content).unwrap();
}

fn scaffold_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "index.html",
        concat!(
            "<html><head>",
            r#"<script type="importmap">{"imports":{"react":"https://esm.sh/react"}}</script>"#,
            "</head><body>",
            r#"<script type="module" src="./src/main.ts"></script>"#,
            "</body></html>",
        ),
    );
    write(dir.path(), "src/main.ts", "import './util';\nexport {};");
    write(dir.path(), "src/util.ts", "export const u = 1;");
    write(dir.path(), "style.css", "body { margin: 0; }");
    write(dir.path(), "node_modules/react/index.js", "module.exports = {};");
    write(dir.path(), ".env", "SECRET=1");
    dir
}

#[tokio::test]
async fn folder_on_disk_becomes_a_sandboxed_simulation() {
    let dir = scaffold_project();
    let config = LoaderConfig::default();
    let source = WalkdirSource::new(dir.path());
    let built = TreeBuilder::new(&source, &config)
        .build("demo")
        .await
        .unwrap();

    // node_modules and hidden files never reach the tree.
    assert_eq!(built.root.file_count(), 4);
    assert!(built.skipped.is_empty());

    let entry = find_entry_point(&built.root).unwrap();
    assert_eq!(entry.path, "index.html");

    let store = Arc::new(MemoryBlobStore::new());
    let launcher = Launcher::new(store.clone(), Arc::new(PassthroughTranspiler));
    let simulation = launcher.launch(&built.root).unwrap();

    let (bytes, mime) = store.get(simulation.url()).unwrap();
    assert_eq!(mime, "text/html");
    let html = String::from_utf8(bytes).unwrap();

    // The merged import map keeps the author-declared external and adds the
    // local modules under all their specifier forms.
    assert!(html.contains("https://esm.sh/react"));
    for specifier in ["\"src/main.ts\"", "\"./src/main.ts\"", "\"/src/main.ts\"", "\"src/main\""] {
        assert!(html.contains(specifier), "missing specifier {specifier}");
    }

    // The TypeScript entry script now points at a blob URL.
    assert!(!html.contains(r#"src="./src/main.ts""#));
    assert!(html.contains(r#"src="blob:mem/"#));

    assert_eq!(
        simulation.sandbox_capabilities(),
        &["allow-scripts", "allow-forms", "allow-same-origin"]
    );

    // 4 file blobs + the rewritten entry document.
    assert_eq!(store.len(), 5);
    simulation.close();
    assert!(store.is_empty());
}

#[tokio::test]
async fn relaunching_mints_fresh_urls_and_replacement_revokes_old_ones() {
    let dir = scaffold_project();
    let config = LoaderConfig::default();
    let source = WalkdirSource::new(dir.path());
    let built = TreeBuilder::new(&source, &config)
        .build("demo")
        .await
        .unwrap();

    let store = Arc::new(MemoryBlobStore::new());
    let launcher = Launcher::new(store.clone(), Arc::new(PassthroughTranspiler));

    let first = launcher.launch(&built.root).unwrap();
    let first_url = first.url().to_string();
    let second = launcher.launch(&built.root).unwrap();

    assert_ne!(first_url, second.url());
    drop(first);
    assert!(store.get(&first_url).is_none());
    assert!(store.get(second.url()).is_some());
}

#[tokio::test]
async fn project_without_entry_point_cannot_launch() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "main.js", "console.log(1);");
    let config = LoaderConfig::default();
    let source = WalkdirSource::new(dir.path());
    let built = TreeBuilder::new(&source, &config)
        .build("nodoc")
        .await
        .unwrap();

    let store = Arc::new(MemoryBlobStore::new());
    let launcher = Launcher::new(store.clone(), Arc::new(PassthroughTranspiler));
    let result = launcher.launch(&built.root);

    assert!(matches!(result, Err(LaunchError::MissingEntryPoint)));
    assert!(store.is_empty());
}

#[tokio::test]
async fn nested_entry_point_resolves_depth_first() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a/index.html", "<html><head></head></html>");
    write(dir.path(), "b/c/index.html", "<html><head></head></html>");
    let config = LoaderConfig::default();
    let source = WalkdirSource::new(dir.path());
    let built = TreeBuilder::new(&source, &config)
        .build("multi")
        .await
        .unwrap();

    let entry = find_entry_point(&built.root).unwrap();
    assert_eq!(entry.path, "a/index.html");
}
