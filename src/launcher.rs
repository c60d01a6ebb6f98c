//! Simulation launching and lifecycle
//!
//! Orchestrates one launch: resolve the entry point, materialize every file,
//! synthesize and merge the import map, rewrite the entry document, and hand
//! back a [`Simulation`] owning every blob URL it created. Closing (or
//! dropping) a simulation revokes all of them; a replaced simulation revokes
//! on drop, so abandoned launches never accumulate URLs.

use crate::assets::AssetMaterializer;
use crate::blob::BlobStore;
use crate::error::LaunchError;
use crate::html;
use crate::importmap;
use crate::transpile::Transpiler;
use crate::tree::{find_entry_point, FileNode};
use crate::types::{BlobUrl, SANDBOX_CAPABILITIES};
use std::sync::Arc;
use tracing::{debug, info};

/// A launched, viewable simulation.
///
/// `url` dereferences to the rewritten entry document; the rendering surface
/// that loads it must be restricted to [`SANDBOX_CAPABILITIES`].
pub struct Simulation {
    url: BlobUrl,
    owned_urls: Vec<BlobUrl>,
    store: Arc<dyn BlobStore>,
    closed: bool,
}

impl Simulation {
    /// URL of the rewritten entry document.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Capabilities the sandboxed rendering surface is granted; nothing else.
    pub fn sandbox_capabilities(&self) -> &'static [&'static str] {
        SANDBOX_CAPABILITIES
    }

    /// Number of blob URLs this simulation owns, entry document included.
    pub fn owned_url_count(&self) -> usize {
        self.owned_urls.len()
    }

    /// Revoke every blob URL owned by this simulation.
    pub fn close(mut self) {
        self.revoke_all();
    }

    fn revoke_all(&mut self) {
        if self.closed {
            return;
        }
        for url in &self.owned_urls {
            self.store.revoke(url);
        }
        debug!(urls = self.owned_urls.len(), "simulation closed; blob urls revoked");
        self.closed = true;
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.revoke_all();
    }
}

/// Launches simulations from loaded project trees.
pub struct Launcher {
    store: Arc<dyn BlobStore>,
    transpiler: Arc<dyn Transpiler>,
}

impl Launcher {
    pub fn new(store: Arc<dyn BlobStore>, transpiler: Arc<dyn Transpiler>) -> Self {
        Self { store, transpiler }
    }

    /// Launch one simulation from a project tree.
    ///
    /// Entry-point absence aborts before anything is materialized; a rewrite
    /// failure revokes every URL created for the launch so no partial
    /// simulation is ever exposed.
    pub fn launch(&self, root: &FileNode) -> Result<Simulation, LaunchError> {
        let entry = find_entry_point(root).ok_or(LaunchError::MissingEntryPoint)?;

        let materializer = AssetMaterializer::new(self.store.as_ref(), self.transpiler.as_ref());
        let assets = materializer.materialize(root);

        let existing = importmap::parse_existing(&entry.content);
        let merged = importmap::merge(existing, importmap::synthesize(&assets));

        let final_html = match html::rewrite_entry(&entry.content, &merged, &assets) {
            Ok(html) => html,
            Err(err) => {
                for asset in assets.values() {
                    self.store.revoke(&asset.url);
                }
                return Err(err);
            }
        };

        let entry_url = self.store.put(final_html.into_bytes(), "text/html");
        let mut owned_urls: Vec<BlobUrl> = assets.values().map(|a| a.url.clone()).collect();
        owned_urls.push(entry_url.clone());

        info!(files = assets.len(), url = %entry_url, "simulation launched");
        Ok(Simulation {
            url: entry_url,
            owned_urls,
            store: Arc::clone(&self.store),
            closed: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MemoryBlobStore;
    use crate::transpile::PassthroughTranspiler;
    use crate::tree::{FileNode, NodeKind};

    fn file(name: &str, path: &str, content: &str) -> FileNode {
        FileNode {
            name: name.to_string(),
            path: path.to_string(),
            kind: NodeKind::File,
            content: content.to_string(),
            children: Vec::new(),
        }
    }

    fn root(children: Vec<FileNode>) -> FileNode {
        FileNode {
            name: "app".to_string(),
            path: String::new(),
            kind: NodeKind::Directory,
            content: String::new(),
            children,
        }
    }

    fn launcher() -> (Arc<MemoryBlobStore>, Launcher) {
        let store = Arc::new(MemoryBlobStore::new());
        let launcher = Launcher::new(store.clone(), Arc::new(PassthroughTranspiler));
        (store, launcher)
    }

    #[test]
    fn launch_produces_a_dereferenceable_entry_document() {
        let tree = root(vec![
            file(
                "index.html",
                "index.html",
                r#"<html><head></head><script src="./main.ts"></script></html>"#,
            ),
            file("main.ts", "main.ts", "export {};"),
        ]);
        let (store, launcher) = launcher();
        let sim = launcher.launch(&tree).unwrap();

        let (bytes, mime) = store.get(sim.url()).unwrap();
        assert_eq!(mime, "text/html");
        let html = String::from_utf8(bytes).unwrap();
        assert!(html.contains(r#"<script type="importmap">"#));
        assert!(html.contains(r#"src="blob:mem/"#));
        assert_eq!(
            sim.sandbox_capabilities(),
            &["allow-scripts", "allow-forms", "allow-same-origin"]
        );
    }

    #[test]
    fn missing_entry_point_aborts_with_no_state() {
        let tree = root(vec![file("main.js", "main.js", "x")]);
        let (store, launcher) = launcher();
        let result = launcher.launch(&tree);

        assert!(matches!(result, Err(LaunchError::MissingEntryPoint)));
        assert!(store.is_empty());
    }

    #[test]
    fn closing_revokes_every_owned_url() {
        let tree = root(vec![
            file("index.html", "index.html", "<html><head></head></html>"),
            file("a.js", "a.js", "x"),
            file("style.css", "style.css", "body{}"),
        ]);
        let (store, launcher) = launcher();
        let sim = launcher.launch(&tree).unwrap();
        let url = sim.url().to_string();

        assert_eq!(sim.owned_url_count(), 4);
        assert_eq!(store.len(), 4);
        sim.close();
        assert!(store.is_empty());
        assert!(store.get(&url).is_none());
    }

    #[test]
    fn dropping_a_replaced_simulation_revokes_its_urls() {
        let tree = root(vec![file(
            "index.html",
            "index.html",
            "<html><head></head></html>",
        )]);
        let (store, launcher) = launcher();
        let first = launcher.launch(&tree).unwrap();
        let second = launcher.launch(&tree).unwrap();
        let first_url = first.url().to_string();

        drop(first);
        assert!(store.get(&first_url).is_none());
        assert!(store.get(second.url()).is_some());
    }

    #[test]
    fn author_declared_externals_survive_the_merge() {
        let entry_html = concat!(
            "<html><head>",
            r#"<script type="importmap">{"imports":{"react":"https://esm.sh/react"}}</script>"#,
            "</head></html>",
        );
        let tree = root(vec![file("index.html", "index.html", entry_html)]);
        let (store, launcher) = launcher();
        let sim = launcher.launch(&tree).unwrap();

        let (bytes, _) = store.get(sim.url()).unwrap();
        let html = String::from_utf8(bytes).unwrap();
        assert!(html.contains("https://esm.sh/react"));
    }
}
