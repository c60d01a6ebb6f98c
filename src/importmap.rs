//! Import map synthesis and merging
//!
//! Registers every way a module might be referenced (bare relative,
//! dot-relative, root-relative, plus extension-less forms for script modules)
//! against its blob URL, and merges the result with any map the entry
//! document already declares. Locally materialized modules win key
//! collisions.

use crate::assets::{is_script_module, AssetTable};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Specifier → URL mapping, serialized as a single `imports` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportMap {
    #[serde(default)]
    pub imports: BTreeMap<String, String>,
}

impl ImportMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// Serialized form embedded in the entry document.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Build the specifier→URL map for one launch from the blob-URL table.
pub fn synthesize(assets: &AssetTable) -> ImportMap {
    let mut imports = BTreeMap::new();
    for (path, asset) in assets {
        for specifier in specifier_aliases(path) {
            imports.insert(specifier, asset.url.clone());
        }
    }
    ImportMap { imports }
}

/// The three specifier forms for a path, plus the extension-less trio for
/// script modules.
fn specifier_aliases(path: &str) -> Vec<String> {
    let mut aliases = prefixed_forms(path);
    if is_script_module(path) {
        if let Some((stem, _)) = path.rsplit_once('.') {
            aliases.extend(prefixed_forms(stem));
        }
    }
    aliases
}

fn prefixed_forms(path: &str) -> Vec<String> {
    vec![path.to_string(), format!("./{path}"), format!("/{path}")]
}

/// Parse any `<script type="importmap">` block out of the entry HTML.
/// Parse failure is non-fatal: logged and treated as an empty map.
pub fn parse_existing(html: &str) -> ImportMap {
    let Some(raw) = extract_importmap_json(html) else {
        return ImportMap::default();
    };
    match serde_json::from_str::<ImportMap>(raw) {
        Ok(map) => map,
        Err(err) => {
            warn!(error = %err, "ignoring unparseable import map in entry document");
            ImportMap::default()
        }
    }
}

/// Merge an author-declared map with the synthesized one; synthesized
/// entries override on key collision.
pub fn merge(existing: ImportMap, synthesized: ImportMap) -> ImportMap {
    let mut imports = existing.imports;
    imports.extend(synthesized.imports);
    ImportMap { imports }
}

pub(crate) fn importmap_block_pattern() -> Regex {
    Regex::new(r#"(?is)<script\s+type=["']importmap["']\s*>(.*?)</script>"#)
        .expect("static pattern compiles")
}

fn extract_importmap_json(html: &str) -> Option<&str> {
    importmap_block_pattern()
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
