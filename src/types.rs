//! Core types shared across the loader pipeline.

/// BlobUrl: Dereferenceable, process-local handle for in-memory byte content.
pub type BlobUrl = String;

/// Sandbox capabilities granted to the rendering surface that loads a
/// launched simulation. Fixed set; nothing else is ever granted.
pub const SANDBOX_CAPABILITIES: &[&str] = &["allow-scripts", "allow-forms", "allow-same-origin"];
