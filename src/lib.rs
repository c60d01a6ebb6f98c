//! Sandcast: In-Memory Project Loading and Sandboxed Preview Launching
//!
//! Loads a user-selected project folder into an immutable in-memory file tree,
//! materializes every file as a URL-addressable blob, synthesizes an import map
//! for its ES modules, rewrites the `index.html` entry point, and exposes the
//! result as one revocable URL for a sandboxed rendering surface.

pub mod assets;
pub mod blob;
pub mod config;
pub mod error;
pub mod html;
pub mod importmap;
pub mod launcher;
pub mod logging;
pub mod provider;
pub mod source;
pub mod tooling;
pub mod transpile;
pub mod tree;
pub mod types;
