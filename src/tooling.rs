//! Tooling & Integration Layer
//!
//! CLI access to the loader pipeline: building trees, launching previews,
//! and calling the hosted provider from the command line.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
