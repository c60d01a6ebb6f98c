//! Error taxonomy for the loader pipeline.
//!
//! Failures are caught at the operation boundary that can still make local
//! progress: per-file read failures and transpile failures degrade and
//! continue, while entry-point absence and HTML rewriting failures abort the
//! launch with no partial state exposed. Nothing is retried automatically.

use thiserror::Error;

/// Errors surfaced while reading from a file source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("source entry not found: {0}")]
    NotFound(String),
}

/// Errors that abort a tree build.
///
/// Individual unreadable files are skipped, not raised; the build only fails
/// outright when listing fails or no compatible file remains.
#[derive(Debug, Error)]
pub enum TreeBuildError {
    #[error("no compatible web files found in the selected folder")]
    NoCompatibleFiles,

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Failure reported by the transpiler collaborator.
#[derive(Debug, Error)]
#[error("transpile failed: {0}")]
pub struct TranspileError(pub String);

/// Errors that abort a simulation launch.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// No `index.html` anywhere in the project tree.
    #[error("no index.html entry point found in the project")]
    MissingEntryPoint,

    /// Unexpected failure while rewriting the entry document. Any blob URLs
    /// already created for the launch are revoked before this is returned.
    #[error("failed to rewrite entry document: {0}")]
    HtmlProcessing(String),
}

/// Errors from the hosted generation provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned an undecodable document: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no provider endpoint configured")]
    NotConfigured,

    #[error("api key environment variable {0} is not set")]
    MissingApiKey(String),

    #[error("no compatible web files found to build a file context")]
    EmptyContext,
}

/// Top-level error for the CLI and embedding hosts.
#[derive(Debug, Error)]
pub enum SandcastError {
    #[error(transparent)]
    Tree(#[from] TreeBuildError),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("configuration error: {0}")]
    Config(String),
}
