//! Loader configuration.
//!
//! Serde-backed settings with defaults matching the interactive tool's
//! behavior, loaded from an optional file plus `SANDCAST_`-prefixed
//! environment overrides.

use crate::logging::LoggingConfig;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for tree building, launching and the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Directory names excluded before tree construction.
    #[serde(default = "default_excluded_dirs")]
    pub excluded_dirs: Vec<String>,

    /// Exclude dot-prefixed (hidden) path segments (default: true).
    #[serde(default = "default_true")]
    pub exclude_hidden: bool,

    /// Extensions that count as compatible web files. A build aborts only
    /// when zero compatible files remain after reads.
    #[serde(default = "default_compatible_extensions")]
    pub compatible_extensions: Vec<String>,

    /// Per-file byte cap when rendering provider file context.
    #[serde(default = "default_context_file_cap")]
    pub context_file_cap: usize,

    /// Hosted generation provider; None disables the `simulate` path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderSettings>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Hosted generation provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key; sent as a bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

fn default_excluded_dirs() -> Vec<String> {
    vec!["node_modules".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_compatible_extensions() -> Vec<String> {
    ["html", "css", "js", "ts", "jsx", "tsx", "json"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_context_file_cap() -> usize {
    5000
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            excluded_dirs: default_excluded_dirs(),
            exclude_hidden: default_true(),
            compatible_extensions: default_compatible_extensions(),
            context_file_cap: default_context_file_cap(),
            provider: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl LoaderConfig {
    /// Load configuration from an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        match path {
            Some(p) => builder = builder.add_source(File::from(p)),
            None => builder = builder.add_source(File::with_name("sandcast").required(false)),
        }
        builder = builder.add_source(Environment::with_prefix("SANDCAST").separator("__"));
        builder.build()?.try_deserialize()
    }

    /// Whether a relative path is excluded from tree construction because
    /// some segment is an excluded directory name or hidden.
    pub fn is_excluded_path(&self, relative_path: &str) -> bool {
        relative_path.split('/').any(|segment| {
            self.excluded_dirs.iter().any(|d| d == segment)
                || (self.exclude_hidden && segment.starts_with('.'))
        })
    }

    /// Whether a relative path has a compatible web extension.
    pub fn is_compatible_path(&self, relative_path: &str) -> bool {
        match crate::assets::extension(relative_path) {
            Some(ext) => self.compatible_extensions.iter().any(|e| *e == ext),
            None => false,
        }
    }
}
