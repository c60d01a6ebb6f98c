//! CLI Tooling
//!
//! Command-line interface for the loader pipeline: build and inspect project
//! trees, launch sandboxed previews, and request hosted simulations.

use crate::blob::MemoryBlobStore;
use crate::config::LoaderConfig;
use crate::error::{LaunchError, SandcastError};
use crate::launcher::Launcher;
use crate::logging::init_logging;
use crate::provider::{build_file_context, HttpProvider, SimulationProvider};
use crate::source::WalkdirSource;
use crate::transpile::PassthroughTranspiler;
use crate::tree::{BuiltTree, FileNode, TreeBuilder};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Sandcast CLI - load a local project and launch it as a sandboxed preview
#[derive(Parser)]
#[command(name = "sandcast")]
#[command(about = "In-memory project loading and sandboxed preview launching")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build and print the project file tree
    Tree {
        /// Project folder to load
        folder: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Launch the project and write the rewritten entry document
    Launch {
        /// Project folder to load
        folder: PathBuf,
        /// File to write the rewritten entry document to
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Ask the hosted provider to simulate the project
    Simulate {
        /// Project folder to use as file context
        folder: PathBuf,
        /// Prompt sent alongside the file context
        #[arg(long, default_value = "")]
        prompt: String,
    },
}

/// Execution context carrying config and the async runtime.
pub struct CliContext {
    config: LoaderConfig,
    runtime: tokio::runtime::Runtime,
}

impl CliContext {
    pub fn new(cli: &Cli) -> Result<Self, SandcastError> {
        let config = LoaderConfig::load(cli.config.as_deref())
            .map_err(|e| SandcastError::Config(e.to_string()))?;

        let mut logging = config.logging.clone();
        if let Some(level) = &cli.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &cli.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &cli.log_output {
            logging.output = output.clone();
        }
        init_logging(&logging)?;

        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| SandcastError::Config(format!("failed to start runtime: {e}")))?;
        Ok(Self { config, runtime })
    }

    pub fn execute(&self, command: &Commands) -> Result<String, SandcastError> {
        match command {
            Commands::Tree { folder, format } => self.run_tree(folder, format),
            Commands::Launch { folder, out } => self.run_launch(folder, out.as_deref()),
            Commands::Simulate { folder, prompt } => self.run_simulate(folder, prompt),
        }
    }

    fn build_tree(&self, folder: &Path) -> Result<BuiltTree, SandcastError> {
        let name = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string());
        let source = WalkdirSource::new(folder);
        let builder = TreeBuilder::new(&source, &self.config);
        let built = self.runtime.block_on(builder.build(&name))?;
        if !built.skipped.is_empty() {
            warn!(count = built.skipped.len(), "some files could not be read and were skipped");
        }
        Ok(built)
    }

    fn run_tree(&self, folder: &Path, format: &str) -> Result<String, SandcastError> {
        let built = self.build_tree(folder)?;
        let mut output = match format {
            "json" => serde_json::to_string_pretty(&built.root)
                .map_err(|e| SandcastError::Config(e.to_string()))?,
            _ => {
                let mut text = String::new();
                render_tree(&built.root, 0, &mut text);
                text
            }
        };
        if !built.skipped.is_empty() {
            output.push_str(&format!("\nskipped {} unreadable file(s)\n", built.skipped.len()));
        }
        Ok(output)
    }

    fn run_launch(&self, folder: &Path, out: Option<&Path>) -> Result<String, SandcastError> {
        let built = self.build_tree(folder)?;

        let store = Arc::new(MemoryBlobStore::new());
        let launcher = Launcher::new(store.clone(), Arc::new(PassthroughTranspiler));
        let simulation = launcher.launch(&built.root)?;

        let mut summary = format!(
            "launched {} ({} blob urls)\nentry: {}\nsandbox: {}\n",
            built.root.name,
            simulation.owned_url_count(),
            simulation.url(),
            simulation.sandbox_capabilities().join(" "),
        );

        if let Some(path) = out {
            let (bytes, _) = store.get(simulation.url()).ok_or_else(|| {
                SandcastError::Launch(LaunchError::HtmlProcessing(
                    "entry document vanished from the blob store".to_string(),
                ))
            })?;
            std::fs::write(path, bytes)
                .map_err(|e| SandcastError::Config(format!("failed to write output: {e}")))?;
            summary.push_str(&format!("wrote {}\n", path.display()));
        }

        info!(folder = %folder.display(), "launch complete");
        simulation.close();
        Ok(summary)
    }

    fn run_simulate(&self, folder: &Path, prompt: &str) -> Result<String, SandcastError> {
        let settings = self
            .config
            .provider
            .clone()
            .ok_or(SandcastError::Provider(crate::error::ProviderError::NotConfigured))?;
        let built = self.build_tree(folder)?;
        let context = build_file_context(&built.root, &self.config)?;

        let provider = HttpProvider::new(settings);
        let prompt = if prompt.is_empty() {
            format!("Folder: {}", built.root.name)
        } else {
            prompt.to_string()
        };
        let app = self
            .runtime
            .block_on(provider.generate(&prompt, Some(&context)))?;

        serde_json::to_string_pretty(&app).map_err(|e| SandcastError::Config(e.to_string()))
    }
}

fn render_tree(node: &FileNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    if node.is_directory() {
        out.push_str(&format!("{indent}{}/\n", node.name));
        for child in &node.children {
            render_tree(child, depth + 1, out);
        }
    } else {
        out.push_str(&format!("{indent}{}\n", node.name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;

    #[test]
    fn tree_rendering_indents_by_depth() {
        let root = FileNode {
            name: "app".to_string(),
            path: String::new(),
            kind: NodeKind::Directory,
            content: String::new(),
            children: vec![
                FileNode {
                    name: "src".to_string(),
                    path: "src".to_string(),
                    kind: NodeKind::Directory,
                    content: String::new(),
                    children: vec![FileNode {
                        name: "main.ts".to_string(),
                        path: "src/main.ts".to_string(),
                        kind: NodeKind::File,
                        content: String::new(),
                        children: Vec::new(),
                    }],
                },
                FileNode {
                    name: "index.html".to_string(),
                    path: "index.html".to_string(),
                    kind: NodeKind::File,
                    content: String::new(),
                    children: Vec::new(),
                },
            ],
        };
        let mut out = String::new();
        render_tree(&root, 0, &mut out);
        assert_eq!(out, "app/\n  src/\n    main.ts\n  index.html\n");
    }
}
