//! Hosted generation provider
//!
//! Boundary for the simulated-app variant: a prompt plus optional file
//! context goes to a hosted generative API, which returns a structured
//! document describing a mocked interactive UI (title, full code, and a list
//! of typed elements with snippets and explanations).

pub mod client;
pub mod context;

pub use client::HttpProvider;
pub use context::build_file_context;

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// UI element category in a generated simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Button,
    Input,
    Card,
    Layout,
    Logic,
}

/// One interactive element of a generated simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeElement {
    pub id: String,
    pub name: String,
    #[serde(rename = "codeSnippet")]
    pub code_snippet: String,
    pub explanation: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
}

/// Structured document returned by the hosted API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedApp {
    pub title: String,
    #[serde(rename = "fullCode")]
    pub full_code: String,
    pub elements: Vec<CodeElement>,
}

/// Hosted generation collaborator.
#[async_trait]
pub trait SimulationProvider: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        file_context: Option<&str>,
    ) -> Result<GeneratedApp, ProviderError>;
}
