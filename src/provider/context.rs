//! File context assembly for provider prompts.

use crate::config::LoaderConfig;
use crate::error::ProviderError;
use crate::tree::FileNode;

/// Render the project tree as `--- FILE: path ---` sections for the provider
/// prompt. Only compatible web files are included, each truncated to the
/// configured per-file cap.
pub fn build_file_context(root: &FileNode, config: &LoaderConfig) -> Result<String, ProviderError> {
    let mut sections = Vec::new();
    for node in root.walk().filter(|n| n.is_file()) {
        if !config.is_compatible_path(&node.path) {
            continue;
        }
        let snippet = truncate(&node.content, config.context_file_cap);
        sections.push(format!("--- FILE: {} ---\n{}", node.path, snippet));
    }
    if sections.is_empty() {
        return Err(ProviderError::EmptyContext);
    }
    Ok(sections.join("\n\n"))
}

/// Truncate to at most `cap` bytes on a char boundary.
fn truncate(content: &str, cap: usize) -> &str {
    if content.len() <= cap {
        return content;
    }
    let mut end = cap;
    while end > 0 && !content.is_char_boundary(end) {
        end -= 1;
    }
    &content[..end]
}
