//! Transpilation collaborator
//!
//! Pure seam from (source text, flags) to executable script text. The real
//! transpiler lives in the host (a browser bundles one); the crate ships an
//! identity implementation for hosts that pre-transpile and for tests.
//! Failure is never fatal to a launch: the materializer falls back to the
//! untranspiled source per its degraded-mode contract.

use crate::error::TranspileError;

/// Flags describing what the source needs lowered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranspileOptions {
    /// Strip TypeScript type annotations.
    pub typescript: bool,
    /// Lower JSX to plain calls.
    pub jsx: bool,
}

/// Source-to-source transpiler collaborator.
pub trait Transpiler: Send + Sync {
    fn transpile(&self, source: &str, options: TranspileOptions) -> Result<String, TranspileError>;
}

/// Identity transpiler: hands sources through unchanged.
pub struct PassthroughTranspiler;

impl Transpiler for PassthroughTranspiler {
    fn transpile(&self, source: &str, _options: TranspileOptions) -> Result<String, TranspileError> {
        Ok(source.to_string())
    }
}
