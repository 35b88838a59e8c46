//! Unified error type for the rag-base crate.

use thiserror::Error;

/// Errors produced by the guideline vector store.
#[derive(Debug, Error)]
pub enum RagBaseError {
    // ── Configuration / environment ──────────────────────────────────────────
    /// Failed to parse an environment variable into the expected type.
    #[error("failed to parse env variable: {key} = '{value}'")]
    EnvParse { key: String, value: String },

    /// Configuration combination is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Qdrant client / transport ───────────────────────────────────────────
    /// Transport / client error from Qdrant.
    #[error("qdrant error: {0}")]
    Qdrant(String),
}
