//! Typed error for the diet-advisor crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisorError {
    /// Neo4j failures (guideline or recipe database, vector index).
    #[error("graph error: {0}")]
    Graph(#[from] knowledge_graph::GraphError),

    /// Qdrant failures.
    #[error("vector store error: {0}")]
    VectorStore(#[from] rag_base::errors::rag_base_error::RagBaseError),

    /// Chat completion or embedding failures.
    #[error("LLM error: {0}")]
    Llm(#[from] ai_llm_service::AiLlmError),

    /// Settings that cannot work together.
    #[error("invalid configuration: {0}")]
    Config(String),
}
