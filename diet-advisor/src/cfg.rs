//! Runtime configuration loaded from environment variables.

use knowledge_graph::vector_index::{DEFAULT_INDEX, validate_index_name};

use crate::error::AdvisorError;

/// Where recommendation embeddings live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorBackend {
    /// Vector index on the guideline Neo4j database.
    Neo4j,
    /// Separate Qdrant collection.
    Qdrant,
}

impl VectorBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            VectorBackend::Neo4j => "neo4j",
            VectorBackend::Qdrant => "qdrant",
        }
    }
}

impl std::str::FromStr for VectorBackend {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "neo4j" => Ok(VectorBackend::Neo4j),
            "qdrant" => Ok(VectorBackend::Qdrant),
            other => Err(AdvisorError::Config(format!(
                "VECTOR_BACKEND must be `neo4j` or `qdrant`, got `{other}`"
            ))),
        }
    }
}

/// Config bag for the pipeline. All fields have defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorConfig {
    pub backend: VectorBackend,
    /// Neo4j vector index name (unused with Qdrant).
    pub vector_index: String,
    /// Recommendations fetched per question.
    pub top_k: usize,
    /// Concurrent embedding requests while reindexing.
    pub reindex_concurrency: usize,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            backend: VectorBackend::Neo4j,
            vector_index: DEFAULT_INDEX.to_string(),
            top_k: 3,
            reindex_concurrency: 4,
        }
    }
}

impl AdvisorConfig {
    /// Reads `VECTOR_BACKEND`, `GUIDELINE_VECTOR_INDEX`, `RAG_TOP_K`, `REINDEX_CONCURRENCY`.
    pub fn from_env() -> Result<Self, AdvisorError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AdvisorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match text("VECTOR_BACKEND") {
            Some(v) => v.parse()?,
            None => defaults.backend,
        };
        let vector_index = text("GUIDELINE_VECTOR_INDEX")
            .map(|v| v.trim().to_string())
            .unwrap_or(defaults.vector_index);
        validate_index_name(&vector_index)?;

        let top_k = parse(&text, "RAG_TOP_K", defaults.top_k)?;
        let reindex_concurrency = parse(&text, "REINDEX_CONCURRENCY", defaults.reindex_concurrency)?;

        Ok(Self {
            backend,
            vector_index,
            top_k,
            reindex_concurrency,
        })
    }
}

/// Positive integer or `default` when unset.
fn parse<F>(text: &F, key: &str, default: usize) -> Result<usize, AdvisorError>
where
    F: Fn(&str) -> Option<String>,
{
    match text(key) {
        None => Ok(default),
        Some(v) => match v.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(AdvisorError::Config(format!(
                "{key} must be a positive integer, got `{v}`"
            ))),
        },
    }
}
