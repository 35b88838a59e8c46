//! Configuration layer: reads runtime settings from environment variables
//! and exposes strongly typed configs for Qdrant and search.

use serde::{Deserialize, Serialize};

use crate::errors::rag_base_error::RagBaseError;

/// Qdrant connectivity and collection parameters.
#[derive(Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    /// gRPC URL for Qdrant (e.g., "http://localhost:6334").
    pub url: String,
    /// Optional API key for managed Qdrant.
    pub api_key: Option<String>,
    /// Collection holding recommendation vectors.
    pub collection: String,
    /// Batch size for upserts (vectors + payloads).
    pub batch_size: usize,
}

impl std::fmt::Debug for QdrantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("collection", &self.collection)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            api_key: None,
            collection: "obesity_guideline".to_string(),
            batch_size: 64,
        }
    }
}

/// Search behavior knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of recommendations returned per question.
    pub top_k: usize,
    /// Optional minimum score threshold for results.
    pub min_score: Option<f32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            min_score: None,
        }
    }
}

/// Top-level runtime configuration for the vector store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Embedding vector dimensionality (1536 for `text-embedding-3-small`).
    pub embedding_dim: usize,
    /// Qdrant connectivity & collection settings.
    pub qdrant: QdrantConfig,
    /// Search behavior settings.
    pub search: SearchConfig,
}

impl RagConfig {
    /// Build configuration from environment variables.
    ///
    /// Environment variables used:
    /// - `QDRANT_URL` (default: "http://localhost:6334")
    /// - `QDRANT_API_KEY` (optional)
    /// - `QDRANT_COLLECTION` (default: "obesity_guideline")
    /// - `QDRANT_BATCH_SIZE` (default: 64)
    /// - `EMBEDDING_DIM` (default: 1536)
    /// - `RAG_TOP_K` (default: 3)
    /// - `RAG_MIN_SCORE` (optional)
    pub fn from_env() -> Result<Self, RagBaseError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RagConfig::from_env`] with an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RagBaseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = QdrantConfig::default();
        let text = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let qdrant = QdrantConfig {
            url: text("QDRANT_URL").unwrap_or(defaults.url),
            api_key: text("QDRANT_API_KEY"),
            collection: text("QDRANT_COLLECTION").unwrap_or(defaults.collection),
            batch_size: parse_opt(&lookup, "QDRANT_BATCH_SIZE")?.unwrap_or(defaults.batch_size),
        };

        let search = SearchConfig {
            top_k: parse_opt(&lookup, "RAG_TOP_K")?.unwrap_or(3),
            min_score: parse_opt(&lookup, "RAG_MIN_SCORE")?,
        };

        let embedding_dim = parse_opt(&lookup, "EMBEDDING_DIM")?.unwrap_or(1536);

        // Basic validations
        if embedding_dim == 0 {
            return Err(RagBaseError::InvalidConfig(
                "EMBEDDING_DIM must be > 0".into(),
            ));
        }
        if search.top_k == 0 {
            return Err(RagBaseError::InvalidConfig("RAG_TOP_K must be > 0".into()));
        }
        if qdrant.batch_size == 0 {
            return Err(RagBaseError::InvalidConfig(
                "QDRANT_BATCH_SIZE must be > 0".into(),
            ));
        }

        Ok(Self {
            embedding_dim,
            qdrant,
            search,
        })
    }
}

/// Parse an optional value; unset or blank → `None`.
fn parse_opt<T, F>(lookup: &F, key: &str) -> Result<Option<T>, RagBaseError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) if !v.trim().is_empty() => {
            v.trim()
                .parse::<T>()
                .map(Some)
                .map_err(|_| RagBaseError::EnvParse {
                    key: key.into(),
                    value: v,
                })
        }
        _ => Ok(None),
    }
}
