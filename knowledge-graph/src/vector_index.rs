//! Similarity search over recommendation embeddings stored in the guideline graph.
//!
//! Embeddings live on `Recommendation.embedding` and are served by a Neo4j
//! vector index (`db.index.vector.queryNodes`, Neo4j 5.11+).

use neo4rs::query;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{GraphClient, GraphError};

/// Default name of the recommendation vector index.
pub const DEFAULT_INDEX: &str = "recommendation_embeddings";

const SEARCH_QUERY: &str = "
CALL db.index.vector.queryNodes($index, $k, $embedding)
YIELD node, score
WHERE node.id IS NOT NULL
RETURN node.id AS id, score
";

const STORE_EMBEDDING_QUERY: &str = "
MATCH (reco:Recommendation {id: $id})
SET reco.embedding = $embedding
";

/// A recommendation id with its similarity score.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoredId {
    pub id: String,
    pub score: f64,
}

/// Index names are spliced into DDL, so only identifier characters are allowed.
pub fn validate_index_name(name: &str) -> Result<(), GraphError> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    if ok {
        Ok(())
    } else {
        Err(GraphError::InvalidConfig(format!(
            "vector index name '{name}' must be an identifier ([A-Za-z_][A-Za-z0-9_]*)"
        )))
    }
}

fn to_f64(v: &[f32]) -> Vec<f64> {
    v.iter().map(|x| f64::from(*x)).collect()
}

/// Returns the ids of the `k` recommendations closest to `embedding`.
pub async fn search_recommendation_ids(
    client: &GraphClient,
    index: &str,
    embedding: &[f32],
    k: usize,
) -> Result<Vec<ScoredId>, GraphError> {
    let q = query(SEARCH_QUERY)
        .param("index", index)
        .param("k", k as i64)
        .param("embedding", to_f64(embedding));

    let hits: Vec<ScoredId> = client.fetch_all(q, "vector index search").await?;
    debug!(index, k, hits = hits.len(), "vector index search completed");
    Ok(hits)
}

/// Creates the vector index if it does not exist yet.
pub async fn ensure_vector_index(
    client: &GraphClient,
    index: &str,
    dim: usize,
) -> Result<(), GraphError> {
    validate_index_name(index)?;
    let ddl = format!(
        "CREATE VECTOR INDEX {index} IF NOT EXISTS \
         FOR (reco:Recommendation) ON (reco.embedding) \
         OPTIONS {{indexConfig: {{`vector.dimensions`: {dim}, `vector.similarity_function`: 'cosine'}}}}"
    );
    client.run(query(&ddl), "create vector index").await?;
    info!(index, dim, "vector index ensured");
    Ok(())
}

/// Writes the embedding of one recommendation.
pub async fn store_embedding(
    client: &GraphClient,
    id: &str,
    embedding: &[f32],
) -> Result<(), GraphError> {
    let q = query(STORE_EMBEDDING_QUERY)
        .param("id", id)
        .param("embedding", to_f64(embedding));
    client.run(q, "store embedding").await
}
