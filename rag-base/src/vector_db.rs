//! Qdrant vector DB helpers: connection, collection reset, batched upserts,
//! and top-K search using the builder `qdrant_client` API.
//!
//! This module does **not** create embeddings — only DB I/O.
//!
//! ## Public API
//! - [`connect`] → `Qdrant`
//! - [`reset_collection`] → drop+create collection
//! - [`upsert_batch`] → write records
//! - [`search_top_k`] → hits with recommendation ids

use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, ScoredPoint, SearchPointsBuilder,
    UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use serde_json::json;

use crate::errors::rag_base_error::RagBaseError;
use crate::structs::rag_base_config::RagConfig;
use crate::structs::rag_store::{IndexRecord, RecommendationPayload, SearchHit};

/// Establish a gRPC connection to Qdrant using `cfg.qdrant.url`.
///
/// This call **does not** touch any collections.
pub fn connect(cfg: &RagConfig) -> Result<Qdrant, RagBaseError> {
    Qdrant::from_url(&cfg.qdrant.url)
        .api_key(cfg.qdrant.api_key.clone())
        .build()
        .map_err(|e| RagBaseError::Qdrant(format!("client build: {e}")))
}

/// Drop the collection (if present) and create a new one with the configured
/// vector size and cosine distance.
pub async fn reset_collection(client: &Qdrant, cfg: &RagConfig) -> Result<(), RagBaseError> {
    // Best-effort delete: ignore errors (e.g., not found) to keep idempotency.
    let _ = client.delete_collection(&cfg.qdrant.collection).await;

    client
        .create_collection(
            CreateCollectionBuilder::new(&cfg.qdrant.collection).vectors_config(
                VectorParamsBuilder::new(cfg.embedding_dim as u64, Distance::Cosine),
            ),
        )
        .await
        .map_err(|e| RagBaseError::Qdrant(format!("create_collection: {e}")))?;

    Ok(())
}

/// Stable numeric point id for a recommendation id (Qdrant only accepts
/// unsigned integers or UUIDs).
pub(crate) fn point_id(recommendation_id: &str) -> u64 {
    let hash = blake3::hash(recommendation_id.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(head)
}

fn payload_to_qdrant(payload: &RecommendationPayload) -> Result<Payload, RagBaseError> {
    let as_json = json!({
        "id": payload.id,
        "chapter_title": payload.chapter_title,
        "content": payload.content,
    });
    as_json
        .try_into()
        .map_err(|e| RagBaseError::Qdrant(format!("payload convert: {e}")))
}

/// Upsert a batch of records. Returns the number of written points.
///
/// # Errors
/// - `InvalidConfig` if any vector has the wrong dimensionality.
/// - `Qdrant` on transport/server errors.
pub async fn upsert_batch(
    client: &Qdrant,
    cfg: &RagConfig,
    batch: Vec<IndexRecord>,
) -> Result<usize, RagBaseError> {
    if batch.is_empty() {
        return Ok(0);
    }

    let mut points: Vec<PointStruct> = Vec::with_capacity(batch.len());
    for rec in batch {
        if rec.vector.len() != cfg.embedding_dim {
            return Err(RagBaseError::InvalidConfig(format!(
                "vector length {} != EMBEDDING_DIM {} for id {}",
                rec.vector.len(),
                cfg.embedding_dim,
                rec.payload.id
            )));
        }
        let q_payload = payload_to_qdrant(&rec.payload)?;
        points.push(PointStruct::new(point_id(&rec.payload.id), rec.vector, q_payload));
    }

    let written = points.len();
    client
        .upsert_points(UpsertPointsBuilder::new(&cfg.qdrant.collection, points).wait(true))
        .await
        .map_err(|e| RagBaseError::Qdrant(format!("upsert_points: {e}")))?;

    Ok(written)
}

/// Run k-NN search for a query vector and return hits with payload ids.
///
/// # Errors
/// - `InvalidConfig` if the query vector length mismatches `EMBEDDING_DIM`.
/// - `Qdrant` on transport/server errors.
pub async fn search_top_k(
    client: &Qdrant,
    cfg: &RagConfig,
    query_vec: Vec<f32>,
    k: usize,
) -> Result<Vec<SearchHit>, RagBaseError> {
    if query_vec.len() != cfg.embedding_dim {
        return Err(RagBaseError::InvalidConfig(format!(
            "query vector length {} != EMBEDDING_DIM {}",
            query_vec.len(),
            cfg.embedding_dim
        )));
    }

    let mut builder =
        SearchPointsBuilder::new(&cfg.qdrant.collection, query_vec, k as u64).with_payload(true);
    if let Some(t) = cfg.search.min_score {
        builder = builder.score_threshold(t);
    }

    let resp = client
        .search_points(builder)
        .await
        .map_err(|e| RagBaseError::Qdrant(format!("search_points: {e}")))?;

    Ok(resp.result.into_iter().map(map_scored_point_to_hit).collect())
}

/// Map a `ScoredPoint` into our [`SearchHit`]; a payload without a string
/// `id` yields `id = None`.
fn map_scored_point_to_hit(sp: ScoredPoint) -> SearchHit {
    let id = sp
        .payload
        .get("id")
        .and_then(|v| v.clone().into_json().as_str().map(str::to_owned));

    SearchHit { score: sp.score, id }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use qdrant_client::qdrant::Value;

    use super::*;

    fn scored(score: f32, payload: &[(&str, &str)]) -> ScoredPoint {
        ScoredPoint {
            score,
            payload: payload
                .iter()
                .map(|(k, v)| (k.to_string(), Value::from(*v)))
                .collect::<HashMap<_, _>>(),
            ..Default::default()
        }
    }

    #[test]
    fn hit_carries_payload_id() {
        let hit = map_scored_point_to_hit(scored(0.91, &[("id", "R-1"), ("content", "저열량")]));
        assert_eq!(hit.id.as_deref(), Some("R-1"));
        assert_eq!(hit.score, 0.91);
    }

    #[test]
    fn hit_without_id_is_kept_with_none() {
        let hit = map_scored_point_to_hit(scored(0.5, &[("content", "저열량")]));
        assert_eq!(hit.id, None);
        assert_eq!(hit.score, 0.5);
    }

    #[test]
    fn point_ids_are_stable_and_distinct() {
        assert_eq!(point_id("R-1-1"), point_id("R-1-1"));
        assert_ne!(point_id("R-1-1"), point_id("R-1-2"));
    }

    #[test]
    fn payload_converts() {
        let p = payload_to_qdrant(&RecommendationPayload {
            id: "R-3-2".into(),
            chapter_title: Some("식사 치료".into()),
            content: "하루 500kcal 감량".into(),
        });
        assert!(p.is_ok());
    }
}
