//! Public API:
//! - [`GuidelineIndex::search`]: vector search (top-k) over recommendation embeddings.
//! - [`GuidelineIndex::load_fresh`]: drop+create the collection and write records in batches.

pub mod errors;
pub mod structs;
mod vector_db;

use std::time::Instant;

use qdrant_client::Qdrant;
use tracing::{debug, info};

use errors::rag_base_error::RagBaseError;
use structs::rag_base_config::RagConfig;
use structs::rag_store::{IndexRecord, IndexStats, SearchHit};

/// Handle to the recommendation collection. Cheap to clone.
#[derive(Clone)]
pub struct GuidelineIndex {
    cfg: RagConfig,
    client: Qdrant,
}

impl GuidelineIndex {
    /// Builds the gRPC client; no request is sent until the first call.
    pub fn connect(cfg: RagConfig) -> Result<Self, RagBaseError> {
        let client = vector_db::connect(&cfg)?;
        info!(
            target: "rag_base::index",
            url = %cfg.qdrant.url,
            collection = %cfg.qdrant.collection,
            "qdrant client ready"
        );
        Ok(Self { cfg, client })
    }

    /// Top-k nearest recommendations for an already embedded question.
    ///
    /// `k = None` uses `RAG_TOP_K`.
    pub async fn search(
        &self,
        query_vec: Vec<f32>,
        k: Option<usize>,
    ) -> Result<Vec<SearchHit>, RagBaseError> {
        let want = k.unwrap_or(self.cfg.search.top_k);
        let hits = vector_db::search_top_k(&self.client, &self.cfg, query_vec, want).await?;
        debug!(
            target: "rag_base::search",
            want,
            hits = hits.len(),
            "search completed"
        );
        Ok(hits)
    }

    /// Drops and recreates the collection, then upserts `records` in batches.
    pub async fn load_fresh(&self, records: Vec<IndexRecord>) -> Result<IndexStats, RagBaseError> {
        let started = Instant::now();
        info!(
            target: "rag_base::index",
            collection = %self.cfg.qdrant.collection,
            records = records.len(),
            "load_fresh: start"
        );

        vector_db::reset_collection(&self.client, &self.cfg).await?;

        let mut indexed = 0usize;
        let mut batch = Vec::with_capacity(self.cfg.qdrant.batch_size);
        for rec in records {
            batch.push(rec);
            if batch.len() == self.cfg.qdrant.batch_size {
                indexed += vector_db::upsert_batch(&self.client, &self.cfg, std::mem::take(&mut batch))
                    .await?;
            }
        }
        indexed += vector_db::upsert_batch(&self.client, &self.cfg, batch).await?;

        let stats = IndexStats {
            indexed,
            skipped: 0,
            duration_ms: started.elapsed().as_millis(),
        };
        info!(
            target: "rag_base::index",
            indexed = stats.indexed,
            duration_ms = stats.duration_ms,
            "load_fresh: finished"
        );
        Ok(stats)
    }
}
