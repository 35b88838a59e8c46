//! Rebuilds recommendation embeddings from the guideline graph.
//!
//! Reads every recommendation, embeds `chapter\ncontent` with bounded
//! concurrency, and writes the vectors to the configured backend.

use std::sync::Arc;
use std::time::Instant;

use futures::{StreamExt, stream};
use knowledge_graph::{GraphClient, RecommendationDoc, guideline, vector_index};
use rag_base::GuidelineIndex;
use rag_base::structs::rag_store::{IndexRecord, IndexStats, RecommendationPayload};
use tracing::{info, warn};

use crate::error::AdvisorError;
use crate::sources::{BoxFuture, GuidelineIndexer, TextEmbedder};

/// Destination of the embeddings.
#[derive(Clone)]
pub enum VectorTarget {
    /// `embedding` property + vector index on the guideline graph.
    Neo4j { index: String },
    Qdrant(GuidelineIndex),
}

pub struct Reindexer {
    embedder: Arc<dyn TextEmbedder>,
    graph: GraphClient,
    target: VectorTarget,
    concurrency: usize,
}

impl Reindexer {
    pub fn new(
        embedder: Arc<dyn TextEmbedder>,
        graph: GraphClient,
        target: VectorTarget,
        concurrency: usize,
    ) -> Self {
        Self {
            embedder,
            graph,
            target,
            concurrency: concurrency.max(1),
        }
    }

    async fn run(&self) -> Result<IndexStats, AdvisorError> {
        let started = Instant::now();
        let docs = guideline::all_recommendations(&self.graph).await?;
        info!(docs = docs.len(), "reindex: recommendations loaded");

        let (embedded, skipped) = embed_all(self.embedder.as_ref(), docs, self.concurrency).await?;

        let indexed = match &self.target {
            VectorTarget::Neo4j { index } => {
                if let Some((_, first)) = embedded.first() {
                    vector_index::ensure_vector_index(&self.graph, index, first.len()).await?;
                }
                for (doc, vector) in &embedded {
                    vector_index::store_embedding(&self.graph, &doc.id, vector).await?;
                }
                embedded.len()
            }
            VectorTarget::Qdrant(store) => {
                let records = embedded
                    .into_iter()
                    .map(|(doc, vector)| IndexRecord {
                        payload: RecommendationPayload {
                            id: doc.id,
                            chapter_title: doc.chapter_title,
                            content: doc.content,
                        },
                        vector,
                    })
                    .collect();
                store.load_fresh(records).await?.indexed
            }
        };

        let stats = IndexStats {
            indexed,
            skipped,
            duration_ms: started.elapsed().as_millis(),
        };
        info!(
            indexed = stats.indexed,
            skipped = stats.skipped,
            duration_ms = stats.duration_ms,
            "reindex: finished"
        );
        Ok(stats)
    }
}

impl GuidelineIndexer for Reindexer {
    fn reindex(&self) -> BoxFuture<'_, IndexStats> {
        Box::pin(self.run())
    }
}

/// Embeds every doc with non-blank content, at most `concurrency` requests in flight.
///
/// Returns the embedded docs in input order plus the number of skipped docs.
/// The first embedding failure aborts the whole run.
pub async fn embed_all(
    embedder: &dyn TextEmbedder,
    docs: Vec<RecommendationDoc>,
    concurrency: usize,
) -> Result<(Vec<(RecommendationDoc, Vec<f32>)>, usize), AdvisorError> {
    let total = docs.len();
    let usable: Vec<RecommendationDoc> = docs
        .into_iter()
        .filter(|d| !d.id.trim().is_empty() && !d.content.trim().is_empty())
        .collect();
    let skipped = total - usable.len();
    if skipped > 0 {
        warn!(skipped, "reindex: recommendations without id or content");
    }

    let results: Vec<Result<(RecommendationDoc, Vec<f32>), AdvisorError>> = stream::iter(usable)
        .map(|doc| async move {
            let vector = embedder.embed(&doc.embedding_text()).await?;
            Ok((doc, vector))
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let embedded = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    Ok((embedded, skipped))
}
