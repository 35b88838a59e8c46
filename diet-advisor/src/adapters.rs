//! Concrete backends behind the pipeline traits.

use std::sync::Arc;
use std::time::Instant;

use ai_llm_service::LlmServiceProfiles;
use knowledge_graph::{
    GraphClient, GuidelineRow, NutrientLimits, RecipeRow, guideline, recipe, vector_index,
};
use rag_base::GuidelineIndex;
use rag_base::structs::rag_store::SearchHit;
use tracing::debug;

use crate::sources::{
    AnswerModel, BoxFuture, GuidelineRetriever, GuidelineSource, RecipeSource, TextEmbedder,
};

impl TextEmbedder for LlmServiceProfiles {
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Vec<f32>> {
        Box::pin(async move { Ok(LlmServiceProfiles::embed(self, text).await?) })
    }
}

impl AnswerModel for LlmServiceProfiles {
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, String> {
        Box::pin(async move {
            let started = Instant::now();
            let answer = self.generate(prompt, None).await?;
            debug!(
                latency_ms = started.elapsed().as_millis() as u64,
                chars = answer.chars().count(),
                "chat completion finished"
            );
            Ok(answer)
        })
    }
}

/// Similarity search through the vector index of the guideline graph.
pub struct Neo4jVectorRetriever {
    embedder: Arc<dyn TextEmbedder>,
    graph: GraphClient,
    index: String,
}

impl Neo4jVectorRetriever {
    pub fn new(embedder: Arc<dyn TextEmbedder>, graph: GraphClient, index: impl Into<String>) -> Self {
        Self {
            embedder,
            graph,
            index: index.into(),
        }
    }
}

impl GuidelineRetriever for Neo4jVectorRetriever {
    fn similar_ids<'a>(&'a self, question: &'a str, k: usize) -> BoxFuture<'a, Vec<String>> {
        Box::pin(async move {
            let vector = self.embedder.embed(question).await?;
            let hits =
                vector_index::search_recommendation_ids(&self.graph, &self.index, &vector, k)
                    .await?;
            Ok(hits.into_iter().map(|h| h.id).collect())
        })
    }

    fn backend(&self) -> &'static str {
        "neo4j"
    }
}

/// Similarity search through the Qdrant collection.
pub struct QdrantRetriever {
    embedder: Arc<dyn TextEmbedder>,
    index: GuidelineIndex,
}

impl QdrantRetriever {
    pub fn new(embedder: Arc<dyn TextEmbedder>, index: GuidelineIndex) -> Self {
        Self { embedder, index }
    }
}

impl GuidelineRetriever for QdrantRetriever {
    fn similar_ids<'a>(&'a self, question: &'a str, k: usize) -> BoxFuture<'a, Vec<String>> {
        Box::pin(async move {
            let vector = self.embedder.embed(question).await?;
            let hits = self.index.search(vector, Some(k)).await?;
            Ok(recommendation_ids(hits))
        })
    }

    fn backend(&self) -> &'static str {
        "qdrant"
    }
}

/// Ids of the hits, in rank order; hits without an id are dropped.
pub(crate) fn recommendation_ids(hits: Vec<SearchHit>) -> Vec<String> {
    let total = hits.len();
    let ids: Vec<String> = hits.into_iter().filter_map(|h| h.id).collect();
    if ids.len() < total {
        debug!(dropped = total - ids.len(), "hits without recommendation id");
    }
    ids
}

/// Guideline database.
#[derive(Clone)]
pub struct GuidelineGraph(pub GraphClient);

impl GuidelineSource for GuidelineGraph {
    fn recommendations<'a>(&'a self, doc_ids: &'a [String]) -> BoxFuture<'a, Vec<GuidelineRow>> {
        Box::pin(async move { Ok(guideline::fetch_recommendations(&self.0, doc_ids).await?) })
    }
}

/// Recipe database.
#[derive(Clone)]
pub struct RecipeGraph(pub GraphClient);

impl RecipeSource for RecipeGraph {
    fn recipes(&self, limits: NutrientLimits) -> BoxFuture<'_, Vec<RecipeRow>> {
        Box::pin(async move { Ok(recipe::find_recipes(&self.0, limits).await?) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(score: f32, id: Option<&str>) -> SearchHit {
        SearchHit {
            score,
            id: id.map(str::to_string),
        }
    }

    #[test]
    fn hits_without_id_are_dropped_in_rank_order() {
        let ids = recommendation_ids(vec![
            hit(0.93, Some("R-2-1")),
            hit(0.88, None),
            hit(0.71, Some("R-5-3")),
        ]);
        assert_eq!(ids, vec!["R-2-1", "R-5-3"]);
    }

    #[test]
    fn no_ids_means_empty_list() {
        assert!(recommendation_ids(vec![hit(0.4, None)]).is_empty());
        assert!(recommendation_ids(Vec::new()).is_empty());
    }
}
