//! Guideline-grounded diet advice.
//!
//! Public API: [`NutritionAdvisor::ask`]. It finds the guideline
//! recommendations closest to the question, reads their evidence from the
//! guideline graph, derives nutrient limits from that evidence, searches the
//! recipe graph under those limits, builds the dietitian prompt, and returns
//! the model answer together with everything that went into it.
//!
//! [`Backends::connect`] wires the production handles; tests build a
//! [`NutritionAdvisor`] from in-memory fakes through the [`sources`] traits.

pub mod adapters;
mod advisor;
mod api_types;
pub mod cfg;
mod error;
pub mod prompt;
pub mod reindex;
pub mod sources;
pub mod thresholds;

use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use knowledge_graph::GraphClient;
use knowledge_graph::config::{GUIDELINE_PREFIX, GraphConfig, RECIPE_PREFIX};
use rag_base::GuidelineIndex;
use rag_base::structs::rag_base_config::RagConfig;
use tracing::info;

pub use advisor::{FAILURE_PREFIX, NutritionAdvisor};
pub use api_types::Advice;
pub use cfg::{AdvisorConfig, VectorBackend};
pub use error::AdvisorError;
pub use reindex::{Reindexer, VectorTarget};

use adapters::{GuidelineGraph, Neo4jVectorRetriever, QdrantRetriever, RecipeGraph};
use sources::{GuidelineRetriever, TextEmbedder};

/// Live handles for both graphs, the vector store and the LLM profiles.
///
/// Built once at startup; clones share the underlying pools.
#[derive(Clone)]
pub struct Backends {
    pub cfg: AdvisorConfig,
    pub llm: Arc<LlmServiceProfiles>,
    pub guideline_graph: GraphClient,
    pub recipe_graph: GraphClient,
    pub target: VectorTarget,
}

impl Backends {
    /// Connects both Neo4j databases (in parallel) and, with the Qdrant
    /// backend, builds the Qdrant client.
    ///
    /// # Errors
    /// Missing `GUIDELINE_*` / `RECIPE_*` settings, unreachable databases, or
    /// invalid Qdrant settings.
    pub async fn connect(
        cfg: AdvisorConfig,
        llm: Arc<LlmServiceProfiles>,
    ) -> Result<Self, AdvisorError> {
        let guideline_cfg = GraphConfig::from_env(GUIDELINE_PREFIX)?;
        let recipe_cfg = GraphConfig::from_env(RECIPE_PREFIX)?;

        let (guideline_graph, recipe_graph) = tokio::try_join!(
            GraphClient::connect(&guideline_cfg),
            GraphClient::connect(&recipe_cfg),
        )?;

        let target = match cfg.backend {
            VectorBackend::Neo4j => VectorTarget::Neo4j {
                index: cfg.vector_index.clone(),
            },
            VectorBackend::Qdrant => {
                VectorTarget::Qdrant(GuidelineIndex::connect(RagConfig::from_env()?)?)
            }
        };

        info!(
            guideline_db = guideline_graph.database(),
            recipe_db = recipe_graph.database(),
            backend = cfg.backend.as_str(),
            "advisor backends connected"
        );

        Ok(Self {
            cfg,
            llm,
            guideline_graph,
            recipe_graph,
            target,
        })
    }

    fn embedder(&self) -> Arc<dyn TextEmbedder> {
        self.llm.clone()
    }

    /// Pipeline over these handles.
    pub fn advisor(&self) -> NutritionAdvisor {
        let retriever: Arc<dyn GuidelineRetriever> = match &self.target {
            VectorTarget::Neo4j { index } => Arc::new(Neo4jVectorRetriever::new(
                self.embedder(),
                self.guideline_graph.clone(),
                index.clone(),
            )),
            VectorTarget::Qdrant(store) => {
                Arc::new(QdrantRetriever::new(self.embedder(), store.clone()))
            }
        };

        NutritionAdvisor::new(
            retriever,
            Arc::new(GuidelineGraph(self.guideline_graph.clone())),
            Arc::new(RecipeGraph(self.recipe_graph.clone())),
            self.llm.clone(),
            self.cfg.top_k,
        )
    }

    /// Reindexer writing into the configured backend.
    pub fn reindexer(&self) -> Reindexer {
        Reindexer::new(
            self.embedder(),
            self.guideline_graph.clone(),
            self.target.clone(),
            self.cfg.reindex_concurrency,
        )
    }
}
