//! Seams between the advice pipeline and its backends.
//!
//! Each trait returns a boxed future so the advisor can hold the
//! implementations as `Arc<dyn ...>` and tests can swap in fakes.

use std::future::Future;
use std::pin::Pin;

use knowledge_graph::{GuidelineRow, NutrientLimits, RecipeRow};
use rag_base::structs::rag_store::IndexStats;

use crate::error::AdvisorError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, AdvisorError>> + Send + 'a>>;

/// Turns text into an embedding vector.
pub trait TextEmbedder: Send + Sync {
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Vec<f32>>;
}

/// Finds the recommendation ids most similar to a question.
pub trait GuidelineRetriever: Send + Sync {
    /// Returns at most `k` ids, best match first. Hits without an id are dropped.
    fn similar_ids<'a>(&'a self, question: &'a str, k: usize) -> BoxFuture<'a, Vec<String>>;

    /// Short label used in logs and the status endpoint.
    fn backend(&self) -> &'static str;
}

/// Guideline evidence for a set of recommendation ids.
pub trait GuidelineSource: Send + Sync {
    fn recommendations<'a>(&'a self, doc_ids: &'a [String]) -> BoxFuture<'a, Vec<GuidelineRow>>;
}

/// Recipes that satisfy nutrient limits.
pub trait RecipeSource: Send + Sync {
    fn recipes(&self, limits: NutrientLimits) -> BoxFuture<'_, Vec<RecipeRow>>;
}

/// Chat model that turns the final prompt into an answer.
pub trait AnswerModel: Send + Sync {
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, String>;
}

/// Rebuilds the similarity index from the guideline graph.
pub trait GuidelineIndexer: Send + Sync {
    fn reindex(&self) -> BoxFuture<'_, IndexStats>;
}
