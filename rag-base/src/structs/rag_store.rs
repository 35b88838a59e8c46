//! Data types for vector-store interaction: payload shapes, search hits,
//! and indexing statistics.

use serde::{Deserialize, Serialize};

/// Payload stored alongside each recommendation vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationPayload {
    pub id: String,            // recommendation id in the guideline graph
    pub chapter_title: Option<String>, // for previews only
    pub content: String,       // recommendation text
}

/// A recommendation ready to be written: payload plus its embedding.
#[derive(Debug, Clone)]
pub struct IndexRecord {
    pub payload: RecommendationPayload,
    pub vector: Vec<f32>,
}

/// A single semantic search hit (ranked by similarity).
///
/// `id` is `None` when the stored payload carries no `id` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub score: f32,
    pub id: Option<String>,
}

/// Summary statistics for a full reindex operation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IndexStats {
    pub indexed: usize,
    pub skipped: usize,
    pub duration_ms: u128,
}
