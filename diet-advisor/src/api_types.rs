//! Public API types re-used by external crates (e.g., the HTTP API layer).

use knowledge_graph::{GuidelineRow, NutrientLimits, RecipeRow};
use serde::Serialize;

/// Final answer together with the evidence that went into the prompt.
///
/// # Example
/// ```
/// use diet_advisor::Advice;
/// use diet_advisor::thresholds::RELAXED;
/// let advice = Advice {
///     answer: "두부조림을 추천합니다.".into(),
///     doc_ids: vec!["R-3-1".into()],
///     guidelines: vec![],
///     recipes: vec![],
///     limits: RELAXED,
/// };
/// assert!(advice.recipes.is_empty());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Advice {
    pub answer: String,
    /// Recommendation ids returned by the similarity search.
    pub doc_ids: Vec<String>,
    pub guidelines: Vec<GuidelineRow>,
    pub recipes: Vec<RecipeRow>,
    pub limits: NutrientLimits,
}
