use diet_advisor::Advice;
use knowledge_graph::{GuidelineRow, NutrientLimits, RecipeRow};
use serde::{Deserialize, Serialize};

/// Request body for `POST /api/ask`.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Response payload for `POST /api/ask`.
///
/// A failed pipeline still answers 200: `answer` then holds the warning text
/// and `failed` is `true`.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub failed: bool,
    pub doc_ids: Vec<String>,
    pub guidelines: Vec<GuidelineRow>,
    pub recipes: Vec<RecipeRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<NutrientLimits>,
}

impl AskResponse {
    pub fn failed(notice: String) -> Self {
        Self {
            answer: notice,
            failed: true,
            doc_ids: Vec::new(),
            guidelines: Vec::new(),
            recipes: Vec::new(),
            limits: None,
        }
    }
}

impl From<Advice> for AskResponse {
    fn from(a: Advice) -> Self {
        Self {
            answer: a.answer,
            failed: false,
            doc_ids: a.doc_ids,
            guidelines: a.guidelines,
            recipes: a.recipes,
            limits: Some(a.limits),
        }
    }
}
