//! The advice pipeline: retrieve, ground, limit, search recipes, prompt, answer.

use std::sync::Arc;
use std::time::Instant;

use knowledge_graph::guideline::joined_content;
use tracing::{debug, info, warn};

use crate::api_types::Advice;
use crate::error::AdvisorError;
use crate::prompt;
use crate::sources::{AnswerModel, GuidelineRetriever, GuidelineSource, RecipeSource};
use crate::thresholds::derive_limits;

/// Prefix of the answer text when the pipeline fails.
pub const FAILURE_PREFIX: &str = "⚠️ 오류 발생: ";

/// Text shown in place of an answer after a failure.
fn failure_notice(err: &AdvisorError) -> String {
    format!("{FAILURE_PREFIX}{err}")
}

/// Stateless pipeline over shared backend handles. Cheap to clone.
#[derive(Clone)]
pub struct NutritionAdvisor {
    retriever: Arc<dyn GuidelineRetriever>,
    guidelines: Arc<dyn GuidelineSource>,
    recipes: Arc<dyn RecipeSource>,
    model: Arc<dyn AnswerModel>,
    top_k: usize,
}

impl NutritionAdvisor {
    pub fn new(
        retriever: Arc<dyn GuidelineRetriever>,
        guidelines: Arc<dyn GuidelineSource>,
        recipes: Arc<dyn RecipeSource>,
        model: Arc<dyn AnswerModel>,
        top_k: usize,
    ) -> Self {
        Self {
            retriever,
            guidelines,
            recipes,
            model,
            top_k: top_k.max(1),
        }
    }

    pub fn retriever_backend(&self) -> &'static str {
        self.retriever.backend()
    }

    /// Answers one question and returns the evidence fed to the model.
    ///
    /// Steps run strictly in order; the first failure aborts the rest.
    ///
    /// # Errors
    /// Propagates [`AdvisorError`] from the vector store, either graph, or the LLM.
    pub async fn ask(&self, question: &str) -> Result<Advice, AdvisorError> {
        let started = Instant::now();

        let doc_ids = self.retriever.similar_ids(question, self.top_k).await?;
        debug!(backend = self.retriever.backend(), ids = ?doc_ids, "similar recommendations");

        let guidelines = self.guidelines.recommendations(&doc_ids).await?;
        let limits = derive_limits(&joined_content(&guidelines));
        debug!(
            rows = guidelines.len(),
            min_protein = limits.min_protein_g,
            max_sodium = limits.max_sodium_mg,
            max_kcal = limits.max_kcal,
            "guideline evidence"
        );

        let recipes = self.recipes.recipes(limits).await?;

        let context = prompt::knowledge_context(&guidelines, &recipes);
        let answer = self.model.complete(&prompt::render(&context, question)).await?;

        info!(
            doc_ids = doc_ids.len(),
            guidelines = guidelines.len(),
            recipes = recipes.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "advice ready"
        );

        Ok(Advice {
            answer,
            doc_ids,
            guidelines,
            recipes,
            limits,
        })
    }

    /// Like [`Self::ask`], but a failure comes back as the notice text shown
    /// in place of the answer (`⚠️ 오류 발생: {error}`).
    pub async fn ask_or_notice(&self, question: &str) -> Result<Advice, String> {
        self.ask(question).await.map_err(|e| {
            warn!(error = %e, "advice pipeline failed");
            failure_notice(&e)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use knowledge_graph::{GraphError, GuidelineRow, NutrientLimits, RecipeRow};

    use super::*;
    use crate::sources::BoxFuture;

    struct FixedIds(Vec<&'static str>);

    impl GuidelineRetriever for FixedIds {
        fn similar_ids<'a>(&'a self, _q: &'a str, k: usize) -> BoxFuture<'a, Vec<String>> {
            let ids = self.0.iter().take(k).map(|s| s.to_string()).collect();
            Box::pin(async move { Ok(ids) })
        }
        fn backend(&self) -> &'static str {
            "fake"
        }
    }

    struct Rows(Vec<GuidelineRow>, Mutex<Vec<String>>);

    impl GuidelineSource for Rows {
        fn recommendations<'a>(&'a self, ids: &'a [String]) -> BoxFuture<'a, Vec<GuidelineRow>> {
            self.1.lock().unwrap().extend(ids.iter().cloned());
            let rows = self.0.clone();
            Box::pin(async move { Ok(rows) })
        }
    }

    struct Recipes(Vec<RecipeRow>, Mutex<Option<NutrientLimits>>);

    impl RecipeSource for Recipes {
        fn recipes(&self, limits: NutrientLimits) -> BoxFuture<'_, Vec<RecipeRow>> {
            *self.1.lock().unwrap() = Some(limits);
            let rows = self.0.clone();
            Box::pin(async move { Ok(rows) })
        }
    }

    struct BrokenRecipes;

    impl RecipeSource for BrokenRecipes {
        fn recipes(&self, _limits: NutrientLimits) -> BoxFuture<'_, Vec<RecipeRow>> {
            Box::pin(async {
                Err(AdvisorError::Graph(GraphError::InvalidConfig(
                    "recipe db offline".into(),
                )))
            })
        }
    }

    struct EchoModel(Mutex<Option<String>>);

    impl AnswerModel for EchoModel {
        fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, String> {
            *self.0.lock().unwrap() = Some(prompt.to_string());
            Box::pin(async { Ok("두부조림을 드세요.".to_string()) })
        }
    }

    fn guideline_rows() -> Vec<GuidelineRow> {
        vec![
            GuidelineRow {
                chapter_title: Some("노인 비만".into()),
                content: "어르신은 근감소를 막기 위해 단백질을 충분히 섭취한다.".into(),
            },
            GuidelineRow {
                chapter_title: Some("식사 치료".into()),
                content: "저열량 식사를 권고한다.".into(),
            },
        ]
    }

    fn tofu() -> RecipeRow {
        RecipeRow {
            food_title: Some("두부조림".into()),
            recipe_title: Some("저염 두부조림".into()),
            ingredients: vec!["두부".into()],
            kcal: Some(320.0),
            protein: Some(24.0),
            sodium: Some(450.0),
        }
    }

    #[tokio::test]
    async fn ask_runs_the_whole_pipeline() {
        let rows = Arc::new(Rows(guideline_rows(), Mutex::new(vec![])));
        let recipes = Arc::new(Recipes(vec![tofu()], Mutex::new(None)));
        let model = Arc::new(EchoModel(Mutex::new(None)));
        let advisor = NutritionAdvisor::new(
            Arc::new(FixedIds(vec!["R-1", "R-2", "R-3", "R-4"])),
            rows.clone(),
            recipes.clone(),
            model.clone(),
            3,
        );

        let advice = advisor.ask("어르신 단백질 식단").await.unwrap();

        assert_eq!(advice.answer, "두부조림을 드세요.");
        assert_eq!(advice.doc_ids, vec!["R-1", "R-2", "R-3"]);
        assert_eq!(*rows.1.lock().unwrap(), vec!["R-1", "R-2", "R-3"]);

        let expected = NutrientLimits {
            min_protein_g: 20,
            max_sodium_mg: 500,
            max_kcal: 600,
        };
        assert_eq!(advice.limits, expected);
        assert_eq!(*recipes.1.lock().unwrap(), Some(expected));

        let prompt = model.0.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("- 노인 비만: 어르신은"));
        assert!(prompt.contains("- 추천 메뉴: 두부조림"));
        assert!(prompt.ends_with("질문: 어르신 단백질 식단"));
    }

    #[tokio::test]
    async fn no_evidence_still_asks_the_model() {
        let recipes = Arc::new(Recipes(vec![], Mutex::new(None)));
        let model = Arc::new(EchoModel(Mutex::new(None)));
        let advisor = NutritionAdvisor::new(
            Arc::new(FixedIds(vec![])),
            Arc::new(Rows(vec![], Mutex::new(vec![]))),
            recipes.clone(),
            model.clone(),
            3,
        );

        let advice = advisor.ask("아무거나").await.unwrap();
        assert!(advice.guidelines.is_empty());
        assert_eq!(advice.limits, crate::thresholds::RELAXED);
        assert_eq!(*recipes.1.lock().unwrap(), Some(crate::thresholds::RELAXED));

        let prompt = model.0.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("조건에 맞는 레시피를 찾지 못했습니다."));
    }

    #[tokio::test]
    async fn failures_become_a_notice() {
        let model = Arc::new(EchoModel(Mutex::new(None)));
        let advisor = NutritionAdvisor::new(
            Arc::new(FixedIds(vec!["R-1"])),
            Arc::new(Rows(guideline_rows(), Mutex::new(vec![]))),
            Arc::new(BrokenRecipes),
            model.clone(),
            3,
        );

        let text = advisor.ask_or_notice("질문").await.unwrap_err();
        assert!(text.starts_with(FAILURE_PREFIX));
        assert!(text.contains("recipe db offline"));
        assert!(model.0.lock().unwrap().is_none(), "model must not be called");
    }
}
