//! HTTP layer: consultation page, JSON endpoints, error envelope.

use std::sync::Arc;

mod core;
mod error_handler;
mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

pub use crate::core::app_state::{AppConfig, AppState, SystemInfo};
pub use crate::error_handler::AppError;

use crate::middleware_layer::json_extractor::{json_error_mapper, request_id};
use crate::routes::{
    ask::ask_question_route::ask_question, index_page::index_page,
    reindex::reindex_route::reindex_route, status::status_route::status_route,
};

/// Builds the state from the environment, binds `API_ADDRESS` and serves
/// until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let state = Arc::new(AppState::from_env().await?);
    let address = state.config.address.clone();
    let app = build_router(state);

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| AppError::Bind {
            address: address.clone(),
            source,
        })?;
    info!(%address, "http server listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("http server stopped");
    Ok(())
}

/// All routes with the request-id and JSON rejection layers.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/api/ask", post(ask_question))
        .route("/api/status", get(status_route))
        .route("/api/guidelines/reindex", post(reindex_route))
        .layer(middleware::from_fn(json_error_mapper))
        .layer(middleware::from_fn(request_id))
        .with_state(state)
}

/// Resolves on Ctrl+C. If the handler cannot be installed the server runs
/// until killed.
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use ai_llm_service::{LlmModelConfig, LlmServiceProfiles};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use diet_advisor::sources::{
        AnswerModel, BoxFuture, GuidelineIndexer, GuidelineRetriever, GuidelineSource,
        RecipeSource,
    };
    use diet_advisor::{AdvisorError, NutritionAdvisor};
    use knowledge_graph::{GraphError, GuidelineRow, NutrientLimits, RecipeRow};
    use rag_base::structs::rag_store::IndexStats;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::{AppConfig, AppState, Arc, SystemInfo, build_router};

    struct Ids;
    impl GuidelineRetriever for Ids {
        fn similar_ids<'a>(&'a self, _q: &'a str, _k: usize) -> BoxFuture<'a, Vec<String>> {
            Box::pin(async { Ok(vec!["R-5-1".to_string()]) })
        }
        fn backend(&self) -> &'static str {
            "fake"
        }
    }

    struct Guidelines;
    impl GuidelineSource for Guidelines {
        fn recommendations<'a>(&'a self, _ids: &'a [String]) -> BoxFuture<'a, Vec<GuidelineRow>> {
            Box::pin(async {
                Ok(vec![GuidelineRow {
                    chapter_title: Some("노인 비만".into()),
                    content: "어르신은 나트륨 섭취를 줄인다.".into(),
                }])
            })
        }
    }

    struct Recipes {
        fail: bool,
    }
    impl RecipeSource for Recipes {
        fn recipes(&self, _limits: NutrientLimits) -> BoxFuture<'_, Vec<RecipeRow>> {
            let fail = self.fail;
            Box::pin(async move {
                if fail {
                    return Err(AdvisorError::Graph(GraphError::InvalidConfig(
                        "recipe db offline".into(),
                    )));
                }
                Ok(vec![RecipeRow {
                    food_title: Some("미역국".into()),
                    recipe_title: Some("저염 미역국".into()),
                    ingredients: vec!["미역".into()],
                    kcal: Some(120.0),
                    protein: Some(8.0),
                    sodium: Some(420.0),
                }])
            })
        }
    }

    struct Model(Mutex<Vec<String>>);
    impl AnswerModel for Model {
        fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, String> {
            self.0.lock().unwrap().push(prompt.to_string());
            Box::pin(async { Ok("저염 미역국을 추천합니다.".to_string()) })
        }
    }

    struct Indexer;
    impl GuidelineIndexer for Indexer {
        fn reindex(&self) -> BoxFuture<'_, IndexStats> {
            Box::pin(async {
                Ok(IndexStats {
                    indexed: 42,
                    skipped: 1,
                    duration_ms: 7,
                })
            })
        }
    }

    fn unreachable_llm() -> LlmModelConfig {
        LlmModelConfig {
            model: "gpt-4o".into(),
            endpoint: "http://127.0.0.1:9".into(),
            api_key: Some("sk-test".into()),
            max_tokens: None,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(1),
        }
    }

    fn state(recipes_fail: bool) -> Arc<AppState> {
        let advisor = NutritionAdvisor::new(
            Arc::new(Ids),
            Arc::new(Guidelines),
            Arc::new(Recipes { fail: recipes_fail }),
            Arc::new(Model(Mutex::new(Vec::new()))),
            3,
        );
        Arc::new(AppState {
            config: AppConfig {
                address: "127.0.0.1:0".into(),
                credit: Some("연구원 <테스트>".into()),
                source_note: "※ 출처".into(),
                health_timeout_secs: Some(1),
            },
            info: SystemInfo {
                guideline_db: "disease".into(),
                recipe_db: "foodgraph".into(),
                vector_backend: "fake",
            },
            advisor,
            indexer: Arc::new(Indexer),
            llm_profiles: Arc::new(
                LlmServiceProfiles::new(unreachable_llm(), unreachable_llm(), Some(1)).unwrap(),
            ),
        })
    }

    fn ask(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/ask")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(resp: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn index_page_shows_databases_and_escapes_credit() {
        let resp = build_router(state(false))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("🥗 노인 비만 맞춤형 영양 관리 AI 비서"));
        assert!(html.contains("✅ 지침 DB: disease"));
        assert!(html.contains("✅ 레시피 DB: foodgraph"));
        assert!(html.contains("연구원 &lt;테스트&gt;"));
        assert!(html.contains("※ 출처"));
        assert!(!html.contains("{{"));
    }

    #[tokio::test]
    async fn ask_returns_answer_and_evidence() {
        let resp = build_router(state(false))
            .oneshot(ask(r#"{"question":"어르신 저염 식단"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));

        let body = json_body(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["answer"], "저염 미역국을 추천합니다.");
        assert_eq!(body["data"]["failed"], false);
        assert_eq!(body["data"]["doc_ids"][0], "R-5-1");
        assert_eq!(body["data"]["limits"]["max_sodium_mg"], 500);
        assert_eq!(body["data"]["recipes"][0]["food_title"], "미역국");
    }

    #[tokio::test]
    async fn blank_question_is_rejected() {
        let resp = build_router(state(false))
            .oneshot(ask(r#"{"question":"   "}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = json_body(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "EMPTY_QUESTION");
        assert_eq!(body["error"]["message"], "내용을 입력해 주세요.");
    }

    #[tokio::test]
    async fn pipeline_failure_is_reported_as_answer() {
        let resp = build_router(state(true))
            .oneshot(ask(r#"{"question":"식단 추천"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = json_body(resp).await;
        assert_eq!(body["data"]["failed"], true);
        let answer = body["data"]["answer"].as_str().unwrap();
        assert!(answer.starts_with("⚠️ 오류 발생: "));
        assert!(answer.contains("recipe db offline"));
        assert!(body["data"].get("limits").is_none());
    }

    #[tokio::test]
    async fn missing_field_is_wrapped_in_envelope() {
        let resp = build_router(state(false))
            .oneshot(ask(r#"{"q":"x"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = json_body(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");
        assert_eq!(body["error"]["details"][0]["path"], "question");
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let mut req = ask(r#"{"question":"식단"}"#);
        req.headers_mut()
            .insert("X-Request-Id", "abc-123".parse().unwrap());
        let resp = build_router(state(false)).oneshot(req).await.unwrap();
        assert_eq!(resp.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn reindex_reports_stats() {
        let resp = build_router(state(false))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/guidelines/reindex")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = json_body(resp).await;
        assert_eq!(body["data"]["indexed"], 42);
        assert_eq!(body["data"]["skipped"], 1);
    }

    #[tokio::test]
    async fn status_lists_databases_and_llm_health() {
        let resp = build_router(state(false))
            .oneshot(
                Request::builder()
                    .uri("/api/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = json_body(resp).await;
        assert_eq!(body["data"]["guideline_db"], "disease");
        assert_eq!(body["data"]["recipe_db"], "foodgraph");
        assert_eq!(body["data"]["llm"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["llm"][0]["ok"], false);
    }
}
