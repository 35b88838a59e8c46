//! POST /api/ask — guideline-grounded diet advice.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppError,
    middleware_layer::json_extractor::REQUEST_ID_HEADER,
    routes::ask::ask_request::{AskRequest, AskResponse},
};

/// Handler: POST /api/ask
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8501/api/ask \
///   -H 'content-type: application/json' \
///   -d '{"question":"비만인 어르신을 위한 단백질 식단을 추천해 주세요."}'
/// ```
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<AskRequest>,
) -> Response {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-");

    let question = body.question.trim();
    if question.is_empty() {
        debug!(request_id = %request_id, "ask_question: empty question");
        return AppError::EmptyQuestion.into_response();
    }

    debug!(
        request_id = %request_id,
        chars = question.chars().count(),
        "ask_question: start"
    );

    let payload = match state.advisor.ask_or_notice(question).await {
        Ok(advice) => {
            debug!(
                request_id = %request_id,
                recipes = advice.recipes.len(),
                "ask_question: success"
            );
            AskResponse::from(advice)
        }
        Err(notice) => {
            debug!(request_id = %request_id, "ask_question: answered with failure notice");
            AskResponse::failed(notice)
        }
    };

    ApiResponse::success(payload).into_response_with_status(StatusCode::OK)
}
