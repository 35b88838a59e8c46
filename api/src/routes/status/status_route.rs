//! GET /api/status — database names and LLM reachability.

use std::sync::Arc;

use ai_llm_service::health_service::HealthStatus;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub guideline_db: String,
    pub recipe_db: String,
    pub vector_backend: &'static str,
    pub llm: Vec<HealthStatus>,
}

pub async fn status_route(State(state): State<Arc<AppState>>) -> Response {
    let llm = state.llm_profiles.health_all().await;

    ApiResponse::success(StatusResponse {
        guideline_db: state.info.guideline_db.clone(),
        recipe_db: state.info.recipe_db.clone(),
        vector_backend: state.info.vector_backend,
        llm,
    })
    .into_response()
}
