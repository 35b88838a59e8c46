//! POST /api/guidelines/reindex — re-embeds every guideline recommendation.

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap};
use rag_base::structs::rag_store::IndexStats;
use tracing::{error, info};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    middleware_layer::json_extractor::REQUEST_ID_HEADER,
};

pub async fn reindex_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<ApiResponse<IndexStats>> {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-");

    info!(request_id = %request_id, backend = state.info.vector_backend, "reindex: start");

    let stats = state.indexer.reindex().await.inspect_err(|err| {
        error!(request_id = %request_id, error = %err, "reindex: failed");
    })?;

    Ok(ApiResponse::success(stats))
}
