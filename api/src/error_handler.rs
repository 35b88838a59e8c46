use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use ai_llm_service::AiLlmError;
use diet_advisor::AdvisorError;

use crate::core::http::response_envelope::{ApiErrorDetail, ApiResponse};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Llm(#[from] AiLlmError),

    #[error(transparent)]
    Advisor(#[from] AdvisorError),

    // --- IO / network / server ---
    #[error("failed to bind listener on {address}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("내용을 입력해 주세요.")]
    EmptyQuestion,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::EmptyQuestion => StatusCode::BAD_REQUEST,
            AppError::Advisor(AdvisorError::Config(_))
            | AppError::Config(_)
            | AppError::Bind { .. }
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Advisor(_) | AppError::Llm(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Llm(_) => "LLM_ERROR",
            AppError::Advisor(AdvisorError::Graph(_)) => "GRAPH_ERROR",
            AppError::Advisor(AdvisorError::VectorStore(_)) => "VECTOR_STORE_ERROR",
            AppError::Advisor(AdvisorError::Llm(_)) => "LLM_ERROR",
            AppError::Advisor(AdvisorError::Config(_)) => "CONFIG_ERROR",
            AppError::Bind { .. } => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::EmptyQuestion => "EMPTY_QUESTION",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let details = match self {
            AppError::EmptyQuestion => vec![ApiErrorDetail::field(
                "question",
                "Send a non-blank `question` string.",
            )],
            _ => Vec::new(),
        };
        ApiResponse::<()>::error(self.error_code(), self.to_string(), details)
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;
