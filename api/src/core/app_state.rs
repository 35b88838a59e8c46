use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use ai_llm_service::config::default_config::{config_openai_chat, config_openai_embedding};
use diet_advisor::sources::GuidelineIndexer;
use diet_advisor::{AdvisorConfig, Backends, NutritionAdvisor};
use tracing::info;

use crate::error_handler::AppError;

pub const DEFAULT_ADDRESS: &str = "0.0.0.0:8501";
pub const DEFAULT_SOURCE_NOTE: &str =
    "※ 본 정보는 대한비만학회 진료지침 2022를 근거로 작성되었습니다.";

/// Server and page settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Listen address, e.g. "0.0.0.0:8501".
    pub address: String,
    /// Optional sidebar line (author, lab).
    pub credit: Option<String>,
    /// Caption under every answer.
    pub source_note: String,
    /// Health probe timeout for `/api/status`.
    pub health_timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Reads `API_ADDRESS`, `APP_CREDIT`, `APP_SOURCE_NOTE`, `HEALTH_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let health_timeout_secs = match text("HEALTH_TIMEOUT_SECS") {
            Some(v) => Some(v.parse::<u64>().map_err(|_| {
                AppError::Config(format!("HEALTH_TIMEOUT_SECS must be an integer, got `{v}`"))
            })?),
            None => None,
        };

        Ok(Self {
            address: text("API_ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.into()),
            credit: text("APP_CREDIT"),
            source_note: text("APP_SOURCE_NOTE").unwrap_or_else(|| DEFAULT_SOURCE_NOTE.into()),
            health_timeout_secs,
        })
    }
}

/// What the sidebar and `/api/status` report about the backends.
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub guideline_db: String,
    pub recipe_db: String,
    pub vector_backend: &'static str,
}

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub info: SystemInfo,
    pub advisor: NutritionAdvisor,
    pub indexer: Arc<dyn GuidelineIndexer>,
    pub llm_profiles: Arc<LlmServiceProfiles>,
}

impl AppState {
    /// Builds every handle once: LLM clients, both graphs and the vector store.
    ///
    /// # Errors
    /// Any missing setting or unreachable backend aborts startup.
    pub async fn from_env() -> Result<Self, AppError> {
        let config = AppConfig::from_env()?;
        let llm_profiles = Arc::new(LlmServiceProfiles::new(
            config_openai_chat()?,
            config_openai_embedding()?,
            config.health_timeout_secs,
        )?);

        let backends = Backends::connect(AdvisorConfig::from_env()?, llm_profiles.clone()).await?;
        let advisor = backends.advisor();
        let info = SystemInfo {
            guideline_db: backends.guideline_graph.database().to_string(),
            recipe_db: backends.recipe_graph.database().to_string(),
            vector_backend: advisor.retriever_backend(),
        };

        info!(
            address = %config.address,
            guideline_db = %info.guideline_db,
            recipe_db = %info.recipe_db,
            vector_backend = info.vector_backend,
            "application state ready"
        );

        Ok(Self {
            config,
            info,
            advisor,
            indexer: Arc::new(backends.reindexer()),
            llm_profiles,
        })
    }
}
