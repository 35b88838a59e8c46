//! Default model configs loaded from environment variables.
//!
//! Two roles are used by the advisor:
//!
//! - **Chat**      → the answering model (deterministic, temperature 0)
//! - **Embedding** → the model used to embed questions and recommendations
//!
//! Any OpenAI-compatible server works; point `OPENAI_BASE_URL` at it.
//!
//! # Environment variables
//!
//! - `OPENAI_API_KEY`          = bearer token (mandatory)
//! - `OPENAI_BASE_URL`         = API base (default `https://api.openai.com`)
//! - `OPENAI_MODEL`            = chat model (default `gpt-4o`)
//! - `OPENAI_EMBEDDING_MODEL`  = embedding model (default `text-embedding-3-small`)
//! - `LLM_MAX_TOKENS`          = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS`        = optional request timeout (u64, default 120)

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{AiLlmError, must_var, opt_u32, opt_u64, validate_http_endpoint},
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

const DEFAULT_TIMEOUT_SECS: u64 = 120;
const EMBEDDING_TIMEOUT_SECS: u64 = 30;

/// Resolves the API base from `OPENAI_BASE_URL`, falling back to the public endpoint.
///
/// # Errors
/// - [`crate::error_handler::ConfigError::InvalidFormat`] if the value is not http/https
fn openai_endpoint<F>(lookup: &F) -> Result<String, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let endpoint = or_default(lookup, "OPENAI_BASE_URL", DEFAULT_BASE_URL);
    validate_http_endpoint("OPENAI_BASE_URL", &endpoint)?;
    Ok(endpoint)
}

fn or_default<F>(lookup: &F, name: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Chat model config from the process environment.
pub fn config_openai_chat() -> Result<LlmModelConfig, AiLlmError> {
    config_openai_chat_from_lookup(|key| std::env::var(key).ok())
}

/// Constructs a config for the **chat** model.
///
/// # Env
/// - `OPENAI_API_KEY` (required)
/// - `OPENAI_MODEL`, `OPENAI_BASE_URL`, `LLM_MAX_TOKENS`, `LLM_TIMEOUT_SECS` (optional)
///
/// # Defaults
/// - `temperature = Some(0.0)`
pub fn config_openai_chat_from_lookup<F>(lookup: F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let endpoint = openai_endpoint(&lookup)?;
    let api_key = must_var(&lookup, "OPENAI_API_KEY")?;
    let max_tokens = opt_u32(&lookup, "LLM_MAX_TOKENS")?;
    let timeout_secs = opt_u64(&lookup, "LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(LlmModelConfig {
        model: or_default(&lookup, "OPENAI_MODEL", DEFAULT_CHAT_MODEL),
        endpoint,
        api_key: Some(api_key),
        max_tokens,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(timeout_secs),
    })
}

/// Embedding model config from the process environment.
pub fn config_openai_embedding() -> Result<LlmModelConfig, AiLlmError> {
    config_openai_embedding_from_lookup(|key| std::env::var(key).ok())
}

/// Constructs a config for the **embedding** model.
///
/// # Env
/// - `OPENAI_API_KEY` (required)
/// - `OPENAI_EMBEDDING_MODEL`, `OPENAI_BASE_URL` (optional)
pub fn config_openai_embedding_from_lookup<F>(lookup: F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let endpoint = openai_endpoint(&lookup)?;
    let api_key = must_var(&lookup, "OPENAI_API_KEY")?;

    Ok(LlmModelConfig {
        model: or_default(&lookup, "OPENAI_EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
        endpoint,
        api_key: Some(api_key),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(EMBEDDING_TIMEOUT_SECS),
    })
}
