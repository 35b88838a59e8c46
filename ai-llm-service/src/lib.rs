//! Shared LLM client layer: OpenAI-compatible chat completions and embeddings,
//! env-driven configs, unified errors, health probes and a tracing layer.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::AiLlmError;
pub use service_profiles::LlmServiceProfiles;
