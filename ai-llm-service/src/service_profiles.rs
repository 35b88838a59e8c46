//! Shared LLM service with two profiles: `chat` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Holds one HTTP client per profile for the whole process.
//! - If both profiles share endpoint, key, and model, a single client is reused.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::LlmServiceProfiles;
//! use ai_llm_service::config::default_config::{config_openai_chat, config_openai_embedding};
//!
//! # async fn run() -> Result<(), ai_llm_service::AiLlmError> {
//! let svc = Arc::new(LlmServiceProfiles::new(
//!     config_openai_chat()?,
//!     config_openai_embedding()?,
//!     Some(10),
//! )?);
//!
//! let txt = svc.generate("Hello world", None).await?;
//! let emb = svc.embed("Ferris").await?;
//! println!("{txt} / dim = {}", emb.len());
//! # Ok(()) }
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::AiLlmError,
    health_service::{HealthService, HealthStatus},
    services::open_ai_service::OpenAiService,
};

/// Process-wide holder of the chat and embedding clients.
pub struct LlmServiceProfiles {
    chat: Arc<OpenAiService>,
    embedding: Arc<OpenAiService>,
    health: HealthService,
}

impl LlmServiceProfiles {
    /// Creates both clients eagerly so configuration problems surface at startup.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if either client or the health checker cannot be built.
    pub fn new(
        chat: LlmModelConfig,
        embedding: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        let chat = Arc::new(OpenAiService::new(chat)?);
        let embedding = if embedding == *chat.config() {
            debug!("embedding profile equals chat profile; sharing client");
            Arc::clone(&chat)
        } else {
            Arc::new(OpenAiService::new(embedding)?)
        };

        Ok(Self {
            chat,
            embedding,
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Generates text with the chat profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if generation fails.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        self.chat.generate(prompt, system).await
    }

    /// Computes embeddings with the embedding profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if embedding fails.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        self.embedding.embeddings(input).await
    }

    /// Returns a health snapshot for all distinct profiles.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let (chat, embedding) = self.profiles();
        let mut list = vec![chat.clone()];
        if embedding != chat {
            list.push(embedding.clone());
        }
        self.health.check_many(&list).await
    }

    /// Returns references to the current profiles `(chat, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (self.chat.config(), self.embedding.config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(model: &str) -> LlmModelConfig {
        LlmModelConfig {
            model: model.into(),
            endpoint: "http://127.0.0.1:9".into(),
            api_key: Some("sk-test".into()),
            max_tokens: None,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(1),
        }
    }

    #[test]
    fn identical_profiles_share_a_client() {
        let svc = LlmServiceProfiles::new(cfg("gpt-4o"), cfg("gpt-4o"), None).unwrap();
        assert!(Arc::ptr_eq(&svc.chat, &svc.embedding));

        let svc = LlmServiceProfiles::new(cfg("gpt-4o"), cfg("text-embedding-3-small"), None)
            .unwrap();
        assert!(!Arc::ptr_eq(&svc.chat, &svc.embedding));
        assert_eq!(svc.profiles().1.model, "text-embedding-3-small");
    }
}
