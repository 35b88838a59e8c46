//! Health probes for OpenAI-compatible backends.
//!
//! Probe: `GET {endpoint}/v1/models` with Bearer auth, plus a best-effort check
//! that the configured model is listed.
//!
//! The returned [`HealthStatus`] is JSON-serializable and suitable for a status endpoint.
//! [`HealthService::check`] is resilient and never fails (errors mapped to `ok=false`).
//! The strict probe (`try_probe`) returns a `Result`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::error_handler::{AiLlmError, HealthError, HttpError, make_snippet};

/// A serializable health snapshot for a single model config.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier the probe looked for.
    pub model: String,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds for the main probe.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    #[inline]
    fn ok(cfg: &LlmModelConfig, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            ok: true,
            latency_ms,
            message: message.into(),
        }
    }

    #[inline]
    fn fail(cfg: &LlmModelConfig, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            ok: false,
            latency_ms,
            message: message.into(),
        }
    }
}

/// A health checker that reuses a single HTTP client.
pub struct HealthService {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds).
    ///
    /// # Errors
    /// Returns [`AiLlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        info!(
            default_timeout_secs = timeout.as_secs(),
            "HealthService initialized"
        );

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Checks health for a single model config.
    ///
    /// Never returns an error: any failure is converted to
    /// `HealthStatus { ok: false, message: ... }`.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            warn!(
                endpoint = %cfg.endpoint,
                "invalid endpoint (empty or missing http/https)"
            );
            return HealthStatus::fail(cfg, 0, "endpoint is empty or missing http/https");
        }

        let start = Instant::now();
        match self.try_probe(cfg).await {
            Ok(status) => {
                info!(
                    endpoint = %status.endpoint,
                    model = %status.model,
                    ok = status.ok,
                    latency_ms = status.latency_ms,
                    "health probe completed"
                );
                status
            }
            Err(err) => {
                let status = HealthStatus::fail(cfg, start.elapsed().as_millis(), err.to_string());
                warn!(
                    endpoint = %status.endpoint,
                    model = %status.model,
                    latency_ms = status.latency_ms,
                    message = %status.message,
                    "health probe failed"
                );
                status
            }
        }
    }

    /// Checks health for multiple configs and returns a vector of statuses.
    pub async fn check_many(&self, configs: &[LlmModelConfig]) -> Vec<HealthStatus> {
        debug!(count = configs.len(), "running batch health probes");
        let mut out = Vec::with_capacity(configs.len());
        for cfg in configs {
            out.push(self.check(cfg).await);
        }
        out
    }

    /// Strict probe. Returns an error on hard failures.
    async fn try_probe(&self, cfg: &LlmModelConfig) -> Result<HealthStatus, AiLlmError> {
        let url = format!("{}/v1/models", cfg.endpoint.trim_end_matches('/'));
        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout)
            .min(self.default_timeout);

        let api_key = cfg
            .api_key
            .as_ref()
            .ok_or_else(|| HealthError::Decode("missing API key".into()))?;

        let auth_header = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| HealthError::Decode(format!("invalid API key header: {e}")))?;

        let start = Instant::now();
        debug!(endpoint = %cfg.endpoint, model = %cfg.model, "GET {}", url);

        let resp = self
            .client
            .get(&url)
            .timeout(timeout)
            .header(header::AUTHORIZATION, auth_header)
            .send()
            .await?;

        let latency = start.elapsed().as_millis();

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %url,
                %status,
                %snippet,
                latency_ms = latency,
                "health GET /v1/models returned non-success status"
            );

            return Err(HealthError::HttpStatus(HttpError {
                status,
                url,
                snippet,
            })
            .into());
        }

        // Expected minimal JSON: { "data": [ { "id": "<model>" }, ... ] }
        #[derive(serde::Deserialize)]
        struct ModelItem {
            id: String,
        }
        #[derive(serde::Deserialize)]
        struct Models {
            data: Vec<ModelItem>,
        }

        match resp.json::<Models>().await {
            Ok(models) if models.data.iter().any(|m| m.id == cfg.model) => Ok(HealthStatus::ok(
                cfg,
                latency,
                "backend is healthy; model is available",
            )),
            Ok(_) => Ok(HealthStatus::fail(
                cfg,
                latency,
                "backend is up, but model not found in /v1/models",
            )),
            Err(e) => {
                warn!(
                    endpoint = %cfg.endpoint,
                    model = %cfg.model,
                    error = %e,
                    latency_ms = latency,
                    "failed to decode /v1/models; treating server as reachable"
                );
                Ok(HealthStatus::ok(
                    cfg,
                    latency,
                    format!("backend is reachable; failed to decode /v1/models: {e}"),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::get};
    use serde_json::json;

    fn cfg(endpoint: &str, model: &str) -> LlmModelConfig {
        LlmModelConfig {
            model: model.into(),
            endpoint: endpoint.into(),
            api_key: Some("sk-test".into()),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    async fn spawn_stub(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn reports_model_presence() {
        let app = Router::new().route(
            "/v1/models",
            get(|| async { Json(json!({ "data": [ { "id": "gpt-4o" } ] })) }),
        );
        let base = spawn_stub(app).await;
        let svc = HealthService::new(Some(5)).unwrap();

        assert!(svc.check(&cfg(&base, "gpt-4o")).await.ok);
        let missing = svc.check(&cfg(&base, "gpt-5-imaginary")).await;
        assert!(!missing.ok);
        assert!(missing.message.contains("not found"));
    }

    #[tokio::test]
    async fn failures_become_statuses() {
        let app = Router::new().route(
            "/v1/models",
            get(|| async { (StatusCode::UNAUTHORIZED, "invalid key") }),
        );
        let base = spawn_stub(app).await;
        let svc = HealthService::new(Some(5)).unwrap();

        let st = svc.check(&cfg(&base, "gpt-4o")).await;
        assert!(!st.ok);
        assert!(st.message.contains("401"));

        let bad = svc.check(&cfg("ftp://nowhere", "gpt-4o")).await;
        assert!(!bad.ok);
        assert_eq!(bad.latency_ms, 0);
    }
}
