//! Access to the orchestrator's JSON API. Everything the dashboard shows
//! comes through an [`OrchestratorClient`].

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;

pub const DEFAULT_ORCHESTRATOR_URL: &str = "http://127.0.0.1:8075";

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("orchestrator {path} unreachable: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Orchestrator {path} failed: {status} {detail}")]
    Status {
        path: String,
        status: StatusCode,
        detail: String,
    },
    #[error("orchestrator {path} returned invalid json: {detail}")]
    Decode { path: String, detail: String },
    #[error("no canned response for {0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl OrchestratorError {
    pub fn path(&self) -> Option<&str> {
        match self {
            OrchestratorError::Transport { path, .. }
            | OrchestratorError::Status { path, .. }
            | OrchestratorError::Decode { path, .. } => Some(path),
            OrchestratorError::NotFound(path) => Some(path),
            OrchestratorError::Internal(_) => None,
        }
    }
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

#[async_trait]
pub trait OrchestratorClient: Send + Sync {
    async fn get_json(&self, path: &str) -> OrchestratorResult<Value>;
    async fn post_json(&self, path: &str, body: &Value) -> OrchestratorResult<Value>;
}

#[derive(Clone)]
pub struct HttpOrchestratorClient {
    client: Client,
    base_url: String,
}

impl HttpOrchestratorClient {
    pub fn new(base_url: &str, timeout: Duration) -> OrchestratorResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| OrchestratorError::Internal(format!("http client: {err}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_response(path: &str, resp: reqwest::Response) -> OrchestratorResult<Value> {
        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(OrchestratorError::Status {
                path: path.to_string(),
                status,
                detail,
            });
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|source| OrchestratorError::Transport {
                path: path.to_string(),
                source,
            })?;
        serde_json::from_slice(&bytes).map_err(|err| OrchestratorError::Decode {
            path: path.to_string(),
            detail: err.to_string(),
        })
    }
}

#[async_trait]
impl OrchestratorClient for HttpOrchestratorClient {
    async fn get_json(&self, path: &str) -> OrchestratorResult<Value> {
        tracing::debug!(%path, "GET orchestrator");
        let resp = self
            .client
            .get(self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|source| OrchestratorError::Transport {
                path: path.to_string(),
                source,
            })?;
        Self::read_response(path, resp).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> OrchestratorResult<Value> {
        tracing::debug!(%path, "POST orchestrator");
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|source| OrchestratorError::Transport {
                path: path.to_string(),
                source,
            })?;
        Self::read_response(path, resp).await
    }
}

/// Serves canned responses keyed by request path (query string included)
/// and records every POST body it receives.
#[derive(Default)]
pub struct StaticOrchestratorClient {
    responses: RwLock<HashMap<String, Value>>,
    posted: RwLock<Vec<(String, Value)>>,
}

impl StaticOrchestratorClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, path: &str, body: Value) -> Self {
        self.responses.get_mut().insert(path.to_string(), body);
        self
    }

    /// Empty telemetry in the shapes the orchestrator reports before any bot
    /// has pushed data.
    pub fn offline(history_limit: usize) -> Self {
        let empty_history = serde_json::json!({ "history": [] });
        Self::new()
            .with_response("/projects", serde_json::json!({ "projects": [] }))
            .with_response("/status", serde_json::json!({ "services": [] }))
            .with_response(
                "/memory/write",
                serde_json::json!({ "ok": true }),
            )
            .with_response(
                "/telemetry/metrics",
                serde_json::json!({
                    "updatedAt": null,
                    "queueDepth": 0,
                    "batchSize": 0,
                    "totals": { "enqueued": 0, "dropped": 0, "batches": 0, "flushedEvents": 0 }
                }),
            )
            .with_response(
                "/telemetry/trading",
                serde_json::json!({
                    "updatedAt": null,
                    "openPositions": 0,
                    "totalValueUsd": 0.0,
                    "unrealizedPnl": 0.0,
                    "realizedPnl": 0.0,
                    "dailyPnl": 0.0,
                    "positions": []
                }),
            )
            .with_response(
                &format!("/telemetry/trading/history?limit={history_limit}"),
                empty_history.clone(),
            )
            .with_response(
                "/telemetry/strategies",
                serde_json::json!({ "updatedAt": null, "strategies": [] }),
            )
            .with_response(
                &format!("/telemetry/strategies/history?limit={history_limit}"),
                empty_history,
            )
    }

    pub async fn posted(&self) -> Vec<(String, Value)> {
        self.posted.read().await.clone()
    }
}

#[async_trait]
impl OrchestratorClient for StaticOrchestratorClient {
    async fn get_json(&self, path: &str) -> OrchestratorResult<Value> {
        self.responses
            .read()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| OrchestratorError::NotFound(path.to_string()))
    }

    async fn post_json(&self, path: &str, body: &Value) -> OrchestratorResult<Value> {
        self.posted
            .write()
            .await
            .push((path.to_string(), body.clone()));
        self.get_json(path).await
    }
}
