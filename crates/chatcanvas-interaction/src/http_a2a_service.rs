//! HttpA2aService - A2A transport over a JSON HTTP proxy.
//!
//! The proxy exposes `POST {base}/a2a` for messages and
//! `GET {base}/a2a/agent-card` for the agent description.

use std::time::Duration;

use async_trait::async_trait;
use chatcanvas_core::a2a::{A2aService, AgentCard, Part, SendMessageSuccessResponse};
use chatcanvas_core::config::AgentConfig;
use chatcanvas_core::error::{ChatCanvasError, Result};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// Transport implementation talking to an A2A proxy over HTTP.
pub struct HttpA2aService {
    client: Client,
    base_url: String,
    supported_catalog_ids: Vec<String>,
    icon_url_override: Option<String>,
    /// Conversation id echoed by the proxy, sent back on every request.
    context_id: RwLock<Option<String>>,
}

impl HttpA2aService {
    /// Creates a service for the proxy at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            supported_catalog_ids: Vec::new(),
            icon_url_override: None,
            context_id: RwLock::new(None),
        }
    }

    /// Builds the service from the `[agent]` config section.
    ///
    /// # Errors
    ///
    /// Returns `ChatCanvasError::Config` if the HTTP client cannot be built.
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if config.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| ChatCanvasError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self::new(&config.endpoint)
            .with_client(client)
            .with_supported_catalog_ids(config.supported_catalog_ids.clone()))
    }

    /// Uses a preconfigured client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// A2UI catalogs advertised with every message.
    pub fn with_supported_catalog_ids(mut self, ids: Vec<String>) -> Self {
        self.supported_catalog_ids = ids;
        self
    }

    /// Replaces the icon of the fetched agent card, e.g. with a local asset.
    pub fn with_icon_url_override(mut self, icon_url: impl Into<String>) -> Self {
        self.icon_url_override = Some(icon_url.into());
        self
    }

    /// Context id learned from the last response, if any.
    pub async fn context_id(&self) -> Option<String> {
        self.context_id.read().await.clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_message(&self, parts: Vec<Part>) -> Result<SendMessageSuccessResponse> {
        let body = SendMessageRequest {
            parts,
            context_id: self.context_id.read().await.clone(),
            metadata: (!self.supported_catalog_ids.is_empty()).then(|| RequestMetadata {
                a2ui_client_capabilities: ClientCapabilities {
                    supported_catalog_ids: self.supported_catalog_ids.clone(),
                },
            }),
        };

        tracing::debug!(
            parts = body.parts.len(),
            context_id = ?body.context_id,
            "POST /a2a"
        );

        let response = self
            .client
            .post(self.url("/a2a"))
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;

        let parsed: SendMessageSuccessResponse =
            response.json().await.map_err(map_reqwest_error)?;

        if let Some(context_id) = parsed.context_id.as_ref() {
            let mut current = self.context_id.write().await;
            if current.as_ref() != Some(context_id) {
                tracing::debug!(context_id = %context_id, "Tracking new context id");
                *current = Some(context_id.clone());
            }
        }

        Ok(parsed)
    }
}

#[async_trait]
impl A2aService for HttpA2aService {
    async fn send_message(
        &self,
        parts: Vec<Part>,
        cancel: CancellationToken,
    ) -> Result<SendMessageSuccessResponse> {
        // Dropping the request future closes the connection.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("A2A request aborted");
                Err(ChatCanvasError::Cancelled)
            }
            result = self.post_message(parts) => result,
        }
    }

    async fn get_agent_card(&self) -> Result<AgentCard> {
        let response = self
            .client
            .get(self.url("/a2a/agent-card"))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if !response.status().is_success() {
            return Err(ChatCanvasError::upstream(
                response.status().as_u16(),
                "Failed to fetch agent card",
            ));
        }

        let mut card: AgentCard = response.json().await.map_err(map_reqwest_error)?;
        if let Some(icon_url) = &self.icon_url_override {
            card.icon_url = Some(icon_url.clone());
        }
        Ok(card)
    }
}

#[derive(Serialize)]
struct SendMessageRequest {
    parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<RequestMetadata>,
}

#[derive(Serialize)]
struct RequestMetadata {
    #[serde(rename = "a2uiClientCapabilities")]
    a2ui_client_capabilities: ClientCapabilities,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientCapabilities {
    supported_catalog_ids: Vec<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error body".to_string());
    Err(map_http_error(status, &body))
}

fn map_http_error(status: StatusCode, body: &str) -> ChatCanvasError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|wrapper| wrapper.error)
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body.to_string()
            }
        });
    ChatCanvasError::upstream(status.as_u16(), message)
}

fn map_reqwest_error(err: reqwest::Error) -> ChatCanvasError {
    if err.is_decode() {
        ChatCanvasError::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    } else if err.is_timeout() {
        ChatCanvasError::transport(format!("A2A request timed out: {err}"))
    } else {
        ChatCanvasError::transport(format!("A2A request failed: {err}"))
    }
}
