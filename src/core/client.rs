//! HTTP client for the conversation backend
//!
//! Information Hiding:
//! - reqwest usage, URL layout and header formatting hidden behind trait
//! - Error bodies are reduced to an optional `detail` string
//! - Callers never see reqwest types, only `ApiFailure`

use super::error::ApiFailure;
use super::models::{decode_collection, Conversation, ConversationId};
use crate::storage::Token;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type ApiResult<T> = std::result::Result<T, ApiFailure>;

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub business_name: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    msg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Value,
}

/// Backend contract consumed by the session, auth and repository layers
#[async_trait]
pub trait ConversationApi: Send + Sync {
    /// Returns the raw access token on success
    async fn login(&self, credentials: &Credentials) -> ApiResult<String>;

    async fn register(&self, registration: &Registration) -> ApiResult<()>;

    /// Returns the backend's confirmation message
    async fn verify(&self, verification_token: &str) -> ApiResult<String>;

    /// Non-array bodies decode to an empty list
    async fn list_conversations(&self, token: &Token) -> ApiResult<Vec<Conversation>>;

    async fn get_conversation(&self, token: &Token, id: ConversationId) -> ApiResult<Conversation>;

    async fn delete_conversation(&self, token: &Token, id: ConversationId) -> ApiResult<()>;
}

pub struct HttpApiClient {
    client: Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Appends each segment percent-encoded, so caller-supplied values
    /// cannot change the route
    fn url_with_segments(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiFailure::Transport(format!("Invalid base URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiFailure::Transport(format!("Base URL cannot carry a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder, token: &Token) -> RequestBuilder {
        request.header("Authorization", token.authorization_header())
    }

    async fn send(&self, request: RequestBuilder, label: &str) -> ApiResult<Response> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("[HttpApiClient] {} request failed: {}", label, e);
            ApiFailure::Transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = extract_detail(&body);
        tracing::warn!(
            "[HttpApiClient] {} returned status {}: {}",
            label,
            status,
            detail.as_deref().unwrap_or("<no detail>")
        );
        Err(ApiFailure::Status { status, detail })
    }

    async fn json<T: serde::de::DeserializeOwned>(response: Response, label: &str) -> ApiResult<T> {
        response.json::<T>().await.map_err(|e| {
            tracing::warn!("[HttpApiClient] Failed to decode {} response: {}", label, e);
            ApiFailure::Transport(format!("Response decode error: {}", e))
        })
    }
}

/// Pulls a human-readable `detail` out of a FastAPI-style error body
fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Null => None,
        Value::String(_) => None,
        // Validation errors arrive as a list of objects with a `msg`
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl ConversationApi for HttpApiClient {
    async fn login(&self, credentials: &Credentials) -> ApiResult<String> {
        let request = self.client.post(self.url("/auth/login")).json(credentials);
        let response = self.send(request, "login").await?;
        let body: LoginResponse = Self::json(response, "login").await?;
        Ok(body.access_token)
    }

    async fn register(&self, registration: &Registration) -> ApiResult<()> {
        let request = self.client.post(self.url("/auth/register")).json(registration);
        self.send(request, "register").await?;
        Ok(())
    }

    async fn verify(&self, verification_token: &str) -> ApiResult<String> {
        let url = self.url_with_segments(&["auth", "verify", verification_token])?;
        let request = self.client.get(url);
        let response = self.send(request, "verify").await?;
        let body: MessageResponse = Self::json(response, "verify").await?;
        Ok(body.msg.unwrap_or_else(|| "Email verified".to_string()))
    }

    async fn list_conversations(&self, token: &Token) -> ApiResult<Vec<Conversation>> {
        let request = self.authorized(self.client.get(self.url("/conversations/")), token);
        let response = self.send(request, "list conversations").await?;
        // Any JSON body is accepted here; shape problems degrade to empty
        let text = response
            .text()
            .await
            .map_err(|e| ApiFailure::Transport(e.to_string()))?;
        let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::Null);
        Ok(decode_collection(body))
    }

    async fn get_conversation(&self, token: &Token, id: ConversationId) -> ApiResult<Conversation> {
        let request = self.authorized(
            self.client.get(self.url(&format!("/conversations/{}", id))),
            token,
        );
        let response = self.send(request, "get conversation").await?;
        Self::json(response, "get conversation").await
    }

    async fn delete_conversation(&self, token: &Token, id: ConversationId) -> ApiResult<()> {
        let request = self.authorized(
            self.client.delete(self.url(&format!("/conversations/{}", id))),
            token,
        );
        self.send(request, "delete conversation").await?;
        Ok(())
    }
}
