//! Gateways to the remote task and auth APIs.
//!
//! [`TaskGateway`] and [`AuthGateway`] are the seams the rest of the client
//! talks to; [`RestClient`] implements both over HTTP with reqwest. Every
//! task call carries the bearer token it is given and holds no session
//! state of its own.

use crate::config::TuiConfig;
use async_trait::async_trait;
use kanban_core::{
    decode_task_list, AuthResponse, LoginRequest, RawTaskList, RegisterRequest, Task, TaskDraft,
    TaskId, TaskListQuery, TaskPatch,
};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{RequestBuilder, StatusCode};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Not signed in")]
    MissingCredential,
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("Config error: {0}")]
    Config(String),
}

impl GatewayError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, GatewayError::Status { status: 401, .. })
    }
}

#[async_trait]
pub trait TaskGateway: Send + Sync {
    async fn list_tasks(&self, token: &str, query: &TaskListQuery)
        -> Result<Vec<Task>, GatewayError>;

    async fn create_task(&self, token: &str, draft: &TaskDraft) -> Result<(), GatewayError>;

    async fn update_task(
        &self,
        token: &str,
        id: TaskId,
        patch: &TaskPatch,
    ) -> Result<(), GatewayError>;

    async fn delete_task(&self, token: &str, id: TaskId) -> Result<(), GatewayError>;
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, GatewayError>;

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, GatewayError>;
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(config: &TuiConfig) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout_ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder.build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn list_request(
        &self,
        token: &str,
        query: &TaskListQuery,
    ) -> Result<RequestBuilder, GatewayError> {
        let request = self.client.get(self.url("/tasks")).query(query);
        with_bearer(request, token)
    }

    pub fn create_request(
        &self,
        token: &str,
        draft: &TaskDraft,
    ) -> Result<RequestBuilder, GatewayError> {
        let request = self.client.post(self.url("/tasks")).json(draft);
        with_bearer(request, token)
    }

    pub fn update_request(
        &self,
        token: &str,
        id: TaskId,
        patch: &TaskPatch,
    ) -> Result<RequestBuilder, GatewayError> {
        let path = format!("/tasks/{}", id);
        let request = self.client.put(self.url(&path)).json(patch);
        with_bearer(request, token)
    }

    pub fn delete_request(&self, token: &str, id: TaskId) -> Result<RequestBuilder, GatewayError> {
        let path = format!("/tasks/{}", id);
        with_bearer(self.client.delete(self.url(&path)), token)
    }

    pub fn login_request(&self, request: &LoginRequest) -> RequestBuilder {
        self.client.post(self.url("/login")).json(request)
    }

    pub fn register_request(&self, request: &RegisterRequest) -> RequestBuilder {
        self.client.post(self.url("/register")).json(request)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, GatewayError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let text = response.text().await?;
            Err(status_error(status, &text))
        }
    }

    /// Mutation responses are not used beyond success or failure.
    async fn send_ack(&self, request: RequestBuilder) -> Result<(), GatewayError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await?;
        Err(status_error(status, &text))
    }
}

#[async_trait]
impl TaskGateway for RestClient {
    async fn list_tasks(
        &self,
        token: &str,
        query: &TaskListQuery,
    ) -> Result<Vec<Task>, GatewayError> {
        let request = self.list_request(token, query)?;
        let raw: RawTaskList = self.send_json(request).await?;
        let decoded = decode_task_list(raw);
        for rejected in &decoded.rejected {
            tracing::warn!(
                task_id = ?rejected.id,
                reason = %rejected.reason,
                "Skipping task with invalid fields"
            );
        }
        tracing::debug!(
            count = decoded.tasks.len(),
            search = ?query.search,
            "Fetched task list"
        );
        Ok(decoded.tasks)
    }

    async fn create_task(&self, token: &str, draft: &TaskDraft) -> Result<(), GatewayError> {
        let request = self.create_request(token, draft)?;
        self.send_ack(request).await
    }

    async fn update_task(
        &self,
        token: &str,
        id: TaskId,
        patch: &TaskPatch,
    ) -> Result<(), GatewayError> {
        let request = self.update_request(token, id, patch)?;
        self.send_ack(request).await
    }

    async fn delete_task(&self, token: &str, id: TaskId) -> Result<(), GatewayError> {
        let request = self.delete_request(token, id)?;
        self.send_ack(request).await
    }
}

#[async_trait]
impl AuthGateway for RestClient {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, GatewayError> {
        self.send_json(self.login_request(request)).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, GatewayError> {
        self.send_json(self.register_request(request)).await
    }
}

fn with_bearer(request: RequestBuilder, token: &str) -> Result<RequestBuilder, GatewayError> {
    if token.is_empty() {
        return Err(GatewayError::MissingCredential);
    }
    let value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|e| GatewayError::Config(e.to_string()))?;
    Ok(request.header(AUTHORIZATION, value))
}

/// Turn a non-2xx body into a readable error, preferring the server's own
/// `message` or `error` field.
fn status_error(status: StatusCode, body: &str) -> GatewayError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"].iter().find_map(|key| {
                value
                    .get(*key)
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| format!("HTTP {}: {}", status.as_u16(), body.trim()));
    GatewayError::Status {
        status: status.as_u16(),
        message,
    }
}
