//! Runs gateway calls off the UI loop and posts the results back as
//! [`TuiEvent`]s.

use crate::api_client::{AuthGateway, GatewayError, TaskGateway};
use crate::board::{Completion, FetchRequest, FetchResult, PendingRequest, RequestKind};
use crate::events::TuiEvent;
use crate::login::AuthSubmit;
use kanban_core::{AuthResponse, TaskPatch};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Side effects requested by the application state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(PendingRequest),
    Fetch(FetchRequest),
    Authenticate(AuthSubmit),
}

#[derive(Clone)]
pub struct Dispatcher {
    tasks: Arc<dyn TaskGateway>,
    auth: Arc<dyn AuthGateway>,
    events: mpsc::Sender<TuiEvent>,
}

impl Dispatcher {
    pub fn new(
        tasks: Arc<dyn TaskGateway>,
        auth: Arc<dyn AuthGateway>,
        events: mpsc::Sender<TuiEvent>,
    ) -> Self {
        Self {
            tasks,
            auth,
            events,
        }
    }

    /// Spawn `command` on the current runtime. `token` is the bearer
    /// credential at the time the command was issued.
    pub fn dispatch(&self, command: Command, token: &str) {
        let token = token.to_string();
        let events = self.events.clone();
        match command {
            Command::Send(request) => {
                tracing::debug!(request = %request.id, action = %request.kind, "Dispatching request");
                let gateway = self.tasks.clone();
                tokio::spawn(async move {
                    let result = execute(gateway.as_ref(), &token, &request.kind)
                        .await
                        .map_err(describe);
                    let completion = Completion { request, result };
                    let _ = events.send(TuiEvent::Completed(completion)).await;
                });
            }
            Command::Fetch(fetch) => {
                tracing::debug!(key = %fetch.key, generation = fetch.generation, "Fetching tasks");
                let gateway = self.tasks.clone();
                tokio::spawn(async move {
                    let result = gateway
                        .list_tasks(&token, &fetch.query)
                        .await
                        .map_err(describe);
                    let fetched = FetchResult {
                        key: fetch.key,
                        generation: fetch.generation,
                        result,
                    };
                    let _ = events.send(TuiEvent::Fetched(fetched)).await;
                });
            }
            Command::Authenticate(submit) => {
                let gateway = self.auth.clone();
                tokio::spawn(async move {
                    let outcome = authenticate(gateway.as_ref(), &submit)
                        .await
                        .map_err(|e| e.to_string());
                    let _ = events.send(TuiEvent::Auth(outcome)).await;
                });
            }
        }
    }
}

fn describe(err: GatewayError) -> String {
    if err.is_unauthorized() {
        tracing::warn!("Server rejected the session token");
    }
    err.to_string()
}

/// Perform one task mutation against `gateway`.
pub async fn execute(
    gateway: &dyn TaskGateway,
    token: &str,
    kind: &RequestKind,
) -> Result<(), GatewayError> {
    match kind {
        RequestKind::Move { task_id, to, .. } => {
            gateway
                .update_task(token, *task_id, &TaskPatch::column(*to))
                .await
        }
        RequestKind::Create { draft } => gateway.create_task(token, draft).await,
        RequestKind::Update { task_id, draft } => {
            gateway.update_task(token, *task_id, &draft.to_patch()).await
        }
        RequestKind::Delete { task_id } => gateway.delete_task(token, *task_id).await,
    }
}

pub async fn authenticate(
    gateway: &dyn AuthGateway,
    submit: &AuthSubmit,
) -> Result<AuthResponse, GatewayError> {
    match submit {
        AuthSubmit::Login(request) => gateway.login(request).await,
        AuthSubmit::Register(request) => gateway.register(request).await,
    }
}
