//! In-memory gateways shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use kanban_core::{
    AuthResponse, LoginRequest, RegisterRequest, Task, TaskDraft, TaskId, TaskListQuery, TaskPatch,
    User,
};
use kanban_test_utils::fixtures;
use kanban_tui::api_client::{AuthGateway, GatewayError, TaskGateway};
use kanban_tui::board::{BoardSync, FetchResult};
use kanban_tui::config::FailurePolicy;
use std::sync::Mutex;

pub const TOKEN: &str = "1|test-token";
pub const PASSWORD: &str = "secret";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    List(TaskListQuery),
    Create(TaskDraft),
    Update(TaskId, TaskPatch),
    Delete(TaskId),
    Login(String),
    Register(String),
}

#[derive(Default)]
struct State {
    tasks: Vec<Task>,
    next_id: TaskId,
    requests: Vec<Recorded>,
    fail_mutations: bool,
}

/// Task and auth backend held in memory. Search matches title or
/// description, case-insensitively.
#[derive(Default)]
pub struct InMemoryGateway {
    state: Mutex<State>,
}

impl InMemoryGateway {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(State {
                tasks,
                next_id,
                ..State::default()
            }),
        }
    }

    /// Make every create, update, and delete fail with a 500.
    pub fn fail_mutations(&self) {
        self.state.lock().unwrap().fail_mutations = true;
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().unwrap().tasks.clone()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    fn authorize(token: &str) -> Result<(), GatewayError> {
        match token {
            "" => Err(GatewayError::MissingCredential),
            TOKEN => Ok(()),
            _ => Err(GatewayError::Status {
                status: 401,
                message: "Unauthenticated.".to_string(),
            }),
        }
    }

    fn mutate(
        &self,
        token: &str,
        recorded: Recorded,
        apply: impl FnOnce(&mut State),
    ) -> Result<(), GatewayError> {
        Self::authorize(token)?;
        let mut state = self.state.lock().unwrap();
        state.requests.push(recorded);
        if state.fail_mutations {
            return Err(GatewayError::Status {
                status: 500,
                message: "HTTP 500: boom".to_string(),
            });
        }
        apply(&mut state);
        Ok(())
    }
}

#[async_trait]
impl TaskGateway for InMemoryGateway {
    async fn list_tasks(
        &self,
        token: &str,
        query: &TaskListQuery,
    ) -> Result<Vec<Task>, GatewayError> {
        Self::authorize(token)?;
        let mut state = self.state.lock().unwrap();
        state.requests.push(Recorded::List(query.clone()));
        let needle = query.search.as_deref().map(str::to_lowercase);
        let tasks = state
            .tasks
            .iter()
            .filter(|task| match &needle {
                Some(needle) => {
                    task.title.to_lowercase().contains(needle)
                        || task
                            .description
                            .as_deref()
                            .map_or(false, |d| d.to_lowercase().contains(needle))
                }
                None => true,
            })
            .take(query.per_page as usize)
            .cloned()
            .collect();
        Ok(tasks)
    }

    async fn create_task(&self, token: &str, draft: &TaskDraft) -> Result<(), GatewayError> {
        let draft = draft.clone();
        self.mutate(token, Recorded::Create(draft.clone()), |state| {
            let id = state.next_id;
            state.next_id += 1;
            let mut task = Task::new(id, draft.title, draft.column);
            if !draft.description.is_empty() {
                task = task.with_description(draft.description);
            }
            state.tasks.push(task);
        })
    }

    async fn update_task(
        &self,
        token: &str,
        id: TaskId,
        patch: &TaskPatch,
    ) -> Result<(), GatewayError> {
        let patch = patch.clone();
        self.mutate(token, Recorded::Update(id, patch.clone()), |state| {
            if let Some(task) = state.tasks.iter_mut().find(|t| t.id == id) {
                if let Some(title) = patch.title {
                    task.title = title;
                }
                if let Some(description) = patch.description {
                    task.description = Some(description);
                }
                if let Some(column) = patch.column {
                    task.column = column;
                }
            }
        })
    }

    async fn delete_task(&self, token: &str, id: TaskId) -> Result<(), GatewayError> {
        self.mutate(token, Recorded::Delete(id), |state| {
            state.tasks.retain(|t| t.id != id);
        })
    }
}

#[async_trait]
impl AuthGateway for InMemoryGateway {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(Recorded::Login(request.email.clone()));
        let expected = fixtures::auth_response();
        if Some(request.email.as_str()) == expected.user.email.as_deref()
            && request.password == PASSWORD
        {
            Ok(expected)
        } else {
            Err(GatewayError::Status {
                status: 401,
                message: "Invalid credentials".to_string(),
            })
        }
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(Recorded::Register(request.email.clone()));
        let mut user = User::new(request.username.clone());
        user.email = Some(request.email.clone());
        Ok(AuthResponse {
            user,
            token: TOKEN.to_string(),
        })
    }
}

/// Run the board's pending fetch, if any, against `gateway`.
pub async fn sync_once(board: &mut BoardSync, gateway: &InMemoryGateway) {
    if let Some(fetch) = board.next_fetch() {
        let result = gateway
            .list_tasks(TOKEN, &fetch.query)
            .await
            .map_err(|e| e.to_string());
        board.apply_fetch(FetchResult {
            key: fetch.key,
            generation: fetch.generation,
            result,
        });
    }
}

/// Board with `tasks` already fetched.
pub fn seeded_board(tasks: Vec<Task>, policy: FailurePolicy) -> BoardSync {
    let mut board = BoardSync::new(100, policy);
    if let Some(fetch) = board.next_fetch() {
        board.apply_fetch(FetchResult {
            key: fetch.key,
            generation: fetch.generation,
            result: Ok(tasks),
        });
    }
    board
}
