//! End-to-end board flows against an in-memory backend.

mod common;

use common::{seeded_board, sync_once, InMemoryGateway, Recorded, PASSWORD, TOKEN};
use kanban_core::{Column, LoginRequest, RegisterRequest, Session, Task, TaskDraft, TaskListQuery, TaskPatch};
use kanban_test_utils::assertions::{assert_in_column, assert_partition};
use kanban_test_utils::fixtures;
use kanban_tui::board::{BoardSync, Completion, DropEvent, MoveState, SyncEvent};
use kanban_tui::config::FailurePolicy;
use kanban_tui::dispatch::{authenticate, execute, Command, Dispatcher};
use kanban_tui::events::TuiEvent;
use kanban_tui::login::AuthSubmit;
use kanban_tui::session::SessionStore;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;

async fn fetched_board(gateway: &InMemoryGateway, policy: FailurePolicy) -> BoardSync {
    let mut board = BoardSync::new(100, policy);
    sync_once(&mut board, gateway).await;
    board
}

#[tokio::test]
async fn search_requests_matching_tasks_only() {
    let gateway = InMemoryGateway::with_tasks(fixtures::searchable_tasks());
    let mut board = fetched_board(&gateway, FailurePolicy::Keep).await;
    assert_eq!(board.tasks().len(), 5);

    board.set_search("foo");
    sync_once(&mut board, &gateway).await;

    assert_eq!(
        gateway.requests().last(),
        Some(&Recorded::List(TaskListQuery::new("foo", 100)))
    );
    let ids: Vec<_> = board.tasks().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
    assert_partition(board.tasks(), &board.columns());
    assert_eq!(board.column_tasks(Column::Done).len(), 0);
}

#[tokio::test]
async fn drop_is_optimistic_then_confirmed_by_refetch() {
    let gateway = InMemoryGateway::with_tasks(vec![Task::new(1, "one", Column::Backlog)]);
    let mut board = fetched_board(&gateway, FailurePolicy::Keep).await;

    let request = board
        .on_drop(DropEvent {
            task_id: 1,
            source: Column::Backlog,
            destination: Some(Column::InProgress),
        })
        .expect("move request");
    let optimistic = serde_json::to_value(board.tasks()).unwrap();
    assert_eq!(
        optimistic,
        serde_json::json!([{"id": 1, "title": "one", "description": null, "column": "In Progress"}])
    );

    let result = execute(&gateway, TOKEN, &request.kind)
        .await
        .map_err(|e| e.to_string());
    assert_eq!(
        gateway.requests().last(),
        Some(&Recorded::Update(1, TaskPatch::column(Column::InProgress)))
    );
    board.complete(Completion { request, result });
    assert_eq!(board.move_state(1), Some(&MoveState::Reconciled));

    sync_once(&mut board, &gateway).await;
    assert_in_column(board.tasks(), 1, Column::InProgress);
    assert_eq!(board.move_state(1), None);
}

#[tokio::test]
async fn failed_move_rolls_back_under_rollback_policy() {
    let gateway = InMemoryGateway::with_tasks(vec![Task::new(1, "one", Column::Backlog)]);
    gateway.fail_mutations();
    let mut board = fetched_board(&gateway, FailurePolicy::Rollback).await;

    let request = board
        .on_drop(DropEvent {
            task_id: 1,
            source: Column::Backlog,
            destination: Some(Column::Done),
        })
        .unwrap();
    let result = execute(&gateway, TOKEN, &request.kind)
        .await
        .map_err(|e| e.to_string());
    let event = board.complete(Completion { request, result });

    assert!(matches!(
        event,
        SyncEvent::Failed {
            rolled_back: true,
            ..
        }
    ));
    assert_in_column(board.tasks(), 1, Column::Backlog);
}

#[tokio::test]
async fn failed_move_is_kept_under_keep_policy() {
    let gateway = InMemoryGateway::with_tasks(vec![Task::new(1, "one", Column::Backlog)]);
    gateway.fail_mutations();
    let mut board = fetched_board(&gateway, FailurePolicy::Keep).await;

    let request = board
        .on_drop(DropEvent {
            task_id: 1,
            source: Column::Backlog,
            destination: Some(Column::Done),
        })
        .unwrap();
    let result = execute(&gateway, TOKEN, &request.kind)
        .await
        .map_err(|e| e.to_string());
    board.complete(Completion { request, result });

    assert_in_column(board.tasks(), 1, Column::Done);
    assert_in_column(&gateway.tasks(), 1, Column::Backlog);
    assert!(matches!(
        board.move_state(1),
        Some(MoveState::Diverged { .. })
    ));

    // A manual refresh brings the server's view back.
    board.refresh();
    sync_once(&mut board, &gateway).await;
    assert_in_column(board.tasks(), 1, Column::Backlog);
    assert_eq!(board.move_state(1), None);
}

#[tokio::test]
async fn delete_only_after_confirmation() {
    let gateway = InMemoryGateway::with_tasks(fixtures::one_per_column());
    let mut board = fetched_board(&gateway, FailurePolicy::Keep).await;

    assert!(board.remove(2, false).is_none());
    assert!(!gateway
        .requests()
        .iter()
        .any(|r| matches!(r, Recorded::Delete(_))));
    assert!(board.task(2).is_some());

    let request = board.remove(2, true).unwrap();
    let result = execute(&gateway, TOKEN, &request.kind)
        .await
        .map_err(|e| e.to_string());
    assert_eq!(
        board.complete(Completion { request, result }),
        SyncEvent::Deleted { task_id: 2 }
    );
    sync_once(&mut board, &gateway).await;

    assert!(board.task(2).is_none());
    assert_eq!(board.tasks().len(), 3);
}

#[tokio::test]
async fn create_and_update_round_trip_through_refetch() {
    let gateway = InMemoryGateway::with_tasks(vec![]);
    let mut board = fetched_board(&gateway, FailurePolicy::Keep).await;

    let create = board
        .create_or_update(None, TaskDraft::new("write docs", "all of them", Column::Review))
        .unwrap();
    let result = execute(&gateway, TOKEN, &create.kind)
        .await
        .map_err(|e| e.to_string());
    board.complete(Completion {
        request: create,
        result,
    });
    sync_once(&mut board, &gateway).await;

    let task = board.tasks()[0].clone();
    assert_eq!(task.title, "write docs");
    assert_eq!(task.column, Column::Review);

    let update = board
        .create_or_update(Some(task.id), TaskDraft::new("write more docs", "", Column::Done))
        .unwrap();
    let result = execute(&gateway, TOKEN, &update.kind)
        .await
        .map_err(|e| e.to_string());
    board.complete(Completion {
        request: update,
        result,
    });
    sync_once(&mut board, &gateway).await;

    assert_eq!(board.tasks()[0].title, "write more docs");
    assert_in_column(board.tasks(), task.id, Column::Done);
}

#[tokio::test]
async fn dispatcher_posts_results_back_to_the_loop() {
    let gateway = Arc::new(InMemoryGateway::with_tasks(vec![Task::new(
        1,
        "one",
        Column::Backlog,
    )]));
    let (tx, mut rx) = mpsc::channel(8);
    let dispatcher = Dispatcher::new(gateway.clone(), gateway.clone(), tx);
    let mut board = BoardSync::new(100, FailurePolicy::Keep);

    let fetch = board.next_fetch().unwrap();
    dispatcher.dispatch(Command::Fetch(fetch), TOKEN);
    let Some(TuiEvent::Fetched(fetched)) = rx.recv().await else {
        panic!("expected a fetch result");
    };
    board.apply_fetch(fetched);
    assert_eq!(board.tasks().len(), 1);

    let request = board.remove(1, true).unwrap();
    dispatcher.dispatch(Command::Send(request), TOKEN);
    let Some(TuiEvent::Completed(completion)) = rx.recv().await else {
        panic!("expected a completion");
    };
    assert_eq!(completion.result, Ok(()));
    assert!(gateway.tasks().is_empty());
}

#[tokio::test]
async fn missing_token_fails_the_request() {
    let gateway = Arc::new(InMemoryGateway::with_tasks(vec![]));
    let (tx, mut rx) = mpsc::channel(8);
    let dispatcher = Dispatcher::new(gateway.clone(), gateway, tx);
    let mut board = BoardSync::new(100, FailurePolicy::Keep);

    dispatcher.dispatch(Command::Fetch(board.next_fetch().unwrap()), "");
    let Some(TuiEvent::Fetched(fetched)) = rx.recv().await else {
        panic!("expected a fetch result");
    };
    assert_eq!(fetched.result, Err("Not signed in".to_string()));
}

#[tokio::test]
async fn login_then_logout_updates_session_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("auth-storage.json");
    let gateway = InMemoryGateway::default();
    let mut store = SessionStore::open(&path).unwrap();

    let submit = AuthSubmit::Login(LoginRequest::new("ada@example.com", PASSWORD));
    let response = authenticate(&gateway, &submit).await.unwrap();
    store.login(response.user, response.token).unwrap();

    assert!(store.snapshot().is_authenticated);
    assert!(!store.token().unwrap_or_default().is_empty());
    assert_eq!(SessionStore::open(&path).unwrap().snapshot(), store.snapshot());

    store.logout().unwrap();
    assert_eq!(store.snapshot(), &Session::empty());
    assert_eq!(
        SessionStore::open(&path).unwrap().snapshot(),
        &Session::empty()
    );
}

#[tokio::test]
async fn wrong_password_reports_server_message() {
    let gateway = InMemoryGateway::default();
    let submit = AuthSubmit::Login(LoginRequest::new("ada@example.com", "nope"));
    let err = authenticate(&gateway, &submit).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Invalid credentials");
}

#[tokio::test]
async fn register_signs_in_new_user() {
    let gateway = InMemoryGateway::default();
    let submit = AuthSubmit::Register(RegisterRequest::new("grace", "grace@example.com", "pw"));
    let response = authenticate(&gateway, &submit).await.unwrap();
    assert_eq!(response.user.username, "grace");
    assert_eq!(response.token, TOKEN);
}

#[test]
fn seeded_board_needs_no_fetch() {
    let mut board = seeded_board(fixtures::one_per_column(), FailurePolicy::Keep);
    assert!(board.next_fetch().is_none());
}
