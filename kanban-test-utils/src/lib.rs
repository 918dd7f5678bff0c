//! Kanban Test Utilities
//!
//! Shared test infrastructure for the kanban workspace:
//! - Proptest generators for tasks, columns, and sessions
//! - Fixtures for common board scenarios
//! - Assertions about column groupings

pub use kanban_core::{
    normalize_column, AuthResponse, Column, Session, Task, TaskDraft, TaskId, User,
};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for board data.

    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    pub fn arb_column() -> impl Strategy<Value = Column> {
        prop::sample::select(Column::ALL.to_vec())
    }

    pub fn arb_title() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9][a-zA-Z0-9 ]{0,30}"
    }

    pub fn arb_task(id: TaskId) -> impl Strategy<Value = Task> {
        (
            arb_title(),
            prop::option::of("[a-zA-Z0-9 ]{0,60}"),
            arb_column(),
        )
            .prop_map(move |(title, description, column)| Task {
                id,
                title,
                description,
                column,
            })
    }

    /// Task list with unique ids, in server order.
    pub fn arb_task_list(max_len: usize) -> impl Strategy<Value = Vec<Task>> {
        prop::collection::btree_set(1i64..10_000, 0..=max_len).prop_flat_map(
            |ids: BTreeSet<TaskId>| {
                ids.into_iter()
                    .map(arb_task)
                    .collect::<Vec<_>>()
            },
        )
    }

    pub fn arb_user() -> impl Strategy<Value = User> {
        (
            prop::option::of(1i64..100_000),
            "[a-z]{1,12}",
            prop::option::of("[a-z]{1,8}@example\\.com"),
        )
            .prop_map(|(id, username, email)| User {
                id,
                username,
                email,
            })
    }

    pub fn arb_token() -> impl Strategy<Value = String> {
        "[A-Za-z0-9|]{8,48}"
    }

    pub fn arb_session() -> impl Strategy<Value = Session> {
        prop_oneof![
            Just(Session::empty()),
            (arb_user(), arb_token())
                .prop_map(|(user, token)| Session::authenticated(user, token)),
        ]
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built board scenarios.

    use super::*;

    pub fn task(id: TaskId, title: &str, column: Column) -> Task {
        Task::new(id, title, column)
    }

    /// One task per column, ids 1..=4 in column order.
    pub fn one_per_column() -> Vec<Task> {
        Column::ALL
            .iter()
            .enumerate()
            .map(|(i, column)| task(i as TaskId + 1, &format!("task {}", i + 1), *column))
            .collect()
    }

    /// Tasks whose titles do and do not contain "foo".
    pub fn searchable_tasks() -> Vec<Task> {
        vec![
            task(1, "foo backlog", Column::Backlog),
            task(2, "bar backlog", Column::Backlog),
            task(3, "foo in progress", Column::InProgress),
            task(4, "review me", Column::Review).with_description("contains foo"),
            task(5, "done deal", Column::Done),
        ]
    }

    pub fn user() -> User {
        User {
            id: Some(1),
            username: "ada".to_string(),
            email: Some("ada@example.com".to_string()),
        }
    }

    pub fn auth_response() -> AuthResponse {
        AuthResponse {
            user: user(),
            token: "1|test-token".to_string(),
        }
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions about how tasks are spread across columns.

    use super::*;
    use std::collections::HashMap;

    /// Assert the four groups partition `tasks`: every task appears in
    /// exactly one group, the group matches its column, and nothing extra
    /// shows up.
    #[track_caller]
    pub fn assert_partition(tasks: &[Task], groups: &[(Column, Vec<&Task>)]) {
        let mut seen: HashMap<TaskId, usize> = HashMap::new();
        for (column, group) in groups {
            for task in group {
                assert_eq!(
                    normalize_column(task.column.to_backend_label()),
                    column.id(),
                    "task {} grouped under {:?}",
                    task.id,
                    column
                );
                *seen.entry(task.id).or_default() += 1;
            }
        }
        for task in tasks {
            assert_eq!(
                seen.get(&task.id).copied(),
                Some(1),
                "task {} should appear exactly once",
                task.id
            );
        }
        assert_eq!(seen.len(), tasks.len(), "groups contain unknown tasks");
    }

    /// Assert the task with `id` sits in `column`.
    #[track_caller]
    pub fn assert_in_column(tasks: &[Task], id: TaskId, column: Column) {
        match tasks.iter().find(|t| t.id == id) {
            Some(task) => assert_eq!(task.column, column, "task {} column", id),
            None => panic!("task {} not found in {:?}", id, tasks),
        }
    }
}
