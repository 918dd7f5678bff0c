mod common;

use common::seeded_board;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use kanban_core::{Column, Task, TaskDraft};
use kanban_test_utils::assertions::{assert_in_column, assert_partition};
use kanban_test_utils::generators::{arb_column, arb_task_list, arb_title};
use kanban_tui::board::{group_by_column, BoardSync, Completion, DropEvent, FetchResult, RequestKind};
use kanban_tui::config::FailurePolicy;
use kanban_tui::keys::{map_key, Action};
use proptest::prelude::*;

fn non_empty_list() -> impl Strategy<Value = (Vec<Task>, prop::sample::Index)> {
    (arb_task_list(24), any::<prop::sample::Index>()).prop_filter("need a task", |(tasks, _)| {
        !tasks.is_empty()
    })
}

proptest! {
    #[test]
    fn grouping_partitions_the_list(tasks in arb_task_list(40)) {
        let groups: Vec<_> = Column::ALL
            .iter()
            .map(|c| (*c, group_by_column(&tasks, *c)))
            .collect();
        assert_partition(&tasks, &groups);
    }

    #[test]
    fn grouping_preserves_list_order(tasks in arb_task_list(40), column in arb_column()) {
        let expected: Vec<_> = tasks.iter().filter(|t| t.column == column).map(|t| t.id).collect();
        let grouped: Vec<_> = group_by_column(&tasks, column).iter().map(|t| t.id).collect();
        prop_assert_eq!(grouped, expected);
    }

    #[test]
    fn drop_without_destination_changes_nothing((tasks, pick) in non_empty_list()) {
        let mut board = seeded_board(tasks.clone(), FailurePolicy::Keep);
        let task = pick.get(&tasks);

        let request = board.on_drop(DropEvent {
            task_id: task.id,
            source: task.column,
            destination: None,
        });

        prop_assert!(request.is_none());
        prop_assert_eq!(board.tasks(), tasks.as_slice());
        prop_assert!(board.move_state(task.id).is_none());
    }

    #[test]
    fn drop_moves_only_the_dropped_task(
        (tasks, pick) in non_empty_list(),
        destination in arb_column(),
    ) {
        let mut board = seeded_board(tasks.clone(), FailurePolicy::Keep);
        let task = pick.get(&tasks);

        let request = board
            .on_drop(DropEvent {
                task_id: task.id,
                source: task.column,
                destination: Some(destination),
            })
            .unwrap();

        prop_assert_eq!(
            request.kind,
            RequestKind::Move { task_id: task.id, from: task.column, to: destination }
        );
        assert_in_column(board.tasks(), task.id, destination);
        for (before, after) in tasks.iter().zip(board.tasks()) {
            prop_assert_eq!(before.id, after.id);
            if before.id != task.id {
                prop_assert_eq!(before, after);
            }
        }
        assert_partition(board.tasks(), &board.columns());
    }

    #[test]
    fn rollback_restores_original_column(
        (tasks, pick) in non_empty_list(),
        destination in arb_column(),
    ) {
        let mut board = seeded_board(tasks.clone(), FailurePolicy::Rollback);
        let task = pick.get(&tasks);

        let request = board
            .on_drop(DropEvent {
                task_id: task.id,
                source: task.column,
                destination: Some(destination),
            })
            .unwrap();
        board.complete(Completion { request, result: Err("offline".to_string()) });

        prop_assert_eq!(board.tasks(), tasks.as_slice());
    }

    #[test]
    fn unconfirmed_delete_never_issues_request((tasks, pick) in non_empty_list()) {
        let mut board = seeded_board(tasks.clone(), FailurePolicy::Keep);
        let task = pick.get(&tasks);

        prop_assert!(board.remove(task.id, false).is_none());
        prop_assert_eq!(board.tasks(), tasks.as_slice());
        prop_assert!(board.next_fetch().is_none());
    }

    #[test]
    fn editor_submits_never_touch_the_cache(
        tasks in arb_task_list(16),
        title in arb_title(),
        column in arb_column(),
    ) {
        let mut board = seeded_board(tasks.clone(), FailurePolicy::Keep);
        let request = board.create_or_update(None, TaskDraft::new(title, "", column));
        prop_assert!(request.is_ok());
        prop_assert_eq!(board.tasks(), tasks.as_slice());
    }

    #[test]
    fn late_list_for_previous_search_never_replaces_board(
        unfiltered in arb_task_list(16),
        filtered in arb_task_list(16),
        term in "[a-z]{1,8}",
    ) {
        let mut board = BoardSync::new(100, FailurePolicy::Keep);
        let previous = board.next_fetch().unwrap();
        prop_assert!(board.set_search(&term));
        let current = board.next_fetch().unwrap();

        board.apply_fetch(FetchResult {
            key: current.key,
            generation: current.generation,
            result: Ok(filtered.clone()),
        });
        board.apply_fetch(FetchResult {
            key: previous.key,
            generation: previous.generation,
            result: Ok(unfiltered.clone()),
        });

        prop_assert_eq!(board.tasks(), filtered.as_slice());
        prop_assert!(board.next_fetch().is_none());

        // The late list is kept under its own search term.
        board.set_search("");
        prop_assert_eq!(board.tasks(), unfiltered.as_slice());
        prop_assert!(board.next_fetch().is_none());
    }
}

#[test]
fn arrow_keys_move_focus() {
    let cases = [
        (KeyCode::Up, Action::MoveUp),
        (KeyCode::Down, Action::MoveDown),
        (KeyCode::Left, Action::MoveLeft),
        (KeyCode::Right, Action::MoveRight),
    ];
    for (code, action) in cases {
        assert_eq!(map_key(KeyEvent::new(code, KeyModifiers::NONE)), Some(action));
    }
}
