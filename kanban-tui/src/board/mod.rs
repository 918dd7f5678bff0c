//! Board model: the cached task list and the synchronizer that keeps it in
//! step with the server.

pub mod cache;
pub mod sync;

pub use cache::{CacheCommand, CacheEntry, JournalEntry, QueryKey, TaskCache, JOURNAL_CAPACITY};
pub use sync::{
    BoardSync, Completion, DropEvent, FetchRequest, FetchResult, MoveState, PendingRequest,
    RequestId, RequestKind, SyncEvent,
};

use kanban_core::{Column, Task};

/// Tasks in `column`, in list order.
pub fn group_by_column(tasks: &[Task], column: Column) -> Vec<&Task> {
    tasks.iter().filter(|task| task.column == column).collect()
}
