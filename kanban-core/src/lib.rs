//! Kanban Core - Board Data Types
//!
//! Pure data structures shared by the client and its tests. No I/O lives
//! here: tasks, the fixed column set and its wire mapping, session records,
//! and the payloads exchanged with the remote task and auth APIs.

pub mod column;
pub mod error;
pub mod session;
pub mod task;

pub use column::{normalize_column, Column};
pub use error::ValidationError;
pub use session::{AuthResponse, LoginRequest, RegisterRequest, Session, User};
pub use task::{
    decode_task_list, DecodedTaskList, RawTaskList, RejectedTask, Task, TaskDraft, TaskId,
    TaskListQuery, TaskPatch,
};
