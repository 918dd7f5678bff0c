//! Task records and the payloads exchanged with the task API.

use crate::column::Column;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Server-assigned task identifier.
pub type TaskId = i64;

/// A task as stored by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub column: Column,
}

impl Task {
    pub fn new(id: TaskId, title: impl Into<String>, column: Column) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            column,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Description with empty strings treated as absent.
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.trim().is_empty())
    }
}

/// Fields submitted by the editor for a create or a full update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub column: Column,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>, column: Column) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            column,
        }
    }

    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            column: task.column,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "title" });
        }
        Ok(())
    }

    /// Every field set, for `PUT /tasks/{id}` from the editor.
    pub fn to_patch(&self) -> TaskPatch {
        TaskPatch {
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            column: Some(self.column),
        }
    }
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self::new("", "", Column::Backlog)
    }
}

/// Partial update body. Absent fields are left out of the JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<Column>,
}

impl TaskPatch {
    pub fn column(column: Column) -> Self {
        Self {
            column: Some(column),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.column.is_none()
    }
}

/// Query string for `GET /tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub per_page: u32,
}

impl TaskListQuery {
    /// An empty or whitespace-only term means "no filter".
    pub fn new(search: &str, per_page: u32) -> Self {
        let search = search.trim();
        Self {
            search: (!search.is_empty()).then(|| search.to_string()),
            per_page,
        }
    }
}

/// List envelope as received, before each task is checked.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTaskList {
    #[serde(default)]
    pub tasks: Vec<serde_json::Value>,
}

/// A task record dropped while decoding a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedTask {
    pub id: Option<TaskId>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedTaskList {
    pub tasks: Vec<Task>,
    pub rejected: Vec<RejectedTask>,
}

/// Decode each task on its own so one malformed record (for example an
/// unrecognized column label) does not take the whole board down.
pub fn decode_task_list(raw: RawTaskList) -> DecodedTaskList {
    let mut decoded = DecodedTaskList::default();
    for value in raw.tasks {
        let id = value.get("id").and_then(serde_json::Value::as_i64);
        match serde_json::from_value::<Task>(value) {
            Ok(task) => decoded.tasks.push(task),
            Err(err) => decoded.rejected.push(RejectedTask {
                id,
                reason: err.to_string(),
            }),
        }
    }
    decoded
}
