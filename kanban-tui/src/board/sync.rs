//! Board state synchronizer.
//!
//! Owns the task cache and turns user gestures into request commands. It
//! never talks to the network: callers dispatch the [`PendingRequest`]s and
//! [`FetchRequest`]s it hands out and feed the results back through
//! [`BoardSync::complete`] and [`BoardSync::apply_fetch`].

use super::cache::{CacheCommand, QueryKey, TaskCache};
use super::group_by_column;
use crate::config::FailurePolicy;
use kanban_core::{Column, Task, TaskDraft, TaskId, TaskListQuery, ValidationError};
use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// Column change from a drag. Sent as `PUT /tasks/{id} {column}`.
    Move {
        task_id: TaskId,
        from: Column,
        to: Column,
    },
    Create {
        draft: TaskDraft,
    },
    Update {
        task_id: TaskId,
        draft: TaskDraft,
    },
    Delete {
        task_id: TaskId,
    },
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::Move { task_id, to, .. } => write!(f, "move task {} to {}", task_id, to),
            RequestKind::Create { draft } => write!(f, "create \"{}\"", draft.title),
            RequestKind::Update { task_id, .. } => write!(f, "update task {}", task_id),
            RequestKind::Delete { task_id } => write!(f, "delete task {}", task_id),
        }
    }
}

/// A gateway call the synchronizer wants made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub id: RequestId,
    pub kind: RequestKind,
}

/// Result of a [`PendingRequest`], as reported by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub request: PendingRequest,
    pub result: Result<(), String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub key: QueryKey,
    pub query: TaskListQuery,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub key: QueryKey,
    pub generation: u64,
    pub result: Result<Vec<Task>, String>,
}

/// A finished drag gesture. `destination` is `None` when the card was
/// released outside every column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropEvent {
    pub task_id: TaskId,
    pub source: Column,
    pub destination: Option<Column>,
}

/// Lifecycle of one task's drag. Absent from the map means idle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveState {
    /// Optimistic column written, server update in flight.
    Pending {
        request: RequestId,
        key: QueryKey,
        from: Column,
        to: Column,
    },
    /// Server accepted the move; waiting for the refetch.
    Reconciled,
    /// Server rejected the move and the optimistic column was kept.
    Diverged { reason: String },
}

/// What a completion or fetch meant for the board, for the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Moved {
        task_id: TaskId,
        to: Column,
    },
    Saved {
        request: RequestId,
        created: bool,
    },
    Deleted {
        task_id: TaskId,
    },
    Failed {
        request: RequestId,
        action: String,
        reason: String,
        rolled_back: bool,
    },
    FetchFailed {
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct BoardSync {
    cache: TaskCache,
    current: QueryKey,
    page_size: u32,
    policy: FailurePolicy,
    moves: HashMap<TaskId, MoveState>,
    fetching: HashSet<QueryKey>,
    failed_fetch: HashSet<QueryKey>,
    next_request: u64,
}

impl BoardSync {
    pub fn new(page_size: u32, policy: FailurePolicy) -> Self {
        Self {
            cache: TaskCache::new(),
            current: QueryKey::default(),
            page_size,
            policy,
            moves: HashMap::new(),
            fetching: HashSet::new(),
            failed_fetch: HashSet::new(),
            next_request: 0,
        }
    }

    pub fn search(&self) -> &str {
        self.current.search()
    }

    /// Switch the board to another search term. Returns whether the key
    /// changed.
    pub fn set_search(&mut self, term: &str) -> bool {
        let key = QueryKey::new(term);
        if key == self.current {
            return false;
        }
        tracing::debug!(from = %self.current, to = %key, "Search changed");
        self.current = key;
        true
    }

    /// Tasks for the current search, in server order.
    pub fn tasks(&self) -> &[Task] {
        self.cache.tasks(&self.current)
    }

    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks().iter().find(|t| t.id == task_id)
    }

    pub fn column_tasks(&self, column: Column) -> Vec<&Task> {
        group_by_column(self.tasks(), column)
    }

    pub fn columns(&self) -> Vec<(Column, Vec<&Task>)> {
        Column::ALL
            .iter()
            .map(|column| (*column, self.column_tasks(*column)))
            .collect()
    }

    /// True until the first list for the current search arrives.
    pub fn is_loading(&self) -> bool {
        self.cache.entry(&self.current).is_none() && self.fetching.contains(&self.current)
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching.contains(&self.current)
    }

    pub fn move_state(&self, task_id: TaskId) -> Option<&MoveState> {
        self.moves.get(&task_id)
    }

    pub fn pending_moves(&self) -> usize {
        self.moves
            .values()
            .filter(|s| matches!(s, MoveState::Pending { .. }))
            .count()
    }

    pub fn diverged_moves(&self) -> usize {
        self.moves
            .values()
            .filter(|s| matches!(s, MoveState::Diverged { .. }))
            .count()
    }

    /// A list request for the current search, if one is needed and none is
    /// already in flight. Failed fetches are not retried until the next
    /// [`refresh`](Self::refresh).
    pub fn next_fetch(&mut self) -> Option<FetchRequest> {
        let key = self.current.clone();
        if !self.cache.needs_fetch(&key)
            || self.fetching.contains(&key)
            || self.failed_fetch.contains(&key)
        {
            return None;
        }
        self.fetching.insert(key.clone());
        Some(FetchRequest {
            query: key.to_query(self.page_size),
            generation: self.cache.generation(),
            key,
        })
    }

    pub fn apply_fetch(&mut self, fetched: FetchResult) -> Option<SyncEvent> {
        // Issued before the last reset: the key may already be in flight again.
        if self.cache.is_discarded(fetched.generation) {
            tracing::debug!(key = %fetched.key, generation = fetched.generation, "Dropping fetch from before reset");
            return None;
        }
        self.fetching.remove(&fetched.key);
        match fetched.result {
            Ok(tasks) => {
                self.failed_fetch.remove(&fetched.key);
                self.cache.apply(CacheCommand::Store {
                    key: fetched.key,
                    tasks,
                    generation: fetched.generation,
                });
                // Settled moves go back to idle once authoritative data is in.
                self.moves
                    .retain(|_, state| matches!(state, MoveState::Pending { .. }));
                None
            }
            Err(reason) => {
                tracing::warn!(key = %fetched.key, reason = %reason, "Task list fetch failed");
                self.failed_fetch.insert(fetched.key);
                Some(SyncEvent::FetchFailed { reason })
            }
        }
    }

    /// Manual refresh: every cached search is refetched on demand.
    pub fn refresh(&mut self) {
        self.failed_fetch.clear();
        self.cache.apply(CacheCommand::InvalidateAll);
    }

    /// Handle a finished drag. The cached column is rewritten before this
    /// returns; the returned request still has to be sent.
    pub fn on_drop(&mut self, event: DropEvent) -> Option<PendingRequest> {
        let to = event.destination?;
        let key = self.current.clone();
        let from = self.cache.column_of(&key, event.task_id).unwrap_or(event.source);

        self.cache.apply(CacheCommand::SetColumn {
            key: key.clone(),
            task_id: event.task_id,
            column: to,
        });

        let request = self.issue(RequestKind::Move {
            task_id: event.task_id,
            from,
            to,
        });
        self.moves.insert(
            event.task_id,
            MoveState::Pending {
                request: request.id,
                key,
                from,
                to,
            },
        );
        tracing::debug!(task_id = event.task_id, %from, %to, request = %request.id, "Optimistic move");
        Some(request)
    }

    /// Create when `task_id` is `None`, otherwise update. Nothing in the
    /// cache changes until the server confirms.
    pub fn create_or_update(
        &mut self,
        task_id: Option<TaskId>,
        draft: TaskDraft,
    ) -> Result<PendingRequest, ValidationError> {
        draft.validate()?;
        let kind = match task_id {
            Some(task_id) => RequestKind::Update { task_id, draft },
            None => RequestKind::Create { draft },
        };
        Ok(self.issue(kind))
    }

    /// Delete only goes out once the user has confirmed it.
    pub fn remove(&mut self, task_id: TaskId, confirmed: bool) -> Option<PendingRequest> {
        if !confirmed {
            tracing::debug!(task_id, "Delete declined");
            return None;
        }
        Some(self.issue(RequestKind::Delete { task_id }))
    }

    pub fn complete(&mut self, completion: Completion) -> SyncEvent {
        let Completion { request, result } = completion;
        match result {
            Ok(()) => self.complete_ok(request),
            Err(reason) => self.complete_err(request, reason),
        }
    }

    /// Forget everything, e.g. after sign-out.
    pub fn reset(&mut self) {
        self.cache.apply(CacheCommand::Clear);
        self.current = QueryKey::default();
        self.moves.clear();
        self.fetching.clear();
        self.failed_fetch.clear();
    }

    fn complete_ok(&mut self, request: PendingRequest) -> SyncEvent {
        tracing::debug!(request = %request.id, action = %request.kind, "Request succeeded");
        let event = match request.kind {
            RequestKind::Move { task_id, to, .. } => {
                if self.is_latest_move(task_id, request.id) {
                    self.moves.insert(task_id, MoveState::Reconciled);
                }
                SyncEvent::Moved { task_id, to }
            }
            RequestKind::Create { .. } => SyncEvent::Saved {
                request: request.id,
                created: true,
            },
            RequestKind::Update { .. } => SyncEvent::Saved {
                request: request.id,
                created: false,
            },
            RequestKind::Delete { task_id } => {
                self.moves.remove(&task_id);
                SyncEvent::Deleted { task_id }
            }
        };
        self.cache.apply(CacheCommand::InvalidateAll);
        event
    }

    fn complete_err(&mut self, request: PendingRequest, reason: String) -> SyncEvent {
        tracing::warn!(request = %request.id, action = %request.kind, reason = %reason, "Request failed");
        let mut rolled_back = false;
        if let RequestKind::Move { task_id, .. } = request.kind {
            if self.is_latest_move(task_id, request.id) {
                rolled_back = self.settle_failed_move(task_id, reason.clone());
            }
        }
        SyncEvent::Failed {
            request: request.id,
            action: request.kind.to_string(),
            reason,
            rolled_back,
        }
    }

    /// Apply the failure policy to the task's pending move. Returns whether
    /// the optimistic column was undone.
    fn settle_failed_move(&mut self, task_id: TaskId, reason: String) -> bool {
        let Some(MoveState::Pending { key, from, to, .. }) = self.moves.remove(&task_id) else {
            return false;
        };
        match self.policy {
            FailurePolicy::Keep => {
                self.moves.insert(task_id, MoveState::Diverged { reason });
                false
            }
            FailurePolicy::Rollback => {
                // A refetch may already have replaced the optimistic write.
                if self.cache.column_of(&key, task_id) != Some(to) {
                    return false;
                }
                self.cache.apply(CacheCommand::SetColumn {
                    key,
                    task_id,
                    column: from,
                })
            }
        }
    }

    fn is_latest_move(&self, task_id: TaskId, request: RequestId) -> bool {
        matches!(
            self.moves.get(&task_id),
            Some(MoveState::Pending { request: latest, .. }) if *latest == request
        )
    }

    fn issue(&mut self, kind: RequestKind) -> PendingRequest {
        self.next_request += 1;
        PendingRequest {
            id: RequestId(self.next_request),
            kind,
        }
    }
}
