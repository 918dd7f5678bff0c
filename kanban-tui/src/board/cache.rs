//! Client-side mirror of the remote task list.
//!
//! The cache is only mutated through [`CacheCommand`] values. Each applied
//! command gets a sequence number and lands in a bounded journal, so the
//! order in which optimistic writes and server results hit the board can be
//! read back after the fact.

use chrono::{DateTime, Utc};
use kanban_core::{Column, Task, TaskId, TaskListQuery};
use std::collections::{HashMap, VecDeque};
use std::fmt;

/// How many applied commands the journal keeps.
pub const JOURNAL_CAPACITY: usize = 64;

/// Cache key: one entry per search term. Page size is fixed per client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryKey {
    search: String,
}

impl QueryKey {
    pub fn new(search: &str) -> Self {
        Self {
            search: search.trim().to_string(),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn to_query(&self, per_page: u32) -> TaskListQuery {
        TaskListQuery::new(&self.search, per_page)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.search.is_empty() {
            write!(f, "tasks")
        } else {
            write!(f, "tasks?search={}", self.search)
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub tasks: Vec<Task>,
    pub fetched_at: DateTime<Utc>,
    pub stale: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheCommand {
    /// Replace the entry for `key` with a server list. `generation` is the
    /// cache generation the fetch was issued under; a list fetched before
    /// the latest invalidation is stored but stays stale; one fetched
    /// before the latest clear is dropped.
    Store {
        key: QueryKey,
        tasks: Vec<Task>,
        generation: u64,
    },
    /// Optimistically move one task within the entry for `key`.
    SetColumn {
        key: QueryKey,
        task_id: TaskId,
        column: Column,
    },
    /// Mark every entry stale.
    InvalidateAll,
    /// Drop every entry and every fetch still in flight.
    Clear,
}

impl fmt::Display for CacheCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheCommand::Store {
                key,
                tasks,
                generation,
            } => write!(f, "store {} ({} tasks, gen {})", key, tasks.len(), generation),
            CacheCommand::SetColumn {
                key,
                task_id,
                column,
            } => write!(f, "set {} task {} -> {}", key, task_id, column),
            CacheCommand::InvalidateAll => write!(f, "invalidate all"),
            CacheCommand::Clear => write!(f, "clear"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub seq: u64,
    pub at: DateTime<Utc>,
    pub command: String,
    pub changed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TaskCache {
    entries: HashMap<QueryKey, CacheEntry>,
    generation: u64,
    /// Generation at the latest clear. Lists fetched before it are dropped.
    epoch: u64,
    next_seq: u64,
    journal: VecDeque<JournalEntry>,
}

impl TaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a command. Returns whether any entry changed.
    pub fn apply(&mut self, command: CacheCommand) -> bool {
        let summary = command.to_string();
        let changed = match command {
            CacheCommand::Store { generation, .. } if generation < self.epoch => false,
            CacheCommand::Store {
                key,
                tasks,
                generation,
            } => {
                let stale = generation < self.generation;
                self.entries.insert(
                    key,
                    CacheEntry {
                        tasks,
                        fetched_at: Utc::now(),
                        stale,
                    },
                );
                true
            }
            CacheCommand::SetColumn {
                key,
                task_id,
                column,
            } => match self.entries.get_mut(&key) {
                Some(entry) => match entry.tasks.iter_mut().find(|t| t.id == task_id) {
                    Some(task) => {
                        task.column = column;
                        true
                    }
                    None => false,
                },
                None => false,
            },
            CacheCommand::InvalidateAll => {
                self.generation += 1;
                for entry in self.entries.values_mut() {
                    entry.stale = true;
                }
                !self.entries.is_empty()
            }
            CacheCommand::Clear => {
                let changed = !self.entries.is_empty();
                self.entries.clear();
                self.generation += 1;
                self.epoch = self.generation;
                changed
            }
        };

        self.next_seq += 1;
        tracing::debug!(seq = self.next_seq, command = %summary, changed, "Cache command applied");
        if self.journal.len() == JOURNAL_CAPACITY {
            self.journal.pop_front();
        }
        self.journal.push_back(JournalEntry {
            seq: self.next_seq,
            at: Utc::now(),
            command: summary,
            changed,
        });
        changed
    }

    pub fn entry(&self, key: &QueryKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Tasks cached for `key`, or an empty list when nothing is cached.
    pub fn tasks(&self, key: &QueryKey) -> &[Task] {
        self.entries
            .get(key)
            .map(|entry| entry.tasks.as_slice())
            .unwrap_or(&[])
    }

    pub fn column_of(&self, key: &QueryKey, task_id: TaskId) -> Option<Column> {
        self.tasks(key)
            .iter()
            .find(|t| t.id == task_id)
            .map(|t| t.column)
    }

    /// Needs a fetch: nothing cached, or the entry was invalidated.
    pub fn needs_fetch(&self, key: &QueryKey) -> bool {
        self.entries.get(key).map_or(true, |entry| entry.stale)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a fetch issued under `generation` predates the latest clear.
    pub fn is_discarded(&self, generation: u64) -> bool {
        generation < self.epoch
    }

    pub fn journal(&self) -> impl Iterator<Item = &JournalEntry> {
        self.journal.iter()
    }
}
