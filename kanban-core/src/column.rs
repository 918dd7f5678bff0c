//! The four fixed board columns and their mapping to backend labels.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A board column. The order of variants is the left-to-right display order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    #[default]
    Backlog,
    InProgress,
    Review,
    Done,
}

/// (column, id, backend label) for every column, in display order.
const COLUMN_TABLE: [(Column, &str, &str); 4] = [
    (Column::Backlog, "backlog", "Backlog"),
    (Column::InProgress, "in_progress", "In Progress"),
    (Column::Review, "review", "Review"),
    (Column::Done, "done", "Done"),
];

impl Column {
    pub const ALL: [Column; 4] = [
        Column::Backlog,
        Column::InProgress,
        Column::Review,
        Column::Done,
    ];

    /// Internal identifier, e.g. `in_progress`.
    pub fn id(self) -> &'static str {
        COLUMN_TABLE[self.index()].1
    }

    /// Label the backend stores, e.g. `In Progress`.
    pub fn to_backend_label(self) -> &'static str {
        COLUMN_TABLE[self.index()].2
    }

    pub fn index(self) -> usize {
        match self {
            Column::Backlog => 0,
            Column::InProgress => 1,
            Column::Review => 2,
            Column::Done => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Column> {
        Self::ALL.get(index).copied()
    }

    pub fn from_id(id: &str) -> Option<Column> {
        COLUMN_TABLE
            .iter()
            .find(|(_, candidate, _)| *candidate == id)
            .map(|(column, _, _)| *column)
    }

    pub fn from_backend_label(label: &str) -> Option<Column> {
        COLUMN_TABLE
            .iter()
            .find(|(_, _, candidate)| *candidate == label)
            .map(|(column, _, _)| *column)
    }

    /// Column to the left, saturating at `Backlog`.
    pub fn previous(self) -> Column {
        Self::from_index(self.index().saturating_sub(1)).unwrap_or(self)
    }

    /// Column to the right, saturating at `Done`.
    pub fn next(self) -> Column {
        Self::from_index(self.index() + 1).unwrap_or(self)
    }

    /// Cycles through all columns, wrapping around. Used by selectors.
    pub fn cycle_next(self) -> Column {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn cycle_previous(self) -> Column {
        let len = Self::ALL.len();
        Self::ALL[(self.index() + len - 1) % len]
    }
}

/// Map a backend label to its column id.
///
/// Input that is not a backend label is returned unchanged, so an
/// already-normalized id maps to itself and unknown server values pass
/// through instead of failing.
pub fn normalize_column(raw: &str) -> &str {
    match Column::from_backend_label(raw) {
        Some(column) => column.id(),
        None => raw,
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_backend_label())
    }
}

impl FromStr for Column {
    type Err = String;

    /// Accepts either a backend label or a column id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::from_id(normalize_column(s)).ok_or_else(|| format!("Invalid Column: {}", s))
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_backend_label())
    }
}

impl<'de> Deserialize<'de> for Column {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
