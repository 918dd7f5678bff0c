//! Error types for board data validation

use thiserror::Error;

/// Rejected input, caught before anything is sent to the server.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    EmptyField { field: &'static str },
}
