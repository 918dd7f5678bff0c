//! Event types for the TUI event loop.

use crate::board::{Completion, FetchResult};
use crossterm::event::KeyEvent;
use kanban_core::AuthResponse;

/// Outcome of a login or registration attempt. Errors are already
/// rendered for display on the form.
pub type AuthOutcome = Result<AuthResponse, String>;

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Resize { width: u16, height: u16 },
    Completed(Completion),
    Fetched(FetchResult),
    Auth(AuthOutcome),
}
