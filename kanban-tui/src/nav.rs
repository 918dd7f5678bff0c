//! Top-level routing between the login form and the board.

use kanban_core::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Board,
}

impl Route {
    /// The board is only reachable with an authenticated session.
    pub fn for_session(session: &Session) -> Route {
        if session.is_authenticated {
            Route::Board
        } else {
            Route::Login
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Sign in",
            Route::Board => "Board",
        }
    }
}
