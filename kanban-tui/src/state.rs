//! Application state and key handling.
//!
//! [`App`] never performs I/O beyond the session file. Key handlers return
//! [`Command`]s for the dispatcher, and gateway results come back through
//! the `handle_*` methods.

use crate::board::{BoardSync, Completion, DropEvent, FetchResult, SyncEvent};
use crate::config::TuiConfig;
use crate::dispatch::Command;
use crate::editor::{EditorOutcome, EditorState};
use crate::events::AuthOutcome;
use crate::keys::{map_confirm_key, map_form_key, map_key, Action, FormKey};
use crate::login::LoginForm;
use crate::nav::Route;
use crate::notifications::{self, Notification, NotificationLevel};
use crate::session::SessionStore;
use crate::theme::BoardTheme;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use kanban_core::{Column, Task, TaskId};

/// Focused column plus the focused row inside each column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardFocus {
    pub column: Column,
    rows: [usize; 4],
}

impl BoardFocus {
    pub fn row(&self, column: Column) -> usize {
        self.rows[column.index()]
    }

    pub fn set_row(&mut self, column: Column, row: usize) {
        self.rows[column.index()] = row;
    }
}

/// A card picked up with the keyboard and hovering over `hover`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub task_id: TaskId,
    pub source: Column,
    pub hover: Column,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDelete {
    pub task_id: TaskId,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInput {
    pub query: String,
}

pub struct App {
    pub config: TuiConfig,
    pub theme: BoardTheme,
    pub session: SessionStore,
    pub board: BoardSync,
    pub route: Route,
    pub focus: BoardFocus,
    pub drag: Option<DragState>,
    pub editor: Option<EditorState>,
    pub login: LoginForm,
    pub search: Option<SearchInput>,
    pub confirm: Option<ConfirmDelete>,
    pub help_visible: bool,
    pub notifications: Vec<Notification>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: TuiConfig, session: SessionStore) -> Self {
        let theme = BoardTheme::from_name(&config.theme.name);
        let board = BoardSync::new(config.page_size, config.sync.on_failure);
        let route = Route::for_session(session.snapshot());
        Self {
            config,
            theme,
            session,
            board,
            route,
            focus: BoardFocus::default(),
            drag: None,
            editor: None,
            login: LoginForm::new(),
            search: None,
            confirm: None,
            help_visible: false,
            notifications: Vec::new(),
            should_quit: false,
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        notifications::push(&mut self.notifications, Notification::new(level, message));
    }

    /// Bearer token for outgoing task requests, empty when signed out.
    pub fn token(&self) -> &str {
        self.session.token().unwrap_or("")
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let column = self.focus.column;
        self.board
            .column_tasks(column)
            .get(self.focus.row(column))
            .copied()
    }

    /// The next list fetch to run, if the board needs one.
    pub fn poll_fetch(&mut self) -> Option<Command> {
        if self.route != Route::Board {
            return None;
        }
        self.board.next_fetch().map(Command::Fetch)
    }

    pub fn tick(&mut self) {
        let now = Utc::now();
        self.notifications.retain(|n| !n.is_expired(now));
    }

    pub fn handle_key(&mut self, event: KeyEvent) -> Vec<Command> {
        if event.kind == KeyEventKind::Release {
            return Vec::new();
        }
        if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Vec::new();
        }
        match self.route {
            Route::Login => self.handle_login_key(event),
            Route::Board => self.handle_board_key(event),
        }
    }

    fn handle_login_key(&mut self, event: KeyEvent) -> Vec<Command> {
        let Some(key) = map_form_key(event) else {
            return Vec::new();
        };
        match self.login.handle(key) {
            Some(submit) => vec![Command::Authenticate(submit)],
            None => Vec::new(),
        }
    }

    fn handle_board_key(&mut self, event: KeyEvent) -> Vec<Command> {
        if self.help_visible {
            self.help_visible = false;
            return Vec::new();
        }
        if self.confirm.is_some() {
            return self.handle_confirm_key(event);
        }
        if self.editor.is_some() {
            return self.handle_editor_key(event);
        }
        if self.search.is_some() {
            self.handle_search_key(event);
            return Vec::new();
        }
        let Some(action) = map_key(event) else {
            return Vec::new();
        };
        if self.drag.is_some() {
            return self.handle_drag_action(action);
        }
        self.handle_action(action)
    }

    fn handle_action(&mut self, action: Action) -> Vec<Command> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::MoveLeft => self.focus_column(self.focus.column.previous()),
            Action::MoveRight => self.focus_column(self.focus.column.next()),
            Action::MoveUp => self.move_row(-1),
            Action::MoveDown => self.move_row(1),
            Action::PickUp => {
                if let Some(task) = self.selected_task() {
                    let column = self.focus.column;
                    self.drag = Some(DragState {
                        task_id: task.id,
                        source: column,
                        hover: column,
                    });
                }
            }
            Action::NewTask => self.editor = Some(EditorState::create()),
            Action::EditTask => {
                if let Some(task) = self.selected_task() {
                    self.editor = Some(EditorState::edit(task));
                }
            }
            Action::DeleteTask => {
                if let Some(task) = self.selected_task() {
                    self.confirm = Some(ConfirmDelete {
                        task_id: task.id,
                        title: task.title.clone(),
                    });
                }
            }
            Action::OpenSearch => {
                self.search = Some(SearchInput {
                    query: self.board.search().to_string(),
                });
            }
            Action::Refresh => {
                self.board.refresh();
                self.notify(NotificationLevel::Info, "Refreshing");
            }
            Action::Logout => self.logout(),
            Action::OpenHelp => self.help_visible = true,
            Action::Confirm | Action::Cancel => {}
        }
        Vec::new()
    }

    fn handle_drag_action(&mut self, action: Action) -> Vec<Command> {
        let Some(mut drag) = self.drag else {
            return Vec::new();
        };
        let destination = match action {
            Action::MoveLeft => {
                drag.hover = drag.hover.previous();
                self.drag = Some(drag);
                return Vec::new();
            }
            Action::MoveRight => {
                drag.hover = drag.hover.next();
                self.drag = Some(drag);
                return Vec::new();
            }
            Action::Confirm => Some(drag.hover),
            Action::Cancel => None,
            Action::Quit => {
                self.should_quit = true;
                return Vec::new();
            }
            _ => return Vec::new(),
        };
        self.drag = None;

        let request = self.board.on_drop(DropEvent {
            task_id: drag.task_id,
            source: drag.source,
            destination,
        });
        if destination.is_some() {
            self.follow_task(drag.task_id);
        }
        request.map(Command::Send).into_iter().collect()
    }

    fn handle_confirm_key(&mut self, event: KeyEvent) -> Vec<Command> {
        let Some(confirmed) = map_confirm_key(event) else {
            return Vec::new();
        };
        let Some(confirm) = self.confirm.take() else {
            return Vec::new();
        };
        self.board
            .remove(confirm.task_id, confirmed)
            .map(Command::Send)
            .into_iter()
            .collect()
    }

    fn handle_editor_key(&mut self, event: KeyEvent) -> Vec<Command> {
        let Some(key) = map_form_key(event) else {
            return Vec::new();
        };
        let Some(editor) = self.editor.as_mut() else {
            return Vec::new();
        };
        match editor.handle(key) {
            EditorOutcome::Continue => Vec::new(),
            EditorOutcome::Close => {
                self.editor = None;
                Vec::new()
            }
            EditorOutcome::Submit(draft) => {
                match self.board.create_or_update(editor.task_id(), draft) {
                    Ok(request) => {
                        editor.submitted(request.id);
                        vec![Command::Send(request)]
                    }
                    Err(err) => {
                        editor.error = Some(err.to_string());
                        Vec::new()
                    }
                }
            }
        }
    }

    fn handle_search_key(&mut self, event: KeyEvent) {
        let Some(key) = map_form_key(event) else {
            return;
        };
        match key {
            FormKey::Submit => {
                let query = self.search.take().map(|s| s.query).unwrap_or_default();
                self.apply_search(&query);
            }
            FormKey::Cancel => {
                self.search = None;
                self.apply_search("");
            }
            FormKey::Text(event) => {
                if let Some(search) = self.search.as_mut() {
                    match event.code {
                        KeyCode::Char(c) => search.query.push(c),
                        KeyCode::Backspace => {
                            search.query.pop();
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    fn apply_search(&mut self, query: &str) {
        if self.board.set_search(query) {
            self.focus = BoardFocus {
                column: self.focus.column,
                ..BoardFocus::default()
            };
        }
    }

    pub fn handle_completion(&mut self, completion: Completion) {
        let request = completion.request.id;
        let failure = completion.result.as_ref().err().cloned();
        let event = self.board.complete(completion);

        let mut close_editor = false;
        if let Some(editor) = self.editor.as_mut() {
            if editor.awaits(request) {
                match failure {
                    Some(reason) => editor.rejected(reason),
                    None => close_editor = true,
                }
            }
        }
        if close_editor {
            self.editor = None;
        }

        match event {
            SyncEvent::Moved { task_id, to } => {
                tracing::debug!(task_id, %to, "Move confirmed");
            }
            SyncEvent::Saved { created, .. } => {
                let message = if created { "Task created" } else { "Task updated" };
                self.notify(NotificationLevel::Success, message);
            }
            SyncEvent::Deleted { .. } => self.notify(NotificationLevel::Success, "Task deleted"),
            SyncEvent::Failed {
                action,
                reason,
                rolled_back,
                ..
            } => {
                let suffix = if rolled_back { " (reverted)" } else { "" };
                self.notify(
                    NotificationLevel::Error,
                    format!("Could not {}: {}{}", action, reason, suffix),
                );
            }
            SyncEvent::FetchFailed { reason } => {
                self.notify(NotificationLevel::Error, reason);
            }
        }
        self.clamp_focus();
    }

    pub fn handle_fetch(&mut self, fetched: FetchResult) {
        if let Some(SyncEvent::FetchFailed { reason }) = self.board.apply_fetch(fetched) {
            self.notify(
                NotificationLevel::Error,
                format!("Could not load tasks: {} (Ctrl-R to retry)", reason),
            );
        }
        self.clamp_focus();
    }

    pub fn handle_auth(&mut self, outcome: AuthOutcome) {
        let response = match outcome {
            Ok(response) => response,
            Err(reason) => {
                tracing::warn!(reason = %reason, "Authentication failed");
                self.login.finished(Some(reason));
                return;
            }
        };
        let name = response.user.display_name().to_string();
        if let Err(err) = self.session.login(response.user, response.token) {
            tracing::error!(error = %err, "Failed to persist session");
            self.login.finished(Some(format!("Could not save session: {}", err)));
            return;
        }
        self.login.finished(None);
        self.board.reset();
        self.focus = BoardFocus::default();
        self.route = Route::Board;
        self.notify(NotificationLevel::Success, format!("Signed in as {}", name));
    }

    pub fn logout(&mut self) {
        if let Err(err) = self.session.logout() {
            tracing::error!(error = %err, "Failed to persist sign-out");
            self.notify(NotificationLevel::Error, format!("Sign-out not saved: {}", err));
        }
        self.board.reset();
        self.focus = BoardFocus::default();
        self.drag = None;
        self.editor = None;
        self.search = None;
        self.confirm = None;
        self.login = LoginForm::new();
        self.route = Route::Login;
    }

    fn focus_column(&mut self, column: Column) {
        self.focus.column = column;
        self.clamp_focus();
    }

    fn move_row(&mut self, delta: isize) {
        let column = self.focus.column;
        let len = self.board.column_tasks(column).len();
        if len == 0 {
            return;
        }
        let row = self.focus.row(column) as isize + delta;
        self.focus.set_row(column, row.clamp(0, len as isize - 1) as usize);
    }

    /// Put focus on `task_id` wherever it now sits.
    fn follow_task(&mut self, task_id: TaskId) {
        let Some(task) = self.board.task(task_id) else {
            return;
        };
        let column = task.column;
        let row = self
            .board
            .column_tasks(column)
            .iter()
            .position(|t| t.id == task_id)
            .unwrap_or(0);
        self.focus.column = column;
        self.focus.set_row(column, row);
    }

    fn clamp_focus(&mut self) {
        for column in Column::ALL {
            let len = self.board.column_tasks(column).len();
            let row = self.focus.row(column).min(len.saturating_sub(1));
            self.focus.set_row(column, row);
        }
    }
}
