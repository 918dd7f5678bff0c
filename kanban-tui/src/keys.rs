//! Keybinding definitions for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Board-level actions. Forms and the search prompt take raw keys through
/// [`map_form_key`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    /// Pick up the focused card for a keyboard drag.
    PickUp,
    Confirm,
    Cancel,
    NewTask,
    EditTask,
    DeleteTask,
    OpenSearch,
    Refresh,
    Logout,
    OpenHelp,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent {
        code,
        modifiers,
        kind,
        ..
    } = event;
    if kind == KeyEventKind::Release {
        return None;
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::OpenHelp),
        KeyCode::Char('/') => Some(Action::OpenSearch),
        KeyCode::Char('n') => Some(Action::NewTask),
        KeyCode::Char('e') => Some(Action::EditTask),
        KeyCode::Char('d') => Some(Action::DeleteTask),
        KeyCode::Char('L') => Some(Action::Logout),
        KeyCode::Char(' ') => Some(Action::PickUp),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::MoveRight),
        _ => None,
    }
}

/// Keys inside a modal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKey {
    Submit,
    Cancel,
    NextField,
    PrevField,
    /// F2: switch the login form between sign-in and registration.
    ToggleMode,
    Left,
    Right,
    /// Anything else goes to the focused text field.
    Text(KeyEvent),
}

pub fn map_form_key(event: KeyEvent) -> Option<FormKey> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') => Some(FormKey::Cancel),
            _ => Some(FormKey::Text(event)),
        };
    }
    let key = match event.code {
        KeyCode::Enter => FormKey::Submit,
        KeyCode::Esc => FormKey::Cancel,
        KeyCode::Tab => FormKey::NextField,
        KeyCode::BackTab => FormKey::PrevField,
        KeyCode::F(2) => FormKey::ToggleMode,
        KeyCode::Left => FormKey::Left,
        KeyCode::Right => FormKey::Right,
        _ => FormKey::Text(event),
    };
    Some(key)
}

/// Confirmation prompt answers.
pub fn map_confirm_key(event: KeyEvent) -> Option<bool> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    match event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(false),
        _ => None,
    }
}
