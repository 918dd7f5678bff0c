//! Task editor modal state.

use crate::board::RequestId;
use crate::keys::FormKey;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use kanban_core::{Column, Task, TaskDraft, TaskId};
use ratatui::style::{Modifier, Style};
use tui_textarea::TextArea;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Title,
    Description,
    Column,
}

impl EditorField {
    fn next(self) -> EditorField {
        match self {
            EditorField::Title => EditorField::Description,
            EditorField::Description => EditorField::Column,
            EditorField::Column => EditorField::Title,
        }
    }

    fn previous(self) -> EditorField {
        match self {
            EditorField::Title => EditorField::Column,
            EditorField::Description => EditorField::Title,
            EditorField::Column => EditorField::Description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorOutcome {
    Continue,
    Submit(TaskDraft),
    Close,
}

pub struct EditorState {
    task_id: Option<TaskId>,
    title: TextArea<'static>,
    description: TextArea<'static>,
    column: Column,
    focus: EditorField,
    pub error: Option<String>,
    in_flight: Option<RequestId>,
}

impl EditorState {
    /// Empty editor for a new task.
    pub fn create() -> Self {
        Self::with_draft(None, TaskDraft::default())
    }

    /// Editor pre-filled from an existing task.
    pub fn edit(task: &Task) -> Self {
        Self::with_draft(Some(task.id), TaskDraft::from_task(task))
    }

    fn with_draft(task_id: Option<TaskId>, draft: TaskDraft) -> Self {
        let mut state = Self {
            task_id,
            title: text_field(&draft.title),
            description: text_field(&draft.description),
            column: draft.column,
            focus: EditorField::Title,
            error: None,
            in_flight: None,
        };
        state.sync_cursors();
        state
    }

    pub fn task_id(&self) -> Option<TaskId> {
        self.task_id
    }

    pub fn is_create(&self) -> bool {
        self.task_id.is_none()
    }

    pub fn title(&self) -> &TextArea<'static> {
        &self.title
    }

    pub fn description(&self) -> &TextArea<'static> {
        &self.description
    }

    pub fn column(&self) -> Column {
        self.column
    }

    pub fn focus(&self) -> EditorField {
        self.focus
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn draft(&self) -> TaskDraft {
        TaskDraft::new(
            field_text(&self.title),
            field_text(&self.description),
            self.column,
        )
    }

    /// Remember the request carrying this editor's submit.
    pub fn submitted(&mut self, request: RequestId) {
        self.error = None;
        self.in_flight = Some(request);
    }

    pub fn awaits(&self, request: RequestId) -> bool {
        self.in_flight == Some(request)
    }

    /// The submit failed; keep the form open with the reason.
    pub fn rejected(&mut self, reason: impl Into<String>) {
        self.in_flight = None;
        self.error = Some(reason.into());
    }

    pub fn handle(&mut self, key: FormKey) -> EditorOutcome {
        match key {
            FormKey::Cancel => return EditorOutcome::Close,
            FormKey::NextField => self.set_focus(self.focus.next()),
            FormKey::PrevField => self.set_focus(self.focus.previous()),
            FormKey::Submit => match self.focus {
                EditorField::Description => {
                    self.description.input(plain(KeyCode::Enter));
                }
                EditorField::Title | EditorField::Column => {
                    if self.in_flight.is_some() {
                        return EditorOutcome::Continue;
                    }
                    return EditorOutcome::Submit(self.draft());
                }
            },
            FormKey::Left => match self.focus {
                EditorField::Column => self.column = self.column.cycle_previous(),
                _ => self.input(plain(KeyCode::Left)),
            },
            FormKey::Right => match self.focus {
                EditorField::Column => self.column = self.column.cycle_next(),
                _ => self.input(plain(KeyCode::Right)),
            },
            FormKey::Text(event) => self.input(event),
            FormKey::ToggleMode => {}
        }
        EditorOutcome::Continue
    }

    fn input(&mut self, event: KeyEvent) {
        match self.focus {
            EditorField::Title => {
                self.title.input(event);
            }
            EditorField::Description => {
                self.description.input(event);
            }
            EditorField::Column => {}
        }
    }

    fn set_focus(&mut self, focus: EditorField) {
        self.focus = focus;
        self.sync_cursors();
    }

    fn sync_cursors(&mut self) {
        set_focused(&mut self.title, self.focus == EditorField::Title);
        set_focused(&mut self.description, self.focus == EditorField::Description);
    }
}

pub(crate) fn text_field(initial: &str) -> TextArea<'static> {
    let lines: Vec<String> = if initial.is_empty() {
        vec![String::new()]
    } else {
        initial.lines().map(str::to_string).collect()
    };
    let mut area = TextArea::new(lines);
    area.set_cursor_line_style(Style::default());
    area.move_cursor(tui_textarea::CursorMove::Bottom);
    area.move_cursor(tui_textarea::CursorMove::End);
    area
}

pub(crate) fn field_text(area: &TextArea<'_>) -> String {
    area.lines().join("\n")
}

/// Only the focused field shows a cursor.
pub(crate) fn set_focused(area: &mut TextArea<'_>, focused: bool) {
    let style = if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    area.set_cursor_style(style);
}

fn plain(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}
