//! Task editor modal.

use crate::editor::{EditorField, EditorState};
use crate::state::App;
use crate::theme::column_color;
use crate::views::helpers::{centered_rect, render_field};
use kanban_core::Column;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, editor: &EditorState, area: Rect) {
    let popup = centered_rect(70, 18, area);
    let title = if editor.is_create() {
        "New task".to_string()
    } else {
        format!("Edit task #{}", editor.task_id().unwrap_or_default())
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.secondary));
    let inner = block.inner(popup);
    f.render_widget(Clear, popup);
    f.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(inner);

    let border = |field: EditorField| {
        if editor.focus() == field {
            Style::default().fg(app.theme.border_focus)
        } else {
            Style::default().fg(app.theme.border)
        }
    };
    render_field(f, rows[0], "Title", editor.title(), border(EditorField::Title));
    render_field(
        f,
        rows[1],
        "Description",
        editor.description(),
        border(EditorField::Description),
    );

    let spans: Vec<Span> = Column::ALL
        .iter()
        .map(|column| {
            let style = if *column == editor.column() {
                Style::default()
                    .fg(column_color(*column, &app.theme))
                    .add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(app.theme.text_dim)
            };
            Span::styled(format!(" {} ", column), style)
        })
        .collect();
    let selector = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title("Column (←/→)")
            .borders(Borders::ALL)
            .border_style(border(EditorField::Column)),
    );
    f.render_widget(selector, rows[2]);

    let (message, style) = match (&editor.error, editor.is_submitting()) {
        (_, true) => ("Saving...".to_string(), Style::default().fg(app.theme.info)),
        (Some(error), false) => (error.clone(), Style::default().fg(app.theme.error)),
        (None, false) => (
            "Enter save • Tab next field • Esc close".to_string(),
            Style::default().fg(app.theme.text_dim),
        ),
    };
    f.render_widget(Paragraph::new(message).style(style), rows[3]);
}
