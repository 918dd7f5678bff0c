//! Four-column board view.

use crate::board::{group_by_column, MoveState};
use crate::state::App;
use crate::theme::{column_color, move_marker};
use crate::widgets::DetailPanel;
use kanban_core::Column;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(8)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[0]);

    if app.board.is_loading() {
        let loading = Paragraph::new("Loading tasks...")
            .style(Style::default().fg(app.theme.text_dim))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(loading, rows[0]);
    } else {
        for column in Column::ALL {
            render_column(f, app, column, columns[column.index()]);
        }
    }

    render_detail(f, app, rows[1]);
}

fn render_column(f: &mut Frame<'_>, app: &App, column: Column, area: Rect) {
    let tasks = group_by_column(app.board.tasks(), column);
    let dragged = app.drag.map(|d| d.task_id);

    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let mut spans = Vec::new();
            if let Some((marker, color)) = move_marker(app.board.move_state(task.id), &app.theme)
            {
                spans.push(Span::styled(format!("{} ", marker), Style::default().fg(color)));
            }
            let style = if Some(task.id) == dragged {
                Style::default()
                    .fg(app.theme.tertiary)
                    .add_modifier(Modifier::ITALIC)
            } else {
                Style::default().fg(app.theme.text)
            };
            spans.push(Span::styled(task.title.clone(), style));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let focused = app.focus.column == column;
    let hovered = app.drag.map_or(false, |d| d.hover == column);
    let border = if hovered {
        Style::default().fg(app.theme.tertiary)
    } else if focused {
        Style::default().fg(app.theme.border_focus)
    } else {
        Style::default().fg(app.theme.border)
    };
    let title = Span::styled(
        format!(" {} ({}) ", column, tasks.len()),
        Style::default()
            .fg(column_color(column, &app.theme))
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default();
    if focused && !tasks.is_empty() {
        state.select(Some(app.focus.row(column)));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border),
        )
        .highlight_style(Style::default().bg(app.theme.bg_highlight))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut state);
}

fn render_detail(f: &mut Frame<'_>, app: &App, area: Rect) {
    let mut fields = Vec::new();
    let mut body = None;
    if let Some(task) = app.selected_task() {
        fields.push(("Task", format!("#{} {}", task.id, task.title)));
        fields.push(("Column", task.column.to_string()));
        if let Some(state) = app.board.move_state(task.id) {
            fields.push(("Sync", describe_move(state)));
        }
        body = task.description_text();
    }
    let detail = DetailPanel {
        title: "Details",
        fields,
        body,
        style: Style::default().fg(app.theme.secondary),
    };
    detail.render(f, area);
}

fn describe_move(state: &MoveState) -> String {
    match state {
        MoveState::Pending { from, to, .. } => format!("moving {} -> {}", from, to),
        MoveState::Reconciled => "saved, refreshing".to_string(),
        MoveState::Diverged { reason } => format!("not saved: {}", reason),
    }
}
