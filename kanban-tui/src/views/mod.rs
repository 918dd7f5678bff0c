//! View rendering dispatch.

pub mod board;
pub mod editor;
pub mod helpers;
pub mod login;
pub mod overlays;

use crate::nav::Route;
use crate::notifications::NotificationLevel;
use crate::state::App;
use crate::widgets::{SearchBar, StatusIndicator};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    match app.route {
        Route::Login => login::render(f, app, layout[1]),
        Route::Board => {
            board::render(f, app, layout[1]);
            if let Some(search) = &app.search {
                let bar = SearchBar {
                    query: &search.query,
                    prompt_style: Style::default().fg(app.theme.primary),
                    text_style: Style::default().fg(app.theme.text),
                };
                let area = Rect {
                    height: 3.min(layout[1].height),
                    ..layout[1]
                };
                bar.render(f, area);
            }
            if let Some(editor) = &app.editor {
                editor::render(f, app, editor, layout[1]);
            }
            if let Some(confirm) = &app.confirm {
                overlays::render_confirm(f, app, confirm, layout[1]);
            }
            if app.help_visible {
                overlays::render_help(f, app, layout[1]);
            }
        }
    }

    render_footer(f, app, layout[2]);
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(32)])
        .split(area);

    let user = app
        .session
        .user()
        .map(|u| u.display_name().to_string())
        .unwrap_or_else(|| "signed out".to_string());
    let mut title = format!("KANBAN | {} | {}", app.route.title(), user);
    if !app.board.search().is_empty() {
        title.push_str(&format!(" | search: {}", app.board.search()));
    }
    let block = Block::default().borders(Borders::ALL).title(Span::styled(
        title,
        Style::default().fg(app.theme.primary),
    ));
    f.render_widget(block, chunks[0]);

    let (status, color) = sync_status(app);
    let indicator = StatusIndicator {
        title: "Sync".to_string(),
        status,
        style: Style::default().fg(color),
    };
    indicator.render(f, chunks[1]);
}

fn sync_status(app: &App) -> (String, Color) {
    let pending = app.board.pending_moves();
    let diverged = app.board.diverged_moves();
    if diverged > 0 {
        (format!("{} unsaved move(s)", diverged), app.theme.error)
    } else if pending > 0 {
        (format!("{} move(s) pending", pending), app.theme.warning)
    } else if app.board.is_fetching() {
        ("refreshing".to_string(), app.theme.info)
    } else {
        ("in sync".to_string(), app.theme.success)
    }
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let help = match app.route {
        Route::Login => "Enter submit • Tab next field • F2 register • Ctrl-C quit",
        Route::Board if app.drag.is_some() => "h/l choose column • Enter drop • Esc cancel",
        Route::Board => {
            "h/j/k/l move • space drag • n new • e edit • d delete • / search • ? help • q quit"
        }
    };
    let (text, style) = if let Some(note) = app.notifications.last() {
        let color = match note.level {
            NotificationLevel::Info => app.theme.info,
            NotificationLevel::Warning => app.theme.warning,
            NotificationLevel::Error => app.theme.error,
            NotificationLevel::Success => app.theme.success,
        };
        (
            format!("{}: {}", note.level.label(), note.message),
            Style::default().fg(color),
        )
    } else {
        (help.to_string(), Style::default().fg(app.theme.text_dim))
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}
