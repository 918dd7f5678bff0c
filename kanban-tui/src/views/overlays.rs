//! Confirmation and help popups.

use crate::state::{App, ConfirmDelete};
use crate::views::helpers::centered_rect;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const HELP: &[(&str, &str)] = &[
    ("h/l ←/→", "focus column"),
    ("j/k ↑/↓", "focus card"),
    ("space", "pick up card, then h/l and Enter to drop, Esc to cancel"),
    ("n", "new task"),
    ("e", "edit task"),
    ("d", "delete task"),
    ("/", "search (Enter apply, Esc clear)"),
    ("Ctrl-R", "refresh"),
    ("L", "sign out"),
    ("q", "quit"),
];

pub fn render_confirm(f: &mut Frame<'_>, app: &App, confirm: &ConfirmDelete, area: Rect) {
    let popup = centered_rect(50, 5, area);
    let text = vec![
        Line::from(format!("Delete \"{}\"?", confirm.title)),
        Line::from("y confirm • n cancel"),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Confirm")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.error)),
        );
    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

pub fn render_help(f: &mut Frame<'_>, app: &App, area: Rect) {
    let popup = centered_rect(60, HELP.len() as u16 + 2, area);
    let lines: Vec<Line> = HELP
        .iter()
        .map(|(keys, action)| Line::from(format!("{:<10} {}", keys, action)))
        .collect();
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title("Keybindings")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.primary)),
    );
    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
