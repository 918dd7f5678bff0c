//! Sign-in / registration view.

use crate::login::LoginField;
use crate::state::App;
use crate::views::helpers::{centered_rect, render_field};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let form = &app.login;
    let fields = form.fields();
    let height = fields.len() as u16 * 3 + 6;
    let popup = centered_rect(50, height, area);

    let block = Block::default()
        .title(form.mode().title())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.primary));
    let inner = block.inner(popup);
    f.render_widget(Clear, popup);
    f.render_widget(block, popup);

    let mut constraints: Vec<Constraint> = fields.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (row, field) in fields.iter().enumerate() {
        let (title, input) = match field {
            LoginField::Username => ("Username", form.username()),
            LoginField::Email => ("Email", form.email()),
            LoginField::Password => ("Password", form.password()),
        };
        let border = if form.focus() == *field {
            Style::default().fg(app.theme.border_focus)
        } else {
            Style::default().fg(app.theme.border)
        };
        render_field(f, rows[row], title, input, border);
    }

    let (message, style) = match (&form.error, form.is_submitting()) {
        (_, true) => ("Signing in...".to_string(), Style::default().fg(app.theme.info)),
        (Some(error), false) => (error.clone(), Style::default().fg(app.theme.error)),
        (None, false) => (
            "Enter submit • Tab next field • F2 switch sign in/register".to_string(),
            Style::default().fg(app.theme.text_dim),
        ),
    };
    let status = Paragraph::new(message)
        .style(style)
        .wrap(Wrap { trim: true });
    f.render_widget(status, rows[fields.len()]);
}
