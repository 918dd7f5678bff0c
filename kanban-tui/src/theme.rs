//! Board themes and color utilities.

use crate::board::MoveState;
use kanban_core::Column;
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct BoardTheme {
    pub bg_highlight: Color,
    pub primary: Color,
    pub secondary: Color,
    pub tertiary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl BoardTheme {
    /// Theme for a validated `theme.name`. Unknown names fall back to neon.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "mono" => Self::mono(),
            _ => Self::neon(),
        }
    }

    pub fn neon() -> Self {
        Self {
            bg_highlight: Color::Rgb(42, 42, 42),
            primary: Color::Rgb(0, 255, 255),
            secondary: Color::Rgb(255, 0, 255),
            tertiary: Color::Rgb(255, 255, 0),
            success: Color::Rgb(0, 255, 0),
            warning: Color::Rgb(255, 255, 0),
            error: Color::Rgb(255, 0, 0),
            info: Color::Rgb(0, 255, 255),
            text: Color::Rgb(255, 255, 255),
            text_dim: Color::Rgb(136, 136, 136),
            border: Color::Rgb(68, 68, 68),
            border_focus: Color::Rgb(0, 255, 255),
        }
    }

    /// Plain ANSI colors for terminals without truecolor.
    pub fn mono() -> Self {
        Self {
            bg_highlight: Color::DarkGray,
            primary: Color::White,
            secondary: Color::White,
            tertiary: Color::Gray,
            success: Color::White,
            warning: Color::Gray,
            error: Color::White,
            info: Color::Gray,
            text: Color::White,
            text_dim: Color::DarkGray,
            border: Color::DarkGray,
            border_focus: Color::White,
        }
    }
}

pub fn column_color(column: Column, theme: &BoardTheme) -> Color {
    match column {
        Column::Backlog => theme.text_dim,
        Column::InProgress => theme.primary,
        Column::Review => theme.secondary,
        Column::Done => theme.success,
    }
}

/// Marker shown next to a card while its move is unsettled.
pub fn move_marker(state: Option<&MoveState>, theme: &BoardTheme) -> Option<(&'static str, Color)> {
    match state? {
        MoveState::Pending { .. } => Some(("…", theme.warning)),
        MoveState::Reconciled => Some(("✓", theme.success)),
        MoveState::Diverged { .. } => Some(("!", theme.error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(BoardTheme::from_name(" MONO ").border, Color::DarkGray);
        assert_eq!(BoardTheme::from_name("neon").primary, Color::Rgb(0, 255, 255));
    }

    #[test]
    fn test_idle_card_has_no_marker() {
        assert!(move_marker(None, &BoardTheme::neon()).is_none());
        let diverged = MoveState::Diverged {
            reason: "boom".to_string(),
        };
        let (marker, _) = move_marker(Some(&diverged), &BoardTheme::neon()).unwrap();
        assert_eq!(marker, "!");
    }
}
