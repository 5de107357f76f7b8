use crate::domain::{EventColor, NodeColor};
use ratatui::style::{Color, Modifier, Style};

/// Default text style
pub fn default_style() -> Style {
    Style::default().fg(Color::White)
}

/// Selected row highlight style
pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}

/// Running timer style
pub fn running_style() -> Style {
    Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
}

/// Paused timer style
pub fn paused_style() -> Style {
    Style::default().fg(Color::Yellow)
}

/// Dimmed text (days outside the month, empty hints)
pub fn muted_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Title style for panes
pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Border style
pub fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Border of the focused day cell
pub fn cursor_border_style() -> Style {
    Style::default()
        .fg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}

/// Today's date label
pub fn today_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Modal background style
pub fn modal_bg_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

/// Modal title style
pub fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Keybinding hint style
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Pomodoro gauge style
pub fn gauge_style() -> Style {
    Style::default().fg(Color::Green).bg(Color::DarkGray)
}

/// Error message style
pub fn error_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Informational toast style
pub fn info_style() -> Style {
    Style::default().fg(Color::Green)
}

/// Completed event style
pub fn done_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::CROSSED_OUT)
}

pub fn event_color(color: EventColor) -> Color {
    match color {
        EventColor::Blue => Color::Blue,
        EventColor::Pink => Color::LightMagenta,
        EventColor::Green => Color::Green,
        EventColor::Purple => Color::Magenta,
        EventColor::Orange => Color::LightRed,
        EventColor::Yellow => Color::Yellow,
    }
}

pub fn node_color(color: NodeColor) -> Color {
    match color {
        NodeColor::Blue => Color::LightBlue,
        NodeColor::Purple => Color::Magenta,
        NodeColor::Green => Color::LightGreen,
        NodeColor::Orange => Color::LightRed,
        NodeColor::Pink => Color::LightMagenta,
    }
}

/// Style for an event entry in lists and cells
pub fn event_style(color: EventColor, completed: bool) -> Style {
    if completed {
        done_style()
    } else {
        Style::default().fg(event_color(color))
    }
}
