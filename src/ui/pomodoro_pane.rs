use crate::app::AppState;
use crate::domain::{PomodoroState, SessionKind};
use crate::ui::styles::{
    border_style, default_style, gauge_style, muted_style, paused_style, running_style,
    title_style,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Status label for the timer
fn state_label(state: PomodoroState) -> &'static str {
    match state {
        PomodoroState::Work => "Focus",
        PomodoroState::ShortBreak => "Short break",
        PomodoroState::LongBreak => "Long break",
        PomodoroState::Paused => "Paused",
    }
}

/// Render the Pomodoro timer pane
pub fn render_pomodoro_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let timer = &app.pomodoro;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(format!(" Pomodoro · {} ", timer.kind().label()), title_style()));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30), // Spacing
            Constraint::Length(1),      // Mode tabs
            Constraint::Length(1),      // Spacing
            Constraint::Length(1),      // Time
            Constraint::Length(1),      // State
            Constraint::Length(1),      // Spacing
            Constraint::Length(1),      // Gauge
            Constraint::Length(1),      // Spacing
            Constraint::Min(4),         // Stats and settings
        ])
        .split(block.inner(area));
    f.render_widget(block, area);

    let modes: Vec<Span> = [SessionKind::Work, SessionKind::ShortBreak, SessionKind::LongBreak]
        .iter()
        .enumerate()
        .map(|(idx, kind)| {
            let style = if *kind == timer.kind() { title_style() } else { muted_style() };
            Span::styled(format!("  [{}] {}  ", idx + 1, kind.label()), style)
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(modes)).alignment(Alignment::Center), chunks[1]);

    let state = timer.state();
    let state_style = if timer.is_running() { running_style() } else { paused_style() };
    let clock = Span::styled(timer.formatted_time(), state_style);
    f.render_widget(Paragraph::new(clock).alignment(Alignment::Center), chunks[3]);
    f.render_widget(
        Paragraph::new(Span::styled(state_label(state), state_style)).alignment(Alignment::Center),
        chunks[4],
    );

    let gauge_area = centered_width(chunks[6], 60);
    let gauge = Gauge::default()
        .gauge_style(gauge_style())
        .percent(timer.progress().clamp(0.0, 100.0) as u16)
        .label(format!("{:.0}%", timer.progress()));
    f.render_widget(gauge, gauge_area);

    let settings = timer.settings();
    let lines = vec![
        Line::from(vec![
            Span::styled("Completed sessions: ", default_style()),
            Span::styled(timer.completed_sessions().to_string(), title_style()),
        ]),
        Line::raw(""),
        Line::from(Span::styled(
            format!(
                "Work {}m · Short break {}m · Long break {}m · Long break every {} sessions",
                settings.work_minutes,
                settings.short_break_minutes,
                settings.long_break_minutes,
                settings.sessions_until_long_break
            ),
            muted_style(),
        )),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), chunks[8]);
}

/// Horizontally centered slice of `area`, `percent` wide
fn centered_width(area: Rect, percent: u16) -> Rect {
    let side = (100 - percent.min(100)) / 2;
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(side),
            Constraint::Percentage(percent),
            Constraint::Percentage(side),
        ])
        .split(area)[1]
}
