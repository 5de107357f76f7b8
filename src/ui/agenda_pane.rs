use crate::app::AppState;
use crate::domain::relative_day_label;
use crate::ui::styles::{
    border_style, done_style, event_style, muted_style, selected_style, title_style,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Sidebar: events of the cursor day above the upcoming agenda
pub fn render_agenda_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_day_list(f, app, chunks[0]);
    render_agenda(f, app, chunks[1]);
}

/// Selectable list of the cursor day's events
fn render_day_list(f: &mut Frame, app: &AppState, area: Rect) {
    let events = app.day_events();
    let items: Vec<ListItem> = events
        .iter()
        .enumerate()
        .map(|(idx, event)| {
            let marker = if event.completed { "[x] " } else { "[ ] " };
            let style = if idx == app.selected_event {
                selected_style()
            } else {
                event_style(event.color, event.completed)
            };
            ListItem::new(Line::from(Span::styled(format!("{}{}", marker, event.title), style)))
        })
        .collect();

    let title = format!(
        " {} ({}) ",
        relative_day_label(app.calendar.current_date, app.today),
        events.len()
    );
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(title, title_style())),
    );
    f.render_widget(list, area);
}

/// Open events grouped by due date, then completed ones
fn render_agenda(f: &mut Frame, app: &AppState, area: Rect) {
    let mut lines = Vec::new();
    let groups = app.calendar.agenda_groups();

    if groups.is_empty() {
        lines.push(Line::from(Span::styled("No open events", muted_style())));
    }

    for (date, events) in groups {
        lines.push(Line::from(Span::styled(relative_day_label(date, app.today), title_style())));
        for event in events {
            lines.push(Line::from(Span::styled(
                format!("  {}", event.title),
                event_style(event.color, false),
            )));
        }
    }

    let completed = app.calendar.completed_events();
    if !completed.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            format!("Completed ({})", completed.len()),
            title_style(),
        )));
        for event in completed {
            lines.push(Line::from(Span::styled(format!("  {}", event.title), done_style())));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(" Agenda ", title_style())),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
