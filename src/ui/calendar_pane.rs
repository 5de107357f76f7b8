use crate::app::AppState;
use crate::domain::{relative_day_label, CalendarEvent, CalendarView};
use crate::ui::layout::split_even;
use crate::ui::styles::{
    border_style, cursor_border_style, default_style, event_style, muted_style, title_style,
    today_style,
};
use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Heading for the visible period
pub fn period_label(app: &AppState) -> String {
    let date = app.calendar.current_date;
    match app.calendar.view {
        CalendarView::Month => date.format("%B %Y").to_string(),
        CalendarView::Week => {
            let (start, end) = app.calendar.view_range();
            format!("{} - {}", start.format("%d %b"), end.format("%d %b %Y"))
        }
        CalendarView::Day => format!(
            "{} ({})",
            date.format("%A, %d %B %Y"),
            relative_day_label(date, app.today)
        ),
    }
}

/// Render the calendar pane for the active view
pub fn render_calendar_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let in_view = app.calendar.view_events();
    let mut title = format!(
        " {} · {} · {} ",
        period_label(app),
        app.calendar.view.name(),
        event_count_label(in_view.len())
    );
    if !app.calendar.search_query.is_empty() {
        title.push_str(&format!("· filter \"{}\" ", app.calendar.search_query));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(title, title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    match app.calendar.view {
        CalendarView::Month => render_month(f, app, inner),
        CalendarView::Week => render_week(f, app, &in_view, inner),
        CalendarView::Day => render_day(f, app, &in_view, inner),
    }
}

fn event_count_label(count: usize) -> String {
    match count {
        1 => "1 event".to_string(),
        n => format!("{} events", n),
    }
}

/// Events of `in_view` planned on `date`
fn on_day<'a>(in_view: &[&'a CalendarEvent], date: NaiveDate) -> Vec<&'a CalendarEvent> {
    in_view.iter().copied().filter(|e| e.planned_date == date).collect()
}

fn event_line(event: &CalendarEvent) -> Line<'static> {
    let marker = if event.completed { "✓ " } else { "• " };
    Line::from(Span::styled(
        format!("{}{}", marker, event.title),
        event_style(event.color, event.completed),
    ))
}

fn date_label_style(app: &AppState, date: NaiveDate, in_period: bool) -> ratatui::style::Style {
    if date == app.today {
        today_style()
    } else if in_period {
        default_style()
    } else {
        muted_style()
    }
}

fn render_month(f: &mut Frame, app: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    for (name, cell) in WEEKDAYS.iter().zip(split_even(chunks[0], Direction::Horizontal, 7)) {
        f.render_widget(Paragraph::new(Span::styled(format!(" {}", name), title_style())), cell);
    }

    let days = app.calendar.calendar_days();
    let weeks: Vec<&[NaiveDate]> = days.chunks(7).collect();
    let rows = split_even(chunks[1], Direction::Vertical, weeks.len());
    let month = app.calendar.current_date.month();

    for (week, row) in weeks.iter().zip(rows) {
        for (date, cell) in week.iter().zip(split_even(row, Direction::Horizontal, 7)) {
            render_day_cell(f, app, *date, cell, date.month() == month);
        }
    }
}

/// One cell of the month grid: day number plus as many events as fit
fn render_day_cell(f: &mut Frame, app: &AppState, date: NaiveDate, area: Rect, in_month: bool) {
    let is_cursor = date == app.calendar.current_date;
    let events = app.calendar.events_for_day(date);

    let mut lines = vec![Line::from(Span::styled(
        format!("{:>2}", date.day()),
        date_label_style(app, date, in_month),
    ))];

    let capacity = area.height.saturating_sub(3) as usize;
    if events.len() <= capacity {
        lines.extend(events.iter().map(|e| event_line(e)));
    } else if capacity > 0 {
        lines.extend(events.iter().take(capacity - 1).map(|e| event_line(e)));
        lines.push(Line::from(Span::styled(
            format!("+{} more", events.len() - (capacity - 1)),
            muted_style(),
        )));
    }

    let block = Block::default().borders(Borders::ALL).border_style(if is_cursor {
        cursor_border_style()
    } else {
        border_style()
    });
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_week(f: &mut Frame, app: &AppState, in_view: &[&CalendarEvent], area: Rect) {
    let days = app.calendar.week_days();
    for (date, column) in days.iter().zip(split_even(area, Direction::Horizontal, 7)) {
        let header = Span::styled(
            format!(" {} {} ", date.format("%a"), date.format("%d")),
            date_label_style(app, *date, true),
        );
        let lines: Vec<Line> = on_day(in_view, *date).into_iter().map(event_line).collect();

        let border = if *date == app.calendar.current_date {
            cursor_border_style()
        } else {
            border_style()
        };
        let block = Block::default().borders(Borders::ALL).border_style(border).title(header);
        f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), column);
    }
}

fn render_day(f: &mut Frame, app: &AppState, in_view: &[&CalendarEvent], area: Rect) {
    let events = on_day(in_view, app.calendar.current_date);
    let mut lines = Vec::new();

    if events.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nothing planned. Press a to add an event.",
            muted_style(),
        )));
    }

    for event in events {
        lines.push(event_line(event));
        if let Some(description) = &event.description {
            lines.push(Line::raw(format!("    {}", description)));
        }
        let mut meta = format!("    due {}", relative_day_label(event.due_date, app.today));
        if let Some(minutes) = event.reminder_minutes {
            meta.push_str(&format!(" · reminder {} min before", minutes));
        }
        lines.push(Line::from(Span::styled(meta, muted_style())));
        lines.push(Line::raw(""));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::persistence::MemoryStorage;

    fn create_test_app() -> AppState {
        let today = NaiveDate::from_ymd_opt(2024, 4, 10).unwrap();
        AppState::new(Box::new(MemoryStorage::new()), Config::default(), today).unwrap()
    }

    #[test]
    fn test_period_label() {
        let mut app = create_test_app();
        assert_eq!(period_label(&app), "April 2024");

        app.set_view(CalendarView::Week);
        assert_eq!(period_label(&app), "08 Apr - 14 Apr 2024");

        app.set_view(CalendarView::Day);
        assert_eq!(period_label(&app), "Wednesday, 10 April 2024 (Today)");
    }

    #[test]
    fn test_event_count_label() {
        assert_eq!(event_count_label(0), "0 events");
        assert_eq!(event_count_label(1), "1 event");
        assert_eq!(event_count_label(3), "3 events");
    }

    #[test]
    fn test_on_day_picks_from_view_window() {
        let mut app = create_test_app();
        let today = app.today;
        app.calendar.add(crate::domain::EventDraft::on("Today", today)).unwrap();
        let tomorrow = today.succ_opt().unwrap();
        app.calendar.add(crate::domain::EventDraft::on("Tomorrow", tomorrow)).unwrap();
        app.set_view(CalendarView::Week);

        let in_view = app.calendar.view_events();
        assert_eq!(in_view.len(), 2);
        let titles: Vec<&str> = on_day(&in_view, today).iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Today"]);
    }
}
