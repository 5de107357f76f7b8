use crate::domain::{CalendarEvent, CalendarStore};
use crate::persistence::{atomic_write, load_events, Storage};
use anyhow::Result;
use chrono::NaiveDate;
use std::path::Path;

const SEPARATOR: &str = "--------------------------------------------------";

/// Render the open tasks planned for `date` as plain text
pub fn render_agenda(date: NaiveDate, events: &[&CalendarEvent]) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Agenda for {}\n\n", date.format("%A, %d %B %Y")));

    if events.is_empty() {
        out.push_str("Nothing planned.\n");
        return out;
    }

    for event in events {
        out.push_str(&format!("** {}\n", event.title));
        if let Some(description) = &event.description {
            out.push_str(&format!("{}\n", description));
        }
        out.push_str(&format!("Due: {}\n", event.due_date.format("%A, %d %B %Y")));
        if event.due_date != event.planned_date {
            out.push_str(&format!("Planned: {}\n", event.planned_date.format("%A, %d %B %Y")));
        }
        if let Some(minutes) = event.reminder_minutes {
            out.push_str(&format!("Reminder: {} min before\n", minutes));
        }
        out.push_str(SEPARATOR);
        out.push('\n');
    }

    out
}

/// Build the agenda for `date` from storage; write it to `output` when
/// given, and return the text either way. Storage is only read.
pub fn generate_agenda<S: Storage + ?Sized>(
    storage: &S,
    date: NaiveDate,
    output: Option<&Path>,
) -> Result<String> {
    let events = load_events(storage)?;
    let store = CalendarStore::new(events, date);
    let open = store.planned_open_on(date);
    log::info!("event=agenda date={} open_tasks={}", date, open.len());

    let text = render_agenda(date, &open);
    if let Some(path) = output {
        atomic_write(path, &text)?;
    }
    Ok(text)
}
