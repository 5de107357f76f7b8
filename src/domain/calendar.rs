use super::enums::{CalendarView, NavDirection};
use super::error::StoreError;
use super::event::{CalendarEvent, EventDraft, EventPatch};
use chrono::{Datelike, Duration, Months, NaiveDate};
use std::collections::BTreeMap;
use uuid::Uuid;

/// First day of the month containing `date`
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let first = start_of_month(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first)
}

/// Monday on or before `date`
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Sunday on or after `date`
pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    start_of_week(date) + Duration::days(6)
}

/// Human label for a date relative to `today`
pub fn relative_day_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%d %b %Y").to_string(),
    }
}

/// In-memory calendar state: the full event collection plus the view
/// selection (date, view kind, search query).
#[derive(Debug, Clone)]
pub struct CalendarStore {
    events: Vec<CalendarEvent>,
    pub current_date: NaiveDate,
    pub view: CalendarView,
    pub search_query: String,
}

impl CalendarStore {
    pub fn new(events: Vec<CalendarEvent>, today: NaiveDate) -> Self {
        Self {
            events,
            current_date: today,
            view: CalendarView::Month,
            search_query: String::new(),
        }
    }

    /// Replace the whole collection (load-all)
    pub fn load(&mut self, events: Vec<CalendarEvent>) {
        self.events = events;
    }

    /// Every event, ignoring the search query (what gets persisted)
    pub fn all_events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn get(&self, id: Uuid) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Events matching the search query; a blank query matches everything
    pub fn filtered_events(&self) -> Vec<&CalendarEvent> {
        let query = self.search_query.trim();
        if query.is_empty() {
            return self.events.iter().collect();
        }
        let needle = query.to_lowercase();
        self.events.iter().filter(|e| e.matches(&needle)).collect()
    }

    /// Inclusive date window for the active view
    pub fn view_range(&self) -> (NaiveDate, NaiveDate) {
        match self.view {
            CalendarView::Month => {
                (start_of_month(self.current_date), end_of_month(self.current_date))
            }
            CalendarView::Week => {
                (start_of_week(self.current_date), end_of_week(self.current_date))
            }
            CalendarView::Day => (self.current_date, self.current_date),
        }
    }

    /// Filtered events whose planned date falls inside the active view
    pub fn view_events(&self) -> Vec<&CalendarEvent> {
        let (start, end) = self.view_range();
        self.filtered_events()
            .into_iter()
            .filter(|e| e.planned_date >= start && e.planned_date <= end)
            .collect()
    }

    /// Whole weeks (Monday..Sunday) covering the current month.
    /// Empty outside the month view.
    pub fn calendar_days(&self) -> Vec<NaiveDate> {
        if self.view != CalendarView::Month {
            return Vec::new();
        }
        let first = start_of_week(start_of_month(self.current_date));
        let last = end_of_week(end_of_month(self.current_date));
        first.iter_days().take_while(|d| *d <= last).collect()
    }

    /// Days shown by the week view
    pub fn week_days(&self) -> Vec<NaiveDate> {
        let first = start_of_week(self.current_date);
        first.iter_days().take(7).collect()
    }

    /// Filtered events planned on `date`
    pub fn events_for_day(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        self.filtered_events()
            .into_iter()
            .filter(|e| e.planned_date == date)
            .collect()
    }

    /// Open (not completed) events planned on `date`, sorted by title
    pub fn planned_open_on(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        let mut open: Vec<&CalendarEvent> = self
            .events
            .iter()
            .filter(|e| e.planned_date == date && !e.completed)
            .collect();
        open.sort_by_key(|e| e.title.to_lowercase());
        open
    }

    /// Incomplete filtered events grouped by due date (ascending),
    /// each group sorted by title
    pub fn agenda_groups(&self) -> Vec<(NaiveDate, Vec<&CalendarEvent>)> {
        let mut groups: BTreeMap<NaiveDate, Vec<&CalendarEvent>> = BTreeMap::new();
        for event in self.filtered_events().into_iter().filter(|e| !e.completed) {
            groups.entry(event.due_date).or_default().push(event);
        }
        groups
            .into_iter()
            .map(|(date, mut events)| {
                events.sort_by_key(|e| e.title.to_lowercase());
                (date, events)
            })
            .collect()
    }

    /// Completed filtered events, in stored order
    pub fn completed_events(&self) -> Vec<&CalendarEvent> {
        self.filtered_events()
            .into_iter()
            .filter(|e| e.completed)
            .collect()
    }

    /// Move the view window backwards or forwards
    pub fn navigate(&mut self, direction: NavDirection) {
        self.current_date = match (self.view, direction) {
            (CalendarView::Month, NavDirection::Next) => start_of_month(self.current_date)
                .checked_add_months(Months::new(1))
                .unwrap_or(self.current_date),
            (CalendarView::Month, NavDirection::Prev) => start_of_month(self.current_date)
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.current_date),
            (CalendarView::Week, NavDirection::Next) => self.current_date + Duration::days(7),
            (CalendarView::Week, NavDirection::Prev) => self.current_date - Duration::days(7),
            (CalendarView::Day, NavDirection::Next) => self.current_date + Duration::days(1),
            (CalendarView::Day, NavDirection::Prev) => self.current_date - Duration::days(1),
        };
    }

    pub fn go_to_today(&mut self, today: NaiveDate) {
        self.current_date = today;
    }

    pub fn set_current_date(&mut self, date: NaiveDate) {
        self.current_date = date;
    }

    pub fn set_view(&mut self, view: CalendarView) {
        self.view = view;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Add a new event from a form submission
    pub fn add(&mut self, draft: EventDraft) -> Result<Uuid, StoreError> {
        let event = CalendarEvent::from_draft(draft)?;
        let id = event.id;
        self.events.push(event);
        Ok(id)
    }

    /// Partially update an event
    pub fn update(&mut self, id: Uuid, patch: EventPatch) -> Result<(), StoreError> {
        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::EventNotFound(id))?;
        event.apply(patch)
    }

    /// Remove an event, returning it
    pub fn delete(&mut self, id: Uuid) -> Result<CalendarEvent, StoreError> {
        let index = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::EventNotFound(id))?;
        Ok(self.events.remove(index))
    }

    /// Flip the completed flag, returning the new value
    pub fn toggle_complete(&mut self, id: Uuid) -> Result<bool, StoreError> {
        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::EventNotFound(id))?;
        event.completed = !event.completed;
        Ok(event.completed)
    }
}
