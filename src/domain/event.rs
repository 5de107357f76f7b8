use super::enums::EventColor;
use super::error::StoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A calendar task with a due/planned date pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the task is due
    pub due_date: NaiveDate,
    /// When the task is intended to be worked on
    pub planned_date: NaiveDate,
    #[serde(default)]
    pub color: EventColor,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_minutes: Option<u32>,
}

impl CalendarEvent {
    /// Build a new event from a validated draft
    pub fn from_draft(draft: EventDraft) -> Result<Self, StoreError> {
        let draft = draft.normalized()?;
        Ok(Self {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date,
            planned_date: draft.planned_date,
            color: draft.color,
            completed: false,
            reminder_minutes: draft.reminder_minutes,
        })
    }

    /// Apply a partial update. Validation happens before any field changes.
    pub fn apply(&mut self, patch: EventPatch) -> Result<(), StoreError> {
        let title = match patch.title {
            Some(title) => {
                let trimmed = title.trim();
                if trimmed.is_empty() {
                    return Err(StoreError::EmptyTitle);
                }
                Some(trimmed.to_string())
            }
            None => None,
        };

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = normalize_description(description);
        }
        if let Some(due) = patch.due_date {
            self.due_date = due;
        }
        if let Some(planned) = patch.planned_date {
            self.planned_date = planned;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(reminder) = patch.reminder_minutes {
            self.reminder_minutes = reminder;
        }
        Ok(())
    }

    /// Case-insensitive substring match on title or description
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(needle_lower))
                .unwrap_or(false)
    }
}

/// Form submission for a new event
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub planned_date: NaiveDate,
    pub color: EventColor,
    pub reminder_minutes: Option<u32>,
}

/// Validated, trimmed draft
struct NormalizedDraft {
    title: String,
    description: Option<String>,
    due_date: NaiveDate,
    planned_date: NaiveDate,
    color: EventColor,
    reminder_minutes: Option<u32>,
}

impl EventDraft {
    /// Draft with both dates set to `date`
    pub fn on(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            due_date: date,
            planned_date: date,
            color: EventColor::default(),
            reminder_minutes: None,
        }
    }

    fn normalized(self) -> Result<NormalizedDraft, StoreError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        Ok(NormalizedDraft {
            title: title.to_string(),
            description: normalize_description(self.description),
            due_date: self.due_date,
            planned_date: self.planned_date,
            color: self.color,
            reminder_minutes: self.reminder_minutes,
        })
    }
}

/// Partial update; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub planned_date: Option<NaiveDate>,
    pub color: Option<EventColor>,
    pub completed: Option<bool>,
    pub reminder_minutes: Option<Option<u32>>,
}

fn normalize_description(description: String) -> Option<String> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
