pub mod calendar;
pub mod enums;
pub mod error;
pub mod event;
pub mod mindmap;
pub mod pomodoro;
pub mod viewport;

pub use calendar::{relative_day_label, CalendarStore};
pub use enums::{CalendarView, EventColor, NavDirection, NodeColor, Tab, UiMode};
pub use error::StoreError;
pub use event::{CalendarEvent, EventDraft, EventPatch};
pub use mindmap::{AutoConnect, MindMap, MindMapStore, NodePatch};
pub use pomodoro::{
    PomodoroSettings, PomodoroState, PomodoroTimer, SessionComplete, SessionKind, SettingsPatch,
};
pub use viewport::Viewport;
