use serde::{Deserialize, Serialize};

/// Color tag for calendar events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventColor {
    #[default]
    Blue,
    Pink,
    Green,
    Purple,
    Orange,
    Yellow,
}

impl EventColor {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Pink => "pink",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
        }
    }

    pub fn all() -> &'static [EventColor] {
        &[
            EventColor::Blue,
            EventColor::Pink,
            EventColor::Green,
            EventColor::Purple,
            EventColor::Orange,
            EventColor::Yellow,
        ]
    }

    /// Next color in the palette (wraps around)
    pub fn next(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|c| c == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

/// Color tag for mind-map nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeColor {
    #[default]
    Blue,
    Purple,
    Green,
    Orange,
    Pink,
}

impl NodeColor {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Pink => "pink",
        }
    }

    pub fn all() -> &'static [NodeColor] {
        &[
            NodeColor::Blue,
            NodeColor::Purple,
            NodeColor::Green,
            NodeColor::Orange,
            NodeColor::Pink,
        ]
    }

    pub fn next(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|c| c == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

/// Active calendar view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarView {
    #[default]
    Month,
    Week,
    Day,
}

impl CalendarView {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Month => "Month",
            Self::Week => "Week",
            Self::Day => "Day",
        }
    }

    /// Cycle Month -> Week -> Day -> Month
    pub fn next(&self) -> Self {
        match self {
            Self::Month => Self::Week,
            Self::Week => Self::Day,
            Self::Day => Self::Month,
        }
    }
}

/// Direction for calendar navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Prev,
    Next,
}

/// Top-level tab of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Calendar,
    MindMap,
    Pomodoro,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Calendar => "Calendar",
            Tab::MindMap => "Mind Map",
            Tab::Pomodoro => "Pomodoro",
        }
    }

    pub fn all() -> &'static [Tab] {
        &[Tab::Calendar, Tab::MindMap, Tab::Pomodoro]
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Calendar => Tab::MindMap,
            Tab::MindMap => Tab::Pomodoro,
            Tab::Pomodoro => Tab::Calendar,
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    Searching,
    EditingEvent,
    EditingNode,
    NamingMap,
    EditingSettings,
    ConfirmDelete,
    Connecting,
    Help,
}
