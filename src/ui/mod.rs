pub mod agenda_pane;
pub mod calendar_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod mindmap_pane;
pub mod modal;
pub mod pomodoro_pane;
pub mod styles;

use crate::app::AppState;
use crate::domain::{Tab, UiMode};
use agenda_pane::render_agenda_pane;
use calendar_pane::render_calendar_pane;
use input_form::{render_event_form, render_map_prompt, render_node_form, render_settings_form};
use keybindings::{render_keybindings, render_status_line, render_tab_bar};
use layout::{create_layout, split_sidebar};
use mindmap_pane::render_mindmap_pane;
use modal::{render_confirm_modal, render_help_modal};
use pomodoro_pane::render_pomodoro_pane;
use ratatui::Frame;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &mut AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_tab_bar(f, app, layout.tabs_area);
    render_status_line(f, app, layout.status_area);
    render_keybindings(f, app, layout.keybindings_area);

    match app.tab {
        Tab::Calendar => {
            let (main, sidebar) = split_sidebar(layout.content_area);
            render_calendar_pane(f, app, main);
            render_agenda_pane(f, app, sidebar);
        }
        Tab::MindMap => render_mindmap_pane(f, app, layout.content_area),
        Tab::Pomodoro => render_pomodoro_pane(f, app, layout.content_area),
    }

    match app.ui_mode {
        UiMode::EditingEvent => render_event_form(f, app, size),
        UiMode::EditingNode => render_node_form(f, app, size),
        UiMode::NamingMap => render_map_prompt(f, app, size),
        UiMode::EditingSettings => render_settings_form(f, app, size),
        UiMode::ConfirmDelete => render_confirm_modal(f, app, size),
        UiMode::Help => render_help_modal(f, size),
        UiMode::Normal | UiMode::Searching | UiMode::Connecting => {}
    }
}
