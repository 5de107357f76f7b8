use crate::app::{AppState, EVENT_COLOR_FIELD};
use crate::domain::{CalendarView, NavDirection, SessionKind, Tab, UiMode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns `true` when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(true);
    }

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::Searching => handle_search_mode(app, key),
        UiMode::EditingEvent => handle_event_form_mode(app, key),
        UiMode::EditingNode => handle_node_form_mode(app, key),
        UiMode::NamingMap => handle_prompt_mode(app, key),
        UiMode::EditingSettings => handle_settings_form_mode(app, key),
        UiMode::ConfirmDelete => handle_confirm_mode(app, key),
        UiMode::Connecting => handle_connect_mode(app, key),
        UiMode::Help => {
            app.close_help();
            Ok(false)
        }
    }
}

/// Keys shared by every tab, then the active tab's own keys
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.reload();
            return Ok(false);
        }
        KeyCode::Tab => {
            app.next_tab();
            return Ok(false);
        }
        KeyCode::F(1) => {
            app.tab = Tab::Calendar;
            return Ok(false);
        }
        KeyCode::F(2) => {
            app.tab = Tab::MindMap;
            return Ok(false);
        }
        KeyCode::F(3) => {
            app.tab = Tab::Pomodoro;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.show_help();
            return Ok(false);
        }
        _ => {}
    }

    match app.tab {
        Tab::Calendar => handle_calendar_keys(app, key),
        Tab::MindMap => handle_mindmap_keys(app, key),
        Tab::Pomodoro => handle_pomodoro_keys(app, key),
    }
    Ok(false)
}

fn handle_calendar_keys(app: &mut AppState, key: KeyEvent) {
    match key.code {
        // Cursor
        KeyCode::Left => app.move_cursor_days(-1),
        KeyCode::Right => app.move_cursor_days(1),
        KeyCode::Up => app.move_cursor_days(-7),
        KeyCode::Down => app.move_cursor_days(7),

        // Period navigation
        KeyCode::Char('[') => app.navigate(NavDirection::Prev),
        KeyCode::Char(']') => app.navigate(NavDirection::Next),
        KeyCode::Char('t') => app.go_to_today(),
        KeyCode::Char('v') => app.cycle_view(),
        KeyCode::Char('m') => app.set_view(CalendarView::Month),
        KeyCode::Char('w') => app.set_view(CalendarView::Week),
        KeyCode::Char('D') => app.set_view(CalendarView::Day),

        // Event list of the cursor day
        KeyCode::Char('k') => app.select_event_up(),
        KeyCode::Char('j') => app.select_event_down(),

        KeyCode::Char('/') => app.start_search(),
        KeyCode::Esc => app.clear_search(),
        KeyCode::Char('a') => app.start_add_event(),
        KeyCode::Char('e') | KeyCode::Enter => app.start_edit_event(),
        KeyCode::Char(' ') | KeyCode::Char('x') => app.toggle_selected_complete(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete_event(),
        _ => {}
    }
}

fn handle_mindmap_keys(app: &mut AppState, key: KeyEvent) {
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        // Arrows move the selected node; with Shift they pan the canvas
        KeyCode::Left if shift => app.pan(-1.0, 0.0),
        KeyCode::Right if shift => app.pan(1.0, 0.0),
        KeyCode::Up if shift => app.pan(0.0, -1.0),
        KeyCode::Down if shift => app.pan(0.0, 1.0),
        KeyCode::Left => app.nudge_selected(-1.0, 0.0),
        KeyCode::Right => app.nudge_selected(1.0, 0.0),
        KeyCode::Up => app.nudge_selected(0.0, -1.0),
        KeyCode::Down => app.nudge_selected(0.0, 1.0),
        KeyCode::Char('h') => app.pan(-1.0, 0.0),
        KeyCode::Char('l') => app.pan(1.0, 0.0),
        KeyCode::Char('k') => app.pan(0.0, -1.0),
        KeyCode::Char('j') => app.pan(0.0, 1.0),

        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),
        KeyCode::Char('0') => app.reset_view(),
        KeyCode::Char('f') => app.focus_selected(),

        KeyCode::Char(']') => app.select_next_node(),
        KeyCode::Char('[') => app.select_prev_node(),

        KeyCode::Char('a') => app.add_node(),
        KeyCode::Char('e') | KeyCode::Enter => app.start_edit_node(),
        KeyCode::Char('c') => app.cycle_selected_node_color(),
        KeyCode::Char('C') => app.cycle_default_node_color(),
        KeyCode::Char('x') => app.start_connect(),
        KeyCode::Char('A') => app.auto_connect_selected(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete_node(),

        // Maps
        KeyCode::Char('N') => app.start_new_map(),
        KeyCode::Char('R') => app.start_rename_map(),
        KeyCode::Char('D') => app.request_delete_map(),
        KeyCode::Char('<') => app.cycle_map(-1),
        KeyCode::Char('>') => app.cycle_map(1),
        _ => {}
    }
}

fn handle_pomodoro_keys(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_timer(),
        KeyCode::Char('r') => app.reset_timer(),
        KeyCode::Char('s') => app.skip_session(),
        KeyCode::Char('1') => app.switch_session(SessionKind::Work),
        KeyCode::Char('2') => app.switch_session(SessionKind::ShortBreak),
        KeyCode::Char('3') => app.switch_session(SessionKind::LongBreak),
        KeyCode::Char('e') => app.start_edit_settings(),
        _ => {}
    }
}

fn handle_search_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.finish_search(),
        KeyCode::Esc => app.clear_search(),
        KeyCode::Backspace => app.search_backspace(),
        KeyCode::Char(c) => app.search_add_char(c),
        _ => {}
    }
    Ok(false)
}

fn handle_event_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_event_form(),
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Tab | KeyCode::Down => app.event_form_next_field(),
        KeyCode::BackTab | KeyCode::Up => app.event_form_prev_field(),
        KeyCode::Left | KeyCode::Right => {
            if app.event_form.as_ref().is_some_and(|f| f.field == EVENT_COLOR_FIELD) {
                app.event_form_cycle_color();
            }
        }
        KeyCode::Backspace => app.event_form_backspace(),
        KeyCode::Char(c) => app.event_form_add_char(c),
        _ => {}
    }
    Ok(false)
}

fn handle_node_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_node_form(),
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.node_form_toggle_field()
        }
        KeyCode::Backspace => app.node_form_backspace(),
        KeyCode::Char(c) => app.node_form_add_char(c),
        _ => {}
    }
    Ok(false)
}

fn handle_prompt_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_prompt(),
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Backspace => app.prompt_backspace(),
        KeyCode::Char(c) => app.prompt_add_char(c),
        _ => {}
    }
    Ok(false)
}

fn handle_settings_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_settings_form(),
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Tab | KeyCode::Down => app.settings_form_next_field(),
        KeyCode::BackTab | KeyCode::Up => app.settings_form_prev_field(),
        KeyCode::Backspace => app.settings_form_backspace(),
        KeyCode::Char(c) => app.settings_form_add_char(c),
        _ => {}
    }
    Ok(false)
}

fn handle_confirm_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
    Ok(false)
}

/// Picking the target node of a new connection
fn handle_connect_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char(']') | KeyCode::Right | KeyCode::Down | KeyCode::Tab => {
            app.select_next_node()
        }
        KeyCode::Char('[') | KeyCode::Left | KeyCode::Up | KeyCode::BackTab => {
            app.select_prev_node()
        }
        KeyCode::Enter | KeyCode::Char('x') => app.confirm_connect(),
        KeyCode::Esc => app.cancel_connect(),
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::persistence::MemoryStorage;
    use chrono::NaiveDate;

    fn create_test_app() -> AppState {
        let today = NaiveDate::from_ymd_opt(2024, 4, 10).unwrap();
        AppState::new(Box::new(MemoryStorage::new()), Config::default(), today).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key(app, key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_handle_quit() {
        let mut app = create_test_app();
        let should_quit = handle_key(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_from_any_mode() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::EditingEvent);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let quit = handle_key(&mut app, ctrl_c).unwrap();
        assert!(quit);
    }

    #[test]
    fn test_ctrl_r_reloads_without_resetting_timer() {
        let mut app = create_test_app();
        app.tab = Tab::Pomodoro;
        app.toggle_timer();

        let ctrl_r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        handle_key(&mut app, ctrl_r).unwrap();

        assert!(app.pomodoro.is_running());
        assert_eq!(app.toast.as_ref().unwrap().message, "Reloaded");
    }

    #[test]
    fn test_q_is_text_inside_forms() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        let should_quit = handle_key(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(!should_quit);
        assert_eq!(app.event_form.as_ref().unwrap().title, "q");
    }

    #[test]
    fn test_tab_switching() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        assert_eq!(app.tab, Tab::MindMap);
        handle_key(&mut app, key(KeyCode::F(3))).unwrap();
        assert_eq!(app.tab, Tab::Pomodoro);
    }

    #[test]
    fn test_handle_add_event() {
        let mut app = create_test_app();

        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::EditingEvent);
        type_text(&mut app, "New");
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        assert_eq!(app.calendar.all_events().len(), 1);
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.event_form.is_none());
    }

    #[test]
    fn test_event_form_color_field_cycles() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        for _ in 0..4 {
            handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        }
        handle_key(&mut app, key(KeyCode::Right)).unwrap();
        assert_eq!(app.event_form.as_ref().unwrap().color, crate::domain::EventColor::Pink);
    }

    #[test]
    fn test_calendar_cursor_keys() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Right)).unwrap();
        assert_eq!(app.calendar.current_date, NaiveDate::from_ymd_opt(2024, 4, 11).unwrap());
        handle_key(&mut app, key(KeyCode::Char('t'))).unwrap();
        assert_eq!(app.calendar.current_date, NaiveDate::from_ymd_opt(2024, 4, 10).unwrap());
        handle_key(&mut app, key(KeyCode::Char('v'))).unwrap();
        assert_eq!(app.calendar.view, CalendarView::Week);
    }

    #[test]
    fn test_search_keys() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('/'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::Searching);
        type_text(&mut app, "gym");
        assert_eq!(app.calendar.search_query, "gym");
        handle_key(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.calendar.search_query, "");
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        type_text(&mut app, "Doomed");
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        handle_key(&mut app, key(KeyCode::Delete)).unwrap();
        assert_eq!(app.ui_mode, UiMode::ConfirmDelete);
        handle_key(&mut app, key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.calendar.all_events().len(), 1);

        handle_key(&mut app, key(KeyCode::Char('d'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('y'))).unwrap();
        assert!(app.calendar.all_events().is_empty());
    }

    #[test]
    fn test_mindmap_add_and_nudge() {
        let mut app = create_test_app();
        app.tab = Tab::MindMap;
        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        let before = app.mindmap.selected_node().unwrap().x;

        handle_key(&mut app, key(KeyCode::Right)).unwrap();
        let after = app.mindmap.selected_node().unwrap().x;
        assert_eq!(after - before, crate::app::NUDGE_STEP);
    }

    #[test]
    fn test_mindmap_pan_and_zoom() {
        let mut app = create_test_app();
        app.tab = Tab::MindMap;
        handle_key(&mut app, KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT)).unwrap();
        assert!(app.viewport.offset_x != 0.0);

        handle_key(&mut app, key(KeyCode::Char('+'))).unwrap();
        assert!(app.viewport.zoom > 1.0);
        handle_key(&mut app, key(KeyCode::Char('0'))).unwrap();
        assert_eq!(app.viewport.zoom, 1.0);
    }

    #[test]
    fn test_connect_mode_escape_restores_source() {
        let mut app = create_test_app();
        app.tab = Tab::MindMap;
        app.mindmap.auto_connect.enabled = false;
        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        let source = app.mindmap.selected_node_id();

        handle_key(&mut app, key(KeyCode::Char('x'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::Connecting);
        assert_ne!(app.mindmap.selected_node_id(), source);

        handle_key(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.mindmap.selected_node_id(), source);
        assert!(app.mindmap.current_map().edges.is_empty());
    }

    #[test]
    fn test_pomodoro_keys() {
        let mut app = create_test_app();
        app.tab = Tab::Pomodoro;
        handle_key(&mut app, key(KeyCode::Char(' '))).unwrap();
        assert!(app.pomodoro.is_running());
        handle_key(&mut app, key(KeyCode::Char('3'))).unwrap();
        assert_eq!(app.pomodoro.kind(), SessionKind::LongBreak);
        assert!(!app.pomodoro.is_running());
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('?'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::Help);
        handle_key(&mut app, key(KeyCode::Char('z'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::Normal);
    }
}
