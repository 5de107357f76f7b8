use crate::config::Config;
use crate::domain::{
    CalendarStore, CalendarView, EventColor, EventDraft, EventPatch, MindMapStore, NavDirection,
    NodePatch, PomodoroTimer, SessionKind, SettingsPatch, StoreError, Tab, UiMode, Viewport,
};
use crate::notifications;
use crate::persistence::{
    load_all, save_current_map_id, save_events, save_maps, save_node_color,
    save_pomodoro_settings, Storage,
};
use crate::ticker::SecondTicker;
use anyhow::Result;
use chrono::{Duration, NaiveDate};
use std::time::Instant;
use uuid::Uuid;

/// Canvas screen units per terminal cell
pub const CELL_WIDTH: f64 = 10.0;
pub const CELL_HEIGHT: f64 = 20.0;
/// World units a node moves per arrow key press
pub const NUDGE_STEP: f64 = 20.0;
/// Screen units the canvas pans per key press
pub const PAN_STEP: f64 = 40.0;
pub const ZOOM_STEP: f64 = 1.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

/// Transient status-line notification
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub expires_at: Instant,
}

/// Field order of the event form
pub const EVENT_FORM_FIELDS: [&str; 6] = [
    "Title",
    "Description",
    "Due",
    "Planned",
    "Color",
    "Reminder (min)",
];
/// Index of the color picker in `EVENT_FORM_FIELDS`
pub const EVENT_COLOR_FIELD: usize = 4;

/// Add/edit form for calendar events
#[derive(Debug, Clone)]
pub struct EventForm {
    /// `None` when adding
    pub editing: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub due: String,
    pub planned: String,
    pub color: EventColor,
    pub reminder: String,
    pub field: usize,
}

impl EventForm {
    fn blank(date: NaiveDate) -> Self {
        let date = date.format("%Y-%m-%d").to_string();
        Self {
            editing: None,
            title: String::new(),
            description: String::new(),
            due: date.clone(),
            planned: date,
            color: EventColor::default(),
            reminder: String::new(),
            field: 0,
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.field {
            0 => Some(&mut self.title),
            1 => Some(&mut self.description),
            2 => Some(&mut self.due),
            3 => Some(&mut self.planned),
            5 => Some(&mut self.reminder),
            _ => None,
        }
    }

    /// Parse into a draft, or a message describing the first bad field
    pub fn to_draft(&self) -> Result<EventDraft, String> {
        let due_date = parse_date(&self.due).ok_or("Due date must be YYYY-MM-DD")?;
        let planned_date = parse_date(&self.planned).ok_or("Planned date must be YYYY-MM-DD")?;
        let reminder = self.reminder.trim();
        let reminder_minutes = if reminder.is_empty() {
            None
        } else {
            Some(reminder.parse::<u32>().map_err(|_| "Reminder must be a number of minutes")?)
        };
        Ok(EventDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date,
            planned_date,
            color: self.color,
            reminder_minutes,
        })
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Edit form for a mind-map node
#[derive(Debug, Clone)]
pub struct NodeForm {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// 0 = title, 1 = content
    pub field: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPurpose {
    NewMap,
    RenameMap(Uuid),
}

/// Single-line text prompt (map names)
#[derive(Debug, Clone)]
pub struct TextPrompt {
    pub purpose: PromptPurpose,
    pub buffer: String,
}

pub const SETTINGS_FIELDS: [&str; 4] = [
    "Work (min)",
    "Short break (min)",
    "Long break (min)",
    "Sessions until long break",
];

/// Pomodoro settings form
#[derive(Debug, Clone)]
pub struct SettingsForm {
    pub values: [String; 4],
    pub field: usize,
}

/// Deletion waiting for confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingDelete {
    Event(Uuid),
    Node(Uuid),
    Map(Uuid),
}

/// Main application state
pub struct AppState {
    storage: Box<dyn Storage>,
    pub config: Config,
    pub calendar: CalendarStore,
    pub mindmap: MindMapStore,
    pub pomodoro: PomodoroTimer,
    pub viewport: Viewport,
    /// Canvas size in screen units, updated by the renderer
    pub canvas_size: (f64, f64),
    pub tab: Tab,
    pub ui_mode: UiMode,
    pub today: NaiveDate,
    /// Index into the cursor day's event list
    pub selected_event: usize,
    pub event_form: Option<EventForm>,
    pub node_form: Option<NodeForm>,
    pub prompt: Option<TextPrompt>,
    pub settings_form: Option<SettingsForm>,
    pub pending_delete: Option<PendingDelete>,
    /// Source node while picking a connection target
    pub connect_source: Option<Uuid>,
    pub toast: Option<Toast>,
    ticker: SecondTicker,
}

impl AppState {
    /// Load every collection from `storage` and build the stores
    pub fn new(mut storage: Box<dyn Storage>, config: Config, today: NaiveDate) -> Result<Self> {
        let loaded = load_all(storage.as_mut())?;
        log::info!(
            "event=state_loaded events={} maps={} discarded={}",
            loaded.events.len(),
            loaded.maps.len(),
            loaded.discarded.len()
        );

        let mindmap = MindMapStore::new(
            loaded.maps,
            loaded.current_map_id,
            loaded.node_color,
            config.auto_connect_settings(),
        );

        let mut app = Self {
            storage,
            calendar: CalendarStore::new(loaded.events, today),
            mindmap,
            pomodoro: PomodoroTimer::new(loaded.pomodoro),
            viewport: Viewport::default(),
            canvas_size: (800.0, 480.0),
            tab: Tab::Calendar,
            ui_mode: UiMode::Normal,
            today,
            selected_event: 0,
            event_form: None,
            node_form: None,
            prompt: None,
            settings_form: None,
            pending_delete: None,
            connect_source: None,
            toast: None,
            ticker: SecondTicker::new(Instant::now()),
            config,
        };

        if !loaded.discarded.is_empty() {
            app.toast_error(format!(
                "Unreadable data was reset: {}",
                loaded.discarded.join(", ")
            ));
        }

        Ok(app)
    }

    // ---- notifications ----

    /// Show a toast that lives `toast_seconds` past `shown_at`
    fn toast_at(&mut self, kind: ToastKind, message: String, shown_at: Instant) {
        let ttl = std::time::Duration::from_secs(self.config.toast_seconds);
        self.toast = Some(Toast {
            message,
            kind,
            expires_at: shown_at + ttl,
        });
    }

    pub fn toast_info(&mut self, message: impl Into<String>) {
        self.toast_at(ToastKind::Info, message.into(), Instant::now());
    }

    pub fn toast_error(&mut self, message: impl Into<String>) {
        self.toast_at(ToastKind::Error, message.into(), Instant::now());
    }

    /// Surface a store error; returns the value on success
    fn report<T>(&mut self, result: Result<T, StoreError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                log::debug!("event=store_rejected error={}", e);
                self.toast_error(capitalize(&e.to_string()));
                None
            }
        }
    }

    // ---- persistence (each failure becomes a toast; memory is kept) ----
    //
    // The persist helpers return false after showing the error toast, so the
    // caller must not replace it with a success message.

    fn persist_events(&mut self) -> bool {
        match save_events(self.storage.as_mut(), self.calendar.all_events()) {
            Ok(()) => true,
            Err(e) => {
                log::error!("event=save_failed key=events error={:#}", e);
                self.toast_error("Could not save events");
                false
            }
        }
    }

    fn persist_maps(&mut self) -> bool {
        let result = save_maps(self.storage.as_mut(), self.mindmap.maps()).and_then(|_| {
            save_current_map_id(self.storage.as_mut(), self.mindmap.current_map_id())
        });
        match result {
            Ok(()) => true,
            Err(e) => {
                log::error!("event=save_failed key=mind_maps error={:#}", e);
                self.toast_error("Could not save mind maps");
                false
            }
        }
    }

    fn persist_node_color(&mut self) -> bool {
        match save_node_color(self.storage.as_mut(), self.mindmap.node_color) {
            Ok(()) => true,
            Err(e) => {
                log::error!("event=save_failed key=node_color error={:#}", e);
                self.toast_error("Could not save node color");
                false
            }
        }
    }

    fn persist_settings(&mut self) -> bool {
        match save_pomodoro_settings(self.storage.as_mut(), self.pomodoro.settings()) {
            Ok(()) => true,
            Err(e) => {
                log::error!("event=save_failed key=pomodoro error={:#}", e);
                self.toast_error("Could not save pomodoro settings");
                false
            }
        }
    }

    // ---- global ----

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
    }

    pub fn show_help(&mut self) {
        self.ui_mode = UiMode::Help;
    }

    pub fn close_help(&mut self) {
        self.ui_mode = UiMode::Normal;
    }

    /// Periodic housekeeping: expire the toast and advance the pomodoro
    pub fn tick(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| now >= t.expires_at) {
            self.toast = None;
        }

        let seconds = self.ticker.advance(now);
        if let Some(done) = self.pomodoro.tick(seconds) {
            log::info!(
                "event=pomodoro_complete finished={:?} next={:?} sessions={}",
                done.finished,
                done.next,
                done.completed_sessions
            );
            self.toast_at(ToastKind::Info, notifications::session_message(&done), now);
            if self.config.notifications {
                notifications::notify_session_complete(&done);
            }
        }
    }

    /// Re-read events and mind maps from storage. View state is kept where
    /// it still applies; the pomodoro is left alone.
    pub fn reload(&mut self) {
        let loaded = match load_all(self.storage.as_mut()) {
            Ok(loaded) => loaded,
            Err(e) => {
                log::error!("event=reload_failed error={:#}", e);
                self.toast_error("Could not reload data");
                return;
            }
        };
        log::info!(
            "event=state_reloaded events={} maps={} discarded={}",
            loaded.events.len(),
            loaded.maps.len(),
            loaded.discarded.len()
        );

        self.calendar.load(loaded.events);
        self.clamp_event_selection();
        let current = loaded.current_map_id.or(Some(self.mindmap.current_map_id()));
        self.mindmap = MindMapStore::new(
            loaded.maps,
            current,
            loaded.node_color,
            self.mindmap.auto_connect,
        );

        if loaded.discarded.is_empty() {
            self.toast_info("Reloaded");
        } else {
            self.toast_error(format!(
                "Unreadable data was reset: {}",
                loaded.discarded.join(", ")
            ));
        }
    }

    /// Date change detected by the event loop
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    // ---- calendar ----

    /// Events of the cursor day (search applied)
    pub fn day_events(&self) -> Vec<&crate::domain::CalendarEvent> {
        self.calendar.events_for_day(self.calendar.current_date)
    }

    pub fn selected_event_id(&self) -> Option<Uuid> {
        self.day_events().get(self.selected_event).map(|e| e.id)
    }

    fn clamp_event_selection(&mut self) {
        let len = self.day_events().len();
        if self.selected_event >= len {
            self.selected_event = len.saturating_sub(1);
        }
    }

    pub fn move_cursor_days(&mut self, days: i64) {
        let date = self.calendar.current_date + Duration::days(days);
        self.calendar.set_current_date(date);
        self.selected_event = 0;
    }

    pub fn navigate(&mut self, direction: NavDirection) {
        self.calendar.navigate(direction);
        self.selected_event = 0;
    }

    pub fn go_to_today(&mut self) {
        self.calendar.go_to_today(self.today);
        self.selected_event = 0;
    }

    pub fn cycle_view(&mut self) {
        let view = self.calendar.view.next();
        self.calendar.set_view(view);
    }

    pub fn set_view(&mut self, view: CalendarView) {
        self.calendar.set_view(view);
    }

    pub fn select_event_up(&mut self) {
        self.selected_event = self.selected_event.saturating_sub(1);
    }

    pub fn select_event_down(&mut self) {
        if self.selected_event + 1 < self.day_events().len() {
            self.selected_event += 1;
        }
    }

    pub fn start_search(&mut self) {
        self.ui_mode = UiMode::Searching;
    }

    pub fn search_add_char(&mut self, c: char) {
        self.calendar.search_query.push(c);
        self.selected_event = 0;
    }

    pub fn search_backspace(&mut self) {
        self.calendar.search_query.pop();
        self.selected_event = 0;
    }

    /// Leave search mode keeping the query
    pub fn finish_search(&mut self) {
        self.ui_mode = UiMode::Normal;
    }

    /// Leave search mode and drop the query
    pub fn clear_search(&mut self) {
        self.calendar.set_search_query("");
        self.ui_mode = UiMode::Normal;
        self.selected_event = 0;
    }

    pub fn start_add_event(&mut self) {
        self.event_form = Some(EventForm::blank(self.calendar.current_date));
        self.ui_mode = UiMode::EditingEvent;
    }

    pub fn start_edit_event(&mut self) {
        let Some(id) = self.selected_event_id() else {
            return;
        };
        let Some(event) = self.calendar.get(id) else {
            return;
        };
        self.event_form = Some(EventForm {
            editing: Some(id),
            title: event.title.clone(),
            description: event.description.clone().unwrap_or_default(),
            due: event.due_date.format("%Y-%m-%d").to_string(),
            planned: event.planned_date.format("%Y-%m-%d").to_string(),
            color: event.color,
            reminder: event.reminder_minutes.map(|m| m.to_string()).unwrap_or_default(),
            field: 0,
        });
        self.ui_mode = UiMode::EditingEvent;
    }

    pub fn event_form_next_field(&mut self) {
        if let Some(form) = &mut self.event_form {
            form.field = (form.field + 1) % EVENT_FORM_FIELDS.len();
        }
    }

    pub fn event_form_prev_field(&mut self) {
        if let Some(form) = &mut self.event_form {
            form.field = (form.field + EVENT_FORM_FIELDS.len() - 1) % EVENT_FORM_FIELDS.len();
        }
    }

    pub fn event_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.event_form {
            if form.field == EVENT_COLOR_FIELD {
                if c == ' ' {
                    form.color = form.color.next();
                }
            } else if let Some(text) = form.text_mut() {
                text.push(c);
            }
        }
    }

    pub fn event_form_backspace(&mut self) {
        if let Some(text) = self.event_form.as_mut().and_then(|f| f.text_mut()) {
            text.pop();
        }
    }

    pub fn event_form_cycle_color(&mut self) {
        if let Some(form) = &mut self.event_form {
            form.color = form.color.next();
        }
    }

    /// Validate and apply the event form. The form stays open on errors.
    pub fn submit_event_form(&mut self) {
        let Some(form) = self.event_form.clone() else {
            return;
        };
        let draft = match form.to_draft() {
            Ok(draft) => draft,
            Err(message) => {
                self.toast_error(message);
                return;
            }
        };

        let applied = match form.editing {
            Some(id) => {
                let patch = EventPatch {
                    title: Some(draft.title),
                    description: Some(draft.description),
                    due_date: Some(draft.due_date),
                    planned_date: Some(draft.planned_date),
                    color: Some(draft.color),
                    completed: None,
                    reminder_minutes: Some(draft.reminder_minutes),
                };
                let result = self.calendar.update(id, patch);
                self.report(result).map(|_| "Event updated")
            }
            None => {
                let planned = draft.planned_date;
                let result = self.calendar.add(draft);
                self.report(result).map(|id| {
                    log::info!("event=event_added id={} planned={}", id, planned);
                    "Event added"
                })
            }
        };

        if let Some(message) = applied {
            self.event_form = None;
            self.ui_mode = UiMode::Normal;
            self.clamp_event_selection();
            if self.persist_events() {
                self.toast_info(message);
            }
        }
    }

    pub fn cancel_form(&mut self) {
        self.event_form = None;
        self.node_form = None;
        self.prompt = None;
        self.settings_form = None;
        self.ui_mode = UiMode::Normal;
    }

    pub fn toggle_selected_complete(&mut self) {
        let Some(id) = self.selected_event_id() else {
            return;
        };
        let result = self.calendar.toggle_complete(id);
        if let Some(done) = self.report(result) {
            if self.persist_events() {
                self.toast_info(if done { "Marked complete" } else { "Marked open" });
            }
        }
    }

    pub fn request_delete_event(&mut self) {
        if let Some(id) = self.selected_event_id() {
            self.pending_delete = Some(PendingDelete::Event(id));
            self.ui_mode = UiMode::ConfirmDelete;
        }
    }

    // ---- confirmation ----

    pub fn confirm_delete(&mut self) {
        let Some(pending) = self.pending_delete.take() else {
            self.ui_mode = UiMode::Normal;
            return;
        };
        self.ui_mode = UiMode::Normal;

        match pending {
            PendingDelete::Event(id) => {
                let result = self.calendar.delete(id);
                if self.report(result).is_some() {
                    self.clamp_event_selection();
                    if self.persist_events() {
                        self.toast_info("Event deleted");
                    }
                }
            }
            PendingDelete::Node(id) => {
                let result = self.mindmap.delete_node(id);
                if self.report(result).is_some() {
                    if self.persist_maps() {
                        self.toast_info("Node deleted");
                    }
                }
            }
            PendingDelete::Map(id) => {
                let result = self.mindmap.delete_map(id);
                if let Some(map) = self.report(result) {
                    log::info!("event=map_deleted id={} nodes={}", map.id, map.nodes.len());
                    self.viewport.reset();
                    if self.persist_maps() {
                        self.toast_info(format!("Map \"{}\" deleted", map.name));
                    }
                }
            }
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Text for the confirmation modal
    pub fn pending_delete_label(&self) -> Option<String> {
        match self.pending_delete? {
            PendingDelete::Event(id) => self
                .calendar
                .get(id)
                .map(|e| format!("Delete event \"{}\"?", e.title)),
            PendingDelete::Node(id) => self
                .mindmap
                .current_map()
                .node(id)
                .map(|n| format!("Delete node \"{}\" and its connections?", n.title)),
            PendingDelete::Map(id) => self
                .mindmap
                .maps()
                .iter()
                .find(|m| m.id == id)
                .map(|m| format!("Delete map \"{}\"?", m.name)),
        }
    }

    // ---- mind map ----

    /// World point at the center of the canvas
    fn view_center(&self) -> (f64, f64) {
        let (w, h) = self.canvas_size;
        self.viewport.screen_to_world(w / 2.0, h / 2.0)
    }

    pub fn add_node(&mut self) {
        let (x, y) = self.view_center();
        let edges_before = self.mindmap.current_map().edges.len();
        let id = self.mindmap.add_node(x, y);
        let linked = self.mindmap.current_map().edges.len() - edges_before;
        log::info!("event=node_added id={} auto_edges={}", id, linked);
        self.persist_maps();
    }

    pub fn select_next_node(&mut self) {
        self.mindmap.cycle_selection(1);
    }

    pub fn select_prev_node(&mut self) {
        self.mindmap.cycle_selection(-1);
    }

    /// Move the selected node by whole nudge steps
    pub fn nudge_selected(&mut self, dx: f64, dy: f64) {
        let Some(id) = self.mindmap.selected_node_id() else {
            return;
        };
        let result = self.mindmap.nudge_node(id, dx * NUDGE_STEP, dy * NUDGE_STEP);
        if let Some(created) = self.report(result) {
            if self.persist_maps() && !created.is_empty() {
                self.toast_info(format!("Auto-connected {} node(s)", created.len()));
            }
        }
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.viewport.pan(dx * PAN_STEP, dy * PAN_STEP);
    }

    pub fn zoom_in(&mut self) {
        let (w, h) = self.canvas_size;
        self.viewport.zoom_by(ZOOM_STEP, w, h);
    }

    pub fn zoom_out(&mut self) {
        let (w, h) = self.canvas_size;
        self.viewport.zoom_by(1.0 / ZOOM_STEP, w, h);
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
    }

    pub fn focus_selected(&mut self) {
        if let Some((x, y)) = self.mindmap.selected_node().map(|n| n.center()) {
            let (w, h) = self.canvas_size;
            self.viewport.center_on(x, y, w, h);
        }
    }

    /// Whether the selected node's center is inside the canvas; `None`
    /// without a selection
    pub fn selected_node_visible(&self) -> Option<bool> {
        let (x, y) = self.mindmap.selected_node()?.center();
        let (sx, sy) = self.viewport.world_to_screen(x, y);
        let (w, h) = self.canvas_size;
        Some((0.0..=w).contains(&sx) && (0.0..=h).contains(&sy))
    }

    pub fn start_edit_node(&mut self) {
        if let Some(node) = self.mindmap.selected_node() {
            self.node_form = Some(NodeForm {
                id: node.id,
                title: node.title.clone(),
                content: node.content.clone(),
                field: 0,
            });
            self.ui_mode = UiMode::EditingNode;
        }
    }

    pub fn node_form_toggle_field(&mut self) {
        if let Some(form) = &mut self.node_form {
            form.field = 1 - form.field;
        }
    }

    pub fn node_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.node_form {
            match form.field {
                0 => form.title.push(c),
                _ => form.content.push(c),
            }
        }
    }

    pub fn node_form_backspace(&mut self) {
        if let Some(form) = &mut self.node_form {
            match form.field {
                0 => form.title.pop(),
                _ => form.content.pop(),
            };
        }
    }

    pub fn submit_node_form(&mut self) {
        let Some(form) = self.node_form.take() else {
            return;
        };
        self.ui_mode = UiMode::Normal;
        let patch = NodePatch {
            title: Some(form.title),
            content: Some(form.content),
            color: None,
        };
        let result = self.mindmap.update_node(form.id, patch);
        if self.report(result).is_some() {
            self.persist_maps();
        }
    }

    /// Recolor the selected node
    pub fn cycle_selected_node_color(&mut self) {
        let Some(node) = self.mindmap.selected_node() else {
            return;
        };
        let (id, color) = (node.id, node.color.next());
        let patch = NodePatch { color: Some(color), ..Default::default() };
        let result = self.mindmap.update_node(id, patch);
        if self.report(result).is_some() {
            self.persist_maps();
        }
    }

    /// Change the color used for new nodes
    pub fn cycle_default_node_color(&mut self) {
        self.mindmap.set_node_color(self.mindmap.node_color.next());
        if self.persist_node_color() {
            self.toast_info(format!("New nodes: {}", self.mindmap.node_color.name()));
        }
    }

    pub fn request_delete_node(&mut self) {
        if let Some(id) = self.mindmap.selected_node_id() {
            self.pending_delete = Some(PendingDelete::Node(id));
            self.ui_mode = UiMode::ConfirmDelete;
        }
    }

    /// Enter connect mode with the selected node as source
    pub fn start_connect(&mut self) {
        let Some(source) = self.mindmap.selected_node_id() else {
            self.toast_error("Select a node first");
            return;
        };
        if self.mindmap.current_map().nodes.len() < 2 {
            self.toast_error("Need another node to connect to");
            return;
        }
        self.connect_source = Some(source);
        self.mindmap.cycle_selection(1);
        self.ui_mode = UiMode::Connecting;
    }

    /// Connect source and the selected target, or disconnect them if they
    /// are already connected
    pub fn confirm_connect(&mut self) {
        self.ui_mode = UiMode::Normal;
        let source = self.connect_source.take();
        let (Some(source), Some(target)) = (source, self.mindmap.selected_node_id()) else {
            return;
        };

        let existing = self
            .mindmap
            .edges_of(source)
            .into_iter()
            .find(|e| e.joins(source, target))
            .map(|e| e.id);

        let message = match existing {
            Some(edge_id) => {
                let result = self.mindmap.disconnect(edge_id);
                self.report(result).map(|_| "Disconnected")
            }
            None => {
                let result = self.mindmap.connect(source, target);
                self.report(result).map(|_| "Connected")
            }
        };
        if let Some(message) = message {
            if self.persist_maps() {
                self.toast_info(message);
            }
        }
    }

    pub fn cancel_connect(&mut self) {
        if let Some(source) = self.connect_source.take() {
            // Source came from the current map
            let _ = self.mindmap.select_node(Some(source));
        }
        self.ui_mode = UiMode::Normal;
    }

    pub fn auto_connect_selected(&mut self) {
        let Some(id) = self.mindmap.selected_node_id() else {
            return;
        };
        let result = self.mindmap.auto_connect(id);
        if let Some(created) = self.report(result) {
            if created.is_empty() {
                self.toast_info("No nearby nodes to connect");
            } else if self.persist_maps() {
                self.toast_info(format!("Connected {} nearby node(s)", created.len()));
            }
        }
    }

    pub fn start_new_map(&mut self) {
        self.prompt = Some(TextPrompt {
            purpose: PromptPurpose::NewMap,
            buffer: String::new(),
        });
        self.ui_mode = UiMode::NamingMap;
    }

    pub fn start_rename_map(&mut self) {
        let map = self.mindmap.current_map();
        self.prompt = Some(TextPrompt {
            purpose: PromptPurpose::RenameMap(map.id),
            buffer: map.name.clone(),
        });
        self.ui_mode = UiMode::NamingMap;
    }

    pub fn prompt_add_char(&mut self, c: char) {
        if let Some(prompt) = &mut self.prompt {
            prompt.buffer.push(c);
        }
    }

    pub fn prompt_backspace(&mut self) {
        if let Some(prompt) = &mut self.prompt {
            prompt.buffer.pop();
        }
    }

    pub fn submit_prompt(&mut self) {
        let Some(prompt) = self.prompt.clone() else {
            return;
        };
        let applied = match prompt.purpose {
            PromptPurpose::NewMap => {
                let result = self.mindmap.create_map(&prompt.buffer);
                self.report(result).map(|_| {
                    self.viewport.reset();
                    "Map created"
                })
            }
            PromptPurpose::RenameMap(id) => {
                let result = self.mindmap.rename_map(id, &prompt.buffer);
                self.report(result).map(|_| "Map renamed")
            }
        };
        if let Some(message) = applied {
            self.prompt = None;
            self.ui_mode = UiMode::Normal;
            if self.persist_maps() {
                self.toast_info(message);
            }
        }
    }

    pub fn request_delete_map(&mut self) {
        self.pending_delete = Some(PendingDelete::Map(self.mindmap.current_map_id()));
        self.ui_mode = UiMode::ConfirmDelete;
    }

    pub fn cycle_map(&mut self, delta: isize) {
        self.mindmap.cycle_map(delta);
        self.viewport.reset();
        self.persist_maps();
    }

    // ---- pomodoro ----

    pub fn toggle_timer(&mut self) {
        self.pomodoro.toggle();
        log::debug!(
            "event=pomodoro_toggled running={} time_left={}",
            self.pomodoro.is_running(),
            self.pomodoro.time_left()
        );
        // Don't count the time spent paused
        self.ticker = SecondTicker::new(Instant::now());
    }

    pub fn reset_timer(&mut self) {
        self.pomodoro.reset();
    }

    pub fn skip_session(&mut self) {
        let done = self.pomodoro.skip();
        self.toast_info(format!("Skipped to {}", done.next.label().to_lowercase()));
    }

    pub fn switch_session(&mut self, kind: SessionKind) {
        self.pomodoro.switch_mode(kind);
    }

    pub fn start_edit_settings(&mut self) {
        let s = self.pomodoro.settings();
        self.settings_form = Some(SettingsForm {
            values: [
                s.work_minutes.to_string(),
                s.short_break_minutes.to_string(),
                s.long_break_minutes.to_string(),
                s.sessions_until_long_break.to_string(),
            ],
            field: 0,
        });
        self.ui_mode = UiMode::EditingSettings;
    }

    pub fn settings_form_next_field(&mut self) {
        if let Some(form) = &mut self.settings_form {
            form.field = (form.field + 1) % SETTINGS_FIELDS.len();
        }
    }

    pub fn settings_form_prev_field(&mut self) {
        if let Some(form) = &mut self.settings_form {
            form.field = (form.field + SETTINGS_FIELDS.len() - 1) % SETTINGS_FIELDS.len();
        }
    }

    pub fn settings_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.settings_form {
            if c.is_ascii_digit() {
                form.values[form.field].push(c);
            }
        }
    }

    pub fn settings_form_backspace(&mut self) {
        if let Some(form) = &mut self.settings_form {
            form.values[form.field].pop();
        }
    }

    pub fn submit_settings_form(&mut self) {
        let Some(form) = self.settings_form.clone() else {
            return;
        };
        let mut parsed = [0u32; 4];
        for (i, value) in form.values.iter().enumerate() {
            match value.trim().parse::<u32>() {
                Ok(n) => parsed[i] = n,
                Err(_) => {
                    self.toast_error(format!("{} must be a number", SETTINGS_FIELDS[i]));
                    return;
                }
            }
        }
        let patch = SettingsPatch {
            work_minutes: Some(parsed[0]),
            short_break_minutes: Some(parsed[1]),
            long_break_minutes: Some(parsed[2]),
            sessions_until_long_break: Some(parsed[3]),
        };
        let result = self.pomodoro.update_settings(patch);
        if self.report(result).is_some() {
            self.settings_form = None;
            self.ui_mode = UiMode::Normal;
            if self.persist_settings() {
                self.toast_info("Settings saved");
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::collections::EVENTS_KEY;
    use crate::persistence::{FileStorage, MemoryStorage};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 10).unwrap()
    }

    fn create_test_app() -> AppState {
        AppState::new(Box::new(MemoryStorage::new()), Config::default(), today()).unwrap()
    }

    /// Storage whose writes always fail
    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }
        fn set(&mut self, key: &str, _value: &str) -> Result<()> {
            anyhow::bail!("read-only storage, cannot write {}", key)
        }
        fn remove(&mut self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    fn type_into_event_form(app: &mut AppState, text: &str) {
        for c in text.chars() {
            app.event_form_add_char(c);
        }
    }

    #[test]
    fn test_app_state_new() {
        let app = create_test_app();
        assert_eq!(app.tab, Tab::Calendar);
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.calendar.current_date, today());
        assert_eq!(app.mindmap.maps().len(), 1);
        assert!(app.toast.is_none());
    }

    #[test]
    fn test_add_event_through_form() {
        let mut app = create_test_app();
        app.start_add_event();
        assert_eq!(app.ui_mode, UiMode::EditingEvent);
        type_into_event_form(&mut app, "Pay rent");
        app.submit_event_form();

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.event_form.is_none());
        let events = app.day_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Pay rent");
        assert_eq!(events[0].due_date, today());
    }

    #[test]
    fn test_blank_title_keeps_form_open() {
        let mut app = create_test_app();
        app.start_add_event();
        app.submit_event_form();

        assert_eq!(app.ui_mode, UiMode::EditingEvent);
        assert!(app.event_form.is_some());
        assert_eq!(app.toast.as_ref().unwrap().kind, ToastKind::Error);
        assert!(app.calendar.all_events().is_empty());
    }

    #[test]
    fn test_bad_date_keeps_form_open() {
        let mut app = create_test_app();
        app.start_add_event();
        type_into_event_form(&mut app, "Trip");
        app.event_form_next_field();
        app.event_form_next_field();
        type_into_event_form(&mut app, "x");
        app.submit_event_form();

        assert!(app.event_form.is_some());
        assert_eq!(app.toast.as_ref().unwrap().message, "Due date must be YYYY-MM-DD");
    }

    #[test]
    fn test_edit_event_updates_fields() {
        let mut app = create_test_app();
        app.start_add_event();
        type_into_event_form(&mut app, "Draft");
        app.submit_event_form();

        app.start_edit_event();
        let form = app.event_form.as_mut().unwrap();
        form.title = "Final".to_string();
        form.field = EVENT_COLOR_FIELD;
        app.event_form_add_char(' ');
        app.submit_event_form();

        let event = &app.calendar.all_events()[0];
        assert_eq!(event.title, "Final");
        assert_eq!(event.color, EventColor::Pink);
        assert_eq!(app.calendar.all_events().len(), 1);
    }

    #[test]
    fn test_toggle_and_delete_selected_event() {
        let mut app = create_test_app();
        app.start_add_event();
        type_into_event_form(&mut app, "Laundry");
        app.submit_event_form();

        app.toggle_selected_complete();
        assert!(app.calendar.all_events()[0].completed);

        app.request_delete_event();
        assert_eq!(app.ui_mode, UiMode::ConfirmDelete);
        assert!(app.pending_delete_label().unwrap().contains("Laundry"));
        app.confirm_delete();
        assert!(app.calendar.all_events().is_empty());
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_cancel_delete_keeps_event() {
        let mut app = create_test_app();
        app.start_add_event();
        type_into_event_form(&mut app, "Keep me");
        app.submit_event_form();

        app.request_delete_event();
        app.cancel_delete();
        assert_eq!(app.calendar.all_events().len(), 1);
    }

    #[test]
    fn test_search_mode() {
        let mut app = create_test_app();
        for title in ["Alpha", "Beta"] {
            app.start_add_event();
            type_into_event_form(&mut app, title);
            app.submit_event_form();
        }

        app.start_search();
        for c in "bet".chars() {
            app.search_add_char(c);
        }
        app.finish_search();
        assert_eq!(app.day_events().len(), 1);

        app.clear_search();
        assert_eq!(app.day_events().len(), 2);
    }

    #[test]
    fn test_event_changes_are_persisted() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(temp_dir.path()).unwrap();
        let mut app = AppState::new(Box::new(storage), Config::default(), today()).unwrap();
        app.start_add_event();
        type_into_event_form(&mut app, "Persist me");
        app.submit_event_form();

        let reopened = FileStorage::open(temp_dir.path()).unwrap();
        let app = AppState::new(Box::new(reopened), Config::default(), today()).unwrap();
        assert_eq!(app.calendar.all_events()[0].title, "Persist me");
    }

    #[test]
    fn test_save_failure_shows_toast_and_keeps_memory() {
        let mut app = AppState::new(Box::new(ReadOnlyStorage), Config::default(), today()).unwrap();
        app.start_add_event();
        type_into_event_form(&mut app, "Unsaved");
        app.submit_event_form();

        assert_eq!(app.calendar.all_events().len(), 1);

        // add_node shows no success toast of its own
        app.add_node();
        let toast = app.toast.as_ref().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "Could not save mind maps");
        assert_eq!(app.mindmap.current_map().nodes.len(), 1);
    }

    fn create_read_only_app() -> AppState {
        let mut app = AppState::new(Box::new(ReadOnlyStorage), Config::default(), today()).unwrap();
        app.config.auto_connect = false;
        app.mindmap.auto_connect.enabled = false;
        app.toast = None;
        app
    }

    fn assert_save_error(app: &AppState, message: &str) {
        let toast = app.toast.as_ref().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, message);
    }

    #[test]
    fn test_failed_event_save_keeps_error_toast() {
        let mut app = create_read_only_app();
        app.start_add_event();
        type_into_event_form(&mut app, "Unsaved");
        app.submit_event_form();
        assert_save_error(&app, "Could not save events");
        assert_eq!(app.calendar.all_events().len(), 1);

        app.toast = None;
        app.toggle_selected_complete();
        assert_save_error(&app, "Could not save events");
        assert!(app.calendar.all_events()[0].completed);

        app.toast = None;
        app.request_delete_event();
        app.confirm_delete();
        assert_save_error(&app, "Could not save events");
        assert!(app.calendar.all_events().is_empty());
    }

    #[test]
    fn test_failed_connect_save_keeps_error_toast() {
        let mut app = create_read_only_app();
        app.add_node();
        app.pan(20.0, 0.0);
        app.add_node();
        app.mindmap.cycle_selection(1);

        app.toast = None;
        app.start_connect();
        app.confirm_connect();
        assert_save_error(&app, "Could not save mind maps");
        assert_eq!(app.mindmap.current_map().edges.len(), 1);
    }

    #[test]
    fn test_failed_map_prompt_save_keeps_error_toast() {
        let mut app = create_read_only_app();
        app.start_new_map();
        for c in "Work".chars() {
            app.prompt_add_char(c);
        }
        app.submit_prompt();

        assert_save_error(&app, "Could not save mind maps");
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.mindmap.current_map().name, "Work");
    }

    #[test]
    fn test_failed_color_save_keeps_error_toast() {
        let mut app = create_read_only_app();
        let before = app.mindmap.node_color;
        app.cycle_default_node_color();

        assert_save_error(&app, "Could not save node color");
        assert_eq!(app.mindmap.node_color, before.next());
    }

    #[test]
    fn test_failed_settings_save_keeps_error_toast() {
        let mut app = create_read_only_app();
        app.start_edit_settings();
        app.settings_form.as_mut().unwrap().values[0] = "40".to_string();
        app.submit_settings_form();

        assert_save_error(&app, "Could not save pomodoro settings");
        assert_eq!(app.pomodoro.settings().work_minutes, 40);
    }

    #[test]
    fn test_successful_save_shows_info_toast() {
        let mut app = create_test_app();
        app.start_add_event();
        type_into_event_form(&mut app, "Saved");
        app.submit_event_form();

        let toast = app.toast.as_ref().unwrap();
        assert_eq!(toast.kind, ToastKind::Info);
        assert_eq!(toast.message, "Event added");
    }

    #[test]
    fn test_reload_picks_up_external_changes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(temp_dir.path()).unwrap();
        let mut app = AppState::new(Box::new(storage), Config::default(), today()).unwrap();
        assert!(app.calendar.all_events().is_empty());

        let mut other = FileStorage::open(temp_dir.path()).unwrap();
        let event =
            crate::domain::CalendarEvent::from_draft(EventDraft::on("From elsewhere", today()))
                .unwrap();
        crate::persistence::save_events(&mut other, &[event]).unwrap();

        app.reload();

        assert_eq!(app.day_events().len(), 1);
        assert_eq!(app.day_events()[0].title, "From elsewhere");
        assert_eq!(app.toast.as_ref().unwrap().message, "Reloaded");
    }

    #[test]
    fn test_reload_keeps_current_map_when_none_stored() {
        let mut app = create_test_app();
        app.start_new_map();
        for c in "Second".chars() {
            app.prompt_add_char(c);
        }
        app.submit_prompt();

        app.reload();
        assert_eq!(app.mindmap.current_map().name, "Second");
    }

    #[test]
    fn test_selected_node_visibility_follows_viewport() {
        let mut app = create_test_app();
        assert_eq!(app.selected_node_visible(), None);

        app.add_node();
        assert_eq!(app.selected_node_visible(), Some(true));

        app.pan(100.0, 0.0);
        assert_eq!(app.selected_node_visible(), Some(false));

        app.focus_selected();
        assert_eq!(app.selected_node_visible(), Some(true));
    }

    #[test]
    fn test_discarded_collection_is_reported() {
        let mut storage = MemoryStorage::new();
        storage.set(EVENTS_KEY, "{ broken").unwrap();
        let app = AppState::new(Box::new(storage), Config::default(), today()).unwrap();

        let toast = app.toast.as_ref().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert!(toast.message.contains(EVENTS_KEY));
        assert!(app.calendar.all_events().is_empty());
    }

    #[test]
    fn test_calendar_cursor_navigation() {
        let mut app = create_test_app();
        app.move_cursor_days(7);
        assert_eq!(app.calendar.current_date, NaiveDate::from_ymd_opt(2024, 4, 17).unwrap());
        app.navigate(NavDirection::Next);
        assert_eq!(app.calendar.current_date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        app.go_to_today();
        assert_eq!(app.calendar.current_date, today());
        app.cycle_view();
        assert_eq!(app.calendar.view, CalendarView::Week);
    }

    #[test]
    fn test_add_node_at_view_center() {
        let mut app = create_test_app();
        app.canvas_size = (400.0, 200.0);
        app.add_node();

        let node = app.mindmap.selected_node().unwrap();
        assert_eq!(node.center(), (200.0, 100.0));
    }

    #[test]
    fn test_connect_mode_toggles_connection() {
        let mut app = create_test_app();
        app.config.auto_connect = false;
        app.mindmap.auto_connect.enabled = false;
        app.add_node();
        app.pan(20.0, 0.0);
        app.add_node();
        app.mindmap.cycle_selection(1);

        app.start_connect();
        assert_eq!(app.ui_mode, UiMode::Connecting);
        app.confirm_connect();
        assert_eq!(app.mindmap.current_map().edges.len(), 1);

        app.start_connect();
        app.confirm_connect();
        assert!(app.mindmap.current_map().edges.is_empty());
    }

    #[test]
    fn test_start_connect_needs_two_nodes() {
        let mut app = create_test_app();
        app.add_node();
        app.start_connect();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.toast.as_ref().unwrap().kind, ToastKind::Error);
    }

    #[test]
    fn test_edit_node_form() {
        let mut app = create_test_app();
        app.add_node();
        app.start_edit_node();
        app.node_form.as_mut().unwrap().title.clear();
        for c in "Idea".chars() {
            app.node_form_add_char(c);
        }
        app.node_form_toggle_field();
        for c in "more".chars() {
            app.node_form_add_char(c);
        }
        app.submit_node_form();

        let node = app.mindmap.selected_node().unwrap();
        assert_eq!(node.title, "Idea");
        assert_eq!(node.content, "more");
    }

    #[test]
    fn test_delete_node_via_confirmation() {
        let mut app = create_test_app();
        app.add_node();
        app.request_delete_node();
        app.confirm_delete();
        assert!(app.mindmap.current_map().nodes.is_empty());
    }

    #[test]
    fn test_map_prompt_and_delete_last_map() {
        let mut app = create_test_app();
        app.start_new_map();
        for c in "Work".chars() {
            app.prompt_add_char(c);
        }
        app.submit_prompt();
        assert_eq!(app.mindmap.maps().len(), 2);
        assert_eq!(app.mindmap.current_map().name, "Work");

        app.start_rename_map();
        app.prompt_backspace();
        app.prompt_add_char('s');
        app.submit_prompt();
        assert_eq!(app.mindmap.current_map().name, "Wors");

        app.request_delete_map();
        app.confirm_delete();
        app.request_delete_map();
        app.confirm_delete();
        assert_eq!(app.mindmap.maps().len(), 1);
        assert_eq!(app.mindmap.current_map().name, crate::domain::mindmap::DEFAULT_MAP_NAME);
    }

    #[test]
    fn test_blank_map_name_keeps_prompt() {
        let mut app = create_test_app();
        app.start_new_map();
        app.submit_prompt();
        assert_eq!(app.ui_mode, UiMode::NamingMap);
        assert_eq!(app.mindmap.maps().len(), 1);
    }

    #[test]
    fn test_settings_form_updates_timer() {
        let mut app = create_test_app();
        app.start_edit_settings();
        app.settings_form.as_mut().unwrap().values[0] = "50".to_string();
        app.submit_settings_form();

        assert_eq!(app.pomodoro.settings().work_minutes, 50);
        assert_eq!(app.pomodoro.time_left(), 50 * 60);
    }

    #[test]
    fn test_settings_form_rejects_zero() {
        let mut app = create_test_app();
        app.start_edit_settings();
        app.settings_form.as_mut().unwrap().values[3] = "0".to_string();
        app.submit_settings_form();

        assert_eq!(app.ui_mode, UiMode::EditingSettings);
        assert_eq!(app.pomodoro.settings().sessions_until_long_break, 4);
    }

    #[test]
    fn test_tick_completes_session() {
        let mut app = create_test_app();
        app.config.notifications = false;
        app.pomodoro
            .update_settings(SettingsPatch { work_minutes: Some(1), ..Default::default() })
            .unwrap();
        app.toggle_timer();

        let start = Instant::now();
        app.tick(start + std::time::Duration::from_secs(61));

        assert_eq!(app.pomodoro.kind(), SessionKind::ShortBreak);
        assert_eq!(app.pomodoro.completed_sessions(), 1);
        let toast = app.toast.as_ref().unwrap();
        assert_eq!(toast.kind, ToastKind::Info);
        assert!(toast.expires_at > start + std::time::Duration::from_secs(61));
    }

    #[test]
    fn test_session_toast_survives_stale_toast_expiry() {
        let mut app = create_test_app();
        app.config.notifications = false;
        app.pomodoro
            .update_settings(SettingsPatch { work_minutes: Some(1), ..Default::default() })
            .unwrap();
        app.toast_info("old news");
        app.toggle_timer();
        assert!(app.pomodoro.is_running());

        // Both the old toast's deadline and the session end fall inside one tick
        let late = Instant::now() + std::time::Duration::from_secs(app.config.toast_seconds + 120);
        app.tick(late);

        let toast = app.toast.as_ref().unwrap();
        assert_ne!(toast.message, "old news");
        assert_eq!(toast.kind, ToastKind::Info);
    }

    #[test]
    fn test_toggle_timer_starts_and_pauses() {
        let mut app = create_test_app();
        app.toggle_timer();
        assert!(app.pomodoro.is_running());
        app.toggle_timer();
        assert!(!app.pomodoro.is_running());
    }

    #[test]
    fn test_toast_expires() {
        let mut app = create_test_app();
        app.toast_info("hello");
        let later = Instant::now() + std::time::Duration::from_secs(app.config.toast_seconds + 1);
        app.tick(later);
        assert!(app.toast.is_none());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("title cannot be empty"), "Title cannot be empty");
        assert_eq!(capitalize(""), "");
    }
}
