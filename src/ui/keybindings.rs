use crate::app::{AppState, ToastKind};
use crate::domain::{Tab, UiMode};
use crate::ui::styles::{error_style, hint_style, info_style, selected_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
    Frame,
};

/// Hints for the current tab and mode
pub fn hints(app: &AppState) -> &'static str {
    match app.ui_mode {
        UiMode::Searching => " type to filter   Enter keep   Esc clear",
        UiMode::EditingEvent => " Tab/↑/↓ field   ←/→ or Space color   Enter save   Esc cancel",
        UiMode::EditingNode => " Tab field   Enter save   Esc cancel",
        UiMode::NamingMap => " Enter save   Esc cancel",
        UiMode::EditingSettings => " Tab/↑/↓ field   digits only   Enter save   Esc cancel",
        UiMode::ConfirmDelete => " y confirm   n cancel",
        UiMode::Connecting => " [/] pick target   Enter connect/disconnect   Esc cancel",
        UiMode::Help => " any key to close",
        UiMode::Normal => match app.tab {
            Tab::Calendar => {
                " ←/→/↑/↓ day   [/] period   t today   v view   j/k event   a add   e edit   x done   d delete   / search   Tab next   ? help   q quit"
            }
            Tab::MindMap => {
                " a add   ←/→/↑/↓ move   hjkl pan   +/- zoom   [/] select   e edit   x connect   c color   d delete   N/R/D map   </> maps   ? help"
            }
            Tab::Pomodoro => " Space start/pause   r reset   s skip   1/2/3 mode   e settings   Tab next   ? help   q quit",
        },
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, app: &AppState, area: Rect) {
    let paragraph = Paragraph::new(Line::raw(hints(app))).style(hint_style());
    f.render_widget(paragraph, area);
}

/// Render the tab bar
pub fn render_tab_bar(f: &mut Frame, app: &AppState, area: Rect) {
    let titles: Vec<Line> = Tab::all()
        .iter()
        .map(|t| Line::from(Span::styled(t.title(), title_style())))
        .collect();
    let selected = Tab::all().iter().position(|t| *t == app.tab).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(selected_style())
        .divider("|");
    f.render_widget(tabs, area);
}

/// Render the toast line (empty when there is nothing to show)
pub fn render_status_line(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(toast) = &app.toast else {
        return;
    };
    let style = match toast.kind {
        ToastKind::Info => info_style(),
        ToastKind::Error => error_style(),
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(format!(" {}", toast.message), style)));
    f.render_widget(paragraph, area);
}
