use crate::app::AppState;
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const HELP: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("Tab / F1-F3", "switch tab"),
            ("?", "this help"),
            ("Ctrl+R", "reload data from disk"),
            ("q / Ctrl+C", "quit"),
        ],
    ),
    (
        "Calendar",
        &[
            ("arrows", "move day cursor"),
            ("[ ]", "previous / next period"),
            ("t", "today"),
            ("v / m w D", "cycle view / month week day"),
            ("j k", "select event of the day"),
            ("a e", "add / edit event"),
            ("x Space", "toggle complete"),
            ("d", "delete event"),
            ("/", "search (Esc clears)"),
        ],
    ),
    (
        "Mind map",
        &[
            ("a", "add node at view center"),
            ("arrows", "move selected node"),
            ("hjkl Shift+arrows", "pan"),
            ("+ - 0 f", "zoom in / out / reset / focus"),
            ("[ ]", "select node"),
            ("e c C", "edit / recolor / new-node color"),
            ("x A", "link mode / auto-connect"),
            ("d", "delete node"),
            ("N R D < >", "new / rename / delete / switch map"),
        ],
    ),
    (
        "Pomodoro",
        &[
            ("Space", "start / pause"),
            ("r s", "reset / skip"),
            ("1 2 3", "work / short / long"),
            ("e", "settings"),
        ],
    ),
];

/// Render the delete confirmation modal
pub fn render_confirm_modal(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(question) = app.pending_delete_label() else {
        return;
    };
    let modal_area = create_modal_area(area, 7);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let lines = vec![
        Line::raw(""),
        Line::raw(format!("  {}", question)),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  [y]", modal_title_style()),
            Span::raw(" Delete  "),
            Span::styled("[n]", modal_title_style()),
            Span::raw(" Cancel"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Confirm ", modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

/// Render the key reference
pub fn render_help_modal(f: &mut Frame, area: Rect) {
    let mut lines = Vec::new();
    for (section, keys) in HELP {
        lines.push(Line::from(Span::styled(format!(" {}", section), modal_title_style())));
        for (key, action) in keys.iter() {
            lines.push(Line::raw(format!("   {:<20}{}", key, action)));
        }
        lines.push(Line::raw(""));
    }

    let height = (lines.len() as u16 + 2).min(area.height);
    let modal_area = create_modal_area(area, height);
    f.render_widget(Clear, modal_area);

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" Keys ", modal_title_style()))
            .style(modal_bg_style()),
    );
    f.render_widget(paragraph, modal_area);
}
