use crate::app::{AppState, PromptPurpose, EVENT_FORM_FIELDS, SETTINGS_FIELDS};
use crate::ui::{
    layout::create_modal_area,
    styles::{event_color, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Label and value lines for one field; the active field gets a cursor
fn field_lines(label: &str, value: &str, active: bool, value_style: Style) -> [Line<'static>; 2] {
    let label = if active {
        format!("{}: (editing)", label)
    } else {
        format!("{}:", label)
    };
    [
        Line::raw(label),
        Line::from(vec![
            Span::raw("> "),
            Span::styled(value.to_string(), value_style),
            if active {
                Span::styled("█", modal_title_style())
            } else {
                Span::raw("")
            },
        ]),
    ]
}

fn render_form(f: &mut Frame, area: Rect, title: String, lines: Vec<Line<'static>>) {
    let height = (lines.len() as u16 + 2).min(area.height);
    let modal_area = create_modal_area(area, height);

    // Clear the area behind the form
    f.render_widget(Clear, modal_area);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title, modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, modal_area);
}

/// Add/edit event form
pub fn render_event_form(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(form) = &app.event_form else {
        return;
    };
    let title = if form.editing.is_some() { " Edit Event " } else { " Add Event " };

    let color_name = form.color.name();
    let values = [
        form.title.as_str(),
        form.description.as_str(),
        form.due.as_str(),
        form.planned.as_str(),
        color_name,
        form.reminder.as_str(),
    ];

    let mut lines = vec![Line::raw("")];
    for (idx, (label, value)) in EVENT_FORM_FIELDS.iter().zip(values).enumerate() {
        let style = if label == &"Color" {
            Style::default().fg(event_color(form.color))
        } else {
            modal_title_style()
        };
        lines.extend(field_lines(label, value, form.field == idx, style));
    }
    lines.push(Line::raw(""));
    lines.push(Line::raw("Tab to switch fields  ·  Enter to save  ·  Esc to cancel"));

    render_form(f, area, title.to_string(), lines);
}

/// Node title/content form
pub fn render_node_form(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(form) = &app.node_form else {
        return;
    };
    let mut lines = vec![Line::raw("")];
    lines.extend(field_lines("Title", &form.title, form.field == 0, modal_title_style()));
    lines.push(Line::raw(""));
    lines.extend(field_lines("Content", &form.content, form.field == 1, modal_title_style()));
    lines.push(Line::raw(""));
    lines.push(Line::raw("Tab to switch fields  ·  Enter to save  ·  Esc to cancel"));

    render_form(f, area, " Edit Node ".to_string(), lines);
}

/// Map name prompt
pub fn render_map_prompt(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(prompt) = &app.prompt else {
        return;
    };
    let title = match prompt.purpose {
        PromptPurpose::NewMap => " New Map ",
        PromptPurpose::RenameMap(_) => " Rename Map ",
    };
    let mut lines = vec![Line::raw("")];
    lines.extend(field_lines("Name", &prompt.buffer, true, modal_title_style()));
    lines.push(Line::raw(""));
    lines.push(Line::raw("Enter to save  ·  Esc to cancel"));

    render_form(f, area, title.to_string(), lines);
}

/// Pomodoro settings form
pub fn render_settings_form(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(form) = &app.settings_form else {
        return;
    };
    let mut lines = vec![Line::raw("")];
    for (idx, label) in SETTINGS_FIELDS.iter().enumerate() {
        lines.extend(field_lines(label, &form.values[idx], form.field == idx, modal_title_style()));
    }
    lines.push(Line::raw(""));
    lines.push(Line::raw("All values must be at least 1  ·  Enter to save  ·  Esc to cancel"));

    render_form(f, area, " Pomodoro Settings ".to_string(), lines);
}
