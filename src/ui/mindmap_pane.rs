use crate::app::{AppState, CELL_HEIGHT, CELL_WIDTH};
use crate::domain::{MindMap, UiMode, Viewport};
use crate::ui::layout::split_sidebar;
use crate::ui::styles::{
    border_style, default_style, modal_title_style, muted_style, node_color, title_style,
};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Rectangle},
        Block, Borders, Paragraph, Wrap,
    },
    Frame,
};
use uuid::Uuid;

/// Canvas y grows upwards while world y grows downwards
fn flip(y: f64) -> f64 {
    -y
}

/// Render the mind-map canvas and its info sidebar
pub fn render_mindmap_pane(f: &mut Frame, app: &mut AppState, area: Rect) {
    let (canvas_area, info_area) = split_sidebar(area);

    let map = app.mindmap.current_map();
    let position = app
        .mindmap
        .maps()
        .iter()
        .position(|m| m.id == map.id)
        .map_or(0, |p| p + 1);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(
            format!(
                " {} ({}/{}) · {:.0}% ",
                map.name,
                position,
                app.mindmap.maps().len(),
                app.viewport.zoom * 100.0
            ),
            title_style(),
        ));

    // Screen units for the inner canvas, read back by zoom and add-node
    let inner = block.inner(canvas_area);
    app.canvas_size = (
        f64::from(inner.width.max(1)) * CELL_WIDTH,
        f64::from(inner.height.max(1)) * CELL_HEIGHT,
    );

    let map = app.mindmap.current_map();
    let viewport = app.viewport;
    let (x_bounds, y_bounds) = viewport.visible_bounds(app.canvas_size.0, app.canvas_size.1);
    let selected = app.mindmap.selected_node_id();
    let source = if app.ui_mode == UiMode::Connecting {
        app.connect_source
    } else {
        None
    };

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds([flip(y_bounds[1]), flip(y_bounds[0])])
        .paint(|ctx| paint_map(ctx, map, &viewport, selected, source));
    f.render_widget(canvas, canvas_area);

    render_info(f, app, info_area);
}

fn paint_map(
    ctx: &mut ratatui::widgets::canvas::Context,
    map: &MindMap,
    viewport: &Viewport,
    selected: Option<Uuid>,
    source: Option<Uuid>,
) {
    for edge in &map.edges {
        let (Some(a), Some(b)) = (map.node(edge.source), map.node(edge.target)) else {
            continue;
        };
        let ((x1, y1), (x2, y2)) = (a.center(), b.center());
        ctx.draw(&CanvasLine {
            x1,
            y1: flip(y1),
            x2,
            y2: flip(y2),
            color: Color::Gray,
        });
    }

    for node in &map.nodes {
        let color = if Some(node.id) == source {
            Color::Yellow
        } else if Some(node.id) == selected {
            Color::White
        } else {
            node_color(node.color)
        };
        ctx.draw(&Rectangle {
            x: node.x,
            y: flip(node.y + node.height),
            width: node.width,
            height: node.height,
            color,
        });
    }

    ctx.layer();

    // One text row is CELL_HEIGHT screen units tall
    let row = CELL_HEIGHT / viewport.zoom;
    let col = CELL_WIDTH / viewport.zoom;
    for node in &map.nodes {
        let mut style = Style::default().fg(node_color(node.color));
        if Some(node.id) == selected {
            style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        ctx.print(node.x + col, flip(node.y + row), Span::styled(node.title.clone(), style));
        if !node.content.is_empty() && node.height > 2.5 * row {
            let first_line = node.content.lines().next().unwrap_or_default().to_string();
            let line = Span::styled(first_line, muted_style());
            ctx.print(node.x + col, flip(node.y + 2.0 * row), line);
        }
    }
}

fn render_info(f: &mut Frame, app: &AppState, area: Rect) {
    let map = app.mindmap.current_map();
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Nodes: ", default_style()),
            Span::styled(map.nodes.len().to_string(), title_style()),
            Span::styled("  Links: ", default_style()),
            Span::styled(map.edges.len().to_string(), title_style()),
        ]),
        Line::from(vec![
            Span::styled("New node color: ", default_style()),
            Span::styled(
                app.mindmap.node_color.name(),
                Style::default().fg(node_color(app.mindmap.node_color)),
            ),
        ]),
        Line::from(vec![
            Span::styled("Auto-connect: ", default_style()),
            Span::styled(
                if app.mindmap.auto_connect.enabled {
                    format!("on ({:.0})", app.mindmap.auto_connect.distance)
                } else {
                    "off".to_string()
                },
                muted_style(),
            ),
        ]),
        Line::raw(""),
    ];

    if app.ui_mode == UiMode::Connecting {
        lines.push(Line::from(Span::styled("Pick a node to link to", modal_title_style())));
        lines.push(Line::raw(""));
    }

    match app.mindmap.selected_node() {
        Some(node) => {
            lines.push(Line::from(Span::styled(node.title.clone(), title_style())));
            if !node.content.is_empty() {
                lines.push(Line::raw(node.content.clone()));
            }
            lines.push(Line::from(Span::styled(
                format!("at ({:.0}, {:.0}) · {}", node.x, node.y, node.color.name()),
                muted_style(),
            )));
            if app.selected_node_visible() == Some(false) {
                lines.push(Line::from(Span::styled("off screen · f to focus", muted_style())));
            }
            let neighbours: Vec<String> = map
                .edges_of(node.id)
                .iter()
                .filter_map(|e| e.other(node.id))
                .filter_map(|id| map.node(id))
                .map(|n| format!("  - {}", n.title))
                .collect();
            if !neighbours.is_empty() {
                lines.push(Line::raw(""));
                lines.push(Line::from(Span::styled("Linked to", default_style())));
                lines.extend(neighbours.into_iter().map(Line::raw));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "No node selected. Press a to add one.",
            muted_style(),
        ))),
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(" Node ", title_style())),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
