use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub tabs_area: Rect,
    pub content_area: Rect,
    pub status_area: Rect,
    pub keybindings_area: Rect,
}

/// Create the main layout
/// - Top bar: tabs (1 row)
/// - Main area: active tab
/// - Status line: toast (1 row)
/// - Bottom bar: keybindings (1 row)
pub fn create_layout(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tabs
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status
            Constraint::Length(1), // Keybindings
        ])
        .split(area);

    MainLayout {
        tabs_area: chunks[0],
        content_area: chunks[1],
        status_area: chunks[2],
        keybindings_area: chunks[3],
    }
}

/// Split a content area into main (70%) and sidebar (30%)
pub fn split_sidebar(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Split an area into `count` equal parts
pub fn split_even(area: Rect, direction: Direction, count: usize) -> Vec<Rect> {
    let count = count.max(1) as u32;
    let constraints: Vec<Constraint> = (0..count).map(|_| Constraint::Ratio(1, count)).collect();
    Layout::default()
        .direction(direction)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

/// Centered modal area of the given height
pub fn create_modal_area(area: Rect, height: u16) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_layout() {
        let area = Rect::new(0, 0, 100, 50);
        let layout = create_layout(area);

        assert_eq!(layout.tabs_area.height, 1);
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.keybindings_area.height, 1);
        assert_eq!(layout.content_area.height, 47);
    }

    #[test]
    fn test_split_sidebar() {
        let (main, side) = split_sidebar(Rect::new(0, 0, 100, 20));
        assert_eq!(main.width, 70);
        assert_eq!(side.width, 30);
    }

    #[test]
    fn test_split_even_covers_area() {
        let parts = split_even(Rect::new(0, 0, 70, 12), Direction::Horizontal, 7);
        assert_eq!(parts.len(), 7);
        assert_eq!(parts.iter().map(|r| r.width).sum::<u16>(), 70);
    }

    #[test]
    fn test_create_modal_area() {
        let area = Rect::new(0, 0, 100, 50);
        let modal = create_modal_area(area, 16);

        assert!(modal.width < area.width);
        assert_eq!(modal.height, 16);
    }
}
