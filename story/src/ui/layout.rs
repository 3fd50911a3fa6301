//! Layout calculations for the story TUI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout areas
pub struct AppLayout {
    pub title_area: Rect,
    pub sidebar_area: Rect,
    pub story_area: Rect,
    pub status_bar: Rect,
    pub hotkey_bar: Rect,
}

impl AppLayout {
    /// Calculate layout based on terminal size
    pub fn calculate(area: Rect) -> Self {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title bar
                Constraint::Min(8),    // Main content
                Constraint::Length(1), // Status bar
                Constraint::Length(1), // Hotkey bar
            ])
            .split(area);

        // Sidebar form on the left, story on the right
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(36), Constraint::Min(20)])
            .split(main_chunks[1]);

        Self {
            title_area: main_chunks[0],
            sidebar_area: content_chunks[0],
            story_area: content_chunks[1],
            status_bar: main_chunks[2],
            hotkey_bar: main_chunks[3],
        }
    }
}

/// Calculate a centered popup of fixed size, clamped to `area`
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_fills_area() {
        let area = Rect::new(0, 0, 100, 30);
        let layout = AppLayout::calculate(area);

        assert_eq!(layout.title_area.height, 1);
        assert_eq!(layout.sidebar_area.width, 36);
        assert_eq!(layout.story_area.width, 64);
        assert_eq!(layout.hotkey_bar.y, 29);
    }

    #[test]
    fn test_centered_rect_is_clamped() {
        let area = Rect::new(0, 0, 40, 10);
        let popup = centered_rect_fixed(60, 20, area);
        assert_eq!(popup, area);

        let popup = centered_rect_fixed(20, 4, area);
        assert_eq!(popup, Rect::new(10, 3, 20, 4));
    }
}
