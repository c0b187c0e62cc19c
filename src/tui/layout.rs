use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect, // Area inside the outer border
    pub table_area: Rect,
    pub controls_area: Rect,
    pub stats_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal dimensions required for the dashboard
    /// Width: room for the ID, task and status columns side by side
    /// Height: 3 table rows (with header and borders) + 3 controls + 4 stats + 1 status
    pub const MIN_WIDTH: u16 = 60;
    pub const MIN_HEIGHT: u16 = 14;

    pub fn calculate(size: Rect) -> Self {
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);
        let size = Rect::new(size.x, size.y, width, height);

        // Outer border takes 1 char on each side
        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(6),    // Task table
                Constraint::Length(3), // Controls
                Constraint::Length(4), // Stats
                Constraint::Length(1), // Status
            ])
            .split(inner_area);

        Self {
            inner_area,
            table_area: vertical[0],
            controls_area: vertical[1],
            stats_area: vertical[2],
            status_area: vertical[3],
        }
    }
}
