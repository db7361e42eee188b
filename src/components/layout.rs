//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main screen layout areas
pub struct MainLayout {
    pub header: Rect,
    pub stats: Rect,
    pub filters: Rect,
    pub table: Rect,
    pub help: Rect,
}

/// Width of one toast in the top-right corner
const TOAST_WIDTH: u16 = 48;

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Area inset by a fixed margin, used by the full-screen overlays
pub fn overlay_area(area: Rect, margin: u16) -> Rect {
    Rect::new(
        area.x + margin,
        area.y + margin,
        area.width.saturating_sub(margin * 2),
        area.height.saturating_sub(margin * 2),
    )
}

/// Calculate main screen layout
pub fn calculate_main_layout(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    MainLayout {
        header: chunks[0],
        stats: chunks[1],
        filters: chunks[2],
        table: chunks[3],
        help: chunks[4],
    }
}

/// Split the stats row into equally wide cards
pub fn stat_cards(area: Rect, count: usize) -> Vec<Rect> {
    let constraints = vec![Constraint::Ratio(1, count.max(1) as u32); count];
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

/// Slot for the `index`-th toast, stacked down from the top-right corner.
/// `None` once the stack would run off the screen.
pub fn toast_slot(area: Rect, index: u16) -> Option<Rect> {
    let height = 3;
    let y = area.y + 1 + index * height;
    if y + height > area.y + area.height {
        return None;
    }
    let width = TOAST_WIDTH.min(area.width);
    Some(Rect::new(area.x + area.width - width, y, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_popup_clamps_to_area() {
        let area = Rect::new(0, 0, 40, 10);
        let popup = centered_popup(area, 60, 6);
        assert_eq!(popup.width, 40);
        assert_eq!(popup.y, 2);
    }

    #[test]
    fn test_main_layout_gives_rest_to_table() {
        let layout = calculate_main_layout(Rect::new(0, 0, 100, 30));
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.stats.height, 3);
        assert_eq!(layout.table.height, 30 - 1 - 3 - 3 - 1);
        assert_eq!(layout.help.y, 29);
    }

    #[test]
    fn test_toast_slots_stack_and_stop_at_bottom() {
        let area = Rect::new(0, 0, 100, 10);
        let first = toast_slot(area, 0).unwrap();
        assert_eq!(first.x, 100 - TOAST_WIDTH);
        assert_eq!(toast_slot(area, 1).unwrap().y, first.y + 3);
        assert!(toast_slot(area, 3).is_none());
    }
}
