use ratatui::layout::{Constraint, Direction, Rect};

/// Detail popup size on a normal terminal (percent of the screen)
const DETAIL_WIDTH_PCT: u16 = 70;
const DETAIL_HEIGHT_PCT: u16 = 60;

/// Below this width the popup takes the whole screen width
const NARROW_WIDTH: u16 = 80;

/// Layout of the watch screen
#[derive(Debug, Default)]
pub struct Layout;

impl Layout {
    pub fn new() -> Self {
        Self
    }

    /// Calculate the main areas
    /// Layout: [ Indicator  (1 line) ]
    ///         [ Tooltip panel       ]
    ///         [ Status bar (1 line) ]
    pub fn calculate(&self, area: Rect) -> LayoutAreas {
        let rows = ratatui::layout::Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        LayoutAreas {
            indicator: rows[0],
            tooltip: rows[1],
            status_bar: rows[2],
        }
    }

    /// Area for the detail popup, widened on narrow terminals
    pub fn detail_area(&self, area: Rect) -> Rect {
        let width_pct = if area.width < NARROW_WIDTH {
            100
        } else {
            DETAIL_WIDTH_PCT
        };
        self.popup_area(area, width_pct, DETAIL_HEIGHT_PCT)
    }

    /// Calculate areas for a popup (centered)
    pub fn popup_area(&self, area: Rect, width_pct: u16, height_pct: u16) -> Rect {
        let popup_layout = ratatui::layout::Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - height_pct) / 2),
                Constraint::Percentage(height_pct),
                Constraint::Percentage((100 - height_pct) / 2),
            ])
            .split(area);

        ratatui::layout::Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - width_pct) / 2),
                Constraint::Percentage(width_pct),
                Constraint::Percentage((100 - width_pct) / 2),
            ])
            .split(popup_layout[1])[1]
    }
}

/// Calculated layout areas
pub struct LayoutAreas {
    pub indicator: Rect,
    pub tooltip: Rect,
    pub status_bar: Rect,
}
