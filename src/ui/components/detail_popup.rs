use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use quotawatch_core::presenter::{DetailIcon, DetailRow};

/// Width of the label column
const LABEL_WIDTH: usize = 24;

/// Popup listing the cached quota details
pub struct DetailPopup;

impl DetailPopup {
    /// Render the popup; `rows` is `None` until the first successful poll
    pub fn render(frame: &mut Frame, area: Rect, rows: Option<&[DetailRow]>) {
        frame.render_widget(Clear, area);

        let mut lines = vec![Line::from("")];
        match rows {
            Some(rows) => lines.extend(rows.iter().map(Self::row_line)),
            None => lines.push(Line::from(Span::styled(
                "  No quota data yet. Press r to refresh.",
                Style::default().fg(Color::DarkGray),
            ))),
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                "d",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" Close  ", Style::default().fg(Color::White)),
            Span::styled(
                "r",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" Refresh", Style::default().fg(Color::White)),
        ]));

        let block = Block::default()
            .title(" Quota Details ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn icon_color(icon: DetailIcon) -> Color {
        match icon {
            DetailIcon::Credits => Color::Cyan,
            DetailIcon::Check => Color::Green,
            DetailIcon::Caution => Color::Yellow,
            DetailIcon::Warning => Color::LightRed,
            DetailIcon::Error => Color::Red,
        }
    }

    /// " ✔ Label                    ██████░░░░ 60%  Reset: ..."
    pub fn row_line(row: &DetailRow) -> Line<'static> {
        match row {
            DetailRow::Item {
                icon,
                label,
                description,
                detail,
            } => Line::from(vec![
                Span::styled(
                    format!("  {} ", icon.glyph()),
                    Style::default().fg(Self::icon_color(*icon)),
                ),
                Span::styled(
                    format!("{:w$}", label, w = LABEL_WIDTH),
                    Style::default().fg(Color::White),
                ),
                Span::raw(format!(" {}  ", description)),
                Span::styled(detail.clone(), Style::default().fg(Color::DarkGray)),
            ]),
            DetailRow::Separator(title) => Line::from(Span::styled(
                format!("  ── {} ──", title),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            DetailRow::Placeholder(text) => Line::from(Span::styled(
                format!("  {}", text),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_item_row_layout() {
        let row = DetailRow::Item {
            icon: DetailIcon::Warning,
            label: "Gemini 3 Pro".to_string(),
            description: "█░░░░░░░░░ 10%".to_string(),
            detail: "Reset: Unknown".to_string(),
        };
        let line = DetailPopup::row_line(&row);

        assert_eq!(line.spans[0].style.fg, Some(Color::LightRed));
        assert!(text(&line).starts_with("  ⚠ Gemini 3 Pro "));
        assert!(text(&line).ends_with("10%  Reset: Unknown"));
    }

    #[test]
    fn test_caution_row_is_yellow() {
        let row = DetailRow::Item {
            icon: DetailIcon::Caution,
            label: "Claude Sonnet 4.5".to_string(),
            description: "████░░░░░░ 40%".to_string(),
            detail: "Reset: Unknown".to_string(),
        };
        let line = DetailPopup::row_line(&row);

        assert_eq!(line.spans[0].style.fg, Some(Color::Yellow));
        assert!(text(&line).starts_with("  ◐ Claude Sonnet 4.5 "));
    }

    #[test]
    fn test_separator_and_placeholder() {
        assert_eq!(
            text(&DetailPopup::row_line(&DetailRow::Separator("Models".to_string()))),
            "  ── Models ──"
        );
        assert_eq!(
            text(&DetailPopup::row_line(&DetailRow::Placeholder(
                "No specific model quotas found.".to_string()
            ))),
            "  No specific model quotas found."
        );
    }
}
