use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use quotawatch_core::api::NotifyLevel;

use crate::ui::view_state::Notification;

/// Key hints shown on the status bar
const KEY_HINTS: [(&str, &str); 4] = [
    ("r", "Refresh"),
    ("d", "Details"),
    ("c", "Reload config"),
    ("q", "Quit"),
];

/// Bottom line: key hints, then the current notification if any
pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame, area: Rect, notification: Option<&Notification>) {
        let paragraph = Paragraph::new(Self::line(notification))
            .style(Style::default().bg(Color::Black));
        frame.render_widget(paragraph, area);
    }

    pub fn line(notification: Option<&Notification>) -> Line<'static> {
        let mut spans = vec![Span::raw(" ")];

        for (key, label) in KEY_HINTS {
            spans.push(Span::styled(
                key,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(":{} ", label),
                Style::default().fg(Color::DarkGray),
            ));
        }

        if let Some(notification) = notification {
            let style = match notification.level {
                NotifyLevel::Info => Style::default().fg(Color::White),
                NotifyLevel::Error => Style::default().fg(Color::White).bg(Color::Red),
            };
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!(" {} ", notification.message), style));
        }

        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_hints_only() {
        let line = StatusBar::line(None);
        assert_eq!(
            text(&line),
            " r:Refresh d:Details c:Reload config q:Quit "
        );
    }

    #[test]
    fn test_error_notification_is_highlighted() {
        let notification = Notification {
            level: NotifyLevel::Error,
            message: "Failed: connection refused".to_string(),
            shown_at: Instant::now(),
        };
        let line = StatusBar::line(Some(&notification));

        let last = line.spans.last().unwrap();
        assert_eq!(last.content, " Failed: connection refused ");
        assert_eq!(last.style.bg, Some(Color::Red));
    }
}
