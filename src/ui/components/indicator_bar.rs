use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use quotawatch_core::presenter::{Indicator, IndicatorTone};
use quotawatch_core::state::CyclePhase;

/// One-line status indicator at the top of the screen
pub struct IndicatorBar;

impl IndicatorBar {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        indicator: &Indicator,
        phase: CyclePhase,
        last_poll: Option<DateTime<Utc>>,
    ) {
        let mut spans = vec![Span::styled(
            format!(" {} ", indicator.text()),
            Self::tone_style(indicator.tone),
        )];

        if phase != CyclePhase::Idle {
            spans.push(Span::styled(
                format!(" {}...", phase.display_name()),
                Style::default().fg(Color::DarkGray),
            ));
        }

        if let Some(last_poll) = last_poll {
            let elapsed = Utc::now().signed_duration_since(last_poll).num_seconds();
            spans.push(Span::styled(
                format!(" [{}s ago]", elapsed.max(0)),
                Style::default().fg(Color::DarkGray),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Indicator colors; warning and error get a colored background
    pub fn tone_style(tone: IndicatorTone) -> Style {
        match tone {
            IndicatorTone::Normal => Style::default().fg(Color::White).bg(Color::DarkGray),
            IndicatorTone::Warning => Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            IndicatorTone::Error => Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        }
    }
}
