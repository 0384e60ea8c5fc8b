//! Tooltip panel: the indicator's markdown tooltip rendered for the terminal.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Gap between table columns
const COLUMN_GAP: &str = "  ";

pub struct TooltipPanel;

impl TooltipPanel {
    pub fn render(frame: &mut Frame, area: Rect, tooltip: &str) {
        let block = Block::default()
            .title(" Quota ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Gray));

        let paragraph = Paragraph::new(markdown_lines(tooltip))
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}

/// Convert the small markdown subset used by tooltips (headings, bold
/// lines, pipe tables, rules) into styled lines
pub fn markdown_lines(text: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut table: Vec<Vec<String>> = Vec::new();

    for raw in text.lines() {
        let trimmed = raw.trim();

        if trimmed.starts_with('|') {
            if !is_alignment_row(trimmed) {
                table.push(split_cells(trimmed));
            }
            continue;
        }
        if !table.is_empty() {
            lines.extend(table_lines(&table));
            table.clear();
        }

        if let Some(heading) = trimmed.strip_prefix("### ") {
            lines.push(Line::from(Span::styled(
                heading.to_string(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
        } else if trimmed == "---" {
            lines.push(Line::from(Span::styled(
                "─".repeat(24),
                Style::default().fg(Color::DarkGray),
            )));
        } else if trimmed.len() > 4 && trimmed.starts_with("**") && trimmed.ends_with("**") {
            lines.push(Line::from(Span::styled(
                strip_inline(trimmed),
                Style::default().add_modifier(Modifier::BOLD),
            )));
        } else {
            lines.push(Line::from(strip_inline(trimmed)));
        }
    }
    if !table.is_empty() {
        lines.extend(table_lines(&table));
    }
    lines
}

fn is_alignment_row(row: &str) -> bool {
    row.chars().all(|c| matches!(c, '|' | ':' | '-' | ' '))
}

fn split_cells(row: &str) -> Vec<String> {
    row.trim_matches('|')
        .split('|')
        .map(|cell| strip_inline(cell.trim()))
        .collect()
}

fn strip_inline(text: &str) -> String {
    text.replace("**", "").replace('`', "")
}

/// Pad cells to column width; the first row is the header
fn table_lines(rows: &[Vec<String>]) -> Vec<Line<'static>> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.width())
                .max()
                .unwrap_or(0)
        })
        .collect();

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let mut text = String::new();
            for (col, width) in widths.iter().enumerate() {
                let cell = row.get(col).map(String::as_str).unwrap_or("");
                if col > 0 {
                    text.push_str(COLUMN_GAP);
                }
                text.push_str(cell);
                text.push_str(&" ".repeat(width.saturating_sub(cell.width())));
            }
            let text = text.trim_end().to_string();
            if i == 0 {
                Line::from(Span::styled(
                    text,
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(text)
            }
        })
        .collect()
}
