//! `quotawatch once`: a single silent poll printed as plain text.

use std::fmt::Write as _;

use anyhow::Result;

use quotawatch_core::api::QuotaCoreBuilder;
use quotawatch_core::config::Settings;
use quotawatch_core::presenter::{DetailRow, Indicator};

/// Poll once and print the report. Fails when the poll fails, after the
/// offline indicator has been printed.
pub async fn run(settings: Settings) -> Result<()> {
    let core = QuotaCoreBuilder::new(settings).build();
    let result = core.poll_once().await;

    let details = core.details();
    print!("{}", render_report(&core.indicator(), details.as_deref()));

    result?;
    Ok(())
}

/// Indicator line, tooltip body and detail rows as plain text
pub fn render_report(indicator: &Indicator, details: Option<&[DetailRow]>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", indicator.text());
    out.push('\n');
    out.push_str(indicator.tooltip.trim_end());
    out.push('\n');

    if let Some(rows) = details {
        out.push('\n');
        for row in rows {
            let _ = writeln!(out, "{}", render_row(row));
        }
    }
    out
}

fn render_row(row: &DetailRow) -> String {
    match row {
        DetailRow::Item {
            icon,
            label,
            description,
            detail,
        } => format!("{} {:<24} {}  {}", icon.glyph(), label, description, detail),
        DetailRow::Separator(title) => format!("-- {} --", title),
        DetailRow::Placeholder(text) => format!("   {}", text),
    }
}
