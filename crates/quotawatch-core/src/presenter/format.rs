//! Small formatting helpers shared by the indicator, tooltip and detail view.

use chrono::{DateTime, Utc};

use crate::status::StatusRecord;

/// Filled cell of a progress bar
pub const BAR_FILLED: char = '█';
/// Empty cell of a progress bar
pub const BAR_EMPTY: char = '░';

/// Per-model percentage at or below which a row is shown as caution
pub const CAUTION_PERCENT: u8 = 50;
/// Per-model percentage at or below which a row is shown as critical
pub const CRITICAL_PERCENT: u8 = 20;

/// Labels longer than this are shortened in the tooltip table
const LABEL_MAX_CHARS: usize = 22;
const LABEL_KEEP_CHARS: usize = 20;

/// Filled and empty cell counts for `percent` on a bar of `width` cells
pub fn bar_cells(percent: f64, width: usize) -> (usize, usize) {
    let ratio = if percent.is_finite() { percent / 100.0 } else { 0.0 };
    let filled = (ratio * width as f64).round().clamp(0.0, width as f64) as usize;
    (filled, width - filled)
}

/// Fixed-width text progress bar, e.g. `███████░░░` for 70% at width 10
pub fn progress_bar(percent: f64, width: usize) -> String {
    let (filled, empty) = bar_cells(percent, width);
    let mut bar = String::with_capacity((filled + empty) * BAR_FILLED.len_utf8());
    bar.extend(std::iter::repeat_n(BAR_FILLED, filled));
    bar.extend(std::iter::repeat_n(BAR_EMPTY, empty));
    bar
}

/// Countdown to `reset`: `Now` once it has passed, otherwise `{h}h {m}m`
pub fn time_remaining(reset: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let remaining = reset - now;
    if remaining.num_milliseconds() <= 0 {
        return "Now".to_string();
    }
    let minutes = remaining.num_minutes();
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Shorten long model labels for table cells
pub fn truncate_label(label: &str) -> String {
    if label.chars().count() > LABEL_MAX_CHARS {
        let head: String = label.chars().take(LABEL_KEEP_CHARS).collect();
        format!("{}..", head)
    } else {
        label.to_string()
    }
}

/// `1234567` -> `1,234,567`
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Headline percentage of a record.
///
/// The global credit balance wins (floored, 0 when the plan has no
/// allowance); otherwise the most depleted model quota. `None` when the
/// record carries neither.
pub fn overall_percent(record: &StatusRecord) -> Option<u32> {
    if let Some(credits) = record.credits {
        if credits.total <= 0 {
            return Some(0);
        }
        let pct = i128::from(credits.available.max(0)) * 100 / i128::from(credits.total);
        return Some(u32::try_from(pct).unwrap_or(u32::MAX));
    }

    record
        .quotas
        .iter()
        .map(|q| q.remaining_fraction)
        .reduce(f64::min)
        .map(floor_percent)
}

/// Fraction to a floored whole percentage; the epsilon keeps values like
/// 0.29 from landing on 28
fn floor_percent(fraction: f64) -> u32 {
    (fraction.clamp(0.0, 1.0) * 100.0 + 1e-9).floor() as u32
}

/// Severity of a single model quota
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaLevel {
    Ok,
    Caution,
    Critical,
}

impl QuotaLevel {
    pub fn for_percent(percent: u8) -> Self {
        if percent <= CRITICAL_PERCENT {
            QuotaLevel::Critical
        } else if percent <= CAUTION_PERCENT {
            QuotaLevel::Caution
        } else {
            QuotaLevel::Ok
        }
    }

    /// Marker used in the tooltip table
    pub fn marker(&self) -> &'static str {
        match self {
            QuotaLevel::Ok => "🟢",
            QuotaLevel::Caution => "🟡",
            QuotaLevel::Critical => "🔴",
        }
    }
}
