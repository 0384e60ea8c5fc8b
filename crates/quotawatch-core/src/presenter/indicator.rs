//! The persistent status indicator: short text, tone and tooltip.

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use super::format::{
    format_thousands, overall_percent, progress_bar, time_remaining, truncate_label, QuotaLevel,
};
use crate::status::StatusRecord;

/// Icon shown in front of the indicator label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndicatorIcon {
    Credits,
    Check,
    Warning,
    Error,
    Syncing,
}

impl IndicatorIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            IndicatorIcon::Credits => "◈",
            IndicatorIcon::Check => "✔",
            IndicatorIcon::Warning => "⚠",
            IndicatorIcon::Error => "✖",
            IndicatorIcon::Syncing => "⟳",
        }
    }
}

/// Background of the indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum IndicatorTone {
    #[default]
    Normal,
    Warning,
    Error,
}

/// Rendered indicator state, replaced as a whole at the end of each cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Indicator {
    pub icon: IndicatorIcon,
    pub label: String,
    pub tooltip: String,
    pub tone: IndicatorTone,
}

impl Default for Indicator {
    fn default() -> Self {
        Self {
            icon: IndicatorIcon::Syncing,
            label: "Waiting...".to_string(),
            tooltip: "Waiting for the first quota poll".to_string(),
            tone: IndicatorTone::Normal,
        }
    }
}

impl Indicator {
    /// Transient state while a manual refresh runs
    pub fn checking() -> Self {
        Self {
            icon: IndicatorIcon::Syncing,
            label: "Checking...".to_string(),
            tooltip: "Refreshing quota...".to_string(),
            tone: IndicatorTone::Normal,
        }
    }

    /// Error state after a failed cycle
    pub fn offline(message: &str) -> Self {
        Self {
            icon: IndicatorIcon::Error,
            label: "Offline".to_string(),
            tooltip: format!("Error: {}", message),
            tone: IndicatorTone::Error,
        }
    }

    /// Indicator for a freshly fetched record.
    ///
    /// `threshold` is the low-quota warning level in percent; the headline
    /// percentage strictly below it switches to the warning tone.
    pub fn from_record(record: &StatusRecord, threshold: u8, now: DateTime<Utc>) -> Self {
        let tooltip = build_tooltip(record, now);

        let Some(percent) = overall_percent(record) else {
            return Self {
                icon: IndicatorIcon::Check,
                label: "Quota OK".to_string(),
                tooltip,
                tone: IndicatorTone::Normal,
            };
        };

        let low = percent < u32::from(threshold);
        let icon = match (low, record.credits.is_some()) {
            (true, _) => IndicatorIcon::Warning,
            (false, true) => IndicatorIcon::Credits,
            (false, false) => IndicatorIcon::Check,
        };

        Self {
            icon,
            label: format!("{}%", percent),
            tooltip,
            tone: if low {
                IndicatorTone::Warning
            } else {
                IndicatorTone::Normal
            },
        }
    }

    /// Icon and label as one line, e.g. `◈ 80%`
    pub fn text(&self) -> String {
        format!("{} {}", self.icon.glyph(), self.label)
    }

    pub fn is_warning(&self) -> bool {
        self.tone == IndicatorTone::Warning
    }
}

/// Markdown tooltip with the credit balance, a per-model table and the
/// update time.
pub fn build_tooltip(record: &StatusRecord, now: DateTime<Utc>) -> String {
    let mut out = String::from("### Antigravity Quota\n\n");

    if let Some(credits) = record.credits {
        let pct = credits.percent();
        let _ = write!(
            out,
            "**Global Credits**\n\n| Available | Used | Balance |\n|:--|:--|:--|\n| **{}** | {}% | `{}` |\n\n",
            format_thousands(credits.available),
            (100.0 - pct).max(0.0).floor(),
            progress_bar(pct, 15)
        );
    }

    if !record.quotas.is_empty() {
        out.push_str("**Models**\n\n| | Model | Quota | Reset |\n|:--|:--|:--|:--|\n");
        for quota in &record.quotas {
            let pct = quota.percent();
            let reset = quota
                .reset_time
                .map(|t| time_remaining(t, now))
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                out,
                "| {} | {} | `{}` {}% | {} |",
                QuotaLevel::for_percent(pct).marker(),
                truncate_label(&quota.label),
                progress_bar(f64::from(pct), 8),
                pct,
                reset
            );
        }
        out.push('\n');
    }

    let _ = write!(
        out,
        "---\nLast Updated: {}",
        now.with_timezone(&Local).format("%H:%M")
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{CreditBalance, SubQuota};
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn credits(available: i64, total: i64) -> StatusRecord {
        StatusRecord {
            credits: Some(CreditBalance { available, total }),
            quotas: vec![],
        }
    }

    #[test]
    fn test_healthy_credits() {
        let indicator = Indicator::from_record(&credits(80, 100), 20, Utc::now());
        assert_eq!(indicator.label, "80%");
        assert_eq!(indicator.icon, IndicatorIcon::Credits);
        assert_eq!(indicator.tone, IndicatorTone::Normal);
        assert_eq!(indicator.text(), "◈ 80%");
    }

    #[test]
    fn test_low_credits_warn() {
        let indicator = Indicator::from_record(&credits(15, 100), 20, Utc::now());
        assert_eq!(indicator.label, "15%");
        assert_eq!(indicator.icon, IndicatorIcon::Warning);
        assert!(indicator.is_warning());
    }

    #[test]
    fn test_threshold_is_strict_and_configurable() {
        assert!(!Indicator::from_record(&credits(20, 100), 20, Utc::now()).is_warning());
        assert!(Indicator::from_record(&credits(40, 100), 50, Utc::now()).is_warning());
    }

    #[test]
    fn test_zero_total_does_not_divide() {
        let indicator = Indicator::from_record(&credits(5, 0), 20, Utc::now());
        assert_eq!(indicator.label, "0%");
        assert!(indicator.is_warning());
    }

    #[test]
    fn test_models_only_uses_worst_quota() {
        let record = StatusRecord {
            credits: None,
            quotas: vec![
                SubQuota {
                    label: "A".to_string(),
                    remaining_fraction: 0.8,
                    reset_time: None,
                },
                SubQuota {
                    label: "B".to_string(),
                    remaining_fraction: 0.1,
                    reset_time: None,
                },
            ],
        };
        let indicator = Indicator::from_record(&record, 20, Utc::now());
        assert_eq!(indicator.label, "10%");
        assert_eq!(indicator.icon, IndicatorIcon::Warning);
    }

    #[test]
    fn test_models_only_warns_just_below_threshold() {
        let record = StatusRecord {
            credits: None,
            quotas: vec![SubQuota {
                label: "Gemini 3 Pro".to_string(),
                remaining_fraction: 0.195,
                reset_time: None,
            }],
        };
        let indicator = Indicator::from_record(&record, 20, Utc::now());
        assert_eq!(indicator.label, "19%");
        assert_eq!(indicator.icon, IndicatorIcon::Warning);
        assert!(indicator.is_warning());
    }

    #[test]
    fn test_empty_record() {
        let indicator = Indicator::from_record(&StatusRecord::default(), 20, Utc::now());
        assert_eq!(indicator.label, "Quota OK");
        assert_eq!(indicator.tone, IndicatorTone::Normal);
    }

    #[test]
    fn test_offline() {
        let indicator = Indicator::offline("Timeout");
        assert_eq!(indicator.text(), "✖ Offline");
        assert_eq!(indicator.tooltip, "Error: Timeout");
        assert_eq!(indicator.tone, IndicatorTone::Error);
    }

    #[test]
    fn test_tooltip_contents() {
        let now = Utc::now();
        let record = StatusRecord {
            credits: Some(CreditBalance {
                available: 12500,
                total: 50000,
            }),
            quotas: vec![
                SubQuota {
                    label: "Gemini 3 Pro (High)".to_string(),
                    remaining_fraction: 0.75,
                    reset_time: Some(now + Duration::minutes(90)),
                },
                SubQuota {
                    label: "Claude Sonnet 4.5 (Thinking)".to_string(),
                    remaining_fraction: 0.1,
                    reset_time: None,
                },
            ],
        };

        let tooltip = build_tooltip(&record, now);
        assert!(tooltip.starts_with("### Antigravity Quota"));
        assert!(tooltip.contains("| **12,500** | 75% | `████░░░░░░░░░░░` |"));
        assert!(tooltip.contains("| 🟢 | Gemini 3 Pro (High) | `██████░░` 75% | 1h 30m |"));
        assert!(tooltip.contains("| 🔴 | Claude Sonnet 4.5 (T.. | `█░░░░░░░` 10% | - |"));
        assert!(tooltip.contains("Last Updated: "));
    }

    #[test]
    fn test_tooltip_without_data() {
        let tooltip = build_tooltip(&StatusRecord::default(), Utc::now());
        assert!(!tooltip.contains("Global Credits"));
        assert!(!tooltip.contains("Models"));
        assert!(tooltip.contains("---\nLast Updated: "));
    }
}
