//! On-demand detail list built from the cached status.

use chrono::Local;
use serde::Serialize;

use super::format::{format_thousands, progress_bar, QuotaLevel};
use crate::status::{StatusRecord, SubQuota};

/// Icon of a detail row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DetailIcon {
    Credits,
    Check,
    Caution,
    Warning,
    Error,
}

impl DetailIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            DetailIcon::Credits => "◈",
            DetailIcon::Check => "✔",
            DetailIcon::Caution => "◐",
            DetailIcon::Warning => "⚠",
            DetailIcon::Error => "✖",
        }
    }
}

/// One row of the detail list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DetailRow {
    Item {
        icon: DetailIcon,
        label: String,
        description: String,
        detail: String,
    },
    /// Section header
    Separator(String),
    /// Informational row without data
    Placeholder(String),
}

fn model_icon(quota: &SubQuota) -> DetailIcon {
    if quota.remaining_fraction <= 0.0 {
        return DetailIcon::Error;
    }
    match QuotaLevel::for_percent(quota.percent()) {
        QuotaLevel::Critical => DetailIcon::Warning,
        QuotaLevel::Caution => DetailIcon::Caution,
        QuotaLevel::Ok => DetailIcon::Check,
    }
}

fn model_row(quota: &SubQuota) -> DetailRow {
    let pct = quota.percent();
    let reset = quota
        .reset_time
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    DetailRow::Item {
        icon: model_icon(quota),
        label: quota.label.clone(),
        description: format!("{} {}%", progress_bar(f64::from(pct), 10), pct),
        detail: format!("Reset: {}", reset),
    }
}

/// Rows for the detail view: credit balance first, then one row per model
pub fn build_details(record: &StatusRecord) -> Vec<DetailRow> {
    let mut rows = Vec::new();

    if let Some(credits) = record.credits {
        let pct = credits.percent();
        rows.push(DetailRow::Item {
            icon: DetailIcon::Credits,
            label: "Global Token Credits".to_string(),
            description: format!("{} {}%", progress_bar(pct, 15), pct.floor()),
            detail: format!(
                "{} / {} credits remaining",
                format_thousands(credits.available),
                format_thousands(credits.total)
            ),
        });
        rows.push(DetailRow::Separator("Models".to_string()));
    }

    if record.quotas.is_empty() {
        rows.push(DetailRow::Placeholder(
            "No specific model quotas found.".to_string(),
        ));
    } else {
        rows.extend(record.quotas.iter().map(model_row));
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::CreditBalance;
    use pretty_assertions::assert_eq;

    fn quota(label: &str, fraction: f64) -> SubQuota {
        SubQuota {
            label: label.to_string(),
            remaining_fraction: fraction,
            reset_time: None,
        }
    }

    #[test]
    fn test_credits_and_models() {
        let record = StatusRecord {
            credits: Some(CreditBalance {
                available: 8000,
                total: 10000,
            }),
            quotas: vec![quota("Gemini", 0.5), quota("Claude", 0.1), quota("GPT", 0.0)],
        };

        let rows = build_details(&record);
        assert_eq!(rows.len(), 5);
        assert_eq!(
            rows[0],
            DetailRow::Item {
                icon: DetailIcon::Credits,
                label: "Global Token Credits".to_string(),
                description: "████████████░░░ 80%".to_string(),
                detail: "8,000 / 10,000 credits remaining".to_string(),
            }
        );
        assert_eq!(rows[1], DetailRow::Separator("Models".to_string()));
        assert_eq!(
            rows[2],
            DetailRow::Item {
                icon: DetailIcon::Caution,
                label: "Gemini".to_string(),
                description: "█████░░░░░ 50%".to_string(),
                detail: "Reset: Unknown".to_string(),
            }
        );
        assert!(matches!(
            rows[3],
            DetailRow::Item {
                icon: DetailIcon::Warning,
                ..
            }
        ));
        assert!(matches!(
            rows[4],
            DetailRow::Item {
                icon: DetailIcon::Error,
                ..
            }
        ));
    }

    #[test]
    fn test_model_icon_follows_quota_level() {
        let icon = |fraction| model_icon(&quota("m", fraction));
        assert_eq!(icon(0.6), DetailIcon::Check);
        assert_eq!(icon(0.5), DetailIcon::Caution);
        assert_eq!(icon(0.4), DetailIcon::Caution);
        assert_eq!(icon(0.2), DetailIcon::Warning);
        assert_eq!(icon(0.0), DetailIcon::Error);
    }

    #[test]
    fn test_no_models_placeholder() {
        let rows = build_details(&StatusRecord::default());
        assert_eq!(
            rows,
            vec![DetailRow::Placeholder(
                "No specific model quotas found.".to_string()
            )]
        );
    }

    #[test]
    fn test_reset_time_is_rendered() {
        let mut q = quota("Gemini", 0.9);
        q.reset_time = Some(chrono::Utc::now());
        let DetailRow::Item { detail, .. } = model_row(&q) else {
            panic!("expected item row");
        };
        assert!(detail.starts_with("Reset: "));
        assert_ne!(detail, "Reset: Unknown");
    }
}
