//! Status data returned by the language server, in domain form.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Aggregate prompt-credit balance of the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreditBalance {
    /// Credits still available this cycle
    pub available: i64,
    /// Monthly credit allowance
    pub total: i64,
}

impl CreditBalance {
    /// Remaining share as a percentage (0 when the plan has no allowance)
    pub fn percent(&self) -> f64 {
        if self.total > 0 {
            self.available as f64 / self.total as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// Quota of a single model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubQuota {
    /// Display label (e.g., "Gemini 3 Pro (High)")
    pub label: String,
    /// Fraction of the quota not yet consumed, in [0, 1]
    pub remaining_fraction: f64,
    /// When the quota refills
    pub reset_time: Option<DateTime<Utc>>,
}

impl SubQuota {
    /// Remaining percentage rounded to the nearest integer
    pub fn percent(&self) -> u8 {
        (self.remaining_fraction * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// Parsed `GetUserStatus` response.
///
/// Replaced wholesale on every successful poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusRecord {
    /// Global credit balance, when the plan reports one
    pub credits: Option<CreditBalance>,
    /// Per-model quotas, in server order
    pub quotas: Vec<SubQuota>,
}

impl StatusRecord {
    /// Whether the response carried any quota information at all
    pub fn is_empty(&self) -> bool {
        self.credits.is_none() && self.quotas.is_empty()
    }
}

/// A status record together with the time it was fetched
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedStatus {
    pub record: StatusRecord,
    pub fetched_at: DateTime<Utc>,
}
