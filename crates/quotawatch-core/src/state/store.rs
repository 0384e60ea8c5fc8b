use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

use crate::presenter::Indicator;
use crate::status::{CachedStatus, StatusRecord};

/// Shared state type alias
pub type SharedState = Arc<RwLock<QuotaState>>;

/// Stage of the poll cycle currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CyclePhase {
    #[default]
    Idle,
    Locating,
    Resolving,
    Querying,
}

impl CyclePhase {
    pub fn display_name(&self) -> &'static str {
        match self {
            CyclePhase::Idle => "Idle",
            CyclePhase::Locating => "Locating",
            CyclePhase::Resolving => "Resolving",
            CyclePhase::Querying => "Querying",
        }
    }
}

/// Per-context quota state
#[derive(Debug, Default)]
pub struct QuotaState {
    /// Last successful status; survives failed cycles
    pub cached: Option<CachedStatus>,
    /// Last rendered indicator
    pub indicator: Indicator,
    /// Current stage of the running cycle
    pub phase: CyclePhase,
    /// Message of the most recent failure, cleared on success
    pub last_error: Option<String>,
    /// When the most recent cycle finished
    pub last_poll: Option<DateTime<Utc>>,
    /// Number of completed cycles (success or failure)
    pub completed_cycles: u64,
}

impl QuotaState {
    /// Create a new, empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new shared state
    pub fn shared() -> SharedState {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Replace cache and indicator with the outcome of a successful cycle
    pub fn record_success(
        &mut self,
        record: StatusRecord,
        indicator: Indicator,
        fetched_at: DateTime<Utc>,
    ) {
        self.cached = Some(CachedStatus { record, fetched_at });
        self.indicator = indicator;
        self.phase = CyclePhase::Idle;
        self.last_error = None;
        self.last_poll = Some(fetched_at);
        self.completed_cycles += 1;
    }

    /// Show a failed cycle; the cached status is left untouched
    pub fn record_failure(&mut self, message: String, indicator: Indicator, at: DateTime<Utc>) {
        self.indicator = indicator;
        self.phase = CyclePhase::Idle;
        self.last_error = Some(message);
        self.last_poll = Some(at);
        self.completed_cycles += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::CreditBalance;

    fn record(available: i64) -> StatusRecord {
        StatusRecord {
            credits: Some(CreditBalance {
                available,
                total: 100,
            }),
            quotas: vec![],
        }
    }

    #[test]
    fn test_initial_state() {
        let state = QuotaState::new();
        assert!(state.cached.is_none());
        assert_eq!(state.phase, CyclePhase::Idle);
        assert_eq!(state.completed_cycles, 0);
    }

    #[test]
    fn test_failure_keeps_last_known_good() {
        let mut state = QuotaState::new();
        let now = Utc::now();
        state.record_success(record(80), Indicator::default(), now);
        state.record_failure(
            "Timeout".to_string(),
            Indicator::offline("Timeout"),
            now,
        );

        let cached = state.cached.as_ref().unwrap();
        assert_eq!(cached.record.credits.unwrap().available, 80);
        assert_eq!(state.last_error.as_deref(), Some("Timeout"));
        assert_eq!(state.indicator.label, "Offline");
        assert_eq!(state.completed_cycles, 2);
    }

    #[test]
    fn test_success_replaces_wholesale() {
        let mut state = QuotaState::new();
        let now = Utc::now();
        state.record_success(record(80), Indicator::default(), now);
        state.record_success(StatusRecord::default(), Indicator::default(), now);

        assert!(state.cached.as_ref().unwrap().record.credits.is_none());
        assert!(state.last_error.is_none());
    }
}
