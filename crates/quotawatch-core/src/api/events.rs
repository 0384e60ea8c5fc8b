//! Core event system for push-based change notification.
//!
//! The UI layer subscribes once and reacts to indicator changes,
//! notifications and requests to open the detail view. Timer-driven cycles
//! only emit [`CoreEvent::IndicatorUpdated`] and [`CoreEvent::StatusUpdated`];
//! notifications and [`CoreEvent::ShowDetails`] come from manual refreshes.

use serde::Serialize;
use tokio::sync::broadcast;

use super::core::QuotaCore;
use crate::presenter::Indicator;

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotifyLevel {
    Info,
    Error,
}

/// Events emitted by the core when state changes occur.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreEvent {
    /// The indicator was re-rendered
    IndicatorUpdated(Indicator),

    /// The cached status was replaced by a fresh record
    StatusUpdated,

    /// Pop-up style message for the user
    Notify {
        level: NotifyLevel,
        message: String,
    },

    /// A manual refresh succeeded; the detail view should open
    ShowDetails,
}

impl QuotaCore {
    /// Subscribe to core events.
    ///
    /// If the receiver falls behind, older events are dropped (lagged).
    pub fn subscribe(&self) -> broadcast::Receiver<CoreEvent> {
        self.event_sender().subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::builder::QuotaCoreBuilder;
    use crate::config::Settings;

    #[tokio::test]
    async fn test_subscribe_receives_events() {
        let core = QuotaCoreBuilder::new(Settings::default()).build();
        let mut rx = core.subscribe();

        core.event_sender().send(CoreEvent::StatusUpdated).unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event, CoreEvent::StatusUpdated);
    }

    #[tokio::test]
    async fn test_subscribe_multiple_receivers() {
        let core = QuotaCoreBuilder::new(Settings::default()).build();
        let mut rx1 = core.subscribe();
        let mut rx2 = core.subscribe();

        core.event_sender().send(CoreEvent::ShowDetails).unwrap();

        assert_eq!(rx1.recv().await.unwrap(), CoreEvent::ShowDetails);
        assert_eq!(rx2.recv().await.unwrap(), CoreEvent::ShowDetails);
    }
}
