//! Builder for constructing a [`QuotaCore`] instance.
//!
//! ```ignore
//! let core = QuotaCoreBuilder::new(settings)
//!     .with_inspector(Arc::new(FakeInspector::default()))
//!     .with_transport(Arc::new(MockTransport::default()))
//!     .build();
//! ```

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::config::Settings;
use crate::discovery::{Discovery, ProcessInspector};
use crate::monitor::{PollContext, Scheduler};
use crate::state::{QuotaState, SharedState};
use crate::status::{StatusClient, StatusTransport};

use super::core::QuotaCore;

/// Default broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Builder for constructing a [`QuotaCore`] instance
pub struct QuotaCoreBuilder {
    settings: Settings,
    state: Option<SharedState>,
    inspectors: Option<Vec<Arc<dyn ProcessInspector>>>,
    transport: Option<Arc<dyn StatusTransport>>,
}

impl QuotaCoreBuilder {
    /// Create a new builder with the given settings
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            state: None,
            inspectors: None,
            transport: None,
        }
    }

    /// Use an existing shared state instead of creating a new one
    pub fn with_state(mut self, state: SharedState) -> Self {
        self.state = Some(state);
        self
    }

    /// Replace the platform inspector chain with a single inspector
    pub fn with_inspector(self, inspector: Arc<dyn ProcessInspector>) -> Self {
        self.with_inspectors(vec![inspector])
    }

    /// Replace the platform inspector chain
    pub fn with_inspectors(mut self, inspectors: Vec<Arc<dyn ProcessInspector>>) -> Self {
        self.inspectors = Some(inspectors);
        self
    }

    /// Replace the HTTPS transport
    pub fn with_transport(mut self, transport: Arc<dyn StatusTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the `QuotaCore` instance. Polling does not start until
    /// [`QuotaCore::start`] is called.
    pub fn build(self) -> QuotaCore {
        let mut settings = self.settings;
        settings.validate();
        let state = self.state.unwrap_or_else(QuotaState::shared);
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let ctx = Arc::new(PollContext::new(
            settings,
            state,
            self.inspectors.map(Discovery::with_inspectors),
            self.transport.map(StatusClient::new),
            event_tx,
        ));
        let scheduler = Scheduler::new(ctx.clone());

        QuotaCore::new(ctx, scheduler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let core = QuotaCoreBuilder::new(Settings::default()).build();

        assert_eq!(core.settings().poll_interval_secs, 120);
        assert!(core.cached_status().is_none());
        assert!(!core.is_running());
        assert_eq!(core.executions(), 0);
    }

    #[test]
    fn test_builder_with_state() {
        let state = QuotaState::shared();
        let core = QuotaCoreBuilder::new(Settings::default())
            .with_state(state.clone())
            .build();

        assert!(Arc::ptr_eq(core.state(), &state));
    }
}
