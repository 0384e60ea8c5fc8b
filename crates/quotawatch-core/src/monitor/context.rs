//! Explicit poll context: settings, collaborators, shared state and the
//! cycle guard of one monitoring instance.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use super::pipeline::query_status;
use crate::api::events::{CoreEvent, NotifyLevel};
use crate::config::Settings;
use crate::discovery::Discovery;
use crate::error::PollError;
use crate::presenter::{overall_percent, Indicator};
use crate::state::{CyclePhase, SharedState};
use crate::status::{StatusClient, StatusRecord, UreqTransport};

/// Everything a poll cycle needs.
///
/// Each context is independent; tests create as many as they like.
pub struct PollContext {
    settings: RwLock<Arc<Settings>>,
    state: SharedState,
    discovery: RwLock<Discovery>,
    client: RwLock<StatusClient>,
    /// Discovery was built from settings (not injected) and follows reconfiguration
    owns_discovery: bool,
    /// Transport was built from settings (not injected) and follows reconfiguration
    owns_transport: bool,
    event_tx: broadcast::Sender<CoreEvent>,
    /// Held for the duration of a cycle; only one cycle runs at a time
    cycle_guard: Mutex<()>,
    executions: AtomicU64,
}

impl PollContext {
    pub(crate) fn new(
        settings: Settings,
        state: SharedState,
        discovery: Option<Discovery>,
        client: Option<StatusClient>,
        event_tx: broadcast::Sender<CoreEvent>,
    ) -> Self {
        let owns_discovery = discovery.is_none();
        let owns_transport = client.is_none();
        let discovery =
            discovery.unwrap_or_else(|| Discovery::for_current_platform(&settings.discovery));
        let client = client.unwrap_or_else(|| default_client(&settings));

        Self {
            settings: RwLock::new(Arc::new(settings)),
            state,
            discovery: RwLock::new(discovery),
            client: RwLock::new(client),
            owns_discovery,
            owns_transport,
            event_tx,
            cycle_guard: Mutex::new(()),
            executions: AtomicU64::new(0),
        }
    }

    /// Current settings snapshot
    pub fn settings(&self) -> Arc<Settings> {
        self.settings.read().clone()
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Number of cycles that actually ran (skipped ticks excluded)
    pub fn executions(&self) -> u64 {
        self.executions.load(Ordering::SeqCst)
    }

    pub(crate) fn discovery(&self) -> Discovery {
        self.discovery.read().clone()
    }

    pub(crate) fn client(&self) -> StatusClient {
        self.client.read().clone()
    }

    pub(crate) fn event_sender(&self) -> &broadcast::Sender<CoreEvent> {
        &self.event_tx
    }

    /// Swap in new settings, rebuilding owned collaborators that depend on them
    pub(crate) fn replace_settings(&self, settings: Settings) {
        let previous = self.settings();

        if self.owns_discovery && previous.discovery != settings.discovery {
            *self.discovery.write() = Discovery::for_current_platform(&settings.discovery);
        }
        if self.owns_transport && previous.request_timeout_secs != settings.request_timeout_secs
        {
            *self.client.write() = default_client(&settings);
        }

        *self.settings.write() = Arc::new(settings);
    }

    pub(crate) fn set_phase(&self, phase: CyclePhase) {
        self.state.write().phase = phase;
    }

    /// Send an event; ignored when nobody is listening
    pub(crate) fn emit(&self, event: CoreEvent) {
        let _ = self.event_tx.send(event);
    }

    pub(crate) fn notify(&self, level: NotifyLevel, message: impl Into<String>) {
        self.emit(CoreEvent::Notify {
            level,
            message: message.into(),
        });
    }

    /// Timer entry point: skip when a cycle is already in flight
    pub(crate) async fn tick(&self) {
        let Ok(_guard) = self.cycle_guard.try_lock() else {
            debug!("Previous poll cycle still running, skipping tick");
            return;
        };
        let _ = self.execute(false).await;
    }

    /// Run one cycle, waiting for an in-flight cycle to finish first
    pub(crate) async fn run_cycle(&self, manual: bool) -> Result<StatusRecord, PollError> {
        let _guard = self.cycle_guard.lock().await;
        self.execute(manual).await
    }

    /// Caller must hold `cycle_guard`
    async fn execute(&self, manual: bool) -> Result<StatusRecord, PollError> {
        self.executions.fetch_add(1, Ordering::SeqCst);

        if manual {
            info!("Manual refresh triggered");
            let checking = Indicator::checking();
            self.state.write().indicator = checking.clone();
            self.emit(CoreEvent::IndicatorUpdated(checking));
            self.notify(NotifyLevel::Info, "Refreshing quota...");
        }

        let result = query_status(self).await;
        let now = Utc::now();

        match &result {
            Ok(record) => {
                let threshold = self.settings().low_quota_threshold;
                let indicator = Indicator::from_record(record, threshold, now);
                info!(
                    "Quota updated: {} ({} model quotas)",
                    indicator.label,
                    record.quotas.len()
                );

                self.state
                    .write()
                    .record_success(record.clone(), indicator.clone(), now);
                self.emit(CoreEvent::IndicatorUpdated(indicator));
                self.emit(CoreEvent::StatusUpdated);

                if manual {
                    let message = match overall_percent(record) {
                        Some(pct) => format!("Quota refreshed: {}% remaining.", pct),
                        None => "Quota refreshed.".to_string(),
                    };
                    self.notify(NotifyLevel::Info, message);
                    self.emit(CoreEvent::ShowDetails);
                }
            }
            Err(e) => {
                warn!("Poll failed ({}): {}", e.kind(), e);
                let indicator = Indicator::offline(&e.to_string());

                self.state
                    .write()
                    .record_failure(e.to_string(), indicator.clone(), now);
                self.emit(CoreEvent::IndicatorUpdated(indicator));

                if manual {
                    self.notify(NotifyLevel::Error, format!("Failed: {}", e));
                }
            }
        }

        result
    }

    #[cfg(test)]
    pub(crate) fn cycle_guard(&self) -> &Mutex<()> {
        &self.cycle_guard
    }
}

fn default_client(settings: &Settings) -> StatusClient {
    StatusClient::new(Arc::new(UreqTransport::new(settings.request_timeout())))
}
