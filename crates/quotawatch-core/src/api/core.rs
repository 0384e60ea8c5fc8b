//! QuotaCore: the facade the binary talks to.
//!
//! Lifecycle: build → [`start`](QuotaCore::start) → [`stop`](QuotaCore::stop)
//! → drop. Dropping the core stops the schedule.

use std::sync::Arc;

use tokio::sync::broadcast;

use super::events::{CoreEvent, NotifyLevel};
use crate::config::Settings;
use crate::error::PollError;
use crate::monitor::{PollContext, Scheduler};
use crate::presenter::{build_details, DetailRow, Indicator};
use crate::state::{CyclePhase, SharedState};
use crate::status::{CachedStatus, StatusRecord};

/// The facade wrapping one monitoring context and its scheduler.
///
/// Constructed via [`QuotaCoreBuilder`](super::builder::QuotaCoreBuilder).
pub struct QuotaCore {
    ctx: Arc<PollContext>,
    scheduler: Scheduler,
}

impl QuotaCore {
    pub(crate) fn new(ctx: Arc<PollContext>, scheduler: Scheduler) -> Self {
        Self { ctx, scheduler }
    }

    // =========================================================
    // Lifecycle
    // =========================================================

    /// Start polling at the configured interval (restarts a running schedule)
    pub fn start(&self) {
        self.scheduler.start(self.ctx.settings().poll_interval_secs);
    }

    /// Stop polling; an in-flight cycle still completes
    pub fn stop(&self) {
        self.scheduler.stop();
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Apply changed settings and restart the schedule with the new interval
    pub fn reconfigure(&self, mut settings: Settings) {
        settings.validate();
        let interval = settings.poll_interval_secs;
        self.ctx.replace_settings(settings);
        self.ctx
            .notify(NotifyLevel::Info, "Configuration changed, reloading...");
        self.scheduler.start(interval);
    }

    // =========================================================
    // Actions
    // =========================================================

    /// "Refresh now": one manual cycle with user-facing notifications
    pub async fn refresh(&self) -> Result<StatusRecord, PollError> {
        self.scheduler.trigger_once(true).await
    }

    /// One silent cycle, as a timer tick would run it
    pub async fn poll_once(&self) -> Result<StatusRecord, PollError> {
        self.scheduler.trigger_once(false).await
    }

    // =========================================================
    // Queries
    // =========================================================

    pub fn settings(&self) -> Arc<Settings> {
        self.ctx.settings()
    }

    /// Last rendered indicator
    pub fn indicator(&self) -> Indicator {
        self.ctx.state().read().indicator.clone()
    }

    /// Last successful status, if any
    pub fn cached_status(&self) -> Option<CachedStatus> {
        self.ctx.state().read().cached.clone()
    }

    /// Detail rows built from the cached status; `None` before the first success
    pub fn details(&self) -> Option<Vec<DetailRow>> {
        self.ctx
            .state()
            .read()
            .cached
            .as_ref()
            .map(|cached| build_details(&cached.record))
    }

    pub fn phase(&self) -> CyclePhase {
        self.ctx.state().read().phase
    }

    pub fn last_error(&self) -> Option<String> {
        self.ctx.state().read().last_error.clone()
    }

    /// Number of cycles that actually ran
    pub fn executions(&self) -> u64 {
        self.ctx.executions()
    }

    pub fn state(&self) -> &SharedState {
        self.ctx.state()
    }

    pub(crate) fn event_sender(&self) -> broadcast::Sender<CoreEvent> {
        self.ctx.event_sender().clone()
    }

    #[cfg(test)]
    pub(crate) fn context(&self) -> &Arc<PollContext> {
        &self.ctx
    }
}
