use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::context::PollContext;
use crate::error::PollError;
use crate::status::StatusRecord;

/// Repeating poll timer. At most one schedule is active per scheduler.
pub struct Scheduler {
    ctx: Arc<PollContext>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl Scheduler {
    pub fn new(ctx: Arc<PollContext>) -> Self {
        Self {
            ctx,
            timer: Mutex::new(None),
        }
    }

    /// Start polling every `interval_secs`, replacing any running schedule.
    ///
    /// The first tick fires immediately. Must be called inside a tokio runtime.
    pub fn start(&self, interval_secs: u64) {
        let period = Duration::from_secs(interval_secs.max(1));
        let ctx = self.ctx.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                // Own task, so stopping the timer does not cut a cycle short
                let ctx = ctx.clone();
                tokio::spawn(async move { ctx.tick().await });
            }
        });

        let previous = self.timer.lock().replace(handle);
        if let Some(previous) = previous {
            previous.abort();
            debug!("Replaced previous poll schedule");
        }
        info!("Polling every {}s", period.as_secs());
    }

    /// Stop the schedule. A cycle already in flight still completes.
    pub fn stop(&self) {
        if let Some(handle) = self.timer.lock().take() {
            handle.abort();
            info!("Polling stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Run one cycle now. Manual triggers surface progress and outcome as
    /// notifications and ask the UI to open the detail view on success.
    pub async fn trigger_once(&self, manual: bool) -> Result<StatusRecord, PollError> {
        self.ctx.run_cycle(manual).await
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.get_mut().take() {
            handle.abort();
        }
    }
}
