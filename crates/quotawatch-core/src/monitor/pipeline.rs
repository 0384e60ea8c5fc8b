//! One poll cycle: locate → resolve → query.

use std::time::Duration;

use tokio::task::spawn_blocking;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::context::PollContext;
use crate::discovery::ProcessLocator;
use crate::error::PollError;
use crate::state::CyclePhase;
use crate::status::StatusRecord;

/// Run the discovery and query stages.
///
/// External commands and the HTTP call block, so each stage runs on the
/// blocking pool. The first failing stage ends the cycle.
pub(crate) async fn query_status(ctx: &PollContext) -> Result<StatusRecord, PollError> {
    let settings = ctx.settings();
    let client = ctx.client();

    if let Some(url) = settings.endpoint.clone() {
        debug!("Using configured endpoint {}, skipping discovery", url);
        ctx.set_phase(CyclePhase::Querying);
        let token = settings.endpoint_token.clone().unwrap_or_default();
        return spawn_blocking(move || client.fetch_url(&url, &token))
            .await
            .unwrap_or_else(|e| Err(PollError::Transport(format!("Status task failed: {}", e))));
    }

    ctx.set_phase(CyclePhase::Locating);
    let locator = ProcessLocator::new(&settings.discovery).map_err(|e| {
        warn!("Cannot build process locator: {:#}", e);
        PollError::ProcessNotFound
    })?;
    let scan_timeout = settings.discovery.command_timeout();
    let discovery = ctx.discovery();
    let handle = bounded_scan("Process scan", scan_timeout, move || {
        discovery.locate(&locator)
    })
    .await
    .ok_or(PollError::ProcessNotFound)?;

    ctx.set_phase(CyclePhase::Resolving);
    let pid = handle.pid;
    let discovery = ctx.discovery();
    let port = bounded_scan("Port scan", scan_timeout, move || discovery.resolve_port(pid))
        .await
        .ok_or(PollError::PortNotFound { pid })?;

    info!("Connected to language server on port {}", port);

    ctx.set_phase(CyclePhase::Querying);
    let token = handle.auth_token;
    spawn_blocking(move || client.fetch(port, &token))
        .await
        .unwrap_or_else(|e| Err(PollError::Transport(format!("Status task failed: {}", e))))
}

/// Run a blocking scan with a time limit. On timeout the scan thread is
/// abandoned so the cycle, and the cycle guard, are released.
async fn bounded_scan<T, F>(stage: &str, limit: Duration, scan: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> Option<T> + Send + 'static,
{
    match timeout(limit, spawn_blocking(scan)).await {
        Ok(Ok(found)) => found,
        Ok(Err(e)) => {
            warn!("{} task failed: {}", stage, e);
            None
        }
        Err(_) => {
            warn!("{} timed out after {}s", stage, limit.as_secs());
            None
        }
    }
}
