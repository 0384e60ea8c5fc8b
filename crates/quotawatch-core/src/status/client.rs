//! The single `GetUserStatus` exchange with the language server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::debug;
use ureq::tls::TlsConfig;

use super::types::StatusRecord;
use crate::error::PollError;

/// Connect RPC path of the status call
pub const STATUS_PATH: &str = "/exa.language_server_pb.LanguageServerService/GetUserStatus";

/// Header carrying the CSRF token from the server's command line
pub const CSRF_HEADER: &str = "X-Codeium-Csrf-Token";

/// Maximum number of body characters quoted in error messages
pub const BODY_PREVIEW_LIMIT: usize = 200;

/// Raw HTTP response as seen by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Performs one POST. `Err` means no response was received at all.
pub trait StatusTransport: Send + Sync {
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse>;
}

/// Blocking HTTPS transport on `ureq`.
///
/// Certificate verification is off: the language server listens on
/// loopback with a self-signed certificate.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .tls_config(TlsConfig::builder().disable_verification(true).build())
            .build();

        Self {
            agent: config.into(),
        }
    }
}

impl StatusTransport for UreqTransport {
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse> {
        let mut request = self.agent.post(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let mut response = request
            .send_json(body)
            .with_context(|| format!("Request to {} failed", url))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .context("Failed to read response body")?;

        Ok(HttpResponse { status, body })
    }
}

/// Request body identifying the calling tool
pub fn request_body() -> serde_json::Value {
    json!({
        "metadata": {
            "ideName": "antigravity",
            "extensionName": "antigravity",
            "locale": "en",
        }
    })
}

/// Loopback URL of the status call on `port`
pub fn status_url(port: u16) -> String {
    format!("https://127.0.0.1:{}{}", port, STATUS_PATH)
}

/// First [`BODY_PREVIEW_LIMIT`] characters of `body`, with `...` when cut
pub fn body_preview(body: &str) -> String {
    if body.chars().count() > BODY_PREVIEW_LIMIT {
        let cut: String = body.chars().take(BODY_PREVIEW_LIMIT).collect();
        format!("{}...", cut)
    } else {
        body.to_string()
    }
}

/// Issues exactly one status request per call; retrying is the scheduler's job.
#[derive(Clone)]
pub struct StatusClient {
    transport: Arc<dyn StatusTransport>,
}

impl StatusClient {
    pub fn new(transport: Arc<dyn StatusTransport>) -> Self {
        Self { transport }
    }

    /// Query the discovered language server. Blocking.
    pub fn fetch(&self, port: u16, token: &str) -> Result<StatusRecord, PollError> {
        self.fetch_url(&status_url(port), token)
    }

    /// Query an explicit endpoint URL. Blocking.
    pub fn fetch_url(&self, url: &str, token: &str) -> Result<StatusRecord, PollError> {
        let headers = [(CSRF_HEADER, token), ("Connect-Protocol-Version", "1")];

        let response = self
            .transport
            .post_json(url, &headers, &request_body())
            .map_err(|e| PollError::Transport(format!("{:#}", e)))?;

        debug!(
            "Status response: HTTP {} ({} bytes)",
            response.status,
            response.body.len()
        );

        if response.status != 200 {
            return Err(PollError::Protocol(format!(
                "Status Code: {}, Body: {}",
                response.status,
                body_preview(&response.body)
            )));
        }

        let value: serde_json::Value = serde_json::from_str(&response.body).map_err(|_| {
            PollError::Protocol(format!(
                "Invalid JSON response: {}",
                body_preview(&response.body)
            ))
        })?;

        StatusRecord::from_json(value)
            .map_err(|e| PollError::Protocol(format!("Unexpected response shape: {}", e)))
    }
}
