//! Typed failures of a poll cycle.

use thiserror::Error;

/// Why a poll cycle did not produce a status record.
///
/// Every variant is recoverable: the indicator goes offline and the next
/// tick tries again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    /// No running language server matched the discovery markers
    #[error("Antigravity process not found. Is the IDE running?")]
    ProcessNotFound,

    /// The process was found but no listening TCP port could be resolved
    #[error("Could not find listening port for PID {pid}")]
    PortNotFound { pid: u32 },

    /// Connection refused, TLS failure, timeout
    #[error("{0}")]
    Transport(String),

    /// Non-200 status or a body that is not the expected JSON
    #[error("{0}")]
    Protocol(String),
}

impl PollError {
    /// Short category name used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            PollError::ProcessNotFound => "process_not_found",
            PollError::PortNotFound { .. } => "port_not_found",
            PollError::Transport(_) => "transport",
            PollError::Protocol(_) => "protocol",
        }
    }
}
