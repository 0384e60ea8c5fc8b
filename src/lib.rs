//! quotawatch - terminal indicator for the Antigravity language server's
//! prompt-credit and per-model quotas.
//!
//! The polling engine lives in `quotawatch-core`; this crate adds the CLI,
//! logging setup, the one-shot report and the ratatui front end.

pub mod config;
pub mod logging;
pub mod once;
pub mod ui;
