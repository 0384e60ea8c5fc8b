//! quotawatch-core: discovery, polling and presentation of Antigravity quota data.
//!
//! The pipeline runs `locate → resolve → query → present` once per poll cycle:
//!
//! - [`discovery`] finds the language server process, its CSRF token and its
//!   listening port through a chain of platform [`ProcessInspector`]s
//! - [`status`] performs the single `GetUserStatus` exchange
//! - [`presenter`] turns a [`StatusRecord`] into indicator text, tooltip and
//!   detail rows
//! - [`monitor`] owns the poll context and the repeating schedule
//! - [`api`] exposes the [`QuotaCore`] facade consumed by the binary
//!
//! [`ProcessInspector`]: discovery::ProcessInspector
//! [`StatusRecord`]: status::StatusRecord
//! [`QuotaCore`]: api::QuotaCore

pub mod api;
pub mod config;
pub mod discovery;
pub mod error;
pub mod monitor;
pub mod presenter;
pub mod state;
pub mod status;

pub use error::PollError;
