//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so watch mode logs to a file; once mode logs
//! to stderr next to the report.

use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_NAME: &str = "quotawatch.log";

/// Directory holding the log file, preferring XDG_STATE_HOME
pub fn log_dir() -> PathBuf {
    if let Some(state) = std::env::var_os("XDG_STATE_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(state).join("quotawatch");
    }
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("quotawatch")
}

pub fn log_file_path() -> PathBuf {
    log_dir().join(LOG_FILE_NAME)
}

fn filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new("quotawatch=debug,quotawatch_core=debug")
    } else {
        EnvFilter::new("quotawatch=info,quotawatch_core=info")
    }
}

fn open_log_file() -> Result<File> {
    let dir = log_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory: {:?}", dir))?;
    let path = dir.join(LOG_FILE_NAME);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {:?}", path))
}

/// Log to the log file (watch mode)
pub fn setup_file_logging(debug: bool) -> Result<()> {
    let file = open_log_file()?;
    tracing_subscriber::registry()
        .with(filter(debug))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

/// Log to stderr (once mode)
pub fn setup_stderr_logging(debug: bool) {
    tracing_subscriber::registry()
        .with(filter(debug))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
