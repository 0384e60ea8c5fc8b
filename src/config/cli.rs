use clap::{Parser, Subcommand};
use std::path::PathBuf;

use quotawatch_core::config::Settings;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Antigravity quota indicator")]
pub struct Config {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Polling interval in seconds (minimum 10)
    #[arg(short = 'i', long, global = true)]
    pub interval: Option<u64>,

    /// Warn when the remaining percentage drops below this value
    #[arg(short = 't', long, global = true)]
    pub threshold: Option<u8>,

    /// Query this URL directly instead of discovering the language server
    #[arg(short = 'e', long, global = true)]
    pub endpoint: Option<String>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Show the live indicator (default)
    #[default]
    Watch,
    /// Poll once, print the report and exit
    Once,
}

impl Config {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn command(&self) -> Command {
        self.command.unwrap_or_default()
    }

    pub fn is_once_mode(&self) -> bool {
        self.command() == Command::Once
    }

    /// Overlay CLI flags on file settings; flags win
    pub fn merge_into(&self, settings: &mut Settings) {
        if let Some(interval) = self.interval {
            settings.poll_interval_secs = interval;
        }
        if let Some(threshold) = self.threshold {
            settings.low_quota_threshold = threshold;
        }
        if let Some(endpoint) = &self.endpoint {
            settings.endpoint = Some(endpoint.clone());
        }
    }

    /// Load the config file, apply flags and validate
    pub fn load_settings(&self) -> anyhow::Result<Settings> {
        let mut settings = Settings::load(self.config.as_ref())?;
        self.merge_into(&mut settings);
        settings.validate();
        Ok(settings)
    }
}
