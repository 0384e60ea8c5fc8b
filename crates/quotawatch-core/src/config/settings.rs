use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application settings (from config file)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Polling interval in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Remaining-quota percentage below which the indicator turns to warning
    #[serde(default = "default_low_quota_threshold")]
    pub low_quota_threshold: u8,

    /// Direct status endpoint URL; skips process discovery when set
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Token sent with requests to the direct endpoint
    #[serde(default)]
    pub endpoint_token: Option<String>,

    /// Timeout for the status request in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Process discovery settings
    #[serde(default)]
    pub discovery: DiscoverySettings,
}

fn default_poll_interval() -> u64 {
    120
}

fn default_low_quota_threshold() -> u8 {
    20
}

fn default_request_timeout() -> u64 {
    5
}

/// Markers used to recognise the language server command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverySettings {
    /// Substring identifying the language server binary
    #[serde(default = "default_server_marker")]
    pub server_marker: String,

    /// Substring identifying the Antigravity flavour of the server
    #[serde(default = "default_app_marker")]
    pub app_marker: String,

    /// Command-line flag carrying the CSRF token
    #[serde(default = "default_token_flag")]
    pub token_flag: String,

    /// Limit in seconds for one process or port scan
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,
}

impl DiscoverySettings {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

fn default_server_marker() -> String {
    "language_server".to_string()
}

fn default_app_marker() -> String {
    "antigravity".to_string()
}

fn default_token_flag() -> String {
    "--csrf_token".to_string()
}

fn default_command_timeout() -> u64 {
    10
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            server_marker: default_server_marker(),
            app_marker: default_app_marker(),
            token_flag: default_token_flag(),
            command_timeout_secs: default_command_timeout(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            low_quota_threshold: default_low_quota_threshold(),
            endpoint: None,
            endpoint_token: None,
            request_timeout_secs: default_request_timeout(),
            discovery: DiscoverySettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from config file or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        // Try custom path first
        if let Some(p) = path {
            if p.exists() {
                return Self::load_file(p);
            }
        }

        // Try default config locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("quotawatch/config.toml")),
            dirs::home_dir().map(|p| p.join(".config/quotawatch/config.toml")),
            dirs::home_dir().map(|p| p.join(".quotawatch.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::load_file(path);
            }
        }

        Ok(Self::default())
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Validate and normalize settings values
    ///
    /// Keeps the poll interval from hammering the language server and the
    /// threshold inside a percentage range.
    pub fn validate(&mut self) {
        const MIN_POLL_INTERVAL: u64 = 10;
        const MIN_REQUEST_TIMEOUT: u64 = 1;

        if self.poll_interval_secs < MIN_POLL_INTERVAL {
            self.poll_interval_secs = MIN_POLL_INTERVAL;
        }
        if self.request_timeout_secs < MIN_REQUEST_TIMEOUT {
            self.request_timeout_secs = MIN_REQUEST_TIMEOUT;
        }
        if self.discovery.command_timeout_secs < MIN_REQUEST_TIMEOUT {
            self.discovery.command_timeout_secs = MIN_REQUEST_TIMEOUT;
        }
        self.low_quota_threshold = self.low_quota_threshold.min(100);
        if self
            .endpoint
            .as_deref()
            .is_some_and(|e| e.trim().is_empty())
        {
            self.endpoint = None;
        }
    }

    /// Poll interval as a `Duration`
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.poll_interval_secs, 120);
        assert_eq!(settings.low_quota_threshold, 20);
        assert_eq!(settings.request_timeout_secs, 5);
        assert_eq!(settings.discovery.command_timeout_secs, 10);
        assert!(settings.endpoint.is_none());
        assert_eq!(settings.discovery.token_flag, "--csrf_token");
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            poll_interval_secs = 60
            low_quota_threshold = 35
            endpoint = "http://localhost:9222/v1/status"

            [discovery]
            app_marker = "windsurf"
        "#;

        let settings: Settings = toml::from_str(toml).expect("Should parse TOML");
        assert_eq!(settings.poll_interval_secs, 60);
        assert_eq!(settings.low_quota_threshold, 35);
        assert_eq!(
            settings.endpoint.as_deref(),
            Some("http://localhost:9222/v1/status")
        );
        assert_eq!(settings.discovery.app_marker, "windsurf");
        assert_eq!(settings.discovery.server_marker, "language_server");
    }

    #[test]
    fn test_validate_clamps_values() {
        let mut settings = Settings {
            poll_interval_secs: 0,
            low_quota_threshold: 250,
            request_timeout_secs: 0,
            endpoint: Some("   ".to_string()),
            ..Settings::default()
        };
        settings.discovery.command_timeout_secs = 0;
        settings.validate();
        assert_eq!(settings.discovery.command_timeout_secs, 1);
        assert_eq!(settings.poll_interval_secs, 10);
        assert_eq!(settings.low_quota_threshold, 100);
        assert_eq!(settings.request_timeout_secs, 1);
        assert!(settings.endpoint.is_none());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "poll_interval_secs = 300").unwrap();

        let path = file.path().to_path_buf();
        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.poll_interval_secs, 300);
        assert_eq!(settings.low_quota_threshold, 20);
    }

    #[test]
    fn test_load_invalid_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "poll_interval_secs = \"soon\"").unwrap();

        let path = file.path().to_path_buf();
        assert!(Settings::load(Some(&path)).is_err());
    }
}
