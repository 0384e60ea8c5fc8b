//! Matching the language server in a process table.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;

use super::inspector::ProcessEntry;
use crate::config::DiscoverySettings;

/// The running language server and the token needed to talk to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessHandle {
    pub pid: u32,
    /// CSRF token taken from the command line; never empty
    pub auth_token: String,
}

/// Decides which process table entry is the target server
#[derive(Debug, Clone)]
pub struct ProcessLocator {
    server_marker: String,
    app_marker: String,
    token_flag: String,
    token_pattern: Regex,
}

impl ProcessLocator {
    /// Build a locator for the configured markers
    pub fn new(settings: &DiscoverySettings) -> Result<Self> {
        // The token must start with an alphanumeric so that a missing value
        // does not swallow the next flag, and must end at whitespace or EOL.
        let pattern = format!(
            r"{}[=\s]+([A-Za-z0-9][A-Za-z0-9-]*)(?:\s|$)",
            regex::escape(&settings.token_flag)
        );
        let token_pattern = Regex::new(&pattern)
            .with_context(|| format!("Invalid token flag: {}", settings.token_flag))?;

        Ok(Self {
            server_marker: settings.server_marker.clone(),
            app_marker: settings.app_marker.clone(),
            token_flag: settings.token_flag.clone(),
            token_pattern,
        })
    }

    /// Check a single command line against the markers and extract its token
    pub fn match_cmdline(&self, cmdline: &str) -> Option<String> {
        if !cmdline.contains(&self.server_marker)
            || !cmdline.contains(&self.app_marker)
            || !cmdline.contains(&self.token_flag)
        {
            return None;
        }

        self.token_pattern
            .captures(cmdline)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// First entry in enumeration order that qualifies wins
    pub fn find(&self, entries: &[ProcessEntry]) -> Option<ProcessHandle> {
        entries.iter().find_map(|entry| {
            if entry.pid == 0 {
                return None;
            }
            self.match_cmdline(&entry.cmdline)
                .map(|auth_token| ProcessHandle {
                    pid: entry.pid,
                    auth_token,
                })
        })
    }
}

/// Parse `ps -ww -eo pid,args` output. The header row and any line without
/// a numeric PID are skipped.
pub fn parse_ps_output(output: &str) -> Vec<ProcessEntry> {
    output
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let (pid, args) = line.split_once(char::is_whitespace)?;
            let pid: u32 = pid.parse().ok()?;
            Some(ProcessEntry::new(pid, args.trim()))
        })
        .collect()
}

/// Turn the raw bytes of `/proc/<pid>/cmdline` into a space-joined string
pub fn parse_proc_cmdline(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .replace('\0', " ")
        .trim()
        .to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CimProcess {
    process_id: Option<u32>,
    command_line: Option<String>,
}

/// Parse `Get-CimInstance Win32_Process | ConvertTo-Json`.
///
/// PowerShell emits a bare object when a single process matches and an
/// array otherwise; empty output means no process matched.
pub fn parse_powershell_json(output: &str) -> Result<Vec<ProcessEntry>> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let value: serde_json::Value =
        serde_json::from_str(trimmed).context("PowerShell output is not JSON")?;
    let processes: Vec<CimProcess> = match value {
        serde_json::Value::Array(_) => serde_json::from_value::<Vec<CimProcess>>(value),
        other => serde_json::from_value::<CimProcess>(other).map(|p| vec![p]),
    }
    .context("Unexpected PowerShell process schema")?;

    Ok(processes
        .into_iter()
        .filter_map(|p| {
            Some(ProcessEntry::new(
                p.process_id?,
                p.command_line.unwrap_or_default(),
            ))
        })
        .collect())
}

/// Parse `wmic process ... get ProcessId,CommandLine /format:list`.
///
/// The output is blank-line separated `Key=Value` blocks, with CRLF (and
/// sometimes CRCRLF) line endings.
pub fn parse_wmic_output(output: &str) -> Vec<ProcessEntry> {
    let normalized = output.replace('\r', "");
    let mut entries = Vec::new();

    for block in normalized.split("\n\n") {
        let mut pid = None;
        let mut cmdline = None;

        for line in block.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            if key.trim().eq_ignore_ascii_case("ProcessId") {
                pid = value.trim().parse::<u32>().ok();
            } else if key.trim().eq_ignore_ascii_case("CommandLine") {
                cmdline = Some(value.trim().to_string());
            }
        }

        if let (Some(pid), Some(cmdline)) = (pid, cmdline) {
            entries.push(ProcessEntry::new(pid, cmdline));
        }
    }

    entries
}
