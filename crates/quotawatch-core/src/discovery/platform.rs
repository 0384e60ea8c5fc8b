//! Command-backed [`ProcessInspector`] implementations, one per OS mechanism.

use anyhow::{Context, Result};
use std::process::Command;
use tracing::debug;

use super::inspector::{ProcessEntry, ProcessInspector};
use super::locator::{parse_powershell_json, parse_proc_cmdline, parse_ps_output, parse_wmic_output};
use super::ports::{parse_lsof_ports, parse_netstat_ports, parse_ss_ports};
use crate::config::DiscoverySettings;

/// Run a command and return its stdout, failing on a non-zero exit
fn run_command(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute {}", program))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("{} failed ({}): {}", program, output.status, stderr.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Markers are interpolated into PowerShell and WQL filters, so only allow
/// characters that need no quoting there.
fn is_filter_safe(marker: &str) -> bool {
    !marker.is_empty()
        && marker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// `ps` for processes, `lsof` for sockets (macOS, Linux, BSD)
#[derive(Debug, Default)]
pub struct PsInspector;

impl ProcessInspector for PsInspector {
    fn name(&self) -> &'static str {
        "ps"
    }

    fn list_processes(&self) -> Result<Vec<ProcessEntry>> {
        let stdout = run_command("ps", &["-ww", "-eo", "pid,args"])?;
        Ok(parse_ps_output(&stdout))
    }

    fn listening_ports(&self, pid: u32) -> Result<Vec<u16>> {
        let pid = pid.to_string();
        let stdout = run_command("lsof", &["-nP", "-a", "-iTCP", "-sTCP:LISTEN", "-p", &pid])?;
        Ok(parse_lsof_ports(&stdout))
    }
}

/// Direct `/proc` scan for processes, `ss` for sockets (Linux without procps/lsof)
#[derive(Debug, Default)]
pub struct ProcFsInspector;

impl ProcessInspector for ProcFsInspector {
    fn name(&self) -> &'static str {
        "procfs"
    }

    fn list_processes(&self) -> Result<Vec<ProcessEntry>> {
        let entries = std::fs::read_dir("/proc").context("Failed to read /proc")?;

        let mut pids: Vec<u32> = entries
            .flatten()
            .filter_map(|entry| entry.file_name().to_str()?.parse::<u32>().ok())
            .collect();
        pids.sort_unstable();

        Ok(pids
            .into_iter()
            .filter_map(|pid| {
                // Processes may exit between read_dir and this read
                let raw = std::fs::read(format!("/proc/{}/cmdline", pid)).ok()?;
                let cmdline = parse_proc_cmdline(&raw);
                (!cmdline.is_empty()).then(|| ProcessEntry::new(pid, cmdline))
            })
            .collect())
    }

    fn listening_ports(&self, pid: u32) -> Result<Vec<u16>> {
        let stdout = run_command("ss", &["-ltnpH"])?;
        Ok(parse_ss_ports(&stdout, pid))
    }
}

/// All protocols, so IPv6-only listeners show up too
const NETSTAT_ARGS: [&str; 1] = ["-ano"];

/// Shared `netstat -ano` lookup for the Windows inspectors
fn windows_listening_ports(pid: u32) -> Result<Vec<u16>> {
    let stdout = run_command("netstat", &NETSTAT_ARGS)?;
    Ok(parse_netstat_ports(&stdout, pid))
}

/// PowerShell `Get-CimInstance` (Windows 10 and later)
#[derive(Debug)]
pub struct PowerShellInspector {
    name_filter: String,
}

impl PowerShellInspector {
    pub fn new(settings: &DiscoverySettings) -> Self {
        Self {
            name_filter: settings.server_marker.clone(),
        }
    }
}

impl ProcessInspector for PowerShellInspector {
    fn name(&self) -> &'static str {
        "powershell"
    }

    fn list_processes(&self) -> Result<Vec<ProcessEntry>> {
        let filter = if is_filter_safe(&self.name_filter) {
            format!(
                " | Where-Object {{ $_.CommandLine -like '*{}*' }}",
                self.name_filter
            )
        } else {
            debug!("Skipping PowerShell pre-filter for marker {:?}", self.name_filter);
            String::new()
        };
        let script = format!(
            "Get-CimInstance Win32_Process{} | Select-Object ProcessId, CommandLine | ConvertTo-Json",
            filter
        );

        let stdout = run_command("powershell", &["-NoProfile", "-Command", &script])?;
        parse_powershell_json(&stdout)
    }

    fn listening_ports(&self, pid: u32) -> Result<Vec<u16>> {
        windows_listening_ports(pid)
    }
}

/// Legacy `wmic` (older Windows, or where PowerShell is restricted)
#[derive(Debug)]
pub struct WmicInspector {
    name_filter: String,
}

impl WmicInspector {
    pub fn new(settings: &DiscoverySettings) -> Self {
        Self {
            name_filter: settings.server_marker.clone(),
        }
    }
}

impl ProcessInspector for WmicInspector {
    fn name(&self) -> &'static str {
        "wmic"
    }

    fn list_processes(&self) -> Result<Vec<ProcessEntry>> {
        let stdout = if is_filter_safe(&self.name_filter) {
            let filter = format!("name like '%{}%'", self.name_filter);
            run_command(
                "wmic",
                &["process", "where", &filter, "get", "ProcessId,CommandLine", "/format:list"],
            )?
        } else {
            run_command("wmic", &["process", "get", "ProcessId,CommandLine", "/format:list"])?
        };
        Ok(parse_wmic_output(&stdout))
    }

    fn listening_ports(&self, pid: u32) -> Result<Vec<u16>> {
        windows_listening_ports(pid)
    }
}
