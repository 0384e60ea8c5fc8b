//! Language server discovery: locate the process and its listening port.
//!
//! Discovery runs through a chain of [`ProcessInspector`]s chosen per
//! platform at startup. Inspectors are tried in order: when one fails or
//! finds no qualifying process, the next one gets a turn. Every failure is
//! logged and collapses to "not found".

mod inspector;
mod locator;
mod platform;
mod ports;

use std::sync::Arc;

use tracing::{debug, info, warn};

pub use inspector::{ProcessEntry, ProcessInspector};
pub use locator::{
    parse_powershell_json, parse_proc_cmdline, parse_ps_output, parse_wmic_output,
    ProcessHandle, ProcessLocator,
};
pub use platform::{PowerShellInspector, ProcFsInspector, PsInspector, WmicInspector};
pub use ports::{parse_lsof_ports, parse_netstat_ports, parse_ss_ports};

use crate::config::DiscoverySettings;

/// Inspectors for the platform this binary was built for, primary first
pub fn platform_inspectors(settings: &DiscoverySettings) -> Vec<Arc<dyn ProcessInspector>> {
    #[cfg(target_os = "windows")]
    {
        vec![
            Arc::new(PowerShellInspector::new(settings)) as Arc<dyn ProcessInspector>,
            Arc::new(WmicInspector::new(settings)),
        ]
    }

    #[cfg(target_os = "linux")]
    {
        let _ = settings;
        vec![
            Arc::new(PsInspector) as Arc<dyn ProcessInspector>,
            Arc::new(ProcFsInspector),
        ]
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux")))]
    {
        let _ = settings;
        vec![Arc::new(PsInspector) as Arc<dyn ProcessInspector>]
    }
}

/// Ordered chain of inspectors used by the poll pipeline
#[derive(Clone)]
pub struct Discovery {
    inspectors: Vec<Arc<dyn ProcessInspector>>,
}

impl Discovery {
    /// Discovery backed by the current platform's inspectors
    pub fn for_current_platform(settings: &DiscoverySettings) -> Self {
        Self::with_inspectors(platform_inspectors(settings))
    }

    /// Discovery backed by an explicit inspector chain
    pub fn with_inspectors(inspectors: Vec<Arc<dyn ProcessInspector>>) -> Self {
        Self { inspectors }
    }

    /// Names of the inspectors in the chain, primary first
    pub fn inspector_names(&self) -> Vec<&'static str> {
        self.inspectors.iter().map(|i| i.name()).collect()
    }

    /// Find the language server. Blocking: runs external commands.
    pub fn locate(&self, locator: &ProcessLocator) -> Option<ProcessHandle> {
        for inspector in &self.inspectors {
            match inspector.list_processes() {
                Ok(entries) => {
                    if let Some(handle) = locator.find(&entries) {
                        info!(
                            "Found language server ({}): PID={}",
                            inspector.name(),
                            handle.pid
                        );
                        return Some(handle);
                    }
                    debug!(
                        "{}: no qualifying process among {} entries",
                        inspector.name(),
                        entries.len()
                    );
                }
                Err(e) => {
                    warn!("{} process scan failed: {:#}", inspector.name(), e);
                }
            }
        }
        None
    }

    /// Find the port `pid` listens on. Blocking: runs external commands.
    pub fn resolve_port(&self, pid: u32) -> Option<u16> {
        for inspector in &self.inspectors {
            match inspector.listening_ports(pid) {
                Ok(ports) => {
                    if ports.len() > 1 {
                        debug!(
                            "PID {} listens on {} ports, using the first ({:?})",
                            pid,
                            ports.len(),
                            ports
                        );
                    }
                    if let Some(port) = ports.first() {
                        return Some(*port);
                    }
                    debug!("{}: no listening socket for PID {}", inspector.name(), pid);
                }
                Err(e) => {
                    warn!(
                        "Error finding port for PID {} ({}): {:#}",
                        pid,
                        inspector.name(),
                        e
                    );
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingInspector {
        calls: AtomicUsize,
    }

    impl ProcessInspector for FailingInspector {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn list_processes(&self) -> Result<Vec<ProcessEntry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("ps: command not found")
        }
        fn listening_ports(&self, _pid: u32) -> Result<Vec<u16>> {
            anyhow::bail!("lsof: command not found")
        }
    }

    struct CannedInspector {
        entries: Vec<ProcessEntry>,
        ports: Vec<u16>,
    }

    impl ProcessInspector for CannedInspector {
        fn name(&self) -> &'static str {
            "canned"
        }
        fn list_processes(&self) -> Result<Vec<ProcessEntry>> {
            Ok(self.entries.clone())
        }
        fn listening_ports(&self, _pid: u32) -> Result<Vec<u16>> {
            Ok(self.ports.clone())
        }
    }

    fn locator() -> ProcessLocator {
        ProcessLocator::new(&DiscoverySettings::default()).unwrap()
    }

    #[test]
    fn test_falls_back_after_primary_failure() {
        let primary = Arc::new(FailingInspector {
            calls: AtomicUsize::new(0),
        });
        let fallback = Arc::new(CannedInspector {
            entries: vec![ProcessEntry::new(
                4242,
                "antigravity/language_server --csrf_token abc123",
            )],
            ports: vec![9999, 10000],
        });
        let discovery = Discovery::with_inspectors(vec![primary.clone() as Arc<dyn ProcessInspector>, fallback]);

        let handle = discovery.locate(&locator()).unwrap();
        assert_eq!(handle.pid, 4242);
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(discovery.resolve_port(4242), Some(9999));
        assert_eq!(discovery.inspector_names(), vec!["failing", "canned"]);
    }

    #[test]
    fn test_falls_back_when_primary_has_no_match() {
        let primary = Arc::new(CannedInspector {
            entries: vec![ProcessEntry::new(1, "/sbin/init")],
            ports: vec![],
        });
        let fallback = Arc::new(CannedInspector {
            entries: vec![ProcessEntry::new(
                77,
                "antigravity/language_server --csrf_token=t0k",
            )],
            ports: vec![4100],
        });
        let discovery = Discovery::with_inspectors(vec![primary as Arc<dyn ProcessInspector>, fallback]);

        assert_eq!(discovery.locate(&locator()).unwrap().pid, 77);
        // Primary reported no sockets, fallback resolves
        assert_eq!(discovery.resolve_port(77), Some(4100));
    }

    #[test]
    fn test_nothing_found() {
        let discovery = Discovery::with_inspectors(vec![Arc::new(FailingInspector {
            calls: AtomicUsize::new(0),
        })]);
        assert!(discovery.locate(&locator()).is_none());
        assert!(discovery.resolve_port(1).is_none());
    }

    #[test]
    fn test_platform_chain_is_not_empty() {
        let discovery = Discovery::for_current_platform(&DiscoverySettings::default());
        assert!(!discovery.inspector_names().is_empty());
    }
}
