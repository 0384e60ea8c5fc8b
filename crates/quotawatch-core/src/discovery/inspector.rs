use anyhow::Result;

/// One row of the OS process table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    /// Process ID
    pub pid: u32,
    /// Full command line, arguments joined by spaces
    pub cmdline: String,
}

impl ProcessEntry {
    pub fn new(pid: u32, cmdline: impl Into<String>) -> Self {
        Self {
            pid,
            cmdline: cmdline.into(),
        }
    }
}

/// Source of process and socket information.
///
/// Implementations wrap one OS mechanism each (`ps`, `/proc`, PowerShell,
/// `wmic`). Their output is parsed defensively: anything unexpected should
/// surface as an error or an empty list, never a panic.
pub trait ProcessInspector: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Enumerate processes in the order the OS reports them
    fn list_processes(&self) -> Result<Vec<ProcessEntry>>;

    /// TCP ports the given process is listening on, in report order
    fn listening_ports(&self, pid: u32) -> Result<Vec<u16>>;
}
