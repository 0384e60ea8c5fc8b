//! Extract listening ports from socket-listing tool output.

use once_cell::sync::Lazy;
use regex::Regex;

/// `lsof -nP` NAME column of a listening socket, e.g. `127.0.0.1:42100 (LISTEN)`,
/// `*:42100 (LISTEN)` or `[::1]:42100 (LISTEN)`
static LSOF_LISTEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[*\[\]\da-fA-F.:]+:(\d+)\s+\(LISTEN\)").expect("Invalid LSOF_LISTEN_PATTERN regex")
});

fn parse_port(s: &str) -> Option<u16> {
    s.parse::<u16>().ok().filter(|p| *p != 0)
}

/// Port component of an address like `0.0.0.0:59123` or `[::]:59123`
fn port_of_address(addr: &str) -> Option<u16> {
    let (_, port) = addr.rsplit_once(':')?;
    parse_port(port)
}

/// Parse `lsof -nP -a -iTCP -sTCP:LISTEN -p <pid>`
pub fn parse_lsof_ports(output: &str) -> Vec<u16> {
    LSOF_LISTEN_PATTERN
        .captures_iter(output)
        .filter_map(|caps| parse_port(caps.get(1)?.as_str()))
        .collect()
}

/// Parse `ss -ltnpH`, keeping sockets owned by `pid`.
///
/// Rows look like
/// `LISTEN 0 4096 127.0.0.1:42100 0.0.0.0:* users:(("language_server",pid=4242,fd=12))`
pub fn parse_ss_ports(output: &str, pid: u32) -> Vec<u16> {
    let owner = format!("pid={},", pid);
    output
        .lines()
        .filter(|line| line.contains(&owner))
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 5 || parts[0] != "LISTEN" {
                return None;
            }
            port_of_address(parts[3])
        })
        .collect()
}

/// Parse `netstat -ano`, keeping `LISTENING` rows whose PID column equals `pid`
pub fn parse_netstat_ports(output: &str, pid: u32) -> Vec<u16> {
    let pid = pid.to_string();
    output
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 5 || parts[3] != "LISTENING" || parts[4] != pid {
                return None;
            }
            port_of_address(parts[1])
        })
        .collect()
}
