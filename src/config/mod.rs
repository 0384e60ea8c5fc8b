mod cli;

pub use cli::{Command, Config};
pub use quotawatch_core::config::{DiscoverySettings, Settings};
