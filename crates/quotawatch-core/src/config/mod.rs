mod settings;

pub use settings::{DiscoverySettings, Settings};
