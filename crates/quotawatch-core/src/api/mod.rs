//! Facade API for consumers (terminal UI, one-shot CLI).
//!
//! ```ignore
//! let core = QuotaCoreBuilder::new(settings).build();
//! let mut events = core.subscribe();
//! core.start();
//! ```

mod builder;
mod core;
pub mod events;

pub use self::core::QuotaCore;
pub use builder::QuotaCoreBuilder;
pub use events::{CoreEvent, NotifyLevel};
