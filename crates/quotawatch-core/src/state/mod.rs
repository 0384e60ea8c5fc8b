mod store;

pub use store::{CyclePhase, QuotaState, SharedState};
