//! Poll scheduling and the per-cycle pipeline.

mod context;
mod pipeline;
mod scheduler;


pub use context::PollContext;
pub use scheduler::Scheduler;
