//! Display-synchronised render loop.
//!
//! The loop owns its timing state (`previous` timestamp) and a readiness gate;
//! the scheduler that drives it is a thin seam so the tick logic can run under
//! a deterministic clock in tests.

mod readiness;
mod render_loop;
mod scheduler;
mod spin;

pub use readiness::Readiness;
pub use render_loop::{RenderLoop, TickOutcome};
pub use scheduler::{ManualScheduler, Scheduler};
pub use spin::{Spin, DEFAULT_ROTATION_PERIOD};
