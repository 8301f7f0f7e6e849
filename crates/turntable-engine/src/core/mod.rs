//! Core engine-facing contracts.
//!
//! The interface between the runtime (platform loop) and a demo: one-time
//! setup once the GPU context exists, asset callbacks, and a per-frame hook.

mod alert;
mod app;
mod ctx;

pub use alert::{Alert, LogAlert};
pub use app::{App, AppControl};
pub use ctx::{FrameCtx, SetupCtx, WindowCtx};
