//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, wires them to the GPU layer, and
//! drives the app once per display refresh.

mod display;
mod event;
mod runtime;

pub use display::DisplaySync;
pub use event::RuntimeEvent;
pub use runtime::{Runtime, RuntimeConfig};
