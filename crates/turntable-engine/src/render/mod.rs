//! Drawing a mesh with a linked program into the current frame.

mod ctx;
mod draw;

pub use ctx::{RenderCtx, RenderTarget};
pub use draw::{clear, draw_mesh};
