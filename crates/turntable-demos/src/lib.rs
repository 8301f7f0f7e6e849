//! The three turntable demos: a flat square, a color cube and a textured cube.
//!
//! Each binary picks a [`Scene`] and hands it to [`DemoApp`], which uploads
//! the scene once the GPU context exists and spins it from the render loop.

mod app;
mod scene;

pub use app::DemoApp;
pub use scene::Scene;
