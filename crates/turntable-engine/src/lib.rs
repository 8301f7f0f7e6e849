//! Turntable engine crate.
//!
//! Owns the platform + GPU runtime used by the demos: window and surface
//! acquisition, mesh upload, shader compile/link, texture loading and the
//! display-synchronised render loop that spins a model.

pub mod animation;
pub mod core;
pub mod device;
pub mod error;
pub mod logging;
pub mod mesh;
pub mod render;
pub mod shader;
pub mod texture;
pub mod time;
pub mod transform;
pub mod window;

pub mod coords;
pub mod paint;

pub use error::EngineError;
