//! Surface geometry.

mod viewport;

pub use viewport::Viewport;
