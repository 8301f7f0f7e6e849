//! Texture assets.
//!
//! Images are decoded off the event-loop thread and handed back through the
//! runtime as a one-shot event; upload and readiness signalling happen on the
//! event-loop thread.

mod gpu;
mod image;
mod loader;

use std::path::PathBuf;

use thiserror::Error;

pub use gpu::GpuTexture;
pub use image::{ImageAsset, ImageOptions};
pub use loader::{AssetId, LoadedImage, TextureLoader};

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: ::image::ImageError,
    },

    #[error("image has zero size")]
    Empty,

    #[error("failed to start image loader thread: {0}")]
    Spawn(#[from] std::io::Error),
}
