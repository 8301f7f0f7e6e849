//! Shader compile + link.
//!
//! A program is two WGSL sources (vertex, fragment) compiled separately and
//! linked into a render pipeline. Parameters are resolved by logical name from
//! the sources' declarations, mirroring attribute/uniform lookups by name.

mod compile;
mod params;
mod program;

use std::fmt;

use thiserror::Error;

pub use compile::compile;
pub use params::{requirements, ParamKind, ParamLocation, ParamMap, Requirement};
pub use program::ShaderProgram;

/// Uniform holding the projection matrix.
pub const PROJECTION_MATRIX: &str = "projectionMatrix";
/// Uniform holding the model-view matrix.
pub const MODEL_VIEW_MATRIX: &str = "modelViewMatrix";
/// Texture sampled by the fragment stage.
pub const SAMPLER: &str = "uSampler";
/// Sampler paired with [`SAMPLER`].
pub const SAMPLER_FILTER: &str = "uSamplerFilter";

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn visibility(self) -> wgpu::ShaderStages {
        match self {
            ShaderStage::Vertex => wgpu::ShaderStages::VERTEX,
            ShaderStage::Fragment => wgpu::ShaderStages::FRAGMENT,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Vertex + fragment WGSL text.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShaderError {
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("could not link shader program: {0}")]
    Link(String),
}
