//! Engine-level error taxonomy.
//!
//! Setup failures are fatal to a demo instance: the runtime reports them once
//! through [`crate::core::Alert`] and then aborts the event loop.

use thiserror::Error;

use crate::mesh::MeshError;
use crate::shader::ShaderError;
use crate::texture::TextureError;
use crate::transform::TransformError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The drawable surface could not provide a rendering context.
    #[error("rendering context unavailable: {0}")]
    ContextUnavailable(String),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Texture(#[from] TextureError),
}

impl EngineError {
    /// Short title used when the error is surfaced to the user.
    pub fn title(&self) -> &'static str {
        match self {
            EngineError::ContextUnavailable(_) => "Rendering context unavailable",
            EngineError::Shader(_) => "Could not initialise shaders",
            EngineError::Mesh(_) => "Invalid mesh",
            EngineError::Transform(_) => "Invalid transform",
            EngineError::Texture(_) => "Texture load failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::ShaderStage;

    #[test]
    fn shader_errors_convert_and_keep_their_message() {
        let err: EngineError = ShaderError::Compile {
            stage: ShaderStage::Fragment,
            log: "unexpected token".into(),
        }
        .into();
        assert_eq!(err.title(), "Could not initialise shaders");
        assert!(err.to_string().contains("unexpected token"));
    }

    #[test]
    fn context_unavailable_names_the_cause() {
        let err = EngineError::ContextUnavailable("no adapter".into());
        assert_eq!(err.to_string(), "rendering context unavailable: no adapter");
    }
}
