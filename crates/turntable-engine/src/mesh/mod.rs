//! Static mesh descriptors and their GPU upload.
//!
//! A `Mesh` is CPU-side and immutable after creation; `GpuMesh` is the same
//! data living in vertex/index buffers. Vertex attributes are described by
//! logical name so a shader program can resolve their locations at link time.

mod gpu;
mod mesh;
pub mod shapes;

pub use gpu::GpuMesh;
pub use mesh::{Mesh, MeshError, NamedAttribute, Primitive, VertexAttributes, VertexLayout};

/// Logical name of the position attribute.
pub const VERTEX_POS: &str = "vertexPos";
/// Logical name of the per-vertex color attribute.
pub const VERTEX_COLOR: &str = "vertexColor";
/// Logical name of the texture-coordinate attribute.
pub const TEX_COORD: &str = "texCoord";
