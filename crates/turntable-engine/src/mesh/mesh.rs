use thiserror::Error;

use super::{TEX_COORD, VERTEX_COLOR, VERTEX_POS};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("mesh has no vertices")]
    Empty,

    #[error("attribute stream has {found} entries, expected one per vertex ({expected})")]
    AttributeCountMismatch { expected: usize, found: usize },

    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u16, vertex_count: usize },
}

/// Primitive assembly mode.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Primitive {
    TriangleStrip,
    TriangleList,
}

impl Primitive {
    pub fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            Primitive::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
            Primitive::TriangleList => wgpu::PrimitiveTopology::TriangleList,
        }
    }
}

/// Optional per-vertex stream next to the positions.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum VertexAttributes {
    #[default]
    None,
    Colors(Vec<[f32; 4]>),
    TexCoords(Vec<[f32; 2]>),
}

impl VertexAttributes {
    fn len(&self) -> Option<usize> {
        match self {
            VertexAttributes::None => None,
            VertexAttributes::Colors(c) => Some(c.len()),
            VertexAttributes::TexCoords(t) => Some(t.len()),
        }
    }

    /// Floats per vertex contributed by this stream.
    pub fn components(&self) -> usize {
        match self {
            VertexAttributes::None => 0,
            VertexAttributes::Colors(_) => 4,
            VertexAttributes::TexCoords(_) => 2,
        }
    }

    /// Logical shader parameter this stream feeds.
    pub fn param_name(&self) -> Option<&'static str> {
        match self {
            VertexAttributes::None => None,
            VertexAttributes::Colors(_) => Some(VERTEX_COLOR),
            VertexAttributes::TexCoords(_) => Some(TEX_COORD),
        }
    }

    fn format(&self) -> Option<wgpu::VertexFormat> {
        match self {
            VertexAttributes::None => None,
            VertexAttributes::Colors(_) => Some(wgpu::VertexFormat::Float32x4),
            VertexAttributes::TexCoords(_) => Some(wgpu::VertexFormat::Float32x2),
        }
    }

    fn push_vertex(&self, i: usize, out: &mut Vec<f32>) {
        match self {
            VertexAttributes::None => {}
            VertexAttributes::Colors(c) => out.extend_from_slice(&c[i]),
            VertexAttributes::TexCoords(t) => out.extend_from_slice(&t[i]),
        }
    }
}

/// One attribute inside an interleaved vertex, addressed by logical name.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NamedAttribute {
    pub name: &'static str,
    pub format: wgpu::VertexFormat,
    pub offset: u64,
}

/// Interleaved vertex layout; locations are filled in by the shader program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    pub stride: u64,
    pub attributes: Vec<NamedAttribute>,
}

impl VertexLayout {
    pub fn attribute(&self, name: &str) -> Option<&NamedAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    positions: Vec<[f32; 3]>,
    attributes: VertexAttributes,
    indices: Option<Vec<u16>>,
    primitive: Primitive,
}

impl Mesh {
    pub fn new(
        positions: Vec<[f32; 3]>,
        attributes: VertexAttributes,
        indices: Option<Vec<u16>>,
        primitive: Primitive,
    ) -> Result<Self, MeshError> {
        if positions.is_empty() {
            return Err(MeshError::Empty);
        }

        if let Some(found) = attributes.len() {
            if found != positions.len() {
                return Err(MeshError::AttributeCountMismatch {
                    expected: positions.len(),
                    found,
                });
            }
        }

        if let Some(idx) = &indices {
            if let Some(&index) = idx.iter().find(|&&i| usize::from(i) >= positions.len()) {
                return Err(MeshError::IndexOutOfRange {
                    index,
                    vertex_count: positions.len(),
                });
            }
        }

        Ok(Self {
            positions,
            attributes,
            indices,
            primitive,
        })
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn attributes(&self) -> &VertexAttributes {
        &self.attributes
    }

    pub fn indices(&self) -> Option<&[u16]> {
        self.indices.as_deref()
    }

    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    /// Elements consumed by the draw call: indices when present, else vertices.
    pub fn element_count(&self) -> u32 {
        match &self.indices {
            Some(idx) => idx.len() as u32,
            None => self.vertex_count(),
        }
    }

    /// Bytes per interleaved vertex.
    pub fn vertex_stride(&self) -> u64 {
        ((3 + self.attributes.components()) * std::mem::size_of::<f32>()) as u64
    }

    /// Positions followed by the attribute stream, one vertex after another.
    pub fn interleaved(&self) -> Vec<f32> {
        let per_vertex = 3 + self.attributes.components();
        let mut out = Vec::with_capacity(self.positions.len() * per_vertex);
        for (i, p) in self.positions.iter().enumerate() {
            out.extend_from_slice(p);
            self.attributes.push_vertex(i, &mut out);
        }
        out
    }

    pub fn vertex_layout(&self) -> VertexLayout {
        let mut attributes = vec![NamedAttribute {
            name: VERTEX_POS,
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
        }];

        if let (Some(name), Some(format)) = (self.attributes.param_name(), self.attributes.format()) {
            attributes.push(NamedAttribute {
                name,
                format,
                offset: (3 * std::mem::size_of::<f32>()) as u64,
            });
        }

        VertexLayout {
            stride: self.vertex_stride(),
            attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> Vec<[f32; 3]> {
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let err = Mesh::new(vec![], VertexAttributes::None, None, Primitive::TriangleList);
        assert_eq!(err.unwrap_err(), MeshError::Empty);
    }

    #[test]
    fn attribute_count_must_match_positions() {
        let err = Mesh::new(
            tri(),
            VertexAttributes::Colors(vec![[1.0; 4]; 2]),
            None,
            Primitive::TriangleList,
        )
        .unwrap_err();
        assert_eq!(err, MeshError::AttributeCountMismatch { expected: 3, found: 2 });
    }

    #[test]
    fn indices_must_reference_existing_vertices() {
        let err = Mesh::new(tri(), VertexAttributes::None, Some(vec![0, 1, 3]), Primitive::TriangleList)
            .unwrap_err();
        assert_eq!(err, MeshError::IndexOutOfRange { index: 3, vertex_count: 3 });
    }

    #[test]
    fn element_count_prefers_indices() {
        let strip = Mesh::new(tri(), VertexAttributes::None, None, Primitive::TriangleStrip).unwrap();
        assert_eq!(strip.element_count(), 3);

        let list = Mesh::new(tri(), VertexAttributes::None, Some(vec![0, 1, 2, 2, 1, 0]), Primitive::TriangleList)
            .unwrap();
        assert_eq!(list.element_count(), 6);
        assert_eq!(list.vertex_count(), 3);
    }

    #[test]
    fn interleaves_positions_and_tex_coords() {
        let mesh = Mesh::new(
            tri(),
            VertexAttributes::TexCoords(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]),
            None,
            Primitive::TriangleList,
        )
        .unwrap();

        assert_eq!(mesh.vertex_stride(), 20);
        assert_eq!(
            &mesh.interleaved()[..10],
            &[0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0]
        );
    }

    #[test]
    fn layout_names_each_attribute() {
        let mesh = Mesh::new(
            tri(),
            VertexAttributes::Colors(vec![[1.0; 4]; 3]),
            None,
            Primitive::TriangleList,
        )
        .unwrap();
        let layout = mesh.vertex_layout();

        assert_eq!(layout.stride, 28);
        assert_eq!(layout.attribute(VERTEX_POS).map(|a| a.offset), Some(0));
        let color = layout.attribute(VERTEX_COLOR).unwrap();
        assert_eq!(color.offset, 12);
        assert_eq!(color.format, wgpu::VertexFormat::Float32x4);
        assert!(layout.attribute(TEX_COORD).is_none());
    }
}
