//! Built-in geometry for the demos.

use super::{Mesh, Primitive, VertexAttributes};

/// Unit square in the z = 0 plane, drawn as a 4-vertex strip.
pub fn square() -> Mesh {
    let positions = vec![
        [0.5, 0.5, 0.0],
        [-0.5, 0.5, 0.0],
        [0.5, -0.5, 0.0],
        [-0.5, -0.5, 0.0],
    ];
    Mesh::new(positions, VertexAttributes::None, None, Primitive::TriangleStrip)
        .expect("square geometry is valid by construction")
}

/// Face colors in face order: front, back, top, bottom, right, left.
pub const FACE_COLORS: [[f32; 4]; 6] = [
    [1.0, 0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0, 1.0],
    [1.0, 1.0, 0.0, 1.0],
    [1.0, 0.0, 1.0, 1.0],
    [0.0, 1.0, 1.0, 1.0],
];

/// Cube spanning [-1, 1]³ with one solid color per face.
pub fn color_cube() -> Mesh {
    let colors = FACE_COLORS
        .iter()
        .flat_map(|c| std::iter::repeat(*c).take(4))
        .collect();
    Mesh::new(
        cube_positions(),
        VertexAttributes::Colors(colors),
        Some(cube_indices()),
        Primitive::TriangleList,
    )
    .expect("color cube geometry is valid by construction")
}

/// Cube spanning [-1, 1]³ mapping the full texture onto every face.
///
/// Coordinates use a bottom-left origin; images are flipped on upload to match.
pub fn textured_cube() -> Mesh {
    let tex_coords = vec![
        // front
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        // back
        [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0],
        // top
        [0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0],
        // bottom
        [1.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0],
        // right
        [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0],
        // left
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
    ];
    Mesh::new(
        cube_positions(),
        VertexAttributes::TexCoords(tex_coords),
        Some(cube_indices()),
        Primitive::TriangleList,
    )
    .expect("textured cube geometry is valid by construction")
}

fn cube_positions() -> Vec<[f32; 3]> {
    vec![
        // front
        [-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0],
        // back
        [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0],
        // top
        [-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0],
        // bottom
        [-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0],
        // right
        [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0],
        // left
        [-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0],
    ]
}

/// Two triangles per face over 4 vertices each.
fn cube_indices() -> Vec<u16> {
    (0..6u16)
        .flat_map(|face| {
            let b = face * 4;
            [b, b + 1, b + 2, b, b + 2, b + 3]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{TEX_COORD, VERTEX_COLOR};

    #[test]
    fn square_is_a_four_vertex_strip() {
        let sq = square();
        assert_eq!(sq.primitive(), Primitive::TriangleStrip);
        assert_eq!(sq.vertex_count(), 4);
        assert_eq!(sq.element_count(), 4);
        assert!(sq.indices().is_none());
        assert_eq!(sq.vertex_stride(), 12);
    }

    #[test]
    fn cubes_have_24_vertices_and_36_indices() {
        for cube in [color_cube(), textured_cube()] {
            assert_eq!(cube.primitive(), Primitive::TriangleList);
            assert_eq!(cube.vertex_count(), 24);
            assert_eq!(cube.element_count(), 36);
        }
    }

    #[test]
    fn every_face_vertex_shares_its_face_color() {
        let cube = color_cube();
        let VertexAttributes::Colors(colors) = cube.attributes() else {
            panic!("color cube carries colors");
        };
        for (face, chunk) in colors.chunks(4).enumerate() {
            assert!(chunk.iter().all(|c| *c == FACE_COLORS[face]));
        }
    }

    #[test]
    fn each_face_lies_on_one_cube_side() {
        let cube = color_cube();
        for face in cube.positions().chunks(4) {
            let flat_axis = (0..3).find(|&axis| face.iter().all(|p| p[axis] == face[0][axis]));
            let axis = flat_axis.expect("face vertices share one coordinate");
            assert_eq!(face[0][axis].abs(), 1.0);
        }
    }

    #[test]
    fn cube_layouts_carry_their_attribute() {
        assert!(color_cube().vertex_layout().attribute(VERTEX_COLOR).is_some());
        assert!(textured_cube().vertex_layout().attribute(TEX_COORD).is_some());
    }
}
