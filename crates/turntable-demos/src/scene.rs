use std::path::PathBuf;

use glam::Vec3;
use turntable_engine::animation::Spin;
use turntable_engine::mesh::{shapes, Mesh};
use turntable_engine::paint::Color;
use turntable_engine::shader::ShaderSource;
use turntable_engine::transform::Projection;

/// Everything a demo needs besides the runtime.
#[derive(Debug, Clone)]
pub struct Scene {
    pub title: &'static str,
    pub mesh: Mesh,
    pub shader: ShaderSource,
    pub projection: Projection,
    /// Initial model-view translation.
    pub translation: Vec3,
    pub axis: Vec3,
    /// `None` keeps the model still.
    pub spin: Option<Spin>,
    /// Image sampled by the program; drawing waits until it has loaded.
    pub texture: Option<PathBuf>,
    pub clear: Color,
}

impl Scene {
    pub fn square() -> Self {
        Self {
            title: "square",
            mesh: shapes::square(),
            shader: ShaderSource::new(
                include_str!("../shaders/square.vert.wgsl"),
                include_str!("../shaders/square.frag.wgsl"),
            ),
            projection: Projection::default(),
            translation: Vec3::new(0.0, 0.0, -3.333),
            axis: Vec3::Z,
            spin: None,
            texture: None,
            clear: Color::BLACK,
        }
    }

    pub fn color_cube() -> Self {
        Self {
            title: "color cube",
            mesh: shapes::color_cube(),
            shader: ShaderSource::new(
                include_str!("../shaders/color_cube.vert.wgsl"),
                include_str!("../shaders/color_cube.frag.wgsl"),
            ),
            translation: Vec3::new(0.0, 0.0, -8.0),
            axis: Vec3::new(0.0, 1.0, 1.0),
            spin: Some(Spin::default()),
            ..Self::square()
        }
    }

    pub fn textured_cube() -> Self {
        Self {
            title: "textured cube",
            mesh: shapes::textured_cube(),
            shader: ShaderSource::new(
                include_str!("../shaders/textured_cube.vert.wgsl"),
                include_str!("../shaders/textured_cube.frag.wgsl"),
            ),
            texture: Some(Self::asset("checker.png")),
            ..Self::color_cube()
        }
    }

    /// Path of a bundled asset.
    pub fn asset(name: &str) -> PathBuf {
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets")).join(name)
    }

    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turntable_engine::shader::{requirements, ParamMap, MODEL_VIEW_MATRIX, SAMPLER};

    fn all() -> [Scene; 3] {
        [Scene::square(), Scene::color_cube(), Scene::textured_cube()]
    }

    #[test]
    fn every_scene_resolves_its_parameters() {
        for scene in all() {
            let reqs = requirements(&scene.mesh.vertex_layout());
            let map = ParamMap::resolve(&scene.shader, &reqs)
                .unwrap_or_else(|e| panic!("{}: {e}", scene.title));
            assert_eq!(map.attribute("vertexPos"), Some(0), "{}", scene.title);
            assert_eq!(map.binding(MODEL_VIEW_MATRIX), Some(1), "{}", scene.title);
        }
    }

    #[test]
    fn only_the_textured_cube_samples_an_image() {
        let textured = Scene::textured_cube();
        let reqs = requirements(&textured.mesh.vertex_layout());
        let map = ParamMap::resolve(&textured.shader, &reqs).unwrap();
        assert_eq!(map.binding(SAMPLER), Some(2));
        assert!(textured.is_textured());
        assert!(!Scene::color_cube().is_textured());
    }

    #[test]
    fn presets_place_and_spin_the_models() {
        let square = Scene::square();
        assert_eq!(square.translation.z, -3.333);
        assert!(square.spin.is_none());

        for cube in [Scene::color_cube(), Scene::textured_cube()] {
            assert_eq!(cube.translation, Vec3::new(0.0, 0.0, -8.0));
            assert_eq!(cube.axis, Vec3::new(0.0, 1.0, 1.0));
            assert_eq!(cube.spin.map(|s| s.period().as_millis()), Some(5000));
            assert_eq!(cube.mesh.element_count(), 36);
        }
    }

    #[test]
    fn bundled_checker_texture_exists() {
        let path = Scene::textured_cube().texture.unwrap();
        assert!(path.is_file(), "{}", path.display());
    }
}
