use std::time::Instant;

use anyhow::{Context, Result};
use turntable_engine::EngineError;
use turntable_engine::animation::{Readiness, RenderLoop, Scheduler, TickOutcome};
use turntable_engine::core::{App, AppControl, FrameCtx, SetupCtx};
use turntable_engine::mesh::GpuMesh;
use turntable_engine::render::draw_mesh;
use turntable_engine::shader::ShaderProgram;
use turntable_engine::texture::{AssetId, GpuTexture, ImageOptions, LoadedImage};
use turntable_engine::transform::TransformState;
use turntable_engine::window::{DisplaySync, RuntimeConfig};

use crate::Scene;

/// Runs one [`Scene`] in its own window.
pub struct DemoApp {
    scene: Scene,
    live: Option<Live>,
}

/// GPU-side state, created by `setup`.
struct Live {
    mesh: GpuMesh,
    program: ShaderProgram,
    transform: TransformState,
    render_loop: RenderLoop,
    pending_texture: Option<AssetId>,
    texture: Option<GpuTexture>,
}

impl DemoApp {
    pub fn new(scene: Scene) -> Self {
        Self { scene, live: None }
    }

    /// Opens the window and drives the scene until it closes.
    pub fn run(self) -> Result<()> {
        let config = RuntimeConfig::titled(self.scene.title);
        DisplaySync::new(config).run(self)
    }
}

impl App for DemoApp {
    fn setup(&mut self, ctx: &mut SetupCtx<'_, '_>) -> Result<()> {
        let scene = &self.scene;
        let rctx = ctx.gpu.render_ctx();

        let projection = scene.projection.matrix(rctx.viewport.aspect());
        let transform = TransformState::translated(projection, scene.translation, scene.axis)
            .map_err(EngineError::from)?;

        let mesh = GpuMesh::upload(rctx.device, &scene.mesh);
        let program = ShaderProgram::link(
            &rctx,
            &scene.shader,
            &scene.mesh.vertex_layout(),
            scene.mesh.primitive(),
        )
        .map_err(EngineError::from)
        .with_context(|| format!("{} shaders", scene.title))?;

        let readiness = if scene.is_textured() {
            Readiness::pending()
        } else {
            Readiness::ready()
        };
        let mut render_loop = RenderLoop::new(Instant::now()).gated_by(readiness);
        if let Some(spin) = scene.spin {
            render_loop = render_loop.with_spin(spin);
        }

        let pending_texture = match &scene.texture {
            Some(path) => Some(
                ctx.loader
                    .load(path.clone(), ImageOptions::default())
                    .map_err(EngineError::from)?,
            ),
            None => None,
        };

        log::info!(
            "{}: {} vertices, {} elements{}",
            scene.title,
            mesh.vertex_count(),
            mesh.element_count(),
            if pending_texture.is_some() { ", waiting for texture" } else { "" }
        );

        self.live = Some(Live {
            mesh,
            program,
            transform,
            render_loop,
            pending_texture,
            texture: None,
        });
        Ok(())
    }

    fn on_image_loaded(&mut self, ctx: &mut SetupCtx<'_, '_>, image: LoadedImage) -> AppControl {
        let Some(live) = self.live.as_mut() else {
            return AppControl::Continue;
        };
        if live.pending_texture != Some(image.id) {
            log::debug!("ignoring unrequested image {}", image.path.display());
            return AppControl::Continue;
        }
        live.pending_texture = None;

        match image.result {
            Ok(asset) => {
                let texture = GpuTexture::upload(ctx.gpu.device(), ctx.gpu.queue(), &asset);
                live.program.bind_texture(ctx.gpu.device(), &texture);
                live.texture = Some(texture);
                live.render_loop.readiness().mark_ready();
            }
            Err(err) => {
                // The loop stays gated; the window keeps showing nothing.
                let err = EngineError::from(err);
                ctx.alert.notify(err.title(), &err.to_string());
            }
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(live) = self.live.as_mut() else {
            return AppControl::Continue;
        };
        let clear = self.scene.clear;
        let (mesh, program) = (&live.mesh, &live.program);

        let outcome = live.render_loop.tick(ctx.time.now, &mut live.transform, |transform| {
            ctx.render(clear, |rctx, target| {
                draw_mesh(rctx, target, mesh, program, transform);
            })
        });

        match outcome {
            TickOutcome::Drawn(control) => control,
            TickOutcome::Skipped => AppControl::Continue,
        }
    }
}
