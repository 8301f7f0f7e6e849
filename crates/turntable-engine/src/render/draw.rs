use crate::mesh::GpuMesh;
use crate::paint::Color;
use crate::shader::ShaderProgram;
use crate::transform::TransformState;

use super::{RenderCtx, RenderTarget};

/// Clears color to `color` and depth to the far plane.
pub fn clear(target: &mut RenderTarget<'_>, color: Color) {
    let depth_stencil_attachment = target.depth_view.map(|view| wgpu::RenderPassDepthStencilAttachment {
        view,
        depth_ops: Some(wgpu::Operations {
            load: wgpu::LoadOp::Clear(1.0),
            store: wgpu::StoreOp::Store,
        }),
        stencil_ops: None,
    });

    let _pass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("turntable clear pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target.color_view,
            depth_slice: None,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(color.to_wgpu()),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });
}

/// Uploads the matrices of `transform` and draws `mesh` with `program`.
///
/// Loads the existing attachments; call [`clear`] first for a fresh frame.
/// A program still waiting for its texture draws nothing.
pub fn draw_mesh(
    ctx: &RenderCtx<'_>,
    target: &mut RenderTarget<'_>,
    mesh: &GpuMesh,
    program: &ShaderProgram,
    transform: &TransformState,
) {
    let Some(bind_group) = program.bind_group() else {
        log::debug!("draw skipped: program has no bound texture");
        return;
    };

    program.write_uniforms(ctx.queue, transform);

    let depth_stencil_attachment = target.depth_view.map(|view| wgpu::RenderPassDepthStencilAttachment {
        view,
        depth_ops: Some(wgpu::Operations {
            load: wgpu::LoadOp::Load,
            store: wgpu::StoreOp::Store,
        }),
        stencil_ops: None,
    });

    let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("turntable mesh pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target.color_view,
            depth_slice: None,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });

    rpass.set_pipeline(program.pipeline());
    rpass.set_bind_group(0, bind_group, &[]);
    mesh.draw(&mut rpass);
}
