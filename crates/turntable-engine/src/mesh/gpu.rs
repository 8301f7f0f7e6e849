use wgpu::util::DeviceExt;

use super::Mesh;

/// A [`Mesh`] uploaded into GPU buffers.
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
    element_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, mesh: &Mesh) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("turntable mesh vbo"),
            contents: bytemuck::cast_slice(&mesh.interleaved()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = mesh.indices().map(|indices| {
            // wgpu requires copy sizes aligned to 4 bytes; pad odd u16 counts.
            let mut padded = indices.to_vec();
            if padded.len() % 2 == 1 {
                padded.push(0);
            }
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("turntable mesh ibo"),
                contents: bytemuck::cast_slice(&padded),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        log::debug!(
            "uploaded mesh: {} vertices, {} elements, {:?}",
            mesh.vertex_count(),
            mesh.element_count(),
            mesh.primitive()
        );

        Self {
            vertex_buffer,
            index_buffer,
            vertex_count: mesh.vertex_count(),
            element_count: mesh.element_count(),
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn element_count(&self) -> u32 {
        self.element_count
    }

    /// Binds the buffers and issues the draw for this mesh.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        match &self.index_buffer {
            Some(ibo) => {
                rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(0..self.element_count, 0, 0..1);
            }
            None => rpass.draw(0..self.vertex_count, 0..1),
        }
    }
}
