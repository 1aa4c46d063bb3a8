use wgpu::util::DeviceExt;

use crate::{
    gfx::{
        resources::material::MaterialUniform,
        scene::object::{Object, TransformUniform},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutWithDesc},
        uniform_buffer::UniformBuffer,
    },
};

/// GPU-side copy of one object: mesh buffers plus its transform and material
/// uniforms, bound at slots 1 and 2 of the Phong pipeline.
pub struct ObjectGpuResources {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    transform_ubo: UniformBuffer<TransformUniform>,
    pub transform_bind_group: wgpu::BindGroup,
    material_ubo: UniformBuffer<MaterialUniform>,
    pub material_bind_group: wgpu::BindGroup,
}

impl ObjectGpuResources {
    pub fn new(
        device: &wgpu::Device,
        object: &Object,
        transform_layout: &BindGroupLayoutWithDesc,
        material_layout: &BindGroupLayoutWithDesc,
    ) -> Self {
        let vertices = object.geometry.to_vertices();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", object.name)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", object.name)),
            contents: bytemuck::cast_slice(&object.geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let transform_ubo = UniformBuffer::new_with_data(device, &object.transform_uniform());
        let transform_bind_group = BindGroupBuilder::new(transform_layout)
            .resource(transform_ubo.binding_resource())
            .create(device, "Transform Bind Group");

        let material_ubo = UniformBuffer::new_with_data(device, &object.material.uniform());
        let material_bind_group = BindGroupBuilder::new(material_layout)
            .resource(material_ubo.binding_resource())
            .create(device, "Material Bind Group");

        log::debug!(
            "uploaded '{}': {} vertices, {} indices",
            object.name,
            vertices.len(),
            object.geometry.indices.len()
        );

        Self {
            vertex_buffer,
            index_buffer,
            index_count: object.geometry.indices.len() as u32,
            transform_ubo,
            transform_bind_group,
            material_ubo,
            material_bind_group,
        }
    }

    /// Uploads the object's current transform and material
    pub fn update(&mut self, queue: &wgpu::Queue, object: &Object) {
        self.transform_ubo
            .update_content(queue, object.transform_uniform());
        self.material_ubo.update_content(queue, object.material.uniform());
    }

    pub fn destroy(&self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        self.transform_ubo.destroy();
        self.material_ubo.destroy();
    }
}
