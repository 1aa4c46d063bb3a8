//! Global uniform bindings for camera and lighting
//!
//! One uniform buffer holds the per-frame data every draw shares: the camera
//! matrices and both lights. It is bound to slot 0 of the Phong pipeline.

use crate::{
    gfx::{camera::camera_utils::CameraUniform, scene::lights::SceneLights},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in `phong.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],  // Camera position (homogeneous coordinates)
    view_proj: [[f32; 4]; 4], // Camera view-projection matrix

    light_direction: [f32; 3], // Unit vector toward the directional light
    _padding0: f32,
    light_radiance: [f32; 3], // Directional color * intensity
    _padding1: f32,
    ambient: [f32; 3], // Ambient color * intensity
    _padding2: f32,
}
// Total: 16 + 64 + 16 + 16 + 16 = 128 bytes

impl GlobalUBOContent {
    pub fn new(camera: CameraUniform, lights: &SceneLights) -> Self {
        let direction = lights.directional.direction_to_light();
        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            light_direction: [direction.x, direction.y, direction.z],
            _padding0: 0.0,
            light_radiance: lights.directional.radiance().to_array(),
            _padding1: 0.0,
            ambient: lights.ambient.irradiance().to_array(),
            _padding2: 0.0,
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Updates the global uniform buffer with camera and light data
///
/// Called once per frame before the draw.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    lights: &SceneLights,
) {
    ubo.update_content(queue, GlobalUBOContent::new(camera, lights));
}

/// Bind group layout and bind group for the global uniforms
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    /// Sets up the layout. The bind group itself is created by
    /// `create_bind_group()` once the uniform buffer exists.
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform()) // Global uniforms (camera + lights)
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(&mut self, device: &wgpu::Device, ubo: &GlobalUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Global Bind Group"),
        );
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    /// Returns `None` until `create_bind_group()` has run
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }
}
