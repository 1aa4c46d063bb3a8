use cgmath::{Matrix4, SquareMatrix};

use super::{orbit_camera::OrbitCamera, orbit_controls::OrbitControls};
use crate::events::PointerInput;

/// Camera plus the controls steering it
pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controls: OrbitControls,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controls: OrbitControls) -> Self {
        Self { camera, controls }
    }

    /// Feeds a pointer event to the controls. The camera itself is only
    /// touched on the next [`CameraManager::update`].
    pub fn process_input(&mut self, input: &PointerInput) {
        self.controls.handle_input(input, &self.camera);
    }

    /// Per-frame step: applies pending (damped) control motion and refreshes
    /// the camera uniform. Returns whether the camera moved.
    pub fn update(&mut self) -> bool {
        let moved = self.controls.update(&mut self.camera);
        self.camera.update_view_proj();
        moved
    }
}

pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}
