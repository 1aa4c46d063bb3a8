use std::f64::consts::TAU;

use cgmath::{Matrix4, Rad, Vector3, Zero};

use crate::gfx::{geometry::GeometryData, resources::material::Material};

/// Per-object transform as uploaded to the vertex shader
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub model: [[f32; 4]; 4],
}

/// A renderable object: geometry, material and a y-axis rotation
///
/// Only rotation about the vertical axis is tracked; the sheet never tilts
/// or scales. The angle accumulates in f64 so a fixed per-frame step stays
/// exact over long runs; it is wrapped to one turn only for the model matrix.
#[derive(Debug, Clone)]
pub struct Object {
    pub name: String,
    pub geometry: GeometryData,
    pub material: Material,
    pub position: Vector3<f32>,
    pub rotation_y: Rad<f64>,
    pub visible: bool,
}

impl Object {
    pub fn new(name: &str, geometry: GeometryData, material: Material) -> Self {
        Self {
            name: name.to_string(),
            geometry,
            material,
            position: Vector3::zero(),
            rotation_y: Rad(0.0),
            visible: true,
        }
    }

    pub fn set_rotation_y(&mut self, angle: Rad<f64>) {
        self.rotation_y = angle;
    }

    /// Adds `angle` to the current rotation about the vertical axis
    pub fn rotate_y(&mut self, angle: Rad<f64>) {
        self.rotation_y += angle;
    }

    /// Model matrix: translation after rotation
    pub fn transform(&self) -> Matrix4<f32> {
        let angle = Rad(self.rotation_y.0.rem_euclid(TAU) as f32);
        Matrix4::from_translation(self.position) * Matrix4::from_angle_y(angle)
    }

    pub fn transform_uniform(&self) -> TransformUniform {
        TransformUniform {
            model: self.transform().into(),
        }
    }
}
