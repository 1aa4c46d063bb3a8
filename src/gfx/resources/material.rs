//! Phong material definition
//!
//! Materials are plain data on the CPU side. The renderer turns them into a
//! [`MaterialUniform`] and owns the GPU buffer.

use crate::gfx::color::Color;

/// GPU uniform data for materials. MUST match `Material` in `phong.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 3],
    pub shininess: f32,
    pub emissive: [f32; 3],
    _padding0: f32,
    pub specular: [f32; 3],
    _padding1: f32,
}

/// Blinn-Phong surface description
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub base_color: Color,
    pub shininess: f32,
    pub emissive: Color,
    /// Specular reflectance at normal incidence
    pub specular: Color,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            base_color: Color::WHITE,
            shininess: 30.0,
            emissive: Color::BLACK,
            specular: Color::from_hex(0x111111),
        }
    }
}

impl Material {
    pub fn new(name: &str, base_color: Color) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            ..Default::default()
        }
    }

    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess.max(0.0);
        self
    }

    pub fn with_emission(mut self, emissive: Color) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn uniform(&self) -> MaterialUniform {
        MaterialUniform {
            base_color: self.base_color.to_array(),
            shininess: self.shininess,
            emissive: self.emissive.to_array(),
            _padding0: 0.0,
            specular: self.specular.to_array(),
            _padding1: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_is_std140_sized() {
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 48);
    }

    #[test]
    fn test_builder_clamps_shininess() {
        let material = Material::new("sheet", Color::WHITE).with_shininess(-4.0);
        assert_eq!(material.shininess, 0.0);
    }
}
