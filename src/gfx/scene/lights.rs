//! Scene lighting: one directional light and one ambient fill
//!
//! Lights are created once at mount and never change afterwards.

use cgmath::{InnerSpace, Vector3, Zero};

use crate::{config::LightingConfig, gfx::color::Color};

/// Parallel light shining from `position` toward `target`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub position: Vector3<f32>,
    pub target: Vector3<f32>,
    pub color: Color,
    pub intensity: f32,
}

impl DirectionalLight {
    /// Unit vector from the lit surface toward the light
    pub fn direction_to_light(&self) -> Vector3<f32> {
        let dir = self.position - self.target;
        if dir.magnitude2() > f32::EPSILON {
            dir.normalize()
        } else {
            Vector3::unit_y()
        }
    }

    pub fn radiance(&self) -> Color {
        self.color.scaled(self.intensity)
    }
}

/// Uniform light reaching every surface equally
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl AmbientLight {
    pub fn irradiance(&self) -> Color {
        self.color.scaled(self.intensity)
    }
}

/// The scene's two lights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLights {
    pub directional: DirectionalLight,
    pub ambient: AmbientLight,
}

impl SceneLights {
    pub fn from_config(config: &LightingConfig) -> Self {
        Self {
            directional: DirectionalLight {
                position: config.directional_position.into(),
                target: Vector3::zero(),
                color: Color::from_hex(config.directional_color),
                intensity: config.directional_intensity,
            },
            ambient: AmbientLight {
                color: Color::from_hex(config.ambient_color),
                intensity: config.ambient_intensity,
            },
        }
    }

    pub fn count(&self) -> usize {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directional_light_points_at_origin() {
        let lights = SceneLights::from_config(&LightingConfig::default());
        let dir = lights.directional.direction_to_light();
        let expected = Vector3::new(1.0, 1.0, 0.0).normalize();
        assert!((dir - expected).magnitude() < 1e-6);
        assert_eq!(lights.directional.intensity, 10.0);
        assert_eq!(lights.ambient.intensity, 1.0);
    }

    #[test]
    fn test_degenerate_direction_falls_back_to_up() {
        let light = DirectionalLight {
            position: Vector3::zero(),
            target: Vector3::zero(),
            color: Color::WHITE,
            intensity: 1.0,
        };
        assert_eq!(light.direction_to_light(), Vector3::unit_y());
    }
}
