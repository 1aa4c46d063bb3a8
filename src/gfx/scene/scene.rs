use cgmath::Rad;

use crate::{
    config::{SheetConfig, ViewerConfig},
    gfx::{
        camera::{CameraManager, OrbitCamera, OrbitControls},
        color::Color,
        geometry::generate_box,
        resources::material::Material,
        viewport::Viewport,
    },
};

use super::{lights::SceneLights, object::Object};

/// Builds the sheet: a thin box with a shiny, self-lit material, turned a
/// quarter turn so its broad face looks down +z.
pub fn build_sheet(config: &SheetConfig) -> Object {
    let [width, height, depth] = config.size;
    let material = Material::new("sheet", Color::from_hex(config.color))
        .with_shininess(config.shininess)
        .with_emission(Color::from_hex(config.emissive));

    let mut sheet = Object::new("sheet", generate_box(width, height, depth), material);
    sheet.set_rotation_y(Rad(config.initial_rotation));
    sheet
}

/// Scene root: the sheet, its lights and the camera looking at it
pub struct Scene {
    pub camera_manager: CameraManager,
    pub sheet: Object,
    pub lights: SceneLights,
}

impl Scene {
    pub fn new(camera_manager: CameraManager, sheet: Object, lights: SceneLights) -> Self {
        Self {
            camera_manager,
            sheet,
            lights,
        }
    }

    /// Builds the complete scene for a viewport
    pub fn build(config: &ViewerConfig, viewport: Viewport) -> Self {
        let sheet = build_sheet(&config.sheet);

        let mut camera = OrbitCamera::from_config(&config.camera, viewport.aspect());
        let controls = OrbitControls::new(
            &config.controls,
            &mut camera,
            viewport.physical_size().1,
        );
        camera.update_view_proj();

        let lights = SceneLights::from_config(&config.lighting);
        log::debug!(
            "scene built: sheet {:?}, camera at {:?}",
            config.sheet.size,
            camera.eye
        );

        Self::new(CameraManager::new(camera, controls), sheet, lights)
    }

    /// Applies pending control motion and refreshes camera matrices
    pub fn update(&mut self) -> bool {
        self.camera_manager.update()
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera_manager.camera
    }

    pub fn object_count(&self) -> usize {
        1
    }

    pub fn light_count(&self) -> usize {
        self.lights.count()
    }

    pub fn get_statistics(&self) -> SceneStatistics {
        SceneStatistics {
            object_count: self.object_count(),
            light_count: self.light_count(),
            total_triangles: self.sheet.geometry.triangle_count(),
            total_vertices: self.sheet.geometry.vertex_count(),
        }
    }
}

/// Scene statistics for debugging
#[derive(Debug, PartialEq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub light_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3};

    #[test]
    fn test_built_scene_contents() {
        let scene = Scene::build(&ViewerConfig::default(), Viewport::new(800, 600, 1.0));

        assert_eq!(
            scene.get_statistics(),
            SceneStatistics {
                object_count: 1,
                light_count: 2,
                total_triangles: 12,
                total_vertices: 24,
            }
        );
        assert_eq!(scene.sheet.rotation_y, Rad(std::f64::consts::FRAC_PI_2));
        assert_eq!(scene.sheet.material.shininess, 100.0);
        assert!((scene.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
        assert!((scene.camera().eye - Vector3::new(0.0, 0.0, 20.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_camera_uniform_is_populated() {
        let scene = Scene::build(&ViewerConfig::default(), Viewport::new(800, 600, 1.0));
        assert_eq!(scene.camera().uniform.view_position, [0.0, 0.0, 20.0, 1.0]);
    }
}
