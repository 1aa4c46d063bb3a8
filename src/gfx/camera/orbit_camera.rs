use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use crate::config::CameraConfig;
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Perspective camera orbiting a target point
///
/// Position is derived from spherical coordinates around `target`:
/// `yaw` swings around the vertical axis (0 = on +z), `pitch` lifts above
/// the horizontal plane. `eye` is recomputed whenever one of them changes.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    /// Projection matrix as of the last `update_projection_matrix` call
    projection: Matrix4<f32>,
    pub uniform: CameraUniform,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection * self.view_matrix()
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Will be auto-calculted in `update()` nevertheless.
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: Rad(std::f32::consts::PI / 4.0),
            znear: 0.1,
            zfar: 1000.0,
            projection: Matrix4::identity(),
            uniform: CameraUniform::default(),
        };
        camera.update();
        camera.update_projection_matrix();
        camera
    }

    /// Camera on +z at the configured distance, looking at the origin
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self::new(config.distance, 0.0, 0.0, Vector3::zero(), aspect);
        camera.fovy = Deg(config.fov_degrees).into();
        camera.znear = config.near;
        camera.zfar = config.far;
        camera.update_projection_matrix();
        camera
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        let mut bounded_yaw = yaw;
        if let Some(min_yaw) = self.bounds.min_yaw {
            bounded_yaw = bounded_yaw.max(min_yaw);
        }
        if let Some(max_yaw) = self.bounds.max_yaw {
            bounded_yaw = bounded_yaw.min(max_yaw);
        }
        self.yaw = bounded_yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Moves the orbit target (and with it the eye) by a world-space offset
    pub fn translate_target(&mut self, offset: Vector3<f32>) {
        self.target += offset;
        self.update();
    }

    pub fn set_target(&mut self, target: Vector3<f32>) {
        self.target = target;
        self.update();
    }

    /// Camera-space right and up axes in world coordinates
    pub fn screen_axes(&self) -> (Vector3<f32>, Vector3<f32>) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();
        (right, up)
    }

    /// Updates the camera after changing `distance`, `pitch`, `yaw` or `target`.
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    /// Sets the aspect ratio for a viewport. Call `update_projection_matrix`
    /// afterwards to commit it.
    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// Recomputes the projection matrix from fovy, aspect and clip planes
    pub fn update_projection_matrix(&mut self) {
        self.projection =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(
            Point3::from_vec(self.eye),
            Point3::from_vec(self.target),
            self.up,
        )
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_yaw: Option<f32>,
    pub max_yaw: Option<f32>,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: None,
            max_distance: None,
            min_pitch: -std::f32::consts::FRAC_PI_2 + 1e-4,
            max_pitch: std::f32::consts::FRAC_PI_2 - 1e-4,
            min_yaw: None,
            max_yaw: None,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera_sits_on_positive_z() {
        let camera = OrbitCamera::from_config(&CameraConfig::default(), 800.0 / 600.0);
        assert!((camera.eye - Vector3::new(0.0, 0.0, 20.0)).magnitude() < 1e-5);
        assert_eq!(camera.target, Vector3::zero());
        assert!((Deg::from(camera.fovy).0 - 75.0).abs() < 1e-4);
    }

    #[test]
    fn test_view_looks_at_target() {
        let camera = OrbitCamera::from_config(&CameraConfig::default(), 1.0);
        let origin = camera.view_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        // Origin lies straight ahead, 20 units down the view axis
        assert!(origin.x.abs() < 1e-5 && origin.y.abs() < 1e-5);
        assert!((origin.z + 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = OrbitCamera::from_config(&CameraConfig::default(), 1.0);
        camera.add_pitch(10.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
        camera.add_pitch(-20.0);
        assert!(camera.pitch > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_projection_only_changes_when_committed() {
        let mut camera = OrbitCamera::from_config(&CameraConfig::default(), 1.0);
        let before = camera.projection_matrix();

        camera.resize_projection(1024, 512);
        assert_eq!(camera.aspect, 2.0);
        assert_eq!(camera.projection_matrix(), before);

        camera.update_projection_matrix();
        assert_ne!(camera.projection_matrix(), before);
    }

    #[test]
    fn test_zero_height_keeps_aspect() {
        let mut camera = OrbitCamera::from_config(&CameraConfig::default(), 1.5);
        camera.resize_projection(640, 0);
        assert_eq!(camera.aspect, 1.5);
    }

    #[test]
    fn test_translate_target_keeps_offset() {
        let mut camera = OrbitCamera::from_config(&CameraConfig::default(), 1.0);
        camera.translate_target(Vector3::new(1.0, 2.0, 0.0));
        assert!((camera.eye - Vector3::new(1.0, 2.0, 20.0)).magnitude() < 1e-5);
    }
}
