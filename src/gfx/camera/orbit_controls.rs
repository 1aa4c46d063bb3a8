//! Mouse-driven orbit, zoom and pan with optional damping
//!
//! Input handlers never move the camera directly. They accumulate a pending
//! motion (yaw/pitch delta, target offset, log-scale zoom) which the render
//! loop consumes through [`OrbitControls::update`] once per frame. With damping
//! enabled each update applies `damping_factor` of what is pending and keeps
//! the rest, so the camera eases toward the gesture's end state over many
//! frames instead of snapping.
//!
//! Gestures:
//! - primary drag: orbit around the target
//! - secondary drag, or shift + primary drag: pan the target in screen space
//! - middle drag, wheel, pinch: zoom (change distance to target)

use std::f32::consts::PI;

use cgmath::{Vector3, Zero};

use super::orbit_camera::OrbitCamera;
use crate::{
    config::ControlsConfig,
    events::{EventHub, ListenerHandle, ListenerKind, PointerButton, PointerInput},
};

/// Pending motion below this magnitude is dropped
const SETTLE_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragMode {
    Rotate,
    Pan,
    Dolly,
}

/// Motion accumulated from input, not yet applied to the camera
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingMotion {
    yaw: f32,
    pitch: f32,
    pan: Vector3<f32>,
    /// Natural log of the distance scale; positive moves away from the target
    zoom: f32,
}

impl PendingMotion {
    fn zero() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            pan: Vector3::zero(),
            zoom: 0.0,
        }
    }

    fn is_settled(&self) -> bool {
        self.yaw.abs() < SETTLE_EPSILON
            && self.pitch.abs() < SETTLE_EPSILON
            && self.pan.x.abs() < SETTLE_EPSILON
            && self.pan.y.abs() < SETTLE_EPSILON
            && self.pan.z.abs() < SETTLE_EPSILON
            && self.zoom.abs() < SETTLE_EPSILON
    }

    fn scale(&mut self, factor: f32) {
        self.yaw *= factor;
        self.pitch *= factor;
        self.pan *= factor;
        self.zoom *= factor;
    }
}

/// Camera pose saved for [`OrbitControls::reset`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub target: Vector3<f32>,
}

impl CameraState {
    pub fn capture(camera: &OrbitCamera) -> Self {
        Self {
            distance: camera.distance,
            pitch: camera.pitch,
            yaw: camera.yaw,
            target: camera.target,
        }
    }
}

pub struct OrbitControls {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pending: PendingMotion,
    drag: Option<DragMode>,
    cursor: Option<(f64, f64)>,
    is_shift_held: bool,
    /// Height of the drawable area in physical pixels
    viewport_height: f32,
    saved_state: CameraState,
    reset_requested: bool,
    subscription: Option<ListenerHandle>,
}

impl OrbitControls {
    pub fn new(config: &ControlsConfig, camera: &mut OrbitCamera, viewport_height: u32) -> Self {
        camera.bounds.min_distance = config.min_distance;
        camera.bounds.max_distance = config.max_distance;

        Self {
            enable_damping: config.enable_damping,
            damping_factor: config.damping_factor.clamp(0.0, 1.0),
            enable_rotate: config.enable_rotate,
            enable_zoom: config.enable_zoom,
            enable_pan: config.enable_pan,
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            pan_speed: config.pan_speed,
            pending: PendingMotion::zero(),
            drag: None,
            cursor: None,
            is_shift_held: false,
            viewport_height: viewport_height.max(1) as f32,
            saved_state: CameraState::capture(camera),
            reset_requested: false,
            subscription: None,
        }
    }

    /// Subscribes to pointer events. Input is ignored until connected.
    pub fn connect(&mut self, hub: &mut EventHub) {
        if self.subscription.is_none() {
            self.subscription = Some(hub.register(ListenerKind::Pointer));
        }
    }

    /// Releases the pointer subscription and drops any in-flight gesture
    pub fn dispose(&mut self, hub: &mut EventHub) {
        if let Some(handle) = self.subscription.take() {
            hub.unregister(handle);
        }
        self.drag = None;
        self.cursor = None;
        self.pending = PendingMotion::zero();
    }

    pub fn is_connected(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn set_viewport_height(&mut self, height: u32) {
        self.viewport_height = height.max(1) as f32;
    }

    /// Whether there is no motion left to apply
    pub fn is_settled(&self) -> bool {
        self.pending.is_settled() && !self.reset_requested
    }

    /// Saves the camera pose that [`OrbitControls::reset`] returns to
    pub fn save_state(&mut self, camera: &OrbitCamera) {
        self.saved_state = CameraState::capture(camera);
    }

    /// Returns the camera to the saved pose on the next update
    pub fn reset(&mut self) {
        self.reset_requested = true;
        self.pending = PendingMotion::zero();
    }

    pub fn handle_input(&mut self, input: &PointerInput, camera: &OrbitCamera) {
        if !self.is_connected() {
            return;
        }

        match *input {
            PointerInput::Modifiers { shift } => {
                self.is_shift_held = shift;
            }
            PointerInput::Pressed(button) => {
                self.drag = match button {
                    PointerButton::Primary if self.is_shift_held => {
                        self.enable_pan.then_some(DragMode::Pan)
                    }
                    PointerButton::Primary => self.enable_rotate.then_some(DragMode::Rotate),
                    PointerButton::Secondary => self.enable_pan.then_some(DragMode::Pan),
                    PointerButton::Middle => self.enable_zoom.then_some(DragMode::Dolly),
                };
                log::debug!("drag started: {:?}", self.drag);
            }
            PointerInput::Released(_) => {
                self.drag = None;
            }
            PointerInput::Left => {
                self.drag = None;
                self.cursor = None;
            }
            PointerInput::Moved { x, y } => {
                if let (Some(mode), Some((last_x, last_y))) = (self.drag, self.cursor) {
                    let dx = (x - last_x) as f32;
                    let dy = (y - last_y) as f32;
                    match mode {
                        DragMode::Rotate => self.rotate(dx, dy),
                        DragMode::Pan => self.pan(dx, dy, camera),
                        DragMode::Dolly => self.dolly(dy),
                    }
                }
                self.cursor = Some((x, y));
            }
            PointerInput::Wheel { delta_y } => {
                if self.enable_zoom {
                    self.dolly(delta_y as f32);
                }
            }
            PointerInput::Pinch { delta } => {
                // delta = 0.1 means "10% larger"
                if self.enable_zoom && delta > -1.0 {
                    self.pending.zoom -= (1.0 + delta as f32).ln();
                }
            }
        }
    }

    /// A full drag across the viewport height is one revolution
    fn rotate(&mut self, dx: f32, dy: f32) {
        let per_pixel = 2.0 * PI / self.viewport_height * self.rotate_speed;
        self.pending.yaw -= dx * per_pixel;
        self.pending.pitch += dy * per_pixel;
    }

    /// Screen-space pan: the point under the cursor on the target plane follows it
    fn pan(&mut self, dx: f32, dy: f32, camera: &OrbitCamera) {
        let (right, up) = camera.screen_axes();
        let half_height = camera.distance * (camera.fovy.0 * 0.5).tan();
        let world_per_pixel = 2.0 * half_height / self.viewport_height * self.pan_speed;

        self.pending.pan += right * (-dx * world_per_pixel) + up * (dy * world_per_pixel);
    }

    /// Positive delta zooms out by `0.95^(zoom_speed * |delta| / 100)`
    fn dolly(&mut self, delta: f32) {
        if delta == 0.0 {
            return;
        }
        let step = (0.95f32).ln() * self.zoom_speed * (delta.abs() * 0.01);
        if delta > 0.0 {
            self.pending.zoom -= step;
        } else {
            self.pending.zoom += step;
        }
    }

    /// Applies pending motion to the camera. Returns whether it moved.
    pub fn update(&mut self, camera: &mut OrbitCamera) -> bool {
        if self.reset_requested {
            self.reset_requested = false;
            camera.set_target(self.saved_state.target);
            camera.set_yaw(self.saved_state.yaw);
            camera.set_pitch(self.saved_state.pitch);
            camera.set_distance(self.saved_state.distance);
            log::info!("camera reset to saved state");
            return true;
        }

        if self.pending.is_settled() {
            self.pending = PendingMotion::zero();
            return false;
        }

        let share = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        let before = CameraState::capture(camera);

        camera.add_yaw(self.pending.yaw * share);
        camera.add_pitch(self.pending.pitch * share);
        camera.translate_target(self.pending.pan * share);
        camera.set_distance(camera.distance * (self.pending.zoom * share).exp());

        if self.enable_damping {
            self.pending.scale(1.0 - self.damping_factor);
        } else {
            self.pending = PendingMotion::zero();
        }

        CameraState::capture(camera) != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use cgmath::InnerSpace;

    fn setup(config: ControlsConfig) -> (OrbitControls, OrbitCamera, EventHub) {
        let mut camera = OrbitCamera::from_config(&CameraConfig::default(), 800.0 / 600.0);
        let mut controls = OrbitControls::new(&config, &mut camera, 600);
        let mut hub = EventHub::new();
        controls.connect(&mut hub);
        (controls, camera, hub)
    }

    fn drag(controls: &mut OrbitControls, camera: &OrbitCamera, button: PointerButton, dx: f64, dy: f64) {
        controls.handle_input(&PointerInput::Moved { x: 100.0, y: 100.0 }, camera);
        controls.handle_input(&PointerInput::Pressed(button), camera);
        controls.handle_input(&PointerInput::Moved { x: 100.0 + dx, y: 100.0 + dy }, camera);
        controls.handle_input(&PointerInput::Released(button), camera);
    }

    #[test]
    fn test_input_does_not_move_camera_until_update() {
        let (mut controls, camera, _hub) = setup(ControlsConfig::default());
        let before = camera.eye;
        drag(&mut controls, &camera, PointerButton::Primary, 60.0, 0.0);
        assert_eq!(camera.eye, before);
        assert!(!controls.is_settled());
    }

    #[test]
    fn test_damped_rotation_eases_over_many_frames() {
        let (mut controls, mut camera, _hub) = setup(ControlsConfig::default());
        drag(&mut controls, &camera, PointerButton::Primary, 60.0, 0.0);

        // 60px of a 600px viewport is a tenth of a revolution
        let total = -2.0 * PI / 10.0;

        assert!(controls.update(&mut camera));
        assert!((camera.yaw - total * 0.05).abs() < 1e-5);

        let mut previous = camera.yaw;
        for _ in 0..20 {
            controls.update(&mut camera);
            let step = (camera.yaw - previous).abs();
            assert!(step > 0.0);
            previous = camera.yaw;
        }
        assert!(camera.yaw > total);

        for _ in 0..1000 {
            controls.update(&mut camera);
        }
        assert!((camera.yaw - total).abs() < 1e-4);
        assert!(controls.is_settled());
    }

    #[test]
    fn test_undamped_rotation_applies_in_one_update() {
        let (mut controls, mut camera, _hub) = setup(ControlsConfig {
            enable_damping: false,
            ..Default::default()
        });
        drag(&mut controls, &camera, PointerButton::Primary, 0.0, 30.0);

        controls.update(&mut camera);
        assert!((camera.pitch - 2.0 * PI * 30.0 / 600.0).abs() < 1e-5);
        assert!(!controls.update(&mut camera));
    }

    #[test]
    fn test_pan_moves_target_and_eye_together() {
        let (mut controls, mut camera, _hub) = setup(ControlsConfig {
            enable_damping: false,
            ..Default::default()
        });
        let offset_before = camera.eye - camera.target;

        drag(&mut controls, &camera, PointerButton::Secondary, 100.0, 0.0);
        controls.update(&mut camera);

        // Dragging right slides the target left along the camera's x axis
        assert!(camera.target.x < 0.0);
        assert!(camera.target.y.abs() < 1e-5);
        assert!(((camera.eye - camera.target) - offset_before).magnitude() < 1e-4);
    }

    #[test]
    fn test_shift_primary_drag_pans() {
        let (mut controls, mut camera, _hub) = setup(ControlsConfig {
            enable_damping: false,
            ..Default::default()
        });
        controls.handle_input(&PointerInput::Modifiers { shift: true }, &camera);
        drag(&mut controls, &camera, PointerButton::Primary, 0.0, 50.0);
        controls.update(&mut camera);

        assert!(camera.target.y > 0.0);
        assert_eq!(camera.yaw, 0.0);
    }

    #[test]
    fn test_wheel_zooms_out_and_in() {
        let (mut controls, mut camera, _hub) = setup(ControlsConfig {
            enable_damping: false,
            ..Default::default()
        });

        controls.handle_input(&PointerInput::Wheel { delta_y: 100.0 }, &camera);
        controls.update(&mut camera);
        assert!((camera.distance - 20.0 / 0.95).abs() < 1e-3);

        controls.handle_input(&PointerInput::Wheel { delta_y: -100.0 }, &camera);
        controls.update(&mut camera);
        assert!((camera.distance - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_respects_distance_bounds() {
        let (mut controls, mut camera, _hub) = setup(ControlsConfig {
            enable_damping: false,
            min_distance: Some(10.0),
            max_distance: Some(25.0),
            ..Default::default()
        });

        controls.handle_input(&PointerInput::Wheel { delta_y: 5000.0 }, &camera);
        controls.update(&mut camera);
        assert_eq!(camera.distance, 25.0);

        controls.handle_input(&PointerInput::Pinch { delta: 4.0 }, &camera);
        controls.update(&mut camera);
        assert_eq!(camera.distance, 10.0);
    }

    #[test]
    fn test_disabled_gestures_are_ignored() {
        let (mut controls, mut camera, _hub) = setup(ControlsConfig {
            enable_zoom: false,
            enable_pan: false,
            ..Default::default()
        });
        controls.handle_input(&PointerInput::Wheel { delta_y: 300.0 }, &camera);
        drag(&mut controls, &camera, PointerButton::Secondary, 40.0, 40.0);

        assert!(controls.is_settled());
        assert!(!controls.update(&mut camera));
    }

    #[test]
    fn test_disposed_controls_ignore_input() {
        let (mut controls, mut camera, mut hub) = setup(ControlsConfig::default());
        assert_eq!(hub.active_of(ListenerKind::Pointer), 1);

        controls.dispose(&mut hub);
        assert_eq!(hub.active_count(), 0);

        drag(&mut controls, &camera, PointerButton::Primary, 80.0, 80.0);
        assert!(!controls.update(&mut camera));
    }

    #[test]
    fn test_reset_restores_saved_pose() {
        let (mut controls, mut camera, _hub) = setup(ControlsConfig {
            enable_damping: false,
            ..Default::default()
        });
        drag(&mut controls, &camera, PointerButton::Primary, 120.0, -40.0);
        controls.handle_input(&PointerInput::Wheel { delta_y: 200.0 }, &camera);
        controls.update(&mut camera);
        assert!((camera.eye - Vector3::new(0.0, 0.0, 20.0)).magnitude() > 1.0);

        controls.reset();
        controls.update(&mut camera);
        assert!((camera.eye - Vector3::new(0.0, 0.0, 20.0)).magnitude() < 1e-4);
    }
}
