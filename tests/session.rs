use std::{cell::RefCell, f64::consts::FRAC_PI_2, rc::Rc};

use cgmath::{InnerSpace, Vector3};
use winit::event::TouchPhase;

use sheet_viewer::{
    config::ViewerConfig,
    error::FrameError,
    events::{EventHub, ListenerKind, PointerButton, PointerInput, TouchTracker},
    gfx::{rendering::FrameRenderer, scene::Scene, viewport::Viewport},
    session::{FrameOutcome, Session, SharedEventHub},
};

/// GPU allocations the recording renderer has made and not yet freed,
/// shared so it can be checked after the session is gone
type Allocations = Rc<RefCell<usize>>;

struct RecordingRenderer {
    allocations: Allocations,
    viewport: Viewport,
    draws: Vec<f64>,
    released: bool,
}

impl RecordingRenderer {
    fn new(viewport: Viewport, allocations: Allocations) -> Self {
        Self {
            allocations,
            viewport,
            draws: Vec::new(),
            released: false,
        }
    }
}

impl FrameRenderer for RecordingRenderer {
    fn prepare(&mut self, scene: &Scene) {
        // vertex buffer, index buffer, transform and material uniforms
        *self.allocations.borrow_mut() += 4;
        assert_eq!(scene.object_count(), 1);
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn reconfigure(&mut self) {}

    fn surface_size(&self) -> (u32, u32) {
        (self.viewport.width, self.viewport.height)
    }

    fn pixel_ratio(&self) -> f64 {
        self.viewport.pixel_ratio
    }

    fn render(&mut self, scene: &Scene) -> Result<(), FrameError> {
        self.draws.push(scene.sheet.rotation_y.0);
        Ok(())
    }

    fn release(&mut self) {
        if !self.released {
            *self.allocations.borrow_mut() = 0;
            self.released = true;
        }
    }

    fn is_released(&self) -> bool {
        self.released
    }
}

struct Host {
    hub: SharedEventHub,
    allocations: Allocations,
}

impl Host {
    fn new() -> Self {
        Self {
            hub: Rc::new(RefCell::new(EventHub::new())),
            allocations: Allocations::default(),
        }
    }

    fn mount(&self, width: u32, height: u32) -> Session<RecordingRenderer> {
        self.mount_with(width, height, &ViewerConfig::default())
    }

    fn mount_with(
        &self,
        width: u32,
        height: u32,
        config: &ViewerConfig,
    ) -> Session<RecordingRenderer> {
        let viewport = Viewport::new(width, height, 1.0);
        let renderer = RecordingRenderer::new(viewport, self.allocations.clone());
        Session::mount(renderer, viewport, config, self.hub.clone())
    }

    fn listeners(&self) -> usize {
        self.hub.borrow().active_count()
    }

    fn allocations(&self) -> usize {
        *self.allocations.borrow()
    }
}

#[test]
fn mount_builds_one_of_each_and_unmount_releases_everything() {
    let host = Host::new();
    let mut session = host.mount(800, 600);

    let stats = session.scene().get_statistics();
    assert_eq!(stats.object_count, 1);
    assert_eq!(stats.light_count, 2);
    assert_eq!(host.hub.borrow().active_of(ListenerKind::Resize), 1);
    assert_eq!(host.hub.borrow().active_of(ListenerKind::Pointer), 1);
    assert!(host.allocations() > 0);

    session.unmount();

    assert!(session.renderer().is_released());
    assert!(!session.is_running());
    assert_eq!(host.listeners(), 0);
    assert_eq!(host.allocations(), 0);
}

#[test]
fn repeated_mount_cycles_leak_nothing() {
    let host = Host::new();

    for _ in 0..5 {
        let mut session = host.mount(800, 600);
        session.frame();
        session.frame();
        session.unmount();
        assert_eq!(host.listeners(), 0);
        assert_eq!(host.allocations(), 0);
    }
}

#[test]
fn each_frame_advances_rotation_by_one_step() {
    let host = Host::new();
    let mut session = host.mount(800, 600);

    for _ in 0..10 {
        assert_eq!(session.frame(), FrameOutcome::Continue);
    }

    let draws = &session.renderer().draws;
    assert_eq!(draws.len(), 10);
    for pair in draws.windows(2) {
        assert!((pair[1] - pair[0] - 0.01).abs() < 1e-5);
    }
    assert!((draws[0] - (FRAC_PI_2 + 0.01)).abs() < 1e-5);
    assert_eq!(session.frames_rendered(), 10);
}

#[test]
fn rotation_step_holds_over_a_long_run() {
    let host = Host::new();
    let mut session = host.mount(800, 600);

    for _ in 0..200_000 {
        session.frame();
    }

    let draws = &session.renderer().draws;
    let last_step = draws[draws.len() - 1] - draws[draws.len() - 2];
    assert!((last_step - 0.01).abs() < 1e-9);
    assert!((draws[draws.len() - 1] - (FRAC_PI_2 + 2000.0)).abs() < 1e-6);
}

#[test]
fn configured_rotation_step_is_used() {
    let host = Host::new();
    let mut config = ViewerConfig::default();
    config.sheet.rotation_step = 0.05;
    let mut session = host.mount_with(800, 600, &config);

    session.frame();
    session.frame();

    let rotation = session.scene().sheet.rotation_y.0;
    assert!((rotation - (FRAC_PI_2 + 0.1)).abs() < 1e-5);
}

#[test]
fn resize_syncs_renderer_size_and_camera_aspect() {
    let host = Host::new();
    let mut session = host.mount(800, 600);

    for (width, height) in [(1920, 1080), (300, 900), (500, 500)] {
        assert!(session.handle_resize(Viewport::new(width, height, 1.0)));
        assert_eq!(session.renderer().surface_size(), (width, height));
        let expected = width as f32 / height as f32;
        assert!((session.scene().camera().aspect - expected).abs() < 1e-6);
    }
}

#[test]
fn damped_drag_eases_in_over_several_frames() {
    let host = Host::new();
    let mut session = host.mount(800, 600);
    let start_yaw = session.scene().camera().yaw;

    session.handle_pointer(&PointerInput::Moved { x: 400.0, y: 300.0 });
    session.handle_pointer(&PointerInput::Pressed(PointerButton::Primary));
    session.handle_pointer(&PointerInput::Moved { x: 500.0, y: 300.0 });
    session.handle_pointer(&PointerInput::Released(PointerButton::Primary));

    // A full viewport height of drag is one revolution
    let gesture = -2.0 * std::f32::consts::PI * 100.0 / 600.0;

    session.frame();
    let first = session.scene().camera().yaw - start_yaw;
    assert!(first.abs() > 0.0);
    assert!(first.abs() < gesture.abs() * 0.5);

    session.frame();
    let second = session.scene().camera().yaw - start_yaw;
    assert!(second.abs() > first.abs());

    for _ in 0..400 {
        session.frame();
    }
    let settled = session.scene().camera().yaw - start_yaw;
    assert!((settled - gesture).abs() < 1e-3);
}

#[test]
fn two_finger_spread_zooms_without_orbiting() {
    let host = Host::new();
    let mut session = host.mount(800, 600);
    let start = *session.scene().camera();
    let mut touches = TouchTracker::new();

    let mut inputs = touches.handle_touch(1, TouchPhase::Started, (350.0, 300.0));
    inputs.extend(touches.handle_touch(2, TouchPhase::Started, (450.0, 300.0)));
    inputs.extend(touches.handle_touch(1, TouchPhase::Moved, (300.0, 300.0)));
    inputs.extend(touches.handle_touch(2, TouchPhase::Moved, (500.0, 300.0)));
    inputs.extend(touches.handle_touch(1, TouchPhase::Ended, (300.0, 300.0)));
    inputs.extend(touches.handle_touch(2, TouchPhase::Ended, (500.0, 300.0)));
    for input in &inputs {
        session.handle_pointer(input);
    }
    for _ in 0..400 {
        session.frame();
    }

    let camera = session.scene().camera();
    // Spacing doubled, so the camera ends at half the distance
    assert!((camera.distance - start.distance * 0.5).abs() < 1e-2);
    assert!((camera.yaw - start.yaw).abs() < 1e-6);
    assert!((camera.pitch - start.pitch).abs() < 1e-6);
}

#[test]
fn default_800x600_view() {
    let host = Host::new();
    let session = host.mount(800, 600);
    let camera = session.scene().camera();

    assert!((camera.aspect - 4.0 / 3.0).abs() < 1e-3);
    assert!((session.scene().sheet.rotation_y.0 - FRAC_PI_2).abs() < 1e-6);
    assert!((camera.eye - Vector3::new(0.0, 0.0, 20.0)).magnitude() < 1e-4);
    assert_eq!(camera.target, Vector3::new(0.0, 0.0, 0.0));
}

#[test]
fn resize_to_1024x768_keeps_rotation() {
    let host = Host::new();
    let mut session = host.mount(800, 600);
    let rotation = session.scene().sheet.rotation_y;

    session.handle_resize(Viewport::new(1024, 768, 1.0));

    assert!((session.scene().camera().aspect - 4.0 / 3.0).abs() < 1e-3);
    assert_eq!(session.renderer().surface_size(), (1024, 768));
    assert_eq!(session.scene().sheet.rotation_y, rotation);
}

#[test]
fn unmount_before_first_frame_leaks_nothing() {
    let host = Host::new();
    let mut session = host.mount(800, 600);
    session.unmount();

    assert_eq!(session.frames_rendered(), 0);
    assert!(session.renderer().draws.is_empty());
    assert_eq!(session.frame(), FrameOutcome::Stopped);
    assert_eq!(host.listeners(), 0);
    assert_eq!(host.allocations(), 0);
}

#[test]
fn dropping_a_session_tears_it_down() {
    let host = Host::new();
    {
        let mut session = host.mount(800, 600);
        session.frame();
    }
    assert_eq!(host.listeners(), 0);
    assert_eq!(host.allocations(), 0);
}

#[test]
fn pointer_input_after_unmount_is_ignored() {
    let host = Host::new();
    let mut session = host.mount(800, 600);
    session.unmount();
    let eye = session.scene().camera().eye;

    session.handle_pointer(&PointerInput::Wheel { delta_y: -500.0 });
    session.frame();

    assert_eq!(session.scene().camera().eye, eye);
}

#[test]
fn shift_c_reset_returns_camera_to_mount_pose() {
    let host = Host::new();
    let mut config = ViewerConfig::default();
    config.controls.enable_damping = false;
    let mut session = host.mount_with(800, 600, &config);
    let eye = session.scene().camera().eye;

    session.handle_pointer(&PointerInput::Wheel { delta_y: 300.0 });
    session.frame();
    assert!((session.scene().camera().eye - eye).magnitude() > 1e-3);

    session.reset_camera();
    session.frame();
    assert!((session.scene().camera().eye - eye).magnitude() < 1e-4);
}
