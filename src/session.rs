//! Render session: one mounted viewer
//!
//! A [`Session`] is created when the host window mounts the viewer and lives
//! until it unmounts. It owns the scene, the renderer and the render loop, and
//! holds the resize listener handle. The orbit controls inside the scene hold
//! the pointer subscription. Unmounting stops the loop, releases the renderer
//! and hands both listener handles back to the [`EventHub`].

use std::{cell::RefCell, rc::Rc};

use cgmath::Rad;

use crate::{
    config::ViewerConfig,
    events::{EventHub, ListenerHandle, ListenerKind, PointerInput},
    gfx::{rendering::FrameRenderer, scene::Scene, viewport::Viewport},
};

/// Event hub shared between the host and its sessions
pub type SharedEventHub = Rc<RefCell<EventHub>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// What the host should do after a frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Schedule the next frame
    Continue,
    /// The loop is stopped; schedule nothing
    Stopped,
}

/// Explicit run/stop state of the per-frame callback
#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    frames: u64,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Running,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Stopping is final; a stopped loop never runs again
    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
    }

    fn record_frame(&mut self) {
        self.frames += 1;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

pub struct Session<R: FrameRenderer> {
    scene: Scene,
    renderer: R,
    render_loop: RenderLoop,
    viewport: Viewport,
    rotation_step: f64,
    hub: SharedEventHub,
    resize_listener: Option<ListenerHandle>,
    mounted: bool,
}

impl<R: FrameRenderer> Session<R> {
    /// Builds the scene, uploads it to the renderer and subscribes to resize
    /// and pointer events.
    pub fn mount(
        mut renderer: R,
        viewport: Viewport,
        config: &ViewerConfig,
        hub: SharedEventHub,
    ) -> Self {
        let mut scene = Scene::build(config, viewport);
        renderer.prepare(&scene);

        let resize_listener = hub.borrow_mut().register(ListenerKind::Resize);
        {
            let manager = &mut scene.camera_manager;
            manager.controls.connect(&mut hub.borrow_mut());
            manager.controls.save_state(&manager.camera);
        }

        log::info!(
            "session mounted at {}x{} (pixel ratio {})",
            viewport.width,
            viewport.height,
            viewport.pixel_ratio
        );

        Self {
            scene,
            renderer,
            render_loop: RenderLoop::new(),
            viewport,
            rotation_step: config.sheet.rotation_step,
            hub,
            resize_listener: Some(resize_listener),
            mounted: true,
        }
    }

    /// One tick of the render loop: spin the sheet, step the controls, draw.
    ///
    /// Surface errors that the next frame can recover from skip this frame.
    /// Any other error stops the loop.
    pub fn frame(&mut self) -> FrameOutcome {
        if !self.render_loop.is_running() {
            return FrameOutcome::Stopped;
        }

        self.scene.sheet.rotate_y(Rad(self.rotation_step));
        self.scene.update();

        match self.renderer.render(&self.scene) {
            Ok(()) => self.render_loop.record_frame(),
            Err(err) if err.is_recoverable() => {
                log::warn!("skipping frame: {}", err);
                if err.needs_reconfigure() {
                    self.renderer.reconfigure();
                }
            }
            Err(err) => {
                log::error!("stopping render loop: {}", err);
                self.render_loop.stop();
                return FrameOutcome::Stopped;
            }
        }

        FrameOutcome::Continue
    }

    /// Matches renderer and camera to a new viewport.
    ///
    /// Returns false when the event was ignored: the session no longer holds
    /// its resize listener, or the viewport is empty (minimized window).
    pub fn handle_resize(&mut self, viewport: Viewport) -> bool {
        if !self.is_listening_for_resize() {
            return false;
        }
        if viewport.is_empty() {
            log::debug!("ignoring resize to empty viewport");
            return false;
        }

        self.viewport = viewport;
        self.renderer.resize(viewport);

        let manager = &mut self.scene.camera_manager;
        let (width, height) = viewport.physical_size();
        manager.camera.resize_projection(width, height);
        manager.camera.update_projection_matrix();
        manager.camera.update_view_proj();
        manager.controls.set_viewport_height(height);

        log::debug!(
            "resized to {}x{} (pixel ratio {})",
            viewport.width,
            viewport.height,
            viewport.pixel_ratio
        );
        true
    }

    pub fn handle_pointer(&mut self, input: &PointerInput) {
        if self.render_loop.is_running() {
            self.scene.camera_manager.process_input(input);
        }
    }

    /// Returns the camera to where it was at mount
    pub fn reset_camera(&mut self) {
        self.scene.camera_manager.controls.reset();
    }

    /// Stops the loop and releases everything acquired at mount. Safe to call
    /// more than once.
    pub fn unmount(&mut self) {
        self.render_loop.stop();
        self.renderer.release();

        let mut hub = self.hub.borrow_mut();
        if let Some(handle) = self.resize_listener.take() {
            hub.unregister(handle);
        }
        self.scene.camera_manager.controls.dispose(&mut hub);

        if self.mounted {
            self.mounted = false;
            log::info!(
                "session unmounted after {} frames",
                self.render_loop.frames()
            );
        }
    }

    fn is_listening_for_resize(&self) -> bool {
        self.resize_listener
            .as_ref()
            .is_some_and(|handle| self.hub.borrow().is_active(handle))
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_running(&self) -> bool {
        self.render_loop.is_running()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.render_loop.frames()
    }
}

impl<R: FrameRenderer> Drop for Session<R> {
    fn drop(&mut self) {
        self.unmount();
    }
}
