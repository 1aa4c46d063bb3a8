use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::ViewerConfig,
    error::ViewerError,
    events::TouchTracker,
    gfx::{rendering::RenderEngine, viewport::Viewport},
    session::{Session, SharedEventHub},
};

/// Desktop host for the viewer: one window, one render session
pub struct SheetViewerApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    session: Option<Session<RenderEngine>>,
    hub: SharedEventHub,
    touches: TouchTracker,
    shift_held: bool,
}

impl SheetViewerApp {
    pub fn new(config: ViewerConfig) -> Result<Self, ViewerError> {
        config.validate()?;
        let event_loop = EventLoop::new()?;

        Ok(Self {
            event_loop,
            app_state: AppState {
                config,
                window: None,
                session: None,
                hub: SharedEventHub::default(),
                touches: TouchTracker::new(),
                shift_held: false,
            },
        })
    }

    /// Runs the event loop until the window closes
    pub fn run(mut self) -> Result<(), ViewerError> {
        // Redraws are requested explicitly while the session runs
        self.event_loop.set_control_flow(ControlFlow::Wait);
        self.event_loop.run_app(&mut self.app_state)?;
        Ok(())
    }
}

impl AppState {
    /// Creates the window on first use, then acquires the GPU and mounts a
    /// session on it.
    fn mount(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let window = match &self.window {
            Some(window) => window.clone(),
            None => {
                let attributes = WindowAttributes::default()
                    .with_title(self.config.window.title.as_str())
                    .with_inner_size(LogicalSize::new(
                        self.config.window.width,
                        self.config.window.height,
                    ));
                let window = Arc::new(event_loop.create_window(attributes)?);
                self.window = Some(window.clone());
                window
            }
        };

        let size = window.inner_size();
        let viewport = Viewport::from_physical(size.width, size.height, window.scale_factor());

        let renderer = pollster::block_on(RenderEngine::new(
            window.clone(),
            viewport,
            &self.config.renderer,
        ))?;

        self.session = Some(Session::mount(
            renderer,
            viewport,
            &self.config,
            self.hub.clone(),
        ));
        window.request_redraw();
        Ok(())
    }

    fn unmount(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.unmount();
        }
        let leaked = self.hub.borrow().active_count();
        if leaked > 0 {
            log::warn!("{} listeners still registered after unmount", leaked);
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        if let Some(session) = self.session.as_mut() {
            session.handle_resize(viewport);
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }

        if let Err(err) = self.mount(event_loop) {
            log::error!("failed to start viewer: {}", err);
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.unmount();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                self.unmount();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match key_code {
                KeyCode::Escape => {
                    self.unmount();
                    event_loop.exit();
                }
                KeyCode::KeyC if self.shift_held => {
                    if let Some(session) = self.session.as_mut() {
                        log::debug!("camera reset");
                        session.reset_camera();
                    }
                }
                _ => (),
            },
            WindowEvent::Resized(size) => {
                self.resize(Viewport::from_physical(
                    size.width,
                    size.height,
                    window.scale_factor(),
                ));
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = window.inner_size();
                self.resize(Viewport::from_physical(size.width, size.height, scale_factor));
            }
            WindowEvent::RedrawRequested => {
                if let Some(session) = self.session.as_mut() {
                    session.frame();
                }
            }
            other => {
                if let WindowEvent::ModifiersChanged(modifiers) = &other {
                    self.shift_held = modifiers.state().shift_key();
                }
                let inputs = self.touches.translate(&other);
                if let Some(session) = self.session.as_mut() {
                    for input in inputs {
                        session.handle_pointer(&input);
                    }
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        let running = self
            .session
            .as_ref()
            .is_some_and(|session| session.is_running());
        if let (true, Some(window)) = (running, self.window.as_ref()) {
            window.request_redraw();
        }
    }
}
