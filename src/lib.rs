//! Sheet Viewer
//!
//! Renders a single spinning sheet under a directional and an ambient light,
//! viewed through an orbit camera with damped mouse, wheel and pinch controls.
//! Built on wgpu and winit.

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod gfx;
pub mod session;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::SheetViewerApp;
pub use config::ViewerConfig;
pub use error::{FrameError, ViewerError};
pub use session::{FrameOutcome, Session};
