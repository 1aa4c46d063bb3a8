//! Error types
//!
//! Construction of the window and GPU context can fail; the frame loop can
//! hit surface errors. Everything else in the viewer is infallible.

use thiserror::Error;

/// Failures while setting up the viewer or acquiring graphics resources
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("output surface unavailable: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("graphics device unavailable: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("output surface reports no supported formats")]
    SurfaceUnsupported,

    #[error("failed to build render pipelines: {}", .0.join("; "))]
    Pipeline(Vec<String>),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Failures while producing a single frame
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("failed to acquire surface texture: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

impl FrameError {
    /// Whether the loop can carry on with the next frame
    pub fn is_recoverable(&self) -> bool {
        match self {
            FrameError::Surface(err) => matches!(
                err,
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Timeout
            ),
        }
    }

    /// Whether the surface must be reconfigured before the next frame
    pub fn needs_reconfigure(&self) -> bool {
        match self {
            FrameError::Surface(err) => {
                matches!(err, wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)
            }
        }
    }
}
