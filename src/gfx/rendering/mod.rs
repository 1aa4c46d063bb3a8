//! Core rendering functionality
//!
//! Handles render pipelines, GPU resource management, and frame rendering.
//! The session talks to the GPU only through [`FrameRenderer`], so the frame
//! loop can be driven by a recording renderer in tests.

pub mod object_resources;
pub mod pipeline_manager;
pub mod render_engine;

// Re-export main types
pub use object_resources::ObjectGpuResources;
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;

use crate::{
    error::FrameError,
    gfx::{scene::Scene, viewport::Viewport},
};

/// What a render session needs from the graphics backend
pub trait FrameRenderer {
    /// Allocates GPU resources for the scene's objects
    fn prepare(&mut self, scene: &Scene);

    /// Matches the output surface to a new viewport
    fn resize(&mut self, viewport: Viewport);

    /// Reapplies the current surface configuration after a lost surface
    fn reconfigure(&mut self);

    /// Surface size in logical pixels
    fn surface_size(&self) -> (u32, u32);

    fn pixel_ratio(&self) -> f64;

    /// Draws and presents one frame
    fn render(&mut self, scene: &Scene) -> Result<(), FrameError>;

    /// Frees every GPU resource. Further calls are no-ops.
    fn release(&mut self);

    fn is_released(&self) -> bool;
}
