//! # Graphics Module
//!
//! Everything the viewer draws and how it draws it.
//!
//! - **Camera System** ([`camera`]) - Orbit camera with damped controls
//! - **Geometry** ([`geometry`]) - Procedural box meshes
//! - **Rendering Pipeline** ([`rendering`]) - Blinn-Phong forward renderer
//! - **Scene Management** ([`scene`]) - The sheet, its lights and camera
//! - **Resource Management** ([`resources`]) - Materials, render targets and uniforms
//!
//! The scene is plain CPU data and can be built and animated without a GPU.
//! Only [`RenderEngine`] touches wgpu.

pub mod camera;
pub mod color;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod viewport;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use color::Color;
pub use rendering::{render_engine::RenderEngine, FrameRenderer};
pub use viewport::Viewport;
