//! # Scene Management Module
//!
//! The scene graph of the viewer: one sheet object, two lights and the
//! orbiting camera. Everything here is CPU-side data; the renderer owns the
//! matching GPU buffers.
//!
//! ```no_run
//! use sheet_viewer::config::ViewerConfig;
//! use sheet_viewer::gfx::{scene::Scene, viewport::Viewport};
//!
//! let scene = Scene::build(&ViewerConfig::default(), Viewport::new(800, 600, 1.0));
//! assert_eq!(scene.light_count(), 2);
//! ```

pub mod lights;
pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use lights::{AmbientLight, DirectionalLight, SceneLights};
pub use object::{Object, TransformUniform};
pub use scene::{build_sheet, Scene, SceneStatistics};
pub use vertex::Vertex3D;
