// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Materials, render target textures and the global uniform bindings.

pub mod global_bindings;
pub mod material;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, GlobalUBOContent};
pub use material::{Material, MaterialUniform};
pub use texture_resource::TextureResource;
