//! Viewer configuration
//!
//! Every tunable of the viewer lives here, grouped by the component that
//! consumes it. Defaults reproduce the stock scene: a `1 x 15 x 15` sheet
//! spinning at 0.01 rad per frame, seen from 20 units away with damped
//! orbit controls.
//!
//! Configuration can be loaded from a JSON file; missing fields fall back to
//! their defaults.
//!
//! ```no_run
//! use sheet_viewer::config::ViewerConfig;
//!
//! let config = ViewerConfig::from_json_file("viewer.json").unwrap();
//! assert!(config.controls.damping_factor > 0.0);
//! ```

use std::{
    f64::consts::{FRAC_PI_2, PI},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::error::ViewerError;

/// Top-level viewer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub sheet: SheetConfig,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub controls: ControlsConfig,
    pub renderer: RendererConfig,
}

impl ViewerConfig {
    /// Parses and validates a configuration from a JSON string
    pub fn from_json_str(source: &str) -> Result<Self, ViewerError> {
        let config: Self =
            serde_json::from_str(source).map_err(|err| ViewerError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ViewerError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|err| ViewerError::Config(format!("{}: {}", path.display(), err)))?;
        Self::from_json_str(&source)
    }

    /// Rejects values that would produce a degenerate projection, a camera
    /// that cannot move, or an empty window
    pub fn validate(&self) -> Result<(), ViewerError> {
        let window = &self.window;
        ensure(
            window.width > 0 && window.height > 0,
            format!("window size {}x{} must be non-zero", window.width, window.height),
        )?;

        let camera = &self.camera;
        ensure(
            camera.fov_degrees.is_finite() && camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0,
            format!("camera.fov_degrees {} must lie in (0, 180)", camera.fov_degrees),
        )?;
        ensure(
            camera.near.is_finite() && camera.near > 0.0,
            format!("camera.near {} must be positive", camera.near),
        )?;
        ensure(
            camera.far.is_finite() && camera.far > camera.near,
            format!("camera.far {} must exceed camera.near {}", camera.far, camera.near),
        )?;
        ensure(
            camera.distance.is_finite() && camera.distance > 0.0,
            format!("camera.distance {} must be positive", camera.distance),
        )?;

        let sheet = &self.sheet;
        ensure(
            sheet.size.iter().all(|extent| extent.is_finite() && *extent > 0.0),
            format!("sheet.size {:?} must be positive on every axis", sheet.size),
        )?;
        ensure(
            sheet.shininess.is_finite() && sheet.shininess >= 0.0,
            format!("sheet.shininess {} must not be negative", sheet.shininess),
        )?;
        ensure(
            sheet.initial_rotation.is_finite(),
            "sheet.initial_rotation must be finite".to_string(),
        )?;
        ensure(
            sheet.rotation_step.is_finite() && sheet.rotation_step.abs() < PI,
            format!(
                "sheet.rotation_step {} must be less than half a turn",
                sheet.rotation_step
            ),
        )?;

        let controls = &self.controls;
        ensure(
            controls.damping_factor > 0.0 && controls.damping_factor <= 1.0,
            format!(
                "controls.damping_factor {} must lie in (0, 1]",
                controls.damping_factor
            ),
        )?;
        for (name, speed) in [
            ("rotate_speed", controls.rotate_speed),
            ("zoom_speed", controls.zoom_speed),
            ("pan_speed", controls.pan_speed),
        ] {
            ensure(
                speed.is_finite() && speed >= 0.0,
                format!("controls.{} {} must not be negative", name, speed),
            )?;
        }
        if let Some(min) = controls.min_distance {
            ensure(
                min.is_finite() && min > 0.0,
                format!("controls.min_distance {} must be positive", min),
            )?;
        }
        if let (Some(min), Some(max)) = (controls.min_distance, controls.max_distance) {
            ensure(
                max >= min,
                format!("controls.max_distance {} is below min_distance {}", max, min),
            )?;
        }

        Ok(())
    }
}

fn ensure(condition: bool, message: String) -> Result<(), ViewerError> {
    if condition {
        Ok(())
    } else {
        Err(ViewerError::Config(message))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Initial logical width in pixels
    pub width: u32,
    /// Initial logical height in pixels
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Sheet Viewer".to_string(),
            width: 1200,
            height: 800,
        }
    }
}

/// Geometry, material and motion of the sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Box extents along x, y, z. The thin x extent makes the box a sheet.
    pub size: [f32; 3],
    /// Base color as an sRGB hex value
    pub color: u32,
    pub shininess: f32,
    /// Self-illumination color as an sRGB hex value
    pub emissive: u32,
    /// Rotation about the vertical axis at mount, radians
    pub initial_rotation: f64,
    /// Rotation added every frame, radians. Negative spins the other way.
    pub rotation_step: f64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            size: [1.0, 15.0, 15.0],
            color: 0x2E9DD1,
            shininess: 100.0,
            emissive: 0xBABABA,
            initial_rotation: FRAC_PI_2,
            rotation_step: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the sheet along +z
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            distance: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub directional_color: u32,
    pub directional_intensity: f32,
    pub directional_position: [f32; 3],
    pub ambient_color: u32,
    pub ambient_intensity: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            directional_color: 0xF2F2F2,
            directional_intensity: 10.0,
            directional_position: [5.0, 5.0, 0.0],
            ambient_color: 0xF2F2F2,
            ambient_intensity: 1.0,
        }
    }
}

/// Orbit control tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            enable_rotate: true,
            enable_zoom: true,
            enable_pan: true,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: None,
            max_distance: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Multisample anti-aliasing; falls back to no MSAA when unsupported
    pub antialias: bool,
    /// FIFO presentation paces the render loop to the display refresh
    pub vsync: bool,
    /// Clear color as an sRGB hex value
    pub clear_color: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            antialias: true,
            vsync: true,
            clear_color: 0x000000,
        }
    }
}
