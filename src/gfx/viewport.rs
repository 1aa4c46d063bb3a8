/// Size of the drawable area
///
/// `width`/`height` are logical pixels; `pixel_ratio` converts them to
/// physical pixels of the output surface (the window's scale factor).
/// A viewport taken from a window keeps the window's exact physical size,
/// so the surface always matches it even when the logical size is rounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
    physical_width: u32,
    physical_height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32, pixel_ratio: f64) -> Self {
        let pixel_ratio = sanitize_ratio(pixel_ratio);
        let scale = |v: u32| (v as f64 * pixel_ratio).round() as u32;
        Self {
            width,
            height,
            pixel_ratio,
            physical_width: scale(width),
            physical_height: scale(height),
        }
    }

    /// Builds a viewport from a physical window size and scale factor
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let pixel_ratio = sanitize_ratio(scale_factor);
        let logical = |v: u32| (v as f64 / pixel_ratio).round() as u32;
        Self {
            width: logical(width),
            height: logical(height),
            pixel_ratio,
            physical_width: width,
            physical_height: height,
        }
    }

    /// A minimized window reports a zero-sized viewport
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.physical_width == 0 || self.physical_height == 0
    }

    /// Width over height of the output surface
    pub fn aspect(&self) -> f32 {
        if self.physical_height == 0 {
            1.0
        } else {
            self.physical_width as f32 / self.physical_height as f32
        }
    }

    /// Output surface size in physical pixels, at least 1x1
    pub fn physical_size(&self) -> (u32, u32) {
        (self.physical_width.max(1), self.physical_height.max(1))
    }
}

fn sanitize_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect() {
        assert!((Viewport::new(800, 600, 1.0).aspect() - 4.0 / 3.0).abs() < 1e-6);
        assert_eq!(Viewport::new(800, 0, 1.0).aspect(), 1.0);
    }

    #[test]
    fn test_physical_round_trip_on_hidpi() {
        let viewport = Viewport::from_physical(2048, 1536, 2.0);
        assert_eq!((viewport.width, viewport.height), (1024, 768));
        assert_eq!(viewport.physical_size(), (2048, 1536));
    }

    #[test]
    fn test_invalid_ratio_falls_back_to_one() {
        let viewport = Viewport::new(640, 480, 0.0);
        assert_eq!(viewport.pixel_ratio, 1.0);
        assert_eq!(viewport.physical_size(), (640, 480));
    }

    #[test]
    fn test_fractional_scale_keeps_window_size() {
        for scale in [1.25, 1.5, 1.75] {
            for size in 990..1010 {
                let viewport = Viewport::from_physical(size, size + 7, scale);
                assert_eq!(viewport.physical_size(), (size, size + 7), "scale {}", scale);
            }
        }
    }

    #[test]
    fn test_aspect_follows_physical_size() {
        let viewport = Viewport::from_physical(1001, 1000, 1.5);
        assert!((viewport.aspect() - 1.001).abs() < 1e-6);
    }

    #[test]
    fn test_empty_viewport() {
        assert!(Viewport::new(0, 480, 1.0).is_empty());
        assert_eq!(Viewport::new(0, 0, 1.0).physical_size(), (1, 1));
    }
}
