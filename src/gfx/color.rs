//! sRGB hex colors and their linear-space equivalents
//!
//! Colors are authored as sRGB hex values (`0x2E9DD1`) and converted to
//! linear RGB before they reach a shader, since lighting is computed in
//! linear space and the surface format re-encodes to sRGB on write.

/// Linear RGB color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Converts a `0xRRGGBB` sRGB value to linear RGB
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xFF) as f32 / 255.0);
        Self {
            r: channel(16),
            g: channel(8),
            b: channel(0),
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: 1.0,
        }
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.0773993808
    } else {
        (c * 0.9478672986 + 0.0521327014).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extremes_are_preserved() {
        assert_eq!(Color::from_hex(0x000000), Color::BLACK);
        let white = Color::from_hex(0xFFFFFF);
        assert!((white.r - 1.0).abs() < 1e-6);
        assert!((white.g - 1.0).abs() < 1e-6);
        assert!((white.b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_mid_gray_is_darker_in_linear_space() {
        let gray = Color::from_hex(0x808080);
        assert!((gray.r - 0.2158605).abs() < 1e-4);
        assert_eq!(gray.r, gray.g);
        assert_eq!(gray.g, gray.b);
    }

    #[test]
    fn test_channel_order() {
        let red = Color::from_hex(0xFF0000);
        assert!(red.r > 0.99);
        assert_eq!(red.g, 0.0);
        assert_eq!(red.b, 0.0);

        let sheet = Color::from_hex(0x2E9DD1);
        assert!(sheet.b > sheet.g && sheet.g > sheet.r);
    }
}
