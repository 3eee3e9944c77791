//! Debug colours used for on-screen state visualisation.

/// Linear RGBA colour reported by states for diagnostic rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl DebugColor {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const GRAY: Self = Self::rgb(0.5, 0.5, 0.5);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Self = Self::rgb(1.0, 0.92, 0.016);
    pub const CYAN: Self = Self::rgb(0.0, 1.0, 1.0);
    pub const MAGENTA: Self = Self::rgb(1.0, 0.0, 1.0);

    /// Colour reported when no state is active.
    pub const DEFAULT: Self = Self::WHITE;

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Packs the colour into `0xRRGGBBAA`.
    pub fn to_rgba8(self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 24) | (channel(self.g) << 16) | (channel(self.b) << 8) | channel(self.a)
    }
}

impl Default for DebugColor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_channels_in_rgba_order() {
        assert_eq!(DebugColor::RED.to_rgba8(), 0xFF0000FF);
        assert_eq!(DebugColor::rgba(0.0, 0.0, 1.0, 0.0).to_rgba8(), 0x0000FF00);
    }

    #[test]
    fn default_is_white() {
        assert_eq!(DebugColor::default(), DebugColor::WHITE);
    }
}
