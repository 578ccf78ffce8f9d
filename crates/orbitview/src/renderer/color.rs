/// 8-bit RGB color, packed into ARGB32 pixels on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_array(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }

    /// Scale by `intensity` (clamped to 0..=1) and pack as `0xAARRGGBB`.
    /// Alpha is always 255.
    #[inline]
    pub fn to_argb(self, intensity: f32) -> u32 {
        let k = if intensity.is_nan() { 0.0 } else { intensity.clamp(0.0, 1.0) };
        let scale = |c: u8| (c as f32 * k).round() as u32;
        0xFF00_0000 | (scale(self.r) << 16) | (scale(self.g) << 8) | scale(self.b)
    }

    /// Linear blend toward `other` (t clamped to 0..=1).
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_intensity_packs_channels() {
        let c = Color::new(0x12, 0x34, 0x56);
        assert_eq!(c.to_argb(1.0), 0xFF12_3456);
    }

    #[test]
    fn intensity_is_clamped() {
        let c = Color::new(200, 100, 50);
        assert_eq!(c.to_argb(3.0), c.to_argb(1.0));
        assert_eq!(c.to_argb(-1.0), 0xFF00_0000);
        assert_eq!(c.to_argb(f32::NAN), 0xFF00_0000);
    }

    #[test]
    fn half_intensity_rounds() {
        let c = Color::new(255, 101, 0);
        let px = c.to_argb(0.5);
        assert_eq!((px >> 16) & 0xFF, 128);
        assert_eq!((px >> 8) & 0xFF, 51);
        assert_eq!(px & 0xFF, 0);
        assert_eq!(px >> 24, 0xFF);
    }

    #[test]
    fn lerp_endpoints() {
        let a = Color::new(0, 0, 0);
        let b = Color::new(200, 100, 50);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Color::new(100, 50, 25));
    }
}
