/// Window viewport in physical pixels.
///
/// The HUD's normalized units are defined against this: a normalized extent
/// of `1.0` spans the full width (or height) of the viewport. Aspect-ratio
/// size constraints use [`aspect_ratio`](Viewport::aspect_ratio) to convert
/// an extent between axes without distortion.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width over height.
    #[inline]
    pub fn aspect_ratio(self) -> f32 {
        if self.height > 0.0 { self.width / self.height } else { 1.0 }
    }

    /// Converts a pixel count on the given axis extent to normalized units.
    #[inline]
    pub fn pixels_to_normalized(self, pixels: f32, horizontal: bool) -> f32 {
        let extent = if horizontal { self.width } else { self.height };
        if extent > 0.0 { pixels / extent } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_wide() {
        assert_eq!(Viewport::new(1920.0, 1080.0).aspect_ratio(), 1920.0 / 1080.0);
    }

    #[test]
    fn aspect_ratio_degenerate_height() {
        assert_eq!(Viewport::new(100.0, 0.0).aspect_ratio(), 1.0);
    }

    #[test]
    fn pixels_to_normalized_both_axes() {
        let vp = Viewport::new(800.0, 400.0);
        assert_eq!(vp.pixels_to_normalized(80.0, true), 0.1);
        assert_eq!(vp.pixels_to_normalized(80.0, false), 0.2);
    }

    #[test]
    fn pixels_to_normalized_invalid_viewport() {
        assert_eq!(Viewport::default().pixels_to_normalized(10.0, true), 0.0);
    }
}
