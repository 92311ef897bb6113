use nimbus_core::coords::Vec2;
use nimbus_core::paint::Color;

/// Value types an [`Animation`](super::Animation) can tween.
///
/// Arrival is judged along the direction of travel: sign-aware for scalars,
/// by remaining magnitude for vectors and colors, so overshoot from float
/// rounding snaps instead of oscillating.
pub trait Animate: Copy {
    /// The fixed per-frame delta for a tween of `duration` frames.
    /// `duration` is nonzero; zero-duration tweens snap without stepping.
    fn step_delta(start: Self, end: Self, duration: u32) -> Self;

    /// One step forward.
    fn advanced(self, delta: Self) -> Self;

    /// Would one more `delta` step from `self` reach or pass `end`?
    fn arrives(self, delta: Self, end: Self) -> bool;
}

impl Animate for f32 {
    #[inline]
    fn step_delta(start: Self, end: Self, duration: u32) -> Self {
        (end - start) / duration as f32
    }

    #[inline]
    fn advanced(self, delta: Self) -> Self {
        self + delta
    }

    #[inline]
    fn arrives(self, delta: Self, end: Self) -> bool {
        if delta >= 0.0 { self + delta >= end } else { self + delta <= end }
    }
}

impl Animate for Vec2 {
    #[inline]
    fn step_delta(start: Self, end: Self, duration: u32) -> Self {
        (end - start) / duration as f32
    }

    #[inline]
    fn advanced(self, delta: Self) -> Self {
        self + delta
    }

    #[inline]
    fn arrives(self, delta: Self, end: Self) -> bool {
        (end - self).length() <= delta.length()
    }
}

impl Animate for Color {
    fn step_delta(start: Self, end: Self, duration: u32) -> Self {
        let d = duration as f32;
        Color::from_premul(
            (end.r - start.r) / d,
            (end.g - start.g) / d,
            (end.b - start.b) / d,
            (end.a - start.a) / d,
        )
    }

    fn advanced(self, delta: Self) -> Self {
        Color::from_premul(self.r + delta.r, self.g + delta.g, self.b + delta.b, self.a + delta.a)
    }

    fn arrives(self, delta: Self, end: Self) -> bool {
        let remaining = (end.r - self.r).powi(2)
            + (end.g - self.g).powi(2)
            + (end.b - self.b).powi(2)
            + (end.a - self.a).powi(2);
        let step =
            delta.r.powi(2) + delta.g.powi(2) + delta.b.powi(2) + delta.a.powi(2);
        remaining <= step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_arrival_is_sign_aware() {
        // Travelling down: passing below the end counts as arrival.
        assert!(1.0f32.arrives(-0.6, 0.5));
        assert!(!1.0f32.arrives(-0.4, 0.5));
        // Travelling up.
        assert!(0.4f32.arrives(0.1, 0.5));
        assert!(!0.0f32.arrives(0.1, 0.5));
    }

    #[test]
    fn vector_arrival_uses_magnitude() {
        let here = Vec2::new(0.0, 0.0);
        let end = Vec2::new(3.0, 4.0); // distance 5
        assert!(here.arrives(Vec2::new(3.0, 4.0), end));
        assert!(!here.arrives(Vec2::new(0.3, 0.4), end));
    }
}
