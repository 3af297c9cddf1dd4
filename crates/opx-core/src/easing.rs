/// Easing curves used by band tables and timed transitions.
///
/// Every curve maps 0 to 0 and 1 to 1 and is monotonic on \[0, 1\]; input is
/// clamped first so callers can pass raw fractions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    /// Hermite smoothstep, `3t² - 2t³`.
    Smooth,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::Smooth => t * t * (3.0 - 2.0 * t),
        }
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Position of `p` inside `[start, end]` as a clamped fraction.
///
/// A zero-width (or inverted) range acts as a step at `start`.
#[inline]
pub fn band_fraction(p: f32, start: f32, end: f32) -> f32 {
    let width = end - start;
    if width.is_nan() || width <= f32::EPSILON {
        return if p >= start { 1.0 } else { 0.0 };
    }
    ((p - start) / width).clamp(0.0, 1.0)
}

/// Fraction of a timed transition that has elapsed; a zero duration is done.
#[inline]
pub fn timed_fraction(elapsed_sec: f32, duration_sec: f32) -> f32 {
    if duration_sec.is_nan() || duration_sec <= 0.0 {
        return 1.0;
    }
    (elapsed_sec / duration_sec).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 8] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::Smooth,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for e in ALL {
            assert!(e.apply(0.0).abs() < 1e-6, "{e:?} at 0");
            assert!((e.apply(1.0) - 1.0).abs() < 1e-6, "{e:?} at 1");
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for e in ALL {
            let mut prev = e.apply(0.0);
            for i in 1..=200 {
                let v = e.apply(i as f32 / 200.0);
                assert!(v + 1e-6 >= prev, "{e:?} decreased at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn in_out_curves_are_symmetric_at_midpoint() {
        assert!((Easing::QuadInOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((Easing::CubicInOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((Easing::Smooth.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn band_fraction_guards_degenerate_range() {
        assert!((band_fraction(0.3, 0.2, 0.4) - 0.5).abs() < 1e-5);
        assert_eq!(band_fraction(0.1, 0.2, 0.4), 0.0);
        assert_eq!(band_fraction(0.9, 0.2, 0.4), 1.0);
        assert_eq!(band_fraction(0.5, 0.5, 0.5), 1.0);
        assert_eq!(band_fraction(0.4, 0.5, 0.5), 0.0);
    }

    #[test]
    fn zero_duration_transition_is_complete() {
        assert_eq!(timed_fraction(0.0, 0.0), 1.0);
        assert_eq!(timed_fraction(1.0, 2.0), 0.5);
        assert_eq!(timed_fraction(5.0, 2.0), 1.0);
    }

    #[test]
    fn input_outside_unit_range_is_clamped() {
        assert_eq!(Easing::CubicOut.apply(-3.0), 0.0);
        assert_eq!(Easing::CubicOut.apply(7.0), 1.0);
        assert_eq!(Easing::QuadIn.apply(f32::NAN), 0.0);
    }
}
