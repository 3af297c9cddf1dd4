//! Transient smoothing terms.
//!
//! These are the only pieces of state animators carry between frames.

use glam::{Vec2, Vec3};

use crate::constants::{TILT_DAMPING, TILT_PITCH_PER_POINTER_Y, TILT_ROLL_PER_POINTER_X};

/// `current += (target - current) * k` with `k` clamped to \[0, 1\].
#[inline]
pub fn approach(current: f32, target: f32, k: f32) -> f32 {
    current + (target - current) * k.clamp(0.0, 1.0)
}

#[inline]
pub fn approach_vec3(current: Vec3, target: Vec3, k: f32) -> Vec3 {
    current + (target - current) * k.clamp(0.0, 1.0)
}

/// Frame-rate aware follow: `k = rate * dt`, clamped so a long frame never
/// overshoots the target.
#[inline]
pub fn follow(current: Vec3, target: Vec3, rate_per_sec: f32, dt_sec: f32) -> Vec3 {
    let dt = if dt_sec.is_finite() { dt_sec.max(0.0) } else { 0.0 };
    approach_vec3(current, target, rate_per_sec * dt)
}

/// Small rotational offset that follows the pointer.
///
/// Pointer coordinates are NDC (x right, y up, both in \[-1, 1\]). The output
/// is an XYZ Euler rotation with pitch on X and roll on Z.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerTilt {
    pitch: f32,
    roll: f32,
}

impl PointerTilt {
    pub fn rotation(&self) -> Vec3 {
        Vec3::new(self.pitch, 0.0, self.roll)
    }

    /// Advance one frame. With `enabled == false` (reduced motion) the tilt
    /// relaxes back to rest instead of following the pointer.
    pub fn update(&mut self, pointer_ndc: Option<Vec2>, enabled: bool) -> Vec3 {
        let target = match pointer_ndc {
            Some(p) if enabled => p.clamp(Vec2::splat(-1.0), Vec2::splat(1.0)),
            _ => Vec2::ZERO,
        };
        self.roll = approach(self.roll, target.x * TILT_ROLL_PER_POINTER_X, TILT_DAMPING);
        self.pitch = approach(self.pitch, target.y * TILT_PITCH_PER_POINTER_Y, TILT_DAMPING);
        self.rotation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approach_converges_without_overshoot() {
        let mut v = 0.0;
        for _ in 0..200 {
            v = approach(v, 1.0, 0.1);
            assert!(v <= 1.0);
        }
        assert!((v - 1.0).abs() < 1e-4);
    }

    #[test]
    fn follow_clamps_long_frames() {
        let v = follow(Vec3::ZERO, Vec3::X, 2.0, 5.0);
        assert_eq!(v, Vec3::X);
        let still = follow(Vec3::ZERO, Vec3::X, 2.0, f32::NAN);
        assert_eq!(still, Vec3::ZERO);
    }

    #[test]
    fn tilt_tracks_pointer_and_relaxes() {
        let mut tilt = PointerTilt::default();
        for _ in 0..100 {
            tilt.update(Some(Vec2::new(1.0, -1.0)), true);
        }
        let r = tilt.rotation();
        assert!((r.z - TILT_ROLL_PER_POINTER_X).abs() < 1e-3);
        assert!((r.x + TILT_PITCH_PER_POINTER_Y).abs() < 1e-3);

        for _ in 0..200 {
            tilt.update(Some(Vec2::new(1.0, -1.0)), false);
        }
        assert!(tilt.rotation().length() < 1e-4);
    }
}
