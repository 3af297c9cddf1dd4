use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::band::Interpolate;

/// Below this opacity an entity is treated as hidden.
pub const VISIBLE_OPACITY_EPSILON: f32 = 1e-3;

/// Transform plus opacity for one animated entity.
///
/// `rotation` holds XYZ Euler angles in radians so that bands can tween
/// individual axes (e.g. a full turn about Y) without quaternion wrapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub opacity: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
        opacity: 1.0,
    };

    /// Fully transparent identity, used for entities that are not shown.
    pub const HIDDEN: Pose = Pose {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
        opacity: 0.0,
    };

    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn with_uniform_scale(mut self, s: f32) -> Self {
        self.scale = Vec3::splat(s);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    #[inline]
    pub fn visible(&self) -> bool {
        self.opacity > VISIBLE_OPACITY_EPSILON
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }
}

impl Interpolate for Pose {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        Pose {
            position: self.position.lerp(to.position, t),
            rotation: self.rotation.lerp(to.rotation, t),
            scale: self.scale.lerp(to.scale, t),
            opacity: self.opacity + (to.opacity - self.opacity) * t,
        }
    }

    fn distance(&self, other: &Self) -> f32 {
        self.position
            .distance(other.position)
            .max(self.rotation.distance(other.rotation))
            .max(self.scale.distance(other.scale))
            .max((self.opacity - other.opacity).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_matrix() {
        assert_eq!(Pose::IDENTITY.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn matrix_applies_scale_then_translation() {
        let pose = Pose::at(Vec3::new(1.0, 2.0, 3.0)).with_uniform_scale(2.0);
        let p = pose.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(3.0, 2.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn lerp_midpoint() {
        let a = Pose::HIDDEN;
        let b = Pose::at(Vec3::new(2.0, 0.0, 0.0)).with_uniform_scale(3.0);
        let m = a.lerp(&b, 0.5);
        assert_eq!(m.position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(m.scale, Vec3::splat(2.0));
        assert_eq!(m.opacity, 0.5);
        assert!(m.visible());
        assert!(!Pose::HIDDEN.visible());
    }
}
