//! Per-frame inputs and the camera description shared with the renderer.
//!
//! These types avoid platform APIs; the web front-end fills a [`FrameInput`]
//! from browser events and turns the [`Camera`] into matrices for the GPU.

use glam::{Mat4, Vec2, Vec3};

use crate::constants::{
    CAMERA_FOV_DESKTOP_DEG, CAMERA_FOV_MOBILE_DEG, CAMERA_INITIAL_Z, CAMERA_ZFAR, CAMERA_ZNEAR,
};
use crate::scroll::ScrollState;

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Camera at its load position, looking at the origin.
    pub fn initial(aspect: f32, mobile: bool) -> Self {
        let fov_deg = if mobile {
            CAMERA_FOV_MOBILE_DEG
        } else {
            CAMERA_FOV_DESKTOP_DEG
        };
        Self {
            eye: Vec3::new(0.0, 0.0, CAMERA_INITIAL_Z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: sanitize_aspect(aspect),
            fovy_radians: fov_deg.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space size of the view frustum on the plane through the target.
    pub fn visible_extent(&self) -> Vec2 {
        let distance = self.eye.distance(self.target).max(self.znear);
        let height = 2.0 * (self.fovy_radians * 0.5).tan() * distance;
        Vec2::new(height * self.aspect, height)
    }

    /// Camera right and up vectors in world space, used to billboard sprites.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let forward = (self.target - self.eye).normalize_or_zero();
        let right = forward.cross(self.up).normalize_or_zero();
        let up = right.cross(forward);
        (right, up)
    }
}

#[inline]
pub fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

/// Everything an animator may read for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub scroll: ScrollState,
    /// Seconds since the scene was created.
    pub elapsed_sec: f32,
    /// Latest pointer position in NDC, `None` before the first move.
    pub pointer_ndc: Option<Vec2>,
    /// Pointer positions (NDC) reported since the previous frame, oldest first.
    pub pointer_moves: Vec<Vec2>,
    pub aspect: f32,
    /// World-space width and height visible on the plane through the origin.
    /// Filled by the scene from the current camera before animators run.
    pub view_extent: Vec2,
    pub mobile: bool,
    pub reduced_motion: bool,
}

impl FrameInput {
    pub fn at(progress: f32, elapsed_sec: f32) -> Self {
        Self {
            scroll: ScrollState::new(progress, 0.0),
            elapsed_sec,
            aspect: 16.0 / 9.0,
            view_extent: Vec2::new(16.0, 9.0),
            ..Self::default()
        }
    }
}
