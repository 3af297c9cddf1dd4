use glam::Vec3;

use crate::band::{Band, BandTable, BandTableError};
use crate::constants::*;
use crate::smoothing::follow;
use crate::state::{sanitize_aspect, Camera, FrameInput};

use super::{Animator, FrameClock};

/// Dolly along Z: slow creep while the logo leaves, a push in through the
/// middle of the page, then a pull back for the content panels.
pub fn dolly_table() -> Result<BandTable<f32>, BandTableError> {
    BandTable::new([
        Band::new(
            0.0,
            CAMERA_HOLD_END,
            CAMERA_HOLD_EASING,
            CAMERA_START_Z,
            CAMERA_HOLD_Z,
        ),
        Band::new(
            CAMERA_HOLD_END,
            CAMERA_PUSH_END,
            CAMERA_PUSH_EASING,
            CAMERA_HOLD_Z,
            CAMERA_PUSH_Z,
        ),
        Band::new(
            CAMERA_PUSH_END,
            1.0,
            CAMERA_PULL_EASING,
            CAMERA_PUSH_Z,
            CAMERA_PULL_Z,
        ),
    ])
}

#[derive(Clone, Debug)]
pub struct CameraAnimator {
    dolly: BandTable<f32>,
    camera: Camera,
    clock: FrameClock,
}

impl CameraAnimator {
    pub fn new(aspect: f32, mobile: bool) -> Result<Self, BandTableError> {
        Ok(Self {
            dolly: dolly_table()?,
            camera: Camera::initial(aspect, mobile),
            clock: FrameClock::default(),
        })
    }

    pub fn target_z(&self, progress: f32) -> f32 {
        self.dolly.sample(progress)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }
}

impl Animator for CameraAnimator {
    type Output = Camera;

    fn update(&mut self, input: &FrameInput) -> Camera {
        let dt = self.clock.tick(input.elapsed_sec);
        let target = Vec3::new(0.0, 0.0, self.target_z(input.scroll.progress));
        self.camera.eye = follow(self.camera.eye, target, CAMERA_FOLLOW_RATE, dt);
        self.camera.target = Vec3::ZERO;
        self.camera.aspect = sanitize_aspect(input.aspect);
        let fov = if input.mobile {
            CAMERA_FOV_MOBILE_DEG
        } else {
            CAMERA_FOV_DESKTOP_DEG
        };
        self.camera.fovy_radians = fov.to_radians();
        self.camera.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dolly_is_continuous() {
        let t = dolly_table().unwrap();
        assert!(t.discontinuities(1e-5).is_empty());
        assert_eq!(t.sample(0.0), CAMERA_START_Z);
        assert!((t.sample(CAMERA_HOLD_END) - CAMERA_HOLD_Z).abs() < 1e-5);
        assert!((t.sample(CAMERA_PUSH_END) - CAMERA_PUSH_Z).abs() < 1e-5);
        assert_eq!(t.sample(1.0), CAMERA_PULL_Z);
    }

    #[test]
    fn follows_target_over_time() {
        let mut cam = CameraAnimator::new(1.5, false).unwrap();
        let mut input = FrameInput::at(0.0, 0.0);
        let first = cam.update(&input);
        assert_eq!(first.eye.z, CAMERA_INITIAL_Z);
        for i in 1..=600 {
            input.elapsed_sec = i as f32 / 60.0;
            cam.update(&input);
        }
        assert!((cam.camera().eye.z - CAMERA_START_Z).abs() < 1e-3);
    }

    #[test]
    fn repeated_frame_is_idempotent() {
        let mut cam = CameraAnimator::new(1.5, false).unwrap();
        let mut input = FrameInput::at(0.9, 0.0);
        cam.update(&input);
        input.elapsed_sec = 0.5;
        let a = cam.update(&input);
        let b = cam.update(&input);
        assert_eq!(a, b);
    }
}
