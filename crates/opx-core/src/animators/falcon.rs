//! A falcon circling the logo, drawn from its point-cloud model.
//!
//! There is no procedural stand-in: until the model arrives (or if it never
//! does) the falcon is simply not drawn.

use glam::{Mat4, Quat, Vec3};

use crate::assets::PointCloud;
use crate::constants::*;
use crate::state::FrameInput;

use super::{emit_cloud, Animator, CloudFrame, SceneFades, Sprite};

#[derive(Clone, Debug)]
pub struct FalconAnimator {
    cloud: Option<PointCloud>,
    fades: SceneFades,
}

impl Default for FalconAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl FalconAnimator {
    pub fn new() -> Self {
        Self {
            cloud: None,
            fades: SceneFades::new(),
        }
    }

    /// Install the decoded model, normalized to unit radius. Empty clouds are
    /// ignored.
    pub fn set_cloud(&mut self, cloud: &PointCloud, budget: usize) {
        if cloud.is_empty() {
            return;
        }
        self.cloud = Some(cloud.normalized().subsampled(budget));
    }

    pub fn has_model(&self) -> bool {
        self.cloud.is_some()
    }

    /// Position on the flight path at orbit angle `a`: a circle around the
    /// logo with a figure-eight bob.
    pub fn flight_path(a: f32) -> Vec3 {
        Vec3::new(
            a.cos() * FALCON_ORBIT_RADIUS,
            (a * 2.0).sin() * FALCON_BOB,
            a.sin() * FALCON_ORBIT_RADIUS,
        )
    }

    /// Body transform at orbit angle `a`, nose pointed along the path.
    pub fn model_at(a: f32) -> Mat4 {
        let here = Self::flight_path(a);
        let ahead = Self::flight_path(a + FALCON_LOOK_AHEAD);
        let heading = Vec3::new(ahead.x - here.x, 0.0, ahead.z - here.z);
        let yaw = heading.x.atan2(heading.z);
        Mat4::from_scale_rotation_translation(
            Vec3::splat(FALCON_RADIUS),
            Quat::from_rotation_y(yaw),
            here,
        )
    }

    pub fn emit(&self, frame: &CloudFrame, out: &mut Vec<Sprite>) {
        if let Some(cloud) = &self.cloud {
            emit_cloud(
                cloud,
                frame.model,
                FALCON_POINT_SIZE,
                Vec3::from(FALCON_COLOR),
                frame.opacity,
                out,
            );
        }
    }
}

impl Animator for FalconAnimator {
    type Output = CloudFrame;

    fn update(&mut self, input: &FrameInput) -> CloudFrame {
        if self.cloud.is_none() {
            return CloudFrame::HIDDEN;
        }
        let p = input.scroll.progress;
        let speed = if input.reduced_motion {
            FALCON_SPEED_REDUCED
        } else {
            FALCON_SPEED
        };
        CloudFrame {
            model: Self::model_at(input.elapsed_sec * speed),
            opacity: self.fades.secondary(p),
            progress: p,
            elapsed_sec: input.elapsed_sec,
            animate: !input.reduced_motion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_until_model_arrives() {
        let mut falcon = FalconAnimator::new();
        let frame = falcon.update(&FrameInput::at(1.0, 2.0));
        assert!(!frame.visible());
        let mut out = Vec::new();
        falcon.emit(&frame, &mut out);
        assert!(out.is_empty());

        falcon.set_cloud(&PointCloud::new(vec![Vec3::X, -Vec3::X]), 100);
        let frame = falcon.update(&FrameInput::at(1.0, 2.0));
        assert!(frame.visible());
        falcon.emit(&frame, &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn orbits_at_fixed_radius() {
        for i in 0..16 {
            let pos = FalconAnimator::flight_path(i as f32 * 0.4);
            assert!((pos.x.hypot(pos.z) - FALCON_ORBIT_RADIUS).abs() < 1e-4);
            assert!(pos.y.abs() <= FALCON_BOB + 1e-5);
        }
    }

    #[test]
    fn nose_points_along_the_path() {
        let a = 0.7;
        let nose = FalconAnimator::model_at(a).transform_vector3(Vec3::Z).normalize();
        let travel = (FalconAnimator::flight_path(a + 0.01) - FalconAnimator::flight_path(a))
            * Vec3::new(1.0, 0.0, 1.0);
        assert!(nose.dot(travel.normalize()) > 0.99);
    }

    #[test]
    fn fades_in_with_secondary_elements() {
        let mut falcon = FalconAnimator::new();
        falcon.set_cloud(&PointCloud::new(vec![Vec3::Y]), 10);
        assert!(!falcon.update(&FrameInput::at(0.3, 0.0)).visible());
        assert_eq!(falcon.update(&FrameInput::at(0.7, 0.0)).opacity, 1.0);
    }
}
