//! Closing logo assembly over the last stretch of the page.
//!
//! All bands here run on the local fraction of `[ASSEMBLY_START,
//! ASSEMBLY_END]`. O rises from below while spinning into view, then slides
//! to its slot as P and X fly in from the left. The finished mark then turns
//! a little about Y.

use glam::Vec3;

use crate::band::{Band, BandTable, Interpolate};
use crate::constants::*;
use crate::easing::{band_fraction, Easing};
use crate::pose::Pose;
use crate::smoothing::PointerTilt;
use crate::state::FrameInput;

use super::logo::{LogoFrame, LogoPiece, GLYPHS};
use super::{fade_in, hover, Animator, FrameClock};

/// Where P and X wait just outside the left edge of the view.
pub fn left_edge_x(view_width: f32) -> f32 {
    -view_width * 0.5 - LOGO_EDGE_MARGIN
}

#[derive(Clone, Debug)]
pub struct AssemblyAnimator {
    o_rise: BandTable<f32>,
    o_slide: BandTable<f32>,
    p_arrive: BandTable<f32>,
    x_arrive: BandTable<f32>,
    turn: BandTable<f32>,
    tilt: PointerTilt,
    clock: FrameClock,
}

impl Default for AssemblyAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl AssemblyAnimator {
    pub fn new() -> Self {
        Self {
            o_rise: fade_in(0.0, ASSEMBLY_O_APPEAR_END, ASSEMBLY_EASING),
            o_slide: fade_in(ASSEMBLY_P_APPEAR_START, ASSEMBLY_X_APPEAR_END, ASSEMBLY_EASING),
            p_arrive: fade_in(ASSEMBLY_P_APPEAR_START, ASSEMBLY_P_APPEAR_END, ASSEMBLY_EASING),
            x_arrive: fade_in(ASSEMBLY_X_APPEAR_START, ASSEMBLY_X_APPEAR_END, ASSEMBLY_EASING),
            turn: BandTable::from_band(Band::new(
                ASSEMBLY_TURN_START,
                1.0,
                Easing::Linear,
                0.0,
                ASSEMBLY_TURN_RADIANS,
            )),
            tilt: PointerTilt::default(),
            clock: FrameClock::default(),
        }
    }

    /// Fraction of the assembly range reached at page progress `p`.
    pub fn local(progress: f32) -> f32 {
        band_fraction(progress, ASSEMBLY_START, ASSEMBLY_END)
    }

    /// Pose of each letter at page progress `p`, before the group transform.
    /// Fully transparent below the assembly range.
    pub fn poses(&self, progress: f32, left_x: f32) -> [Pose; 3] {
        if progress < ASSEMBLY_START {
            return [Pose::HIDDEN; 3];
        }
        let f = Self::local(progress);
        let turn = Vec3::new(0.0, self.turn.sample(f), 0.0);

        // One full turn while rising, ending square to the camera.
        let rise = self.o_rise.sample(f);
        let risen = Pose::at(ASSEMBLY_O_RISE_FROM)
            .with_uniform_scale(0.0)
            .with_opacity(0.0)
            .with_rotation(Vec3::new(0.0, -std::f32::consts::TAU, 0.0))
            .lerp(&Pose::IDENTITY, rise);
        let o = Pose {
            position: Vec3::ZERO.lerp(ASSEMBLY_O_SLOT, self.o_slide.sample(f)) + risen.position,
            rotation: risen.rotation + turn,
            ..risen
        };

        let arrive = |slot: Vec3, fraction: f32| {
            let mut pose = Pose::at(Vec3::new(left_x, 0.0, 0.0))
                .with_uniform_scale(ASSEMBLY_ARRIVAL_SCALE)
                .with_opacity(0.0)
                .lerp(&Pose::at(slot), fraction);
            pose.rotation = turn;
            pose
        };
        [
            o,
            arrive(ASSEMBLY_P_SLOT, self.p_arrive.sample(f)),
            arrive(ASSEMBLY_X_SLOT, self.x_arrive.sample(f)),
        ]
    }
}

impl Animator for AssemblyAnimator {
    type Output = LogoFrame;

    fn update(&mut self, input: &FrameInput) -> LogoFrame {
        let poses = self.poses(input.scroll.progress, left_edge_x(input.view_extent.x));
        let tilt = if self.clock.tick(input.elapsed_sec) > 0.0 {
            self.tilt.update(input.pointer_ndc, !input.reduced_motion)
        } else {
            self.tilt.rotation()
        };
        let (offset, wobble) = hover(input.elapsed_sec, input.reduced_motion);
        LogoFrame {
            group: Pose::at(offset).with_rotation(wobble + tilt),
            pieces: [0, 1, 2].map(|i| LogoPiece {
                glyph: GLYPHS[i],
                pose: poses[i],
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Glyph;

    const LEFT: f32 = -10.0;

    #[test]
    fn hidden_before_range() {
        let a = AssemblyAnimator::new();
        for p in [0.0, 0.5, 0.94] {
            assert!(a.poses(p, LEFT).iter().all(|pose| !pose.visible()));
        }
    }

    #[test]
    fn o_rises_first_then_p_then_x() {
        let a = AssemblyAnimator::new();
        let at_local = |f: f32| a.poses(ASSEMBLY_START + f * (ASSEMBLY_END - ASSEMBLY_START), LEFT);

        let early = at_local(0.1);
        assert!(early[0].visible());
        assert!(!early[1].visible() && !early[2].visible());

        let mid = at_local(0.3);
        assert!(mid[1].visible());
        assert!(!mid[2].visible());

        let late = at_local(0.5);
        assert!(late[2].visible());
    }

    #[test]
    fn terminal_pose_is_assembled_and_turned() {
        let mut a = AssemblyAnimator::new();
        let frame = a.update(&FrameInput {
            reduced_motion: true,
            ..FrameInput::at(1.0, 30.0)
        });
        let o = frame.piece(Glyph::O).pose;
        let p = frame.piece(Glyph::P).pose;
        let x = frame.piece(Glyph::X).pose;
        assert!((o.position - ASSEMBLY_O_SLOT).length() < 1e-4);
        assert!((p.position - ASSEMBLY_P_SLOT).length() < 1e-4);
        assert!((x.position - ASSEMBLY_X_SLOT).length() < 1e-4);
        for pose in [o, p, x] {
            assert!((pose.opacity - 1.0).abs() < 1e-6);
            assert!((pose.rotation.y - ASSEMBLY_TURN_RADIANS).abs() < 1e-5);
        }
    }

    #[test]
    fn o_spin_is_continuous_into_the_turn() {
        let a = AssemblyAnimator::new();
        let before = a.poses(ASSEMBLY_START + 0.0299, LEFT)[0].rotation.y;
        let after = a.poses(ASSEMBLY_START + 0.0301, LEFT)[0].rotation.y;
        assert!((before - after).abs() < 1e-2);
    }
}
