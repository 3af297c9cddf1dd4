//! The opening O/P/X logo.
//!
//! On load the pieces glide in from the right edge. After that, scroll bands
//! send them back out one at a time: X first, then P, while O first slides
//! into P's slot and leaves last.

use glam::{Mat4, Vec3};

use crate::assets::{glyph_outline, Glyph, PointCloud};
use crate::band::{BandTable, Interpolate};
use crate::constants::*;
use crate::easing::timed_fraction;
use crate::pose::Pose;
use crate::smoothing::PointerTilt;
use crate::state::FrameInput;

use super::{emit_cloud, fade_in, hover, Animator, FrameClock, Sprite};

pub const GLYPHS: [Glyph; 3] = [Glyph::O, Glyph::P, Glyph::X];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogoPiece {
    pub glyph: Glyph,
    pub pose: Pose,
}

/// Group transform plus one pose per letter, in O, P, X order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogoFrame {
    pub group: Pose,
    pub pieces: [LogoPiece; 3],
}

impl LogoFrame {
    pub fn piece(&self, glyph: Glyph) -> &LogoPiece {
        match glyph {
            Glyph::O => &self.pieces[0],
            Glyph::P => &self.pieces[1],
            Glyph::X => &self.pieces[2],
        }
    }

    pub fn visible(&self) -> bool {
        self.group.visible() && self.pieces.iter().any(|p| p.pose.visible())
    }
}

/// Point clouds for the three letters. Start as procedural outlines and are
/// swapped for the real models as they arrive.
#[derive(Clone, Debug)]
pub struct LogoClouds {
    clouds: [PointCloud; 3],
}

impl Default for LogoClouds {
    fn default() -> Self {
        Self {
            clouds: GLYPHS.map(|g| glyph_outline(g, LOGO_GLYPH_SAMPLES)),
        }
    }
}

impl LogoClouds {
    pub fn get(&self, glyph: Glyph) -> &PointCloud {
        &self.clouds[glyph_index(glyph)]
    }

    /// Install a decoded model. Empty clouds keep the current outline.
    pub fn set(&mut self, glyph: Glyph, cloud: &PointCloud) {
        if cloud.is_empty() {
            return;
        }
        self.clouds[glyph_index(glyph)] = cloud.normalized().subsampled(LOGO_MAX_POINTS);
    }

    pub fn emit(&self, frame: &LogoFrame, out: &mut Vec<Sprite>) {
        let group = frame.group.matrix();
        let piece_scale = Mat4::from_scale(Vec3::splat(LOGO_PIECE_RADIUS));
        for piece in &frame.pieces {
            emit_cloud(
                self.get(piece.glyph),
                group * piece.pose.matrix() * piece_scale,
                LOGO_POINT_SIZE,
                Vec3::from(LOGO_COLOR),
                piece.pose.opacity * frame.group.opacity,
                out,
            );
        }
    }
}

fn glyph_index(glyph: Glyph) -> usize {
    match glyph {
        Glyph::O => 0,
        Glyph::P => 1,
        Glyph::X => 2,
    }
}

/// Where a piece parks just outside the right edge of the view.
pub fn right_edge_x(view_width: f32) -> f32 {
    view_width * 0.5 + LOGO_EDGE_MARGIN
}

#[derive(Clone, Debug)]
pub struct LogoAnimator {
    x_exit: BandTable<f32>,
    p_exit: BandTable<f32>,
    o_shift: BandTable<f32>,
    o_exit: BandTable<f32>,
    tilt: PointerTilt,
    clock: FrameClock,
    pub clouds: LogoClouds,
}

impl Default for LogoAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl LogoAnimator {
    pub fn new() -> Self {
        Self {
            x_exit: fade_in(LOGO_X_EXIT_START, LOGO_X_EXIT_END, LOGO_EXIT_EASING),
            p_exit: fade_in(LOGO_P_EXIT_START, LOGO_P_EXIT_END, LOGO_EXIT_EASING),
            o_shift: fade_in(LOGO_O_SHIFT_START, LOGO_O_SHIFT_END, LOGO_O_SHIFT_EASING),
            o_exit: fade_in(LOGO_O_EXIT_START, LOGO_O_EXIT_END, LOGO_EXIT_EASING),
            tilt: PointerTilt::default(),
            clock: FrameClock::default(),
            clouds: LogoClouds::default(),
        }
    }

    /// Scroll-driven pose of each piece, ignoring the load-time entry.
    pub fn scroll_poses(&self, progress: f32, edge_x: f32) -> [Pose; 3] {
        let leave = |slot: Vec3, fraction: f32| {
            let parked = Pose::at(Vec3::new(edge_x, slot.y, 0.0)).with_opacity(0.0);
            Pose::at(slot).lerp(&parked, fraction)
        };
        let o_slot = LOGO_O_SLOT.lerp(LOGO_P_SLOT, self.o_shift.sample(progress));
        [
            leave(o_slot, self.o_exit.sample(progress)),
            leave(LOGO_P_SLOT, self.p_exit.sample(progress)),
            leave(LOGO_X_SLOT, self.x_exit.sample(progress)),
        ]
    }

    /// Eased share of the load-time entry that has played.
    pub fn entry_fraction(&self, elapsed_sec: f32, reduced_motion: bool) -> f32 {
        if reduced_motion {
            return 1.0;
        }
        LOGO_ENTRY_EASING.apply(timed_fraction(elapsed_sec, LOGO_ENTRY_DURATION_SEC))
    }
}

impl Animator for LogoAnimator {
    type Output = LogoFrame;

    fn update(&mut self, input: &FrameInput) -> LogoFrame {
        let edge_x = right_edge_x(input.view_extent.x);
        let entry = self.entry_fraction(input.elapsed_sec, input.reduced_motion);
        let start =
            Pose::at(Vec3::new(edge_x, 0.0, 0.0)).with_uniform_scale(LOGO_ENTRY_START_SCALE);
        let poses = self
            .scroll_poses(input.scroll.progress, edge_x)
            .map(|settled| {
                if entry >= 1.0 {
                    settled
                } else {
                    start.lerp(&settled, entry)
                }
            });

        let tilt = if self.clock.tick(input.elapsed_sec) > 0.0 {
            self.tilt.update(input.pointer_ndc, !input.reduced_motion)
        } else {
            self.tilt.rotation()
        };
        let (offset, wobble) = hover(input.elapsed_sec, input.reduced_motion);
        let group = Pose::at(offset).with_rotation(wobble + tilt);

        LogoFrame {
            group,
            pieces: [0, 1, 2].map(|i| LogoPiece {
                glyph: GLYPHS[i],
                pose: poses[i],
            }),
        }
    }
}
