//! Entity animators.
//!
//! Each animator maps a [`FrameInput`] to a value for one visual entity. The
//! only state an animator keeps between frames is its own smoothing terms,
//! and none of them touch another animator's entity.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::assets::PointCloud;
use crate::band::{Band, BandTable};
use crate::constants::{
    ATMOSPHERIC_FADE_END, ATMOSPHERIC_FADE_START, FLOAT_HEIGHT_INTENSITY,
    FLOAT_ROTATION_INTENSITY, FLOAT_SPEED, SECONDARY_FADE_END, SECONDARY_FADE_START,
};
use crate::easing::Easing;
use crate::state::FrameInput;

pub mod assembly;
pub mod camera;
pub mod falcon;
pub mod logo;
pub mod particles;
pub mod post;
pub mod text;
pub mod trail;

pub use assembly::AssemblyAnimator;
pub use camera::CameraAnimator;
pub use falcon::FalconAnimator;
pub use logo::LogoAnimator;
pub use particles::{GoldSwarm, Nebula, PalmCloud, StarField};
pub use post::{PostAnimator, PostParams};
pub use text::{BackdropStyle, PanelAnimation, PanelSpec, PanelStyle, TextAnimator};
pub use trail::TrailEmitter;

/// One frame of one entity.
pub trait Animator {
    type Output;

    /// Produce this frame's value. Calling twice with an identical input must
    /// give identical output.
    fn update(&mut self, input: &FrameInput) -> Self::Output;
}

/// A camera-facing quad. `size.x` runs along `angle` in the screen plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub position: Vec3,
    pub size: Vec2,
    pub angle: f32,
    /// Linear RGB (may exceed 1 for bloom) and alpha.
    pub color: Vec4,
}

impl Sprite {
    pub fn point(position: Vec3, size: f32, color: Vec3, alpha: f32) -> Self {
        Self {
            position,
            size: Vec2::splat(size),
            angle: 0.0,
            color: color.extend(alpha),
        }
    }
}

/// Push one sprite per cloud point transformed by `model`. Nothing is pushed
/// for an invisible entity.
pub fn emit_cloud(
    cloud: &PointCloud,
    model: Mat4,
    size: f32,
    color: Vec3,
    opacity: f32,
    out: &mut Vec<Sprite>,
) {
    if opacity <= crate::pose::VISIBLE_OPACITY_EPSILON {
        return;
    }
    out.extend(
        cloud
            .points
            .iter()
            .map(|p| Sprite::point(model.transform_point3(*p), size, color, opacity)),
    );
}

/// Per-frame transform and timing for a point-cloud entity. Per-point motion
/// is applied when the cloud is emitted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudFrame {
    pub model: Mat4,
    pub opacity: f32,
    pub progress: f32,
    pub elapsed_sec: f32,
    /// False under reduced motion; per-point idle motion is frozen.
    pub animate: bool,
}

impl CloudFrame {
    pub const HIDDEN: CloudFrame = CloudFrame {
        model: Mat4::IDENTITY,
        opacity: 0.0,
        progress: 0.0,
        elapsed_sec: 0.0,
        animate: false,
    };

    pub fn visible(&self) -> bool {
        self.opacity > crate::pose::VISIBLE_OPACITY_EPSILON
    }
}

/// Scene-wide fade-ins shared by several entities.
#[derive(Clone, Debug)]
pub struct SceneFades {
    atmospheric: BandTable<f32>,
    secondary: BandTable<f32>,
}

impl Default for SceneFades {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneFades {
    pub fn new() -> Self {
        Self {
            atmospheric: fade_in(ATMOSPHERIC_FADE_START, ATMOSPHERIC_FADE_END, Easing::Linear),
            secondary: fade_in(SECONDARY_FADE_START, SECONDARY_FADE_END, Easing::Linear),
        }
    }

    /// Opacity of the nebula.
    pub fn atmospheric(&self, p: f32) -> f32 {
        self.atmospheric.sample(p)
    }

    /// Opacity multiplier of the falcon and the palm cloud.
    pub fn secondary(&self, p: f32) -> f32 {
        self.secondary.sample(p)
    }
}

/// Gentle idle hover: a vertical bob plus a small wobble about all axes.
/// Returns `(offset, rotation)`; both are zero under reduced motion.
pub fn hover(elapsed_sec: f32, reduced_motion: bool) -> (Vec3, Vec3) {
    if reduced_motion {
        return (Vec3::ZERO, Vec3::ZERO);
    }
    let phase = elapsed_sec / 4.0 * FLOAT_SPEED;
    let rotation = Vec3::new(
        phase.cos() / 8.0,
        phase.sin() / 8.0,
        phase.sin() / 20.0,
    ) * FLOAT_ROTATION_INTENSITY;
    let offset = Vec3::new(0.0, phase.sin() / 10.0 * FLOAT_HEIGHT_INTENSITY, 0.0);
    (offset, rotation)
}

/// Elapsed-time bookkeeping for animators that integrate over time.
///
/// A repeated or earlier timestamp yields `dt == 0`, so replaying a frame is
/// a no-op.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameClock {
    last_sec: Option<f32>,
}

impl FrameClock {
    pub fn tick(&mut self, elapsed_sec: f32) -> f32 {
        if !elapsed_sec.is_finite() {
            return 0.0;
        }
        let dt = match self.last_sec {
            Some(last) => (elapsed_sec - last).max(0.0),
            None => 0.0,
        };
        if self.last_sec.map_or(true, |last| elapsed_sec > last) {
            self.last_sec = Some(elapsed_sec);
        }
        dt
    }
}

/// Single-band fade from 0 to 1 over `[start, end]`. Bounds are clamped into
/// \[0, 1\] and ordered, so the table is always valid.
pub fn fade_in(start: f32, end: f32, easing: Easing) -> BandTable<f32> {
    BandTable::from_band(Band::new(start, end, easing, 0.0, 1.0))
}

/// Single-band fade from 1 to 0 over `[start, end]`.
pub fn fade_out(start: f32, end: f32, easing: Easing) -> BandTable<f32> {
    BandTable::from_band(Band::new(start, end, easing, 1.0, 0.0))
}
