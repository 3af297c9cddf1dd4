//! Ambient point clouds: nebula, gold swarm, star field and the palm cloud.
//!
//! Layouts are drawn once from a seeded [`StdRng`], so a given seed always
//! produces the same scene. Everything after construction is a function of
//! the frame input plus, for the stars and the palm, a little integrated state.

use std::f32::consts::{PI, TAU};

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use rand::prelude::*;

use crate::assets::{palm_fallback_grid, PointCloud};
use crate::band::{Band, BandTable};
use crate::constants::*;
use crate::easing::Easing;
use crate::state::FrameInput;

use super::{Animator, CloudFrame, FrameClock, SceneFades, Sprite};

// Per-entity salts so every cloud draws its own sequence from one seed.
const NEBULA_SALT: u64 = 0x6E65_6275;
const GOLD_SALT: u64 = 0x676F_6C64;
const STAR_SALT: u64 = 0x7374_6172;

fn entity_rng(seed: u64, salt: u64) -> StdRng {
    StdRng::seed_from_u64(seed ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Number of points to draw for a full-size `count` at `scale`.
pub fn scaled_count(count: usize, scale: f32) -> usize {
    ((count as f32 * scale.clamp(0.0, 1.0)).round() as usize).max(1)
}

fn unit_direction(rng: &mut StdRng) -> Vec3 {
    let theta = rng.gen::<f32>() * TAU;
    let phi = rng.gen_range(-1.0_f32..1.0).acos();
    Vec3::new(
        phi.sin() * theta.cos(),
        phi.sin() * theta.sin(),
        phi.cos(),
    )
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Particle {
    position: Vec3,
    color: Vec3,
    size: f32,
    phase: f32,
}

/// Distant coloured dust that fades in once the logo has gone.
#[derive(Clone, Debug)]
pub struct Nebula {
    particles: Vec<Particle>,
    fades: SceneFades,
}

impl Nebula {
    pub fn new(seed: u64, count: usize) -> Self {
        let mut rng = entity_rng(seed, NEBULA_SALT);
        let particles = (0..count)
            .map(|_| {
                let radius = NEBULA_RADIUS_MIN + rng.gen::<f32>() * NEBULA_RADIUS_SPAN;
                let position = unit_direction(&mut rng) * radius;
                let color = Vec3::from(NEBULA_PALETTE[rng.gen_range(0..NEBULA_PALETTE.len())]);
                Particle {
                    position,
                    color,
                    size: NEBULA_POINT_SIZE,
                    phase: 0.0,
                }
            })
            .collect();
        Self {
            particles,
            fades: SceneFades::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn emit(&self, frame: &CloudFrame, out: &mut Vec<Sprite>) {
        if !frame.visible() {
            return;
        }
        out.extend(self.particles.iter().map(|p| {
            Sprite::point(
                frame.model.transform_point3(p.position),
                p.size,
                p.color,
                frame.opacity,
            )
        }));
    }
}

impl Animator for Nebula {
    type Output = CloudFrame;

    fn update(&mut self, input: &FrameInput) -> CloudFrame {
        let p = input.scroll.progress;
        let t = input.elapsed_sec;
        let spin = NEBULA_SPIN_RATE * t + p * NEBULA_SCROLL_SPIN;
        let wobble = (t * 0.1).sin() * NEBULA_WOBBLE;
        CloudFrame {
            model: Mat4::from_euler(EulerRot::XYZ, wobble, spin, 0.0),
            opacity: (NEBULA_BASE_OPACITY + NEBULA_SCROLL_OPACITY * p) * self.fades.atmospheric(p),
            progress: p,
            elapsed_sec: t,
            animate: !input.reduced_motion,
        }
    }
}

/// Warm swarm around the logo. It drifts, swirls and spreads out as the page
/// scrolls, then fades before the content panels arrive.
#[derive(Clone, Debug)]
pub struct GoldSwarm {
    particles: Vec<Particle>,
    opacity: BandTable<f32>,
}

/// Opacity of the swarm: rises from its base level, then fades to nothing
/// with no jump between the two bands.
pub fn gold_opacity_table() -> BandTable<f32> {
    BandTable::new([
        Band::new(
            0.0,
            GOLD_FADE_START,
            Easing::Linear,
            GOLD_BASE_OPACITY,
            GOLD_PEAK_OPACITY,
        ),
        Band::new(
            GOLD_FADE_START,
            GOLD_FADE_END,
            Easing::Linear,
            GOLD_PEAK_OPACITY,
            0.0,
        ),
    ])
    .unwrap_or_else(|_| BandTable::single(Easing::Linear, 0.0, 0.0))
}

impl GoldSwarm {
    pub fn new(seed: u64, count: usize) -> Self {
        let mut rng = entity_rng(seed, GOLD_SALT);
        let particles = (0..count)
            .map(|_| {
                let radius = GOLD_RADIUS_MIN + rng.gen::<f32>() * GOLD_RADIUS_SPAN;
                let angle = rng.gen::<f32>() * TAU;
                let height = (rng.gen::<f32>() - 0.5) * GOLD_HEIGHT_SPAN;
                Particle {
                    position: Vec3::new(
                        radius * angle.cos(),
                        height,
                        radius * angle.sin() * GOLD_DEPTH_SQUASH + GOLD_DEPTH_OFFSET,
                    ),
                    color: Vec3::ONE,
                    size: GOLD_SIZE_MIN + rng.gen::<f32>() * GOLD_SIZE_SPAN,
                    phase: rng.gen::<f32>() * TAU,
                }
            })
            .collect();
        Self {
            particles,
            opacity: gold_opacity_table(),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// World position of particle `i` at `progress` and time `t`.
    fn position(&self, i: usize, progress: f32, t: f32) -> Vec3 {
        let base = self.particles[i].position;
        let phase = self.particles[i].phase;
        let fi = i as f32;
        let steady = (progress * PI).sin() * 1.2 * GOLD_SCROLL_DRIFT;

        let mut pos = base;
        pos.x += (t * 0.5 + fi * 0.02).sin() * (0.2 + 0.3 * progress)
            + steady
            + (t * 1.3 + phase).sin() * GOLD_JITTER;
        pos.y += (t * 0.6 + fi * 0.03).cos() * (0.15 + 0.4 * progress)
            + steady
            + (t * 1.1 + phase).cos() * GOLD_JITTER;
        pos.z += (t * 0.9 + phase * 2.0).sin() * GOLD_JITTER;

        let dist = Vec2::new(base.x, base.y).length();
        let swirl = dist * GOLD_VORTEX_PER_PROGRESS * progress;
        let angle = swirl + t * 0.2;
        pos.x += angle.cos() * swirl * GOLD_VORTEX_WEIGHT;
        pos.y += angle.sin() * swirl * GOLD_VORTEX_WEIGHT;

        let spread = (progress * GOLD_SPREAD_PER_PROGRESS).min(GOLD_SPREAD_MAX);
        pos.x *= 1.0 + spread * 0.3;
        pos.y *= 1.0 + spread * 0.2;
        pos
    }

    pub fn emit(&self, frame: &CloudFrame, out: &mut Vec<Sprite>) {
        if !frame.visible() {
            return;
        }
        let p = frame.progress;
        let t = if frame.animate { frame.elapsed_sec } else { 0.0 };
        let tint = Vec3::new(1.0, 1.0 - 0.35 * p, 0.7 * p);
        for (i, particle) in self.particles.iter().enumerate() {
            let fi = i as f32;
            let pulse = (1.0 + GOLD_PULSE * (t * 3.0 + fi * 0.05).sin()) * (1.0 + 0.4 * p);
            let glow = (0.9 + 0.2 * (t * 2.5 + fi * 0.08).sin()).max(0.7);
            out.push(Sprite::point(
                frame.model.transform_point3(self.position(i, p, t)),
                0.2 * particle.size * pulse,
                tint * glow,
                frame.opacity,
            ));
        }
    }
}

impl Animator for GoldSwarm {
    type Output = CloudFrame;

    fn update(&mut self, input: &FrameInput) -> CloudFrame {
        let p = input.scroll.progress;
        CloudFrame {
            model: Mat4::IDENTITY,
            opacity: self.opacity.sample(p),
            progress: p,
            elapsed_sec: input.elapsed_sec,
            animate: !input.reduced_motion,
        }
    }
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Vec3 {
    let hue = |t: f32| {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };
    Vec3::new(hue(h + 1.0 / 3.0), hue(h), hue(h - 1.0 / 3.0))
}

/// Background star shell. Spins and twinkles faster as the page scrolls.
#[derive(Clone, Debug)]
pub struct StarField {
    particles: Vec<Particle>,
    /// Integrated `speed * dt`.
    phase: f32,
    clock: FrameClock,
}

impl StarField {
    pub fn new(seed: u64, count: usize) -> Self {
        let mut rng = entity_rng(seed, STAR_SALT);
        let particles = (0..count)
            .map(|i| {
                let radius = STAR_RADIUS + rng.gen::<f32>() * STAR_DEPTH;
                Particle {
                    position: unit_direction(&mut rng) * radius,
                    color: hsl_to_rgb(i as f32 / count as f32, 0.2, 0.9),
                    size: STAR_POINT_SIZE * (0.5 + 0.5 * rng.gen::<f32>()),
                    phase: rng.gen::<f32>() * TAU,
                }
            })
            .collect();
        Self {
            particles,
            phase: 0.0,
            clock: FrameClock::default(),
        }
    }

    /// Carry the spin of a field this one replaces.
    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn speed(progress: f32) -> f32 {
        STAR_BASE_SPEED + STAR_SCROLL_SPEED * progress
    }

    pub fn emit(&self, frame: &CloudFrame, out: &mut Vec<Sprite>) {
        if !frame.visible() {
            return;
        }
        out.extend(self.particles.iter().map(|p| {
            let twinkle = 1.0 + 0.2 * (self.phase + p.phase).sin();
            Sprite::point(
                frame.model.transform_point3(p.position),
                p.size * twinkle,
                p.color,
                frame.opacity,
            )
        }));
    }
}

impl Animator for StarField {
    type Output = CloudFrame;

    fn update(&mut self, input: &FrameInput) -> CloudFrame {
        let p = input.scroll.progress;
        let dt = self.clock.tick(input.elapsed_sec);
        if !input.reduced_motion {
            self.phase += Self::speed(p) * dt;
        }
        let model = Mat4::from_scale_rotation_translation(
            Vec3::splat(1.0 + STAR_SCROLL_GROWTH * p),
            Quat::from_rotation_y(self.phase * STAR_SPIN_PER_SPEED),
            Vec3::ZERO,
        );
        CloudFrame {
            model,
            opacity: 1.0,
            progress: p,
            elapsed_sec: input.elapsed_sec,
            animate: !input.reduced_motion,
        }
    }
}

/// Palm-shaped cloud that rises through the middle of the page. Points near
/// the pointer are pushed aside and ease back once it leaves.
#[derive(Clone, Debug)]
pub struct PalmCloud {
    points: Vec<Vec3>,
    colors: Vec<Vec3>,
    offsets: Vec<Vec2>,
    fades: SceneFades,
    clock: FrameClock,
}

impl Default for PalmCloud {
    fn default() -> Self {
        Self::new()
    }
}

impl PalmCloud {
    /// Starts on the procedural grid until the model arrives.
    pub fn new() -> Self {
        let mut palm = Self {
            points: Vec::new(),
            colors: Vec::new(),
            offsets: Vec::new(),
            fades: SceneFades::new(),
            clock: FrameClock::default(),
        };
        palm.set_points(palm_fallback_grid().points, PALM_FALLBACK_GRADIENT_RADIUS);
        palm
    }

    /// Install the palm model, given in its authored units. At most `budget`
    /// points are kept.
    pub fn set_model(&mut self, cloud: &PointCloud, budget: usize) {
        if cloud.is_empty() {
            return;
        }
        let points = cloud
            .subsampled(budget.min(PALM_SAMPLE_TARGET))
            .points
            .into_iter()
            .map(|p| p * PALM_ASSET_SCALE - Vec3::Y * PALM_ASSET_DROP)
            .collect();
        self.set_points(points, PALM_GRADIENT_RADIUS);
    }

    fn set_points(&mut self, points: Vec<Vec3>, gradient_radius: f32) {
        let near = Vec3::from(PALM_NEAR_COLOR);
        let far = Vec3::from(PALM_FAR_COLOR);
        self.colors = points
            .iter()
            .map(|p| {
                let d = Vec2::new(p.x, p.z).length();
                near.lerp(far, (d / gradient_radius).min(1.0))
            })
            .collect();
        self.offsets = vec![Vec2::ZERO; points.len()];
        self.points = points;
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Current displacement of each point from its rest position.
    pub fn offsets(&self) -> &[Vec2] {
        &self.offsets
    }

    /// One relaxation step toward the pointer-repelled layout, or back to
    /// rest when there is no pointer.
    fn repel(&mut self, pointer: Option<Vec2>) {
        let pointer = pointer.map(|p| p * PALM_POINTER_REACH);
        for (rest, offset) in self.points.iter().zip(self.offsets.iter_mut()) {
            let home = Vec2::new(rest.x, rest.y);
            match pointer {
                Some(ptr) if home.distance_squared(ptr) < PALM_REPEL_RADIUS * PALM_REPEL_RADIUS => {
                    let away = home - ptr;
                    let dist = away.length();
                    let dir = away.normalize_or_zero();
                    *offset = dir * (PALM_REPEL_RADIUS - dist) * PALM_REPEL_STRENGTH;
                }
                _ => *offset *= 1.0 - PALM_RELAX,
            }
        }
    }

    pub fn emit(&self, frame: &CloudFrame, out: &mut Vec<Sprite>) {
        if !frame.visible() {
            return;
        }
        let t = frame.elapsed_sec;
        for ((rest, offset), color) in self.points.iter().zip(&self.offsets).zip(&self.colors) {
            let mut local = *rest + offset.extend(0.0);
            if frame.animate {
                local.z += (t * 0.5 + rest.x * 0.1).sin() * PALM_WAVE
                    + (t * 0.3 + rest.z * 0.1).cos() * PALM_WAVE;
            }
            out.push(Sprite::point(
                frame.model.transform_point3(local),
                PALM_POINT_SIZE,
                *color,
                frame.opacity,
            ));
        }
    }
}

impl Animator for PalmCloud {
    type Output = CloudFrame;

    fn update(&mut self, input: &FrameInput) -> CloudFrame {
        let p = input.scroll.progress;
        if self.clock.tick(input.elapsed_sec) > 0.0 {
            let pointer = input.pointer_ndc.filter(|_| !input.reduced_motion);
            self.repel(pointer);
        }
        let turn_rate = if input.reduced_motion {
            PALM_TURN_RATE_REDUCED
        } else {
            PALM_TURN_RATE
        };
        let model = Mat4::from_rotation_translation(
            Quat::from_rotation_y(p * TAU * turn_rate),
            Vec3::new(0.0, PALM_RISE_FROM + PALM_RISE_SPAN * p, 0.0),
        );
        CloudFrame {
            model,
            opacity: (2.0 * p).min(1.0) * self.fades.secondary(p),
            progress: p,
            elapsed_sec: input.elapsed_sec,
            animate: !input.reduced_motion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(progress: f32, t: f32) -> FrameInput {
        FrameInput::at(progress, t)
    }

    #[test]
    fn layouts_are_seeded() {
        let a = Nebula::new(7, 50);
        let b = Nebula::new(7, 50);
        let c = Nebula::new(8, 50);
        assert_eq!(a.particles, b.particles);
        assert_ne!(a.particles, c.particles);
        for p in &a.particles {
            let r = p.position.length();
            assert!((NEBULA_RADIUS_MIN - 1e-3..=NEBULA_RADIUS_MIN + NEBULA_RADIUS_SPAN + 1e-3).contains(&r));
        }
    }

    #[test]
    fn scaled_count_never_drops_to_zero() {
        assert_eq!(scaled_count(600, 1.0), 600);
        assert_eq!(scaled_count(600, 0.5), 300);
        assert_eq!(scaled_count(600, 0.0), 1);
    }

    #[test]
    fn nebula_waits_for_the_logo_to_leave() {
        let mut n = Nebula::new(1, 10);
        assert!(!n.update(&frame(0.1, 0.0)).visible());
        let late = n.update(&frame(0.9, 0.0));
        assert!((late.opacity - (NEBULA_BASE_OPACITY + NEBULA_SCROLL_OPACITY * 0.9)).abs() < 1e-5);
        let mut out = Vec::new();
        n.emit(&late, &mut out);
        assert_eq!(out.len(), 10);
    }

    #[test]
    fn gold_opacity_is_continuous_and_ends_hidden() {
        let t = gold_opacity_table();
        assert!(t.discontinuities(1e-5).is_empty());
        assert_eq!(t.sample(0.0), GOLD_BASE_OPACITY);
        assert!((t.sample(GOLD_FADE_START) - GOLD_PEAK_OPACITY).abs() < 1e-5);
        assert_eq!(t.sample(GOLD_FADE_END), 0.0);
        assert_eq!(t.sample(1.0), 0.0);
    }

    #[test]
    fn gold_spreads_with_scroll() {
        let mut g = GoldSwarm::new(3, 200);
        let spread = |g: &mut GoldSwarm, p: f32| {
            let f = g.update(&frame(p, 0.0));
            let mut out = Vec::new();
            g.emit(&f, &mut out);
            out.iter().map(|s| s.position.x.abs()).sum::<f32>() / out.len() as f32
        };
        let near = spread(&mut g, 0.0);
        let far = spread(&mut g, 0.6);
        assert!(far > near);
    }

    #[test]
    fn stars_only_advance_with_time() {
        let mut s = StarField::new(1, 20);
        s.update(&frame(0.5, 1.0));
        let a = s.update(&frame(0.5, 2.0));
        let b = s.update(&frame(0.5, 2.0));
        assert_eq!(a, b);
        assert!((s.phase - StarField::speed(0.5)).abs() < 1e-5);

        let mut frozen = StarField::new(1, 20);
        let input = FrameInput {
            reduced_motion: true,
            ..frame(0.5, 1.0)
        };
        frozen.update(&input);
        frozen.update(&FrameInput {
            elapsed_sec: 3.0,
            ..input
        });
        assert_eq!(frozen.phase, 0.0);
    }

    #[test]
    fn palm_rises_and_fades_in() {
        let mut palm = PalmCloud::new();
        assert_eq!(palm.len(), PALM_FALLBACK_GRID * PALM_FALLBACK_GRID);
        assert!(!palm.update(&frame(0.3, 0.0)).visible());
        let f = palm.update(&frame(1.0, 0.0));
        assert_eq!(f.opacity, 1.0);
        let origin = f.model.transform_point3(Vec3::ZERO);
        assert!((origin.y - (PALM_RISE_FROM + PALM_RISE_SPAN)).abs() < 1e-4);
    }

    #[test]
    fn palm_points_dodge_the_pointer_then_relax() {
        let mut palm = PalmCloud::new();
        let rest = palm.points[0];
        let pointer = Vec2::new(rest.x, rest.y) / PALM_POINTER_REACH + Vec2::new(0.05, 0.0);
        let mut input = FrameInput {
            pointer_ndc: Some(pointer),
            ..frame(0.7, 0.0)
        };
        palm.update(&input);
        input.elapsed_sec = 0.1;
        palm.update(&input);
        assert!(palm.offsets()[0].length() > 0.0);

        input.pointer_ndc = None;
        for i in 2..200 {
            input.elapsed_sec = i as f32 * 0.1;
            palm.update(&input);
        }
        assert!(palm.offsets()[0].length() < 1e-4);
    }

    #[test]
    fn palm_model_replaces_fallback_grid() {
        let mut palm = PalmCloud::new();
        let model = PointCloud::new((0..5000).map(|i| Vec3::new(i as f32, 35.0, 0.0)).collect());
        palm.set_model(&model, 10_000);
        assert_eq!(palm.len(), PALM_SAMPLE_TARGET);
        assert!(palm.points.iter().all(|p| p.y.abs() < 1e-4));
        palm.set_model(&model, 100);
        assert_eq!(palm.len(), 100);
    }
}
