//! Light streaks left behind by a moving pointer.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use rand::prelude::*;

use crate::constants::*;
use crate::state::FrameInput;

use super::{Animator, FrameClock, Sprite};

const TRAIL_SALT: u64 = 0x7472_6169;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Streak {
    pub position: Vec3,
    pub velocity: Vec3,
    pub life: f32,
    pub max_life: f32,
    pub width: f32,
    pub length: f32,
    pub angle: f32,
}

impl Streak {
    /// Rises and falls over the streak's life; zero at birth and death.
    pub fn envelope(&self) -> f32 {
        (self.life / self.max_life * PI).sin().max(0.0)
    }
}

/// Spawns streaks from pointer moves and ages them each frame.
#[derive(Clone, Debug)]
pub struct TrailEmitter {
    streaks: Vec<Streak>,
    last_pointer: Option<Vec2>,
    rng: StdRng,
    clock: FrameClock,
}

impl TrailEmitter {
    pub fn new(seed: u64) -> Self {
        Self {
            streaks: Vec::new(),
            last_pointer: None,
            rng: StdRng::seed_from_u64(seed ^ TRAIL_SALT),
            clock: FrameClock::default(),
        }
    }

    pub fn streaks(&self) -> &[Streak] {
        &self.streaks
    }

    pub fn max_live(mobile: bool) -> usize {
        if mobile {
            TRAIL_MAX_LIVE_MOBILE
        } else {
            TRAIL_MAX_LIVE
        }
    }

    fn age(&mut self, dt: f32) {
        for s in &mut self.streaks {
            let slow = s.life / s.max_life;
            s.position += s.velocity * slow * dt;
            s.life -= dt * TRAIL_DECAY_PER_SEC;
        }
        self.streaks.retain(|s| s.life > 0.0);
    }

    fn spawn(&mut self, from: Vec2, to: Vec2, view_extent: Vec2, mobile: bool) {
        let delta = to - from;
        let speed = delta.length();
        if speed <= TRAIL_SPEED_THRESHOLD {
            return;
        }
        let (per_speed, max_per_event) = if mobile {
            (TRAIL_SPAWN_PER_SPEED_MOBILE, TRAIL_MAX_PER_EVENT_MOBILE)
        } else {
            (TRAIL_SPAWN_PER_SPEED, TRAIL_MAX_PER_EVENT)
        };
        let count = ((speed * per_speed).floor() as usize).min(max_per_event);
        let heading = delta.y.atan2(delta.x);
        let origin = (to * view_extent * 0.5).extend(0.0);
        let width_scale = if mobile { 0.5 } else { 1.0 };
        for _ in 0..count {
            let angle = heading + (self.rng.gen::<f32>() - 0.5) * TRAIL_ANGLE_JITTER;
            let vx = TRAIL_SPEED_MIN + self.rng.gen::<f32>() * TRAIL_SPEED_SPAN;
            let vy = TRAIL_SPEED_MIN + self.rng.gen::<f32>() * TRAIL_SPEED_SPAN;
            let life = TRAIL_LIFE_MIN + self.rng.gen::<f32>() * TRAIL_LIFE_SPAN;
            let max_life = TRAIL_LIFE_MIN + self.rng.gen::<f32>() * TRAIL_LIFE_SPAN;
            self.streaks.push(Streak {
                position: origin,
                velocity: Vec3::new(angle.cos() * vx, angle.sin() * vy, 0.0),
                life: life.min(max_life),
                max_life,
                width: (TRAIL_SIZE_MIN + self.rng.gen::<f32>() * TRAIL_SIZE_SPAN) * width_scale,
                length: speed * (4.0 + self.rng.gen::<f32>() * 4.0),
                angle,
            });
        }
    }

    pub fn emit(&self, out: &mut Vec<Sprite>) {
        let color = Vec3::from(TRAIL_COLOR);
        out.extend(self.streaks.iter().filter_map(|s| {
            let fade = s.envelope();
            (fade > 0.0).then(|| Sprite {
                position: s.position,
                size: Vec2::new(s.length * fade, s.width * fade),
                angle: s.angle,
                color: (color * TRAIL_INTENSITY * fade).extend(fade),
            })
        }));
    }
}

impl Animator for TrailEmitter {
    /// Number of live streaks.
    type Output = usize;

    fn update(&mut self, input: &FrameInput) -> usize {
        let dt = self.clock.tick(input.elapsed_sec);
        if input.reduced_motion {
            self.streaks.clear();
            self.last_pointer = input.pointer_moves.last().copied().or(input.pointer_ndc);
            return 0;
        }
        self.age(dt);
        for &to in &input.pointer_moves {
            if let Some(from) = self.last_pointer {
                self.spawn(from, to, input.view_extent, input.mobile);
            }
            self.last_pointer = Some(to);
        }
        let max = Self::max_live(input.mobile);
        if self.streaks.len() > max {
            let excess = self.streaks.len() - max;
            self.streaks.drain(..excess);
        }
        self.streaks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moves(points: &[(f32, f32)], t: f32) -> FrameInput {
        FrameInput {
            pointer_moves: points.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
            ..FrameInput::at(0.5, t)
        }
    }

    #[test]
    fn slow_pointer_leaves_no_trail() {
        let mut trail = TrailEmitter::new(1);
        assert_eq!(trail.update(&moves(&[(0.0, 0.0), (0.001, 0.0)], 0.0)), 0);
    }

    #[test]
    fn fast_pointer_spawns_capped_streaks() {
        let mut trail = TrailEmitter::new(1);
        let n = trail.update(&moves(&[(0.0, 0.0), (0.5, 0.0)], 0.0));
        assert_eq!(n, TRAIL_MAX_PER_EVENT);
        let s = trail.streaks()[0];
        assert!(s.angle.abs() <= TRAIL_ANGLE_JITTER * 0.5 + 1e-6);
        assert_eq!(s.position, Vec3::new(0.5 * 16.0 * 0.5, 0.0, 0.0));
    }

    #[test]
    fn live_streaks_are_bounded() {
        let mut trail = TrailEmitter::new(2);
        let zigzag: Vec<(f32, f32)> = (0..200)
            .map(|i| (if i % 2 == 0 { -0.5 } else { 0.5 }, 0.0))
            .collect();
        assert_eq!(trail.update(&moves(&zigzag, 0.0)), TRAIL_MAX_LIVE);
        let mobile = FrameInput {
            mobile: true,
            ..moves(&zigzag, 0.1)
        };
        assert!(trail.update(&mobile) <= TRAIL_MAX_LIVE_MOBILE);
    }

    #[test]
    fn streaks_die_out() {
        let mut trail = TrailEmitter::new(3);
        trail.update(&moves(&[(0.0, 0.0), (0.3, 0.3)], 0.0));
        assert!(!trail.streaks().is_empty());
        for i in 1..=40 {
            trail.update(&moves(&[], i as f32 * 0.1));
        }
        assert!(trail.streaks().is_empty());
        let mut out = Vec::new();
        trail.emit(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn reduced_motion_disables_the_trail() {
        let mut trail = TrailEmitter::new(4);
        let input = FrameInput {
            reduced_motion: true,
            ..moves(&[(0.0, 0.0), (0.9, 0.9)], 0.0)
        };
        assert_eq!(trail.update(&input), 0);
        assert!(trail.streaks().is_empty());
    }
}
