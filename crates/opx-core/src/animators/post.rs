//! Values for the post-processing chain.
//!
//! Most effects ramp with scroll progress; chromatic aberration and grain
//! also react to scroll speed. Reduced motion pins everything to fixed,
//! gentler values.

use crate::constants::*;
use crate::easing::lerp;
use crate::state::FrameInput;

use super::Animator;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostParams {
    pub bloom_intensity: f32,
    pub bloom_threshold: f32,
    /// UV offset of the red and blue channels.
    pub chroma_offset: f32,
    pub vignette_offset: f32,
    pub vignette_darkness: f32,
    pub brightness: f32,
    pub contrast: f32,
    /// Hue rotation in turns.
    pub hue: f32,
    pub saturation: f32,
    pub grain: f32,
    /// Blur radius multiplier for the depth-of-field pass.
    pub bokeh_scale: f32,
    pub white_point: f32,
}

impl PostParams {
    pub const REDUCED_MOTION: PostParams = PostParams {
        bloom_intensity: BLOOM_REDUCED,
        bloom_threshold: BLOOM_THRESHOLD,
        chroma_offset: CHROMA_REDUCED_OFFSET,
        vignette_offset: VIGNETTE_OFFSET,
        vignette_darkness: VIGNETTE_REDUCED,
        brightness: 0.0,
        contrast: CONTRAST_BASE,
        hue: 0.0,
        saturation: SATURATION_BASE,
        grain: GRAIN_REDUCED,
        bokeh_scale: BOKEH_REDUCED,
        white_point: TONEMAP_WHITE_POINT,
    };

    /// Values at scroll `progress` and signed `velocity` (px/s).
    pub fn at(progress: f32, velocity: f32) -> Self {
        let speed = velocity.abs() * POST_VELOCITY_SCALE;
        let chroma_boost = (speed * CHROMA_VELOCITY_GAIN).min(CHROMA_VELOCITY_MAX);
        Self {
            bloom_intensity: lerp(BLOOM_MIN, BLOOM_MAX, progress),
            bloom_threshold: BLOOM_THRESHOLD,
            chroma_offset: CHROMA_BASE_OFFSET * (1.0 + chroma_boost * CHROMA_VELOCITY_BOOST),
            vignette_offset: VIGNETTE_OFFSET,
            vignette_darkness: lerp(VIGNETTE_MIN, VIGNETTE_MAX, progress),
            brightness: BRIGHTNESS_BASE + BRIGHTNESS_SPAN * progress,
            contrast: CONTRAST_BASE + CONTRAST_SPAN * progress,
            hue: HUE_SPAN * progress,
            saturation: SATURATION_BASE + SATURATION_SPAN * progress,
            grain: GRAIN_BASE + (speed * GRAIN_VELOCITY_GAIN).min(GRAIN_VELOCITY_MAX),
            bokeh_scale: lerp(BOKEH_MIN, BOKEH_MAX, progress),
            white_point: TONEMAP_WHITE_POINT,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PostAnimator;

impl Animator for PostAnimator {
    type Output = PostParams;

    fn update(&mut self, input: &FrameInput) -> PostParams {
        if input.reduced_motion {
            PostParams::REDUCED_MOTION
        } else {
            PostParams::at(input.scroll.progress, input.scroll.velocity)
        }
    }
}
