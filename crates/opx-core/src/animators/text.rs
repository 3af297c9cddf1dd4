//! Content panels laid over the canvas near the end of the page, plus the
//! liquid backdrop behind them.
//!
//! Styles are plain numbers (pixels, radians, 0..1); the front-end turns them
//! into CSS.

use glam::Vec2;
use smallvec::SmallVec;

use crate::constants::*;
use crate::easing::{band_fraction, Easing};
use crate::state::FrameInput;

use super::Animator;

/// How a panel moves while it enters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PanelAnimation {
    #[default]
    SlideUp,
    /// Enters from the right, travelling left.
    SlideLeft,
    /// Enters from the left, travelling right.
    SlideRight,
    Fade,
    Scale,
}

/// Which side of the viewport carries the text card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PanelAlign {
    #[default]
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PanelSpec {
    pub heading: &'static [&'static str],
    pub body: &'static str,
    pub image: &'static str,
    pub align: PanelAlign,
    pub animation: PanelAnimation,
    pub easing: Easing,
    pub entry: (f32, f32),
    pub exit: (f32, f32),
}

impl PanelSpec {
    /// Free-standing panel shown over `[start, end]` that leaves over the
    /// default exit span after `end`.
    pub fn new(heading: &'static [&'static str], start: f32, end: f32) -> Self {
        Self {
            heading,
            body: "",
            image: "",
            align: PanelAlign::Left,
            animation: PanelAnimation::default(),
            easing: Easing::CubicInOut,
            entry: (start, end),
            exit: (end, end + PANEL_EXIT_SPAN_DEFAULT),
        }
    }

    pub fn animation(mut self, animation: PanelAnimation) -> Self {
        self.animation = animation;
        self
    }

    /// Style at page progress `p` and time `t`.
    pub fn style(&self, progress: f32, elapsed_sec: f32, reduced_motion: bool) -> PanelStyle {
        let entry = self
            .easing
            .apply(band_fraction(progress, self.entry.0, self.entry.1));
        let exit = band_fraction(progress, self.exit.0, self.exit.1);
        let rest = 1.0 - entry;

        let mut style = PanelStyle {
            opacity: entry * (1.0 - exit),
            blur_px: entry * PANEL_BLUR_PX,
            ..PanelStyle::HIDDEN
        };
        match self.animation {
            PanelAnimation::SlideUp => style.translate_px.y = rest * PANEL_SLIDE_PX,
            PanelAnimation::SlideLeft => style.translate_px.x = rest * PANEL_SLIDE_PX,
            PanelAnimation::SlideRight => style.translate_px.x = -rest * PANEL_SLIDE_PX,
            PanelAnimation::Fade => {}
            PanelAnimation::Scale => style.scale = entry,
        }
        style.scale = (style.scale - exit * PANEL_EXIT_SCALE_DROP).max(PANEL_MIN_SCALE);

        if entry >= 1.0 && exit <= 0.0 && !reduced_motion {
            style.translate_px.y += (elapsed_sec * PANEL_FLOAT_RATE).sin() * PANEL_FLOAT_PX;
            style.roll = (elapsed_sec * PANEL_ROLL_RATE).sin() * PANEL_ROLL_AMPLITUDE;
        }
        style
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelStyle {
    pub opacity: f32,
    /// CSS translation; positive y is down.
    pub translate_px: Vec2,
    pub scale: f32,
    pub blur_px: f32,
    pub roll: f32,
}

impl PanelStyle {
    pub const HIDDEN: PanelStyle = PanelStyle {
        opacity: 0.0,
        translate_px: Vec2::ZERO,
        scale: 1.0,
        blur_px: 0.0,
        roll: 0.0,
    };

    pub fn visible(&self) -> bool {
        self.opacity > crate::pose::VISIBLE_OPACITY_EPSILON
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BackdropStyle {
    pub opacity: f32,
    pub displacement: f32,
}

impl BackdropStyle {
    pub fn at(progress: f32) -> Self {
        let fade = band_fraction(progress, BACKDROP_FADE_START, BACKDROP_FADE_END);
        Self {
            opacity: fade,
            displacement: fade * BACKDROP_DISPLACEMENT,
        }
    }
}

const SECTION_COPY: [(&[&str], &str, &str, PanelAlign); 4] = [
    (
        &["A Diversified", "Holding", "Company"],
        "The main trunk of the tree supports a complex of branches which are represented by a variety of businesses.",
        "images/hero-palm.png",
        PanelAlign::Left,
    ),
    (
        &["Global", "Investment", "Strategies"],
        "Our investment approach spans international markets, focusing on emerging technologies and sustainable infrastructure development.",
        "images/falcon-bg.png",
        PanelAlign::Right,
    ),
    (
        &["Innovation", "Through", "Collaboration"],
        "Partnering with visionary entrepreneurs and industry pioneers to build solutions that shape tomorrow's business landscape.",
        "images/cityscape.png",
        PanelAlign::Left,
    ),
    (
        &["Building The", "Future", "Together"],
        "Join us in our mission to create a more connected, sustainable, and prosperous world through strategic investments and partnerships.",
        "images/tech-future.png",
        PanelAlign::Right,
    ),
];

/// The four content sections. Each slides up as it enters and crossfades
/// out as the next one starts; the last clears before the closing logo.
pub fn content_sections() -> Vec<PanelSpec> {
    SECTION_COPY
        .iter()
        .enumerate()
        .map(|(i, &(heading, body, image, align))| {
            let start = PANEL_ENTRY_STARTS[i];
            let exit_start = PANEL_ENTRY_STARTS
                .get(i + 1)
                .copied()
                .unwrap_or(PANEL_LAST_EXIT_START);
            PanelSpec {
                heading,
                body,
                image,
                align,
                animation: PanelAnimation::SlideUp,
                easing: Easing::Linear,
                entry: (start, (start + PANEL_ENTRY_SPAN).min(exit_start)),
                exit: (exit_start, (exit_start + PANEL_EXIT_SPAN).min(1.0)),
            }
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextFrame {
    pub panels: SmallVec<[PanelStyle; 4]>,
    pub backdrop: BackdropStyle,
}

#[derive(Clone, Debug)]
pub struct TextAnimator {
    panels: Vec<PanelSpec>,
}

impl Default for TextAnimator {
    fn default() -> Self {
        Self::new(content_sections())
    }
}

impl TextAnimator {
    pub fn new(panels: Vec<PanelSpec>) -> Self {
        Self { panels }
    }

    pub fn panels(&self) -> &[PanelSpec] {
        &self.panels
    }
}

impl Animator for TextAnimator {
    type Output = TextFrame;

    fn update(&mut self, input: &FrameInput) -> TextFrame {
        let p = input.scroll.progress;
        TextFrame {
            panels: self
                .panels
                .iter()
                .map(|spec| spec.style(p, input.elapsed_sec, input.reduced_motion))
                .collect(),
            backdrop: BackdropStyle::at(p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styles(p: f32) -> TextFrame {
        let input = FrameInput {
            reduced_motion: true,
            ..FrameInput::at(p, 0.0)
        };
        TextAnimator::default().update(&input)
    }

    #[test]
    fn nothing_shows_before_the_content() {
        let f = styles(0.69);
        assert!(f.panels.iter().all(|s| !s.visible()));
        assert_eq!(f.backdrop, BackdropStyle::default());
    }

    #[test]
    fn first_section_slides_up_into_place() {
        let half = styles(PANEL_ENTRY_STARTS[0] + PANEL_ENTRY_SPAN * 0.5).panels[0];
        assert!((half.opacity - 0.5).abs() < 1e-4);
        assert!((half.translate_px.y - 50.0).abs() < 1e-2);
        assert!((half.blur_px - 4.0).abs() < 1e-3);

        let full = styles(PANEL_ENTRY_STARTS[0] + PANEL_ENTRY_SPAN).panels[0];
        assert!(full.opacity > 0.99);
        assert!(full.translate_px.y < 1.0);
    }

    #[test]
    fn sections_hand_over_without_a_hard_cut() {
        let mut prev: Option<TextFrame> = None;
        for i in 0..=1000 {
            let f = styles(0.7 + 0.3 * i as f32 / 1000.0);
            if let Some(prev) = prev {
                for (a, b) in prev.panels.iter().zip(&f.panels) {
                    assert!((a.opacity - b.opacity).abs() < 0.05);
                }
            }
            prev = Some(f);
        }
    }

    #[test]
    fn last_section_clears_before_the_end() {
        let f = styles(1.0);
        assert!(f.panels.iter().all(|s| !s.visible()));
        assert_eq!(f.backdrop.opacity, 1.0);
        assert!((f.backdrop.displacement - BACKDROP_DISPLACEMENT).abs() < 1e-6);
    }

    #[test]
    fn scale_panel_grows_then_shrinks_on_exit() {
        let spec = PanelSpec::new(&["Hello"], 0.2, 0.3).animation(PanelAnimation::Scale);
        assert_eq!(spec.style(0.2, 0.0, true).scale, PANEL_MIN_SCALE);
        assert_eq!(spec.style(0.3, 0.0, true).scale, 1.0);
        let leaving = spec.style(0.3 + PANEL_EXIT_SPAN_DEFAULT, 0.0, true);
        assert_eq!(leaving.scale, 0.5);
        assert_eq!(leaving.opacity, 0.0);
    }

    #[test]
    fn float_only_while_fully_shown() {
        let spec = PanelSpec::new(&["Hello"], 0.2, 0.3).animation(PanelAnimation::Fade);
        let shown = spec.style(0.3, 3.0, false);
        assert!(shown.translate_px.y.abs() > 0.0);
        assert!(shown.roll.abs() > 0.0);
        assert_eq!(spec.style(0.3, 3.0, true).translate_px, Vec2::ZERO);
        assert_eq!(spec.style(0.25, 3.0, false).roll, 0.0);
    }

    #[test]
    fn slide_directions() {
        let at = |a| PanelSpec::new(&["x"], 0.0, 1.0).animation(a).style(0.0, 0.0, true);
        assert_eq!(at(PanelAnimation::SlideLeft).translate_px.x, PANEL_SLIDE_PX);
        assert_eq!(at(PanelAnimation::SlideRight).translate_px.x, -PANEL_SLIDE_PX);
    }
}
