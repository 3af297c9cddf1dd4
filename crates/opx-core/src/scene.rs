//! The whole scene: every animator, the asset registry and a reusable sprite
//! buffer.
//!
//! [`Scene::update`] runs the animators in a fixed order (camera first, so
//! the others can place things relative to the visible area) and returns
//! everything the renderer and the DOM overlay need for one frame.

use crate::animators::particles::scaled_count;
use crate::animators::text::TextFrame;
use crate::animators::{
    AssemblyAnimator, Animator, CameraAnimator, FalconAnimator, GoldSwarm, LogoAnimator, Nebula,
    PalmCloud, PostAnimator, PostParams, Sprite, StarField, TextAnimator, TrailEmitter,
};
use crate::assets::{AssetError, AssetId, AssetRegistry, Glyph, PointCloud};
use crate::band::BandTableError;
use crate::constants::*;
use crate::params::SceneParams;
use crate::quality::QualitySettings;
use crate::scroll::{ScrollReader, ScrollState};
use crate::state::{Camera, FrameInput};

/// Everything produced for one frame.
#[derive(Debug)]
pub struct SceneFrame<'a> {
    pub camera: Camera,
    /// Camera-facing sprites in world space, blended additively.
    pub sprites: &'a [Sprite],
    pub post: PostParams,
    pub text: TextFrame,
    pub trail_streaks: usize,
}

#[derive(Debug)]
pub struct Scene {
    params: SceneParams,
    quality: QualitySettings,
    scroll: ScrollReader,
    registry: AssetRegistry,
    camera: CameraAnimator,
    logo: LogoAnimator,
    assembly: AssemblyAnimator,
    nebula: Nebula,
    gold: GoldSwarm,
    stars: StarField,
    palm: PalmCloud,
    falcon: FalconAnimator,
    trail: TrailEmitter,
    text: TextAnimator,
    post: PostAnimator,
    sprites: Vec<Sprite>,
}

impl Scene {
    pub fn new(
        params: SceneParams,
        quality: QualitySettings,
        scroll: ScrollReader,
        aspect: f32,
        mobile: bool,
    ) -> Result<Self, BandTableError> {
        let seed = params.seed;
        let scale = quality.particle_scale();
        Ok(Self {
            camera: CameraAnimator::new(aspect, mobile)?,
            logo: LogoAnimator::new(),
            assembly: AssemblyAnimator::new(),
            nebula: Nebula::new(seed, scaled_count(NEBULA_COUNT, scale)),
            gold: GoldSwarm::new(seed, scaled_count(GOLD_COUNT, scale)),
            stars: StarField::new(seed, STAR_COUNT.min(quality.particle_budget)),
            palm: PalmCloud::new(),
            falcon: FalconAnimator::new(),
            trail: TrailEmitter::new(seed),
            text: TextAnimator::default(),
            post: PostAnimator,
            registry: AssetRegistry::new(),
            sprites: Vec::new(),
            params,
            quality,
            scroll,
        })
    }

    pub fn params(&self) -> &SceneParams {
        &self.params
    }

    pub fn quality(&self) -> &QualitySettings {
        &self.quality
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn text(&self) -> &TextAnimator {
        &self.text
    }

    /// Current value of the shared scroll cell.
    pub fn scroll(&self) -> ScrollState {
        self.scroll.get()
    }

    /// Rebuild the particle clouds for a new quality tier. Layouts keep their
    /// seed and the star field keeps its spin, so the surviving points stay
    /// where they were.
    pub fn set_quality(&mut self, quality: QualitySettings) {
        if quality == self.quality {
            return;
        }
        log::info!("[quality] switching to {} tier", quality.tier);
        let seed = self.params.seed;
        let scale = quality.particle_scale();
        self.nebula = Nebula::new(seed, scaled_count(NEBULA_COUNT, scale));
        self.gold = GoldSwarm::new(seed, scaled_count(GOLD_COUNT, scale));
        self.stars = StarField::new(seed, STAR_COUNT.min(quality.particle_budget))
            .with_phase(self.stars.phase());
        self.quality = quality;
        for id in [AssetId::Palm, AssetId::Falcon] {
            if let Some(cloud) = self.registry.slot(id).ready().cloned() {
                self.install(id, &cloud);
            }
        }
    }

    /// Record the outcome of an asset fetch and hand a decoded cloud to the
    /// entity that draws it. Failures keep the entity on its fallback.
    pub fn resolve_asset(&mut self, id: AssetId, result: Result<PointCloud, AssetError>) {
        if let Ok(cloud) = &result {
            self.install(id, cloud);
        }
        self.registry.resolve(id, result);
    }

    fn install(&mut self, id: AssetId, cloud: &PointCloud) {
        let scale = self.quality.particle_scale();
        match id {
            AssetId::LogoO => self.logo.clouds.set(Glyph::O, cloud),
            AssetId::LogoP => self.logo.clouds.set(Glyph::P, cloud),
            AssetId::LogoX => self.logo.clouds.set(Glyph::X, cloud),
            AssetId::Palm => self
                .palm
                .set_model(cloud, scaled_count(PALM_SAMPLE_TARGET, scale)),
            AssetId::Falcon => self
                .falcon
                .set_cloud(cloud, scaled_count(FALCON_MAX_POINTS, scale)),
        }
    }

    pub fn update(&mut self, input: &FrameInput) -> SceneFrame<'_> {
        let mut input = input.clone();
        input.reduced_motion |= self.params.reduced_motion;

        let camera = self.camera.update(&input);
        input.view_extent = camera.visible_extent();

        let logo = self.logo.update(&input);
        let assembly = self.assembly.update(&input);
        let nebula = self.nebula.update(&input);
        let gold = self.gold.update(&input);
        let stars = self.stars.update(&input);
        let palm = self.palm.update(&input);
        let falcon = self.falcon.update(&input);
        let trail_streaks = self.trail.update(&input);
        let text = self.text.update(&input);
        let post = self.post.update(&input);

        self.sprites.clear();
        self.stars.emit(&stars, &mut self.sprites);
        self.nebula.emit(&nebula, &mut self.sprites);
        self.palm.emit(&palm, &mut self.sprites);
        self.gold.emit(&gold, &mut self.sprites);
        self.falcon.emit(&falcon, &mut self.sprites);
        self.logo.clouds.emit(&logo, &mut self.sprites);
        self.logo.clouds.emit(&assembly, &mut self.sprites);
        self.trail.emit(&mut self.sprites);

        SceneFrame {
            camera,
            sprites: &self.sprites,
            post,
            text,
            trail_streaks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::QualityTier;
    use crate::scroll::shared_scroll;

    fn scene(tier: QualityTier) -> Scene {
        let (_writer, reader) = shared_scroll();
        Scene::new(
            SceneParams::default(),
            QualitySettings::for_tier(tier),
            reader,
            16.0 / 9.0,
            false,
        )
        .unwrap()
    }

    #[test]
    fn lower_tiers_draw_fewer_sprites() {
        let input = FrameInput::at(0.5, 1.0);
        let high = scene(QualityTier::High).update(&input).sprites.len();
        let low = scene(QualityTier::Low).update(&input).sprites.len();
        assert!(low < high);
    }

    #[test]
    fn assets_replace_fallbacks_and_failures_are_kept() {
        let mut s = scene(QualityTier::Medium);
        let falcon = PointCloud::new(vec![glam::Vec3::X, glam::Vec3::Y, glam::Vec3::Z]);
        let input = FrameInput::at(0.7, 1.0);
        let before = s.update(&input).sprites.len();

        s.resolve_asset(AssetId::Falcon, Ok(falcon));
        let after = s.update(&input).sprites.len();
        assert_eq!(after, before + 3);

        s.resolve_asset(AssetId::Palm, Err(AssetError::Fetch("404".into())));
        assert!(!s.registry().slot(AssetId::Palm).is_pending());
        assert_eq!(s.update(&input).sprites.len(), after);
    }

    #[test]
    fn quality_change_keeps_installed_models() {
        let mut s = scene(QualityTier::High);
        let palm = PointCloud::new((0..4000).map(|i| glam::Vec3::splat(i as f32)).collect());
        s.resolve_asset(AssetId::Palm, Ok(palm));
        s.set_quality(QualitySettings::for_tier(QualityTier::Low));
        assert_eq!(s.quality().tier, QualityTier::Low);
        assert_eq!(
            s.palm.len(),
            scaled_count(PALM_SAMPLE_TARGET, s.quality().particle_scale())
        );
    }

    #[test]
    fn quality_change_does_not_move_surviving_stars() {
        let mut s = scene(QualityTier::High);
        let dt = 1.0 / 60.0;
        let mut t = 0.0;
        for _ in 0..600 {
            t += dt;
            s.update(&FrameInput::at(0.9, t));
        }
        let before = s.update(&FrameInput::at(0.9, t)).sprites[0].position;
        s.set_quality(QualitySettings::for_tier(QualityTier::Medium));
        let after = s.update(&FrameInput::at(0.9, t + dt)).sprites[0].position;
        let jump = before.distance(after);
        assert!(jump < 0.5, "star jumped {jump} across a tier change");
    }

    #[test]
    fn forced_reduced_motion_reaches_animators() {
        let (_writer, reader) = shared_scroll();
        let params = SceneParams {
            reduced_motion: true,
            ..SceneParams::default()
        };
        let mut s = Scene::new(params, QualitySettings::default(), reader, 1.5, false).unwrap();
        let frame = s.update(&FrameInput::at(0.5, 3.0));
        assert_eq!(frame.post, PostParams::REDUCED_MOTION);
    }
}
