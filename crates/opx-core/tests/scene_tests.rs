// Scene-level behaviour: determinism, continuity across band boundaries,
// fade monotonicity, start/middle/end poses and missing assets.

use glam::Vec2;
use opx_core::animators::camera::dolly_table;
use opx_core::animators::logo::right_edge_x;
use opx_core::animators::particles::gold_opacity_table;
use opx_core::animators::{
    fade_in, AssemblyAnimator, CameraAnimator, LogoAnimator, SceneFades, TextAnimator,
};
use opx_core::assets::{AssetId, Glyph};
use opx_core::constants::*;
use opx_core::easing::Easing;
use opx_core::{
    shared_scroll, Animator, FrameInput, Interpolate, Pose, QualitySettings, QualityTier, Scene,
    SceneParams, ScrollState,
};

const EPS: f32 = 1e-4;
// Narrower probes for pose checks; the steepest bands move several units
// per 0.05 of progress.
const LOGO_EPS: f32 = 1e-5;
const ASSEMBLY_EPS: f32 = 1e-6;

fn scene() -> Scene {
    let (_writer, reader) = shared_scroll();
    Scene::new(
        SceneParams::default(),
        QualitySettings::for_tier(QualityTier::Medium),
        reader,
        16.0 / 9.0,
        false,
    )
    .unwrap()
}

fn still(progress: f32, t: f32) -> FrameInput {
    FrameInput {
        reduced_motion: true,
        ..FrameInput::at(progress, t)
    }
}

/// Poses on either side of a boundary agree, ignoring jumps an invisible
/// piece makes while it is fully transparent.
fn assert_pose_continuous(a: &Pose, b: &Pose, at: f32) {
    assert!(
        (a.opacity - b.opacity).abs() < 1e-2,
        "opacity jumps at {at}: {} -> {}",
        a.opacity,
        b.opacity
    );
    if a.visible() && b.visible() {
        assert!(a.distance(b) < 5e-2, "pose jumps at {at}: {a:?} -> {b:?}");
    }
}

#[test]
fn same_inputs_give_same_frame() {
    let mut a = scene();
    let mut b = scene();
    for &(p, t) in &[(0.0, 0.0), (0.3, 1.5), (0.5, 2.0), (0.82, 7.25), (1.0, 11.0)] {
        let input = still(p, t);
        let fa = a.update(&input);
        let (cam_a, sprites_a) = (fa.camera.clone(), fa.sprites.to_vec());
        let fb = b.update(&input);
        assert_eq!(cam_a, fb.camera);
        assert_eq!(sprites_a, fb.sprites);
    }
}

#[test]
fn repeating_a_frame_changes_nothing() {
    let mut s = scene();
    let mut input = FrameInput::at(0.45, 0.0);
    input.pointer_ndc = Some(Vec2::new(0.3, -0.2));
    s.update(&input);
    input.elapsed_sec = 0.75;
    input.scroll = ScrollState::new(0.46, 120.0);

    let first = s.update(&input);
    let (camera, sprites, post) = (first.camera.clone(), first.sprites.to_vec(), first.post);
    let second = s.update(&input);
    assert_eq!(camera, second.camera);
    assert_eq!(sprites, second.sprites);
    assert_eq!(post, second.post);
}

#[test]
fn band_tables_have_no_jumps() {
    assert!(dolly_table().unwrap().discontinuities(EPS).is_empty());
    assert!(gold_opacity_table().discontinuities(EPS).is_empty());
}

#[test]
fn logo_is_continuous_across_its_boundaries() {
    let logo = LogoAnimator::new();
    let edge = right_edge_x(16.0);
    let boundaries = [
        LOGO_X_EXIT_START,
        LOGO_X_EXIT_END,
        LOGO_P_EXIT_START,
        LOGO_P_EXIT_END,
        LOGO_O_SHIFT_START,
        LOGO_O_SHIFT_END,
        LOGO_O_EXIT_START,
        LOGO_O_EXIT_END,
    ];
    for b in boundaries {
        let before = logo.scroll_poses(b - LOGO_EPS, edge);
        let after = logo.scroll_poses(b + LOGO_EPS, edge);
        for (x, y) in before.iter().zip(&after) {
            assert_pose_continuous(x, y, b);
        }
    }
}

#[test]
fn assembly_is_continuous_across_its_boundaries() {
    let assembly = AssemblyAnimator::new();
    let span = ASSEMBLY_END - ASSEMBLY_START;
    let local = [
        0.0,
        ASSEMBLY_O_APPEAR_END,
        ASSEMBLY_P_APPEAR_START,
        ASSEMBLY_P_APPEAR_END,
        ASSEMBLY_X_APPEAR_START,
        ASSEMBLY_X_APPEAR_END,
        ASSEMBLY_TURN_START,
    ];
    for f in local {
        let b = ASSEMBLY_START + f * span;
        let before = assembly.poses(b - ASSEMBLY_EPS, -10.0);
        let after = assembly.poses(b + ASSEMBLY_EPS, -10.0);
        for (x, y) in before.iter().zip(&after) {
            assert_pose_continuous(x, y, b);
        }
    }
}

#[test]
fn fade_ins_never_dip_and_fade_outs_never_rise() {
    let fades = SceneFades::new();
    let gold = gold_opacity_table();
    let custom = fade_in(0.1, 0.6, Easing::CubicInOut);
    let steps = 500;
    let mut prev = (0.0_f32, 0.0_f32, 0.0_f32);
    let mut prev_gold = gold.sample(GOLD_FADE_START);
    for i in 0..=steps {
        let p = i as f32 / steps as f32;
        let now = (fades.atmospheric(p), fades.secondary(p), custom.sample(p));
        assert!(now.0 >= prev.0 && now.1 >= prev.1 && now.2 >= prev.2, "dip at {p}");
        prev = now;

        if p >= GOLD_FADE_START {
            let g = gold.sample(p);
            assert!(g <= prev_gold + 1e-6, "gold rises at {p}");
            prev_gold = g;
        }
    }
}

#[test]
fn start_middle_and_end_of_page() {
    // Top of the page: the opening logo sits in its slots, nothing else shows.
    let logo = LogoAnimator::new().update(&still(0.0, 5.0));
    assert_eq!(logo.piece(Glyph::O).pose.position, LOGO_O_SLOT);
    assert!(logo.pieces.iter().all(|p| p.pose.opacity == 1.0));
    assert!(!AssemblyAnimator::new().update(&still(0.0, 5.0)).visible());

    // Halfway: the logo has gone and the camera is pushing in.
    let logo = LogoAnimator::new().update(&still(0.5, 5.0));
    assert!(!logo.visible());
    let dolly = CameraAnimator::new(1.5, false).unwrap();
    let z = dolly.target_z(0.5);
    assert!(z < CAMERA_HOLD_Z && z > CAMERA_PUSH_Z);

    // Bottom: the closing logo is assembled, panels are gone, camera pulled back.
    let assembled = AssemblyAnimator::new().update(&still(1.0, 5.0));
    for (piece, slot) in assembled
        .pieces
        .iter()
        .zip([ASSEMBLY_O_SLOT, ASSEMBLY_P_SLOT, ASSEMBLY_X_SLOT])
    {
        assert!((piece.pose.position - slot).length() < 1e-4);
        assert!((piece.pose.opacity - 1.0).abs() < 1e-6);
    }
    let text = TextAnimator::default().update(&still(1.0, 5.0));
    assert!(text.panels.iter().all(|s| !s.visible()));
    assert_eq!(dolly.target_z(1.0), CAMERA_PULL_Z);
}

#[test]
fn unresolved_assets_leave_fallbacks_in_place() {
    let mut s = scene();
    let mut counts = Vec::new();
    for frame in 0..300 {
        let p = frame as f32 / 299.0;
        let f = s.update(&FrameInput::at(p, frame as f32 / 60.0));
        counts.push(f.sprites.len());
        assert!(f.sprites.iter().all(|sp| sp.position.is_finite()));
    }
    assert_eq!(s.registry().pending().count(), AssetId::ALL.len());
    // Fallback logo outlines are drawn at the top of the page.
    assert!(counts[0] > 0);
}
