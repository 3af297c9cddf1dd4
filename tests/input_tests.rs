// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use glam::Vec2;
use input::*;

#[test]
fn client_corners_map_to_ndc_corners() {
    let vp = Vec2::new(800.0, 600.0);
    assert_eq!(client_to_ndc(Vec2::ZERO, vp), Some(Vec2::new(-1.0, 1.0)));
    assert_eq!(client_to_ndc(vp, vp), Some(Vec2::new(1.0, -1.0)));
    assert_eq!(client_to_ndc(vp * 0.5, vp), Some(Vec2::ZERO));
}

#[test]
fn positions_outside_the_viewport_are_clamped() {
    let vp = Vec2::new(100.0, 100.0);
    let ndc = client_to_ndc(Vec2::new(-50.0, 400.0), vp).unwrap();
    assert_eq!(ndc, Vec2::new(-1.0, -1.0));
}

#[test]
fn empty_viewport_gives_no_pointer() {
    assert_eq!(client_to_ndc(Vec2::ONE, Vec2::ZERO), None);
    assert_eq!(client_to_ndc(Vec2::ONE, Vec2::new(100.0, 0.0)), None);
    assert_eq!(client_to_ndc(Vec2::NAN, Vec2::splat(100.0)), None);
}

#[test]
fn pointer_queue_keeps_latest_and_drops_oldest() {
    let mut q = PointerQueue::with_capacity(3);
    assert_eq!(q.latest(), None);
    for i in 0..5 {
        q.push(Vec2::splat(i as f32));
    }
    let moves = q.take_moves();
    assert_eq!(moves, vec![Vec2::splat(2.0), Vec2::splat(3.0), Vec2::splat(4.0)]);
    assert!(q.take_moves().is_empty());
    assert_eq!(q.latest(), Some(Vec2::splat(4.0)));
}

#[test]
fn scroll_extent_never_negative() {
    assert_eq!(scroll_extent(5000.0, 1000.0), 4000.0);
    assert_eq!(scroll_extent(600.0, 1000.0), 0.0);
    assert_eq!(scroll_extent(f64::NAN, 1000.0), 0.0);
}

#[test]
fn mobile_by_agent_or_width() {
    let desktop = "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/130.0";
    let phone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148";
    assert!(!is_mobile(desktop, 1440.0, 768.0));
    assert!(is_mobile(desktop, 500.0, 768.0));
    assert!(is_mobile(phone, 1440.0, 768.0));
}

#[test]
fn cached_page_hides_do_not_tear_down() {
    let mut gate = TeardownGate::default();
    assert!(!gate.on_pagehide(true));
    assert!(!gate.on_pagehide(true));
    assert!(gate.on_pagehide(false));
    assert!(!gate.on_pagehide(false));
}
