// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use epley_core::{Ear, Perspective, TiltKey};
use glam::Vec2;
use input::*;

fn approx(a: Vec2, b: Vec2) -> bool {
    (a - b).length() < 1e-3
}

#[test]
fn fit_letterboxes_wide_canvas() {
    let view = ViewTransform::fit(Vec2::new(440.0, 440.0), Vec2::new(1320.0, 880.0));
    assert!((view.scale - 2.0).abs() < 1e-6);
    // 880px of world centered in 1320px leaves 220px on each side
    assert!(approx(view.offset, Vec2::new(220.0, 0.0)));
}

#[test]
fn fit_letterboxes_tall_canvas() {
    let view = ViewTransform::fit(Vec2::new(440.0, 440.0), Vec2::new(440.0, 1000.0));
    assert!((view.scale - 1.0).abs() < 1e-6);
    assert!(approx(view.offset, Vec2::new(0.0, 280.0)));
}

#[test]
fn screen_and_world_round_trip() {
    let view = ViewTransform::fit(Vec2::new(440.0, 440.0), Vec2::new(800.0, 600.0));
    let world = Vec2::new(220.0, 200.0);
    assert!(approx(view.to_world(view.to_screen(world)), world));
    assert!((view.length_to_screen(60.0) - 60.0 * view.scale).abs() < 1e-4);
}

#[test]
fn fit_survives_zero_sized_canvas() {
    let view = ViewTransform::fit(Vec2::new(440.0, 440.0), Vec2::ZERO);
    assert!(view.scale.is_finite() && view.scale > 0.0);
    assert!(view.offset.is_finite());
}

#[test]
fn css_offsets_scale_to_backing_store() {
    let p = css_to_backing_px(
        Vec2::new(50.0, 25.0),
        Vec2::new(100.0, 100.0),
        Vec2::new(200.0, 200.0),
    );
    assert!(approx(p, Vec2::new(100.0, 50.0)));
    assert_eq!(
        css_to_backing_px(Vec2::new(5.0, 5.0), Vec2::ZERO, Vec2::new(10.0, 10.0)),
        Vec2::ZERO
    );
}

#[test]
fn key_action_maps_selection_keys() {
    assert_eq!(key_action("l"), Some(KeyAction::Ear(Ear::Left)));
    assert_eq!(key_action("R"), Some(KeyAction::Ear(Ear::Right)));
    assert_eq!(
        key_action("p"),
        Some(KeyAction::Perspective(Perspective::Patient))
    );
    assert_eq!(
        key_action("C"),
        Some(KeyAction::Perspective(Perspective::Clinician))
    );
}

#[test]
fn key_action_maps_tilt_and_reset() {
    assert_eq!(key_action("ArrowUp"), Some(KeyAction::Tilt(TiltKey::Up)));
    assert_eq!(key_action("ArrowLeft"), Some(KeyAction::Tilt(TiltKey::Left)));
    assert_eq!(key_action(" "), Some(KeyAction::Reset));
    assert_eq!(key_action("Spacebar"), Some(KeyAction::Reset));
    assert_eq!(key_action("x"), None);
    assert_eq!(key_action("Enter"), None);
}
