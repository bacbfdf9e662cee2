// Orientation sampling, gravity mapping and the keyboard tilt emulator.

use epley_core::gravity::{gravity_vector, GravityModel};
use epley_core::orientation::sanitize_reading;
use epley_core::{GravityConfig, Orientation, OrientationConfig, OrientationSampler, TiltEmulator, TiltKey};

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn sampler_blends_with_previous_reading() {
    let mut s = OrientationSampler::new(OrientationConfig::default());
    let o = s.push(Some(10.0), Some(20.0));
    // 0.3 * previous + 0.7 * new
    assert!(close(o.beta, 7.0));
    assert!(close(o.gamma, 14.0));
    let o = s.push(Some(10.0), Some(20.0));
    assert!(close(o.beta, 0.3 * 7.0 + 7.0));
}

#[test]
fn sampler_rejects_gimbal_jumps() {
    let mut s = OrientationSampler::new(OrientationConfig::default());
    s.push(Some(10.0), Some(0.0));
    let before = s.current();
    let o = s.push(Some(160.0), Some(0.0));
    assert_eq!(o, before);
    assert_eq!(s.rejected_count(), 1);
    let o = s.push(Some(0.0), Some(-150.0));
    assert_eq!(o, before);
    assert_eq!(s.rejected_count(), 2);
}

#[test]
fn sampler_clamps_accepted_readings() {
    let mut s = OrientationSampler::new(OrientationConfig::default());
    let o = s.push(Some(60.0), Some(-80.0));
    assert!(close(o.beta, 0.7 * 30.0));
    assert!(close(o.gamma, 0.7 * -30.0));
}

#[test]
fn missing_and_nan_readings_count_as_level() {
    assert_eq!(sanitize_reading(None), 0.0);
    assert_eq!(sanitize_reading(Some(f64::NAN)), 0.0);
    assert_eq!(sanitize_reading(Some(f64::INFINITY)), 0.0);
    assert_eq!(sanitize_reading(Some(12.5)), 12.5);

    let mut s = OrientationSampler::new(OrientationConfig::default());
    let o = s.push(None, Some(f64::NAN));
    assert_eq!(o, Orientation::default());
}

#[test]
fn sampler_reset_forgets_history() {
    let mut s = OrientationSampler::new(OrientationConfig::default());
    s.push(Some(20.0), Some(20.0));
    s.push(Some(170.0), Some(0.0));
    s.reset();
    assert_eq!(s.current(), Orientation::default());
    assert_eq!(s.rejected_count(), 0);
}

#[test]
fn level_device_gives_no_gravity() {
    let mut g = GravityModel::new(GravityConfig::default());
    let v = g.step(Orientation::default());
    assert_eq!(v, glam::Vec2::ZERO);
}

#[test]
fn forward_tilt_pulls_down() {
    let cfg = GravityConfig::default();
    let mut g = GravityModel::new(cfg.clone());
    let v = g.step(Orientation::new(30.0, 0.0));
    // no change on the first frame, so strength is the base strength
    let expected = 30f32.to_radians().sin() * cfg.base_strength * cfg.vertical_boost;
    assert!(close(v.x, 0.0));
    assert!(close(v.y, expected));
}

#[test]
fn upward_pull_is_capped() {
    let cfg = GravityConfig::default();
    let v = gravity_vector(Orientation::new(-30.0, 0.0), 0.08, &cfg);
    assert!(close(v.y, -0.08 * cfg.max_upward_fraction));
}

#[test]
fn sideways_tilt_uses_reduced_sensitivity_when_upright() {
    let cfg = GravityConfig::default();
    let v = gravity_vector(Orientation::new(0.0, 20.0), 0.08, &cfg);
    let expected = 20f32.to_radians().sin() * 0.08 * cfg.vertical_gamma_sensitivity;
    assert!(close(v.x, expected));
}

#[test]
fn quick_tilts_strengthen_gravity_smoothly() {
    let cfg = GravityConfig::default();
    let mut g = GravityModel::new(cfg.clone());
    g.step(Orientation::default());
    g.step(Orientation::new(30.0, 0.0));
    // change of 30 degrees saturates the multiplier at 2.2
    let dynamic = cfg.base_strength * cfg.change_multiplier_max;
    let expected = cfg.strength_prev_weight * cfg.base_strength
        + (1.0 - cfg.strength_prev_weight) * dynamic;
    let s = g.smoothed_strength().unwrap_or_default();
    assert!(close(s, expected));
    g.reset();
    assert_eq!(g.smoothed_strength(), None);
}

#[test]
fn tilt_emulator_ramps_and_returns() {
    let mut t = TiltEmulator::new();
    assert!(!t.is_active());
    t.set_key(TiltKey::Down, true);
    let o = t.step(0.25);
    assert!(close(o.beta, 15.0));
    let o = t.step(1.0);
    assert!(close(o.beta, 30.0));
    assert!(t.is_active());

    t.set_key(TiltKey::Down, false);
    let o = t.step(0.1);
    assert!(close(o.beta, 21.0));
    t.step(1.0);
    assert!(!t.is_active());
}

#[test]
fn tilt_emulator_opposite_keys_cancel() {
    let mut t = TiltEmulator::new();
    t.set_key(TiltKey::Left, true);
    let o = t.step(0.5);
    assert!(close(o.gamma, -30.0));
    t.set_key(TiltKey::Right, true);
    let o = t.step(0.1);
    assert!(close(o.gamma, -21.0));
}
