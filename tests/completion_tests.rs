// Completion latch, stepped fades and the indicator hit test; also the timer
// and fade primitives they are built on.

use epley_core::completion::{hits_indicator, CompletionState};
use epley_core::fade::{Easing, Fade};
use epley_core::timer::Deadline;
use epley_core::CompletionConfig;
use glam::Vec2;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[test]
fn completion_fires_once_on_final_stage() {
    let mut c = CompletionState::default();
    assert!(!c.check(false, 5, 100.0));
    assert!(!c.check(true, 4, 200.0));
    assert!(!c.is_fired());
    assert!(c.check(true, 5, 1000.0));
    assert!(!c.check(true, 5, 1100.0));
    assert_eq!(c.fired_at(), Some(1000.0));
}

#[test]
fn avatar_fades_out_in_steps() {
    let cfg = CompletionConfig::default();
    let mut c = CompletionState::default();
    assert_eq!(c.avatar_opacity(0.0, &cfg), 1.0);
    c.check(true, 5, 1000.0);
    assert_eq!(c.avatar_opacity(1000.0, &cfg), 1.0);
    assert_eq!(c.avatar_opacity(1049.0, &cfg), 1.0);
    assert!(close(c.avatar_opacity(1050.0, &cfg), 0.95));
    assert!(close(c.avatar_opacity(1500.0, &cfg), 0.5));
    assert_eq!(c.avatar_opacity(2000.0, &cfg), 0.0);
    assert_eq!(c.avatar_opacity(9000.0, &cfg), 0.0);
}

#[test]
fn indicator_fades_in_after_avatar() {
    let cfg = CompletionConfig::default();
    let mut c = CompletionState::default();
    assert_eq!(c.indicator_opacity(5000.0, &cfg), 0.0);
    c.check(true, 5, 1000.0);
    assert_eq!(c.indicator_opacity(1500.0, &cfg), 0.0);
    assert_eq!(c.indicator_opacity(1999.0, &cfg), 0.0);
    assert_eq!(c.indicator_opacity(2000.0, &cfg), 0.0);
    assert!(close(c.indicator_opacity(2050.0, &cfg), 0.05));
    assert_eq!(c.indicator_opacity(3000.0, &cfg), 1.0);
}

#[test]
fn indicator_hit_test_is_circular() {
    let center = Vec2::new(220.0, 200.0);
    assert!(hits_indicator(center, center, 60.0));
    assert!(hits_indicator(center + Vec2::new(60.0, 0.0), center, 60.0));
    assert!(!hits_indicator(center + Vec2::new(43.0, 43.0), center, 60.0));
}

#[test]
fn deadline_does_not_stack() {
    let mut d = Deadline::IDLE;
    assert!(!d.is_pending());
    d.schedule_if_idle(0.0, 100.0);
    d.schedule_if_idle(50.0, 100.0);
    assert_eq!(d.at(), Some(100.0));
    d.schedule(50.0, 100.0);
    assert_eq!(d.at(), Some(150.0));
    assert!(!d.fire(149.0));
    assert!(d.fire(150.0));
    assert!(!d.fire(151.0));
    d.cancel();
    assert!(!d.is_pending());
    assert_eq!(Deadline::after(10.0, 5.0).at(), Some(15.0));
}

#[test]
fn fades_clamp_outside_their_window() {
    let f = Fade::new(0.0, 1.0, 100.0, 200.0, Easing::EaseInOut);
    assert_eq!(f.value(0.0), 0.0);
    assert!(close(f.value(200.0), 0.5));
    assert_eq!(f.value(1000.0), 1.0);
    assert!(f.is_finished(300.0));
    assert!(!f.is_finished(299.0));

    let stepped = Fade::new(1.0, 0.0, 0.0, 100.0, Easing::Stepped { steps: 4 });
    assert_eq!(stepped.value(24.0), 1.0);
    assert!(close(stepped.value(25.0), 0.75));
    assert_eq!(stepped.value(100.0), 0.0);

    let instant = Fade::new(0.0, 1.0, 0.0, 0.0, Easing::EaseInOut);
    assert_eq!(instant.value(0.0), 1.0);
}
