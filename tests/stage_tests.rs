// Stage classification, debounced promotion and the avatar cross-fade.

use epley_core::stage::{
    candidate_stage, classify_angle, cue_override_ms, stage_label, AvatarBlend, StageState,
    FINAL_STAGE,
};
use epley_core::{Ear, StageCommit, StageConfig};

#[test]
fn classify_right_ear_brackets() {
    assert_eq!(classify_angle(Ear::Right, 100.0), 1);
    assert_eq!(classify_angle(Ear::Right, 170.0), 2);
    assert_eq!(classify_angle(Ear::Right, 250.0), 3);
    assert_eq!(classify_angle(Ear::Right, 310.0), 4);
    assert_eq!(classify_angle(Ear::Right, 10.0), 4);
    assert_eq!(classify_angle(Ear::Right, 20.0), 5);
    // brackets are half-open
    assert_eq!(classify_angle(Ear::Right, 90.0), 1);
    assert_eq!(classify_angle(Ear::Right, 165.0), 2);
}

#[test]
fn left_ear_mirrors_right() {
    for theta in [100.0f32, 170.0, 250.0, 310.0, 10.0, 20.0, 140.0, 280.0] {
        let mirrored = 180.0 - theta;
        assert_eq!(
            classify_angle(Ear::Left, mirrored),
            classify_angle(Ear::Right, theta),
            "theta = {theta}"
        );
    }
}

#[test]
fn candidate_prefers_higher_stage_on_tie() {
    assert_eq!(
        candidate_stage(Ear::Right, [100.0, 100.0, 170.0, 170.0]),
        Some(2)
    );
    assert_eq!(
        candidate_stage(Ear::Right, [100.0, 100.0, 100.0, 250.0]),
        Some(1)
    );
    assert_eq!(candidate_stage(Ear::Right, std::iter::empty::<f32>()), None);
}

#[test]
fn promotion_waits_for_debounce() {
    let cfg = StageConfig::default();
    let s = StageState::default();
    let (s, c) = s.step(2, 0.0, &cfg);
    assert_eq!(c, None);
    assert_eq!(s.current, 1);
    let (s, c) = s.step(2, 299.0, &cfg);
    assert_eq!(c, None);
    let (s, c) = s.step(2, 300.0, &cfg);
    assert_eq!(
        c,
        Some(StageCommit {
            from: 1,
            to: 2,
            at: 300.0
        })
    );
    assert_eq!(s.current, 2);
    assert_eq!(s.pending, None);
}

#[test]
fn promotion_is_capped_at_one_step() {
    let cfg = StageConfig::default();
    let (s, _) = StageState::default().step(4, 0.0, &cfg);
    let (s, c) = s.step(4, 300.0, &cfg);
    assert_eq!(c.map(|c| c.to), Some(2));
    assert_eq!(s.current, 2);
    // the next step needs its own window
    let (s, c) = s.step(4, 301.0, &cfg);
    assert_eq!(c, None);
    let (s, c) = s.step(4, 601.0, &cfg);
    assert_eq!(c.map(|c| c.to), Some(3));
    assert_eq!(s.current, 3);
}

#[test]
fn falling_back_cancels_pending_promotion() {
    let cfg = StageConfig::default();
    let (s, _) = StageState::default().step(2, 0.0, &cfg);
    let (s, c) = s.step(1, 100.0, &cfg);
    assert_eq!(c, None);
    assert_eq!(s.pending, None);
    let (s, _) = s.step(2, 200.0, &cfg);
    let (s, c) = s.step(2, 450.0, &cfg);
    assert_eq!(c, None);
    let (s, c) = s.step(2, 500.0, &cfg);
    assert!(c.is_some());
    assert_eq!(s.current, 2);
}

#[test]
fn stages_never_regress() {
    let cfg = StageConfig::default();
    let s = StageState {
        current: 3,
        pending: None,
    };
    let (s, c) = s.step(1, 10_000.0, &cfg);
    assert_eq!(c, None);
    assert_eq!(s.current, 3);
}

#[test]
fn final_stage_uses_short_window() {
    let cfg = StageConfig::default();
    let s = StageState {
        current: 4,
        pending: None,
    };
    let (s, _) = s.step(5, 1000.0, &cfg);
    let (s, c) = s.step(5, 1049.0, &cfg);
    assert_eq!(c, None);
    let (s, c) = s.step(5, 1050.0, &cfg);
    assert_eq!(c.map(|c| c.to), Some(FINAL_STAGE));
    // nothing beyond the final stage
    let (s, c) = s.step(5, 5000.0, &cfg);
    assert_eq!(c, None);
    assert_eq!(s.current, FINAL_STAGE);
}

#[test]
fn cue_overrides_per_transition() {
    let cfg = StageConfig::default();
    assert_eq!(cue_override_ms(2, &cfg), Some(10_000.0));
    assert_eq!(cue_override_ms(3, &cfg), Some(3_000.0));
    assert_eq!(cue_override_ms(4, &cfg), Some(5_000.0));
    assert_eq!(cue_override_ms(5, &cfg), Some(2_000.0));
    assert_eq!(cue_override_ms(1, &cfg), None);
    assert_eq!(cue_override_ms(6, &cfg), None);
}

#[test]
fn every_stage_has_a_label() {
    for s in 1..=FINAL_STAGE {
        assert!(!stage_label(s).is_empty());
    }
    assert!(stage_label(0).is_empty());
}

#[test]
fn avatar_cross_fades_on_commit() {
    let cfg = StageConfig::default();
    let mut avatar = AvatarBlend::default();
    assert_eq!(avatar.blend(0.0), 1.0);
    avatar.on_commit(
        &StageCommit {
            from: 1,
            to: 2,
            at: 1000.0,
        },
        &cfg,
    );
    assert_eq!(avatar.stage, 2);
    assert_eq!(avatar.previous_stage, 1);
    assert_eq!(avatar.blend(1000.0), 0.0);
    assert!((avatar.blend(1000.0 + cfg.crossfade_ms / 2.0) - 0.5).abs() < 1e-4);
    assert_eq!(avatar.blend(1000.0 + cfg.crossfade_ms), 1.0);
    let view = avatar.view(1000.0 + cfg.crossfade_ms, 0.5);
    assert_eq!(view.opacity, 0.5);
    assert_eq!(view.stage, 2);
}
