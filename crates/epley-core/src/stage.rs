//! Maneuver stage tracking.
//!
//! Particle angles around the ring map to one of five brackets; the bracket
//! holding the most particles is the candidate stage. Promotions are capped
//! at one step, debounced, and never undone within a run.

use crate::clock::Millis;
use crate::config::StageConfig;
use crate::fade::{Easing, Fade};
use crate::geometry::normalize_deg;
use crate::state::{AvatarView, Ear, StageCommit};

pub const FIRST_STAGE: u8 = 1;
pub const FINAL_STAGE: u8 = 5;

/// Half-open angular range `[start, end)` in degrees; wraps when `start > end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bracket {
    pub start: f32,
    pub end: f32,
}

impl Bracket {
    const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, angle_deg: f32) -> bool {
        let a = normalize_deg(angle_deg);
        if self.start <= self.end {
            a >= self.start && a < self.end
        } else {
            a >= self.start || a < self.end
        }
    }
}

/// Stage `i + 1` occupies `BRACKETS[ear][i]`. The left row mirrors the right
/// one about the vertical axis (`θ -> 180 - θ`).
const RIGHT_BRACKETS: [Bracket; 5] = [
    Bracket::new(90.0, 165.0),
    Bracket::new(165.0, 225.0),
    Bracket::new(225.0, 300.0),
    Bracket::new(300.0, 15.0),
    Bracket::new(15.0, 90.0),
];

const LEFT_BRACKETS: [Bracket; 5] = [
    Bracket::new(15.0, 90.0),
    Bracket::new(315.0, 15.0),
    Bracket::new(240.0, 315.0),
    Bracket::new(165.0, 240.0),
    Bracket::new(90.0, 165.0),
];

pub fn brackets(ear: Ear) -> &'static [Bracket; 5] {
    match ear {
        Ear::Right => &RIGHT_BRACKETS,
        Ear::Left => &LEFT_BRACKETS,
    }
}

/// Stage of a single angle around the ring center.
pub fn classify_angle(ear: Ear, angle_deg: f32) -> u8 {
    brackets(ear)
        .iter()
        .position(|b| b.contains(angle_deg))
        .map_or(FIRST_STAGE, |i| i as u8 + 1)
}

/// Most populated stage; ties go to the higher stage. `None` without angles.
pub fn candidate_stage(ear: Ear, angles: impl IntoIterator<Item = f32>) -> Option<u8> {
    let mut counts = [0usize; FINAL_STAGE as usize];
    let mut any = false;
    for a in angles {
        counts[(classify_angle(ear, a) - 1) as usize] += 1;
        any = true;
    }
    if !any {
        return None;
    }
    let (best, _) = counts
        .iter()
        .enumerate()
        .fold((0usize, 0usize), |(bi, bc), (i, &c)| if c >= bc { (i, c) } else { (bi, bc) });
    Some(best as u8 + 1)
}

pub fn stage_label(stage: u8) -> &'static str {
    match stage {
        1 => "Sit upright, head turned 45° toward the affected ear",
        2 => "Lie back quickly, head hanging 20° below the table",
        3 => "Turn the head 90° toward the unaffected side",
        4 => "Roll onto the side, nose pointed toward the floor",
        5 => "Sit up slowly, chin tucked",
        _ => "",
    }
}

/// A promotion waiting out its debounce window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingPromotion {
    pub target: u8,
    pub since: Millis,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageState {
    pub current: u8,
    pub pending: Option<PendingPromotion>,
}

impl Default for StageState {
    fn default() -> Self {
        Self {
            current: FIRST_STAGE,
            pending: None,
        }
    }
}

fn debounce_for(target: u8, cfg: &StageConfig) -> Millis {
    if target >= FINAL_STAGE {
        cfg.final_debounce_ms
    } else {
        cfg.debounce_ms
    }
}

impl StageState {
    /// Advance with this tick's candidate. Returns the new state and, when a
    /// promotion was committed, its record.
    pub fn step(self, candidate: u8, now: Millis, cfg: &StageConfig) -> (StageState, Option<StageCommit>) {
        if candidate <= self.current || self.current >= FINAL_STAGE {
            return (
                StageState {
                    pending: None,
                    ..self
                },
                None,
            );
        }

        let target = (self.current + 1).min(FINAL_STAGE);
        let pending = match self.pending {
            Some(p) if p.target == target => p,
            _ => PendingPromotion { target, since: now },
        };

        if now - pending.since >= debounce_for(target, cfg) {
            let commit = StageCommit {
                from: self.current,
                to: target,
                at: now,
            };
            (
                StageState {
                    current: target,
                    pending: None,
                },
                Some(commit),
            )
        } else {
            (
                StageState {
                    pending: Some(pending),
                    ..self
                },
                None,
            )
        }
    }
}

/// Cue override duration for the transition that ends at `to`.
pub fn cue_override_ms(to: u8, cfg: &StageConfig) -> Option<Millis> {
    let idx = to.checked_sub(2)? as usize;
    cfg.cue_override_ms.get(idx).copied()
}

/// Cross-fade between the previous and current avatar image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AvatarBlend {
    pub stage: u8,
    pub previous_stage: u8,
    fade: Option<Fade>,
}

impl Default for AvatarBlend {
    fn default() -> Self {
        Self {
            stage: FIRST_STAGE,
            previous_stage: FIRST_STAGE,
            fade: None,
        }
    }
}

impl AvatarBlend {
    /// Restart the blend for a fresh commit.
    pub fn on_commit(&mut self, commit: &StageCommit, cfg: &StageConfig) {
        self.previous_stage = commit.from;
        self.stage = commit.to;
        self.fade = Some(Fade::new(0.0, 1.0, commit.at, cfg.crossfade_ms, Easing::EaseInOut));
    }

    pub fn blend(&self, now: Millis) -> f32 {
        self.fade.map_or(1.0, |f| f.value(now))
    }

    pub fn view(&self, now: Millis, opacity: f32) -> AvatarView {
        AvatarView {
            stage: self.stage,
            previous_stage: self.previous_stage,
            blend: self.blend(now),
            opacity,
        }
    }
}
