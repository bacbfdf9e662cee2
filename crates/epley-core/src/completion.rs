use crate::clock::Millis;
use crate::config::CompletionConfig;
use crate::fade::{Easing, Fade};
use crate::stage::FINAL_STAGE;
use glam::Vec2;

/// Run completion: a one-shot latch followed by two stepped fades.
///
/// Phase A fades the avatar out, Phase B then fades the completion indicator
/// in. Both are derived from the firing time, so there is nothing to cancel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CompletionState {
    fired_at: Option<Millis>,
}

impl CompletionState {
    pub fn is_fired(&self) -> bool {
        self.fired_at.is_some()
    }

    pub fn fired_at(&self) -> Option<Millis> {
        self.fired_at
    }

    /// Latch when every particle has reached the vestibule on the final
    /// stage. Returns `true` only on the call that fires.
    pub fn check(&mut self, all_entered: bool, stage: u8, now: Millis) -> bool {
        if self.fired_at.is_some() || !all_entered || stage != FINAL_STAGE {
            return false;
        }
        self.fired_at = Some(now);
        true
    }

    fn phase_ms(cfg: &CompletionConfig) -> Millis {
        cfg.fade_steps as Millis * cfg.fade_step_ms
    }

    fn easing(cfg: &CompletionConfig) -> Easing {
        Easing::Stepped {
            steps: cfg.fade_steps,
        }
    }

    pub fn avatar_opacity(&self, now: Millis, cfg: &CompletionConfig) -> f32 {
        match self.fired_at {
            None => 1.0,
            Some(at) => Fade::new(1.0, 0.0, at, Self::phase_ms(cfg), Self::easing(cfg)).value(now),
        }
    }

    pub fn indicator_opacity(&self, now: Millis, cfg: &CompletionConfig) -> f32 {
        match self.fired_at {
            None => 0.0,
            Some(at) => {
                let phase = Self::phase_ms(cfg);
                if now < at + phase {
                    0.0
                } else {
                    Fade::new(0.0, 1.0, at + phase, phase, Self::easing(cfg)).value(now)
                }
            }
        }
    }
}

/// Circular hit test for the completion indicator.
pub fn hits_indicator(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) <= radius * radius
}
