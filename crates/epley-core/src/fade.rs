use crate::clock::Millis;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    /// Smoothstep between the endpoints.
    EaseInOut,
    /// Discrete jumps of `1 / steps` every `duration / steps`.
    Stepped { steps: u32 },
}

/// A time-based interpolation between two values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fade {
    pub from: f32,
    pub to: f32,
    pub start_ms: Millis,
    pub duration_ms: Millis,
    pub easing: Easing,
}

impl Fade {
    pub fn new(from: f32, to: f32, start_ms: Millis, duration_ms: Millis, easing: Easing) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
            easing,
        }
    }

    pub fn end_ms(&self) -> Millis {
        self.start_ms + self.duration_ms
    }

    pub fn is_finished(&self, now: Millis) -> bool {
        now >= self.end_ms()
    }

    /// Progress in [0, 1] after easing.
    pub fn progress(&self, now: Millis) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        let elapsed = (now - self.start_ms).clamp(0.0, self.duration_ms);
        match self.easing {
            Easing::EaseInOut => {
                let t = (elapsed / self.duration_ms) as f32;
                t * t * (3.0 - 2.0 * t)
            }
            Easing::Stepped { steps } => {
                let steps = steps.max(1) as f64;
                let step_ms = self.duration_ms / steps;
                ((elapsed / step_ms).floor().min(steps) / steps) as f32
            }
        }
    }

    pub fn value(&self, now: Millis) -> f32 {
        self.from + (self.to - self.from) * self.progress(now)
    }
}
