//! Device tilt input.
//!
//! Raw `deviceorientation` readings are noisy and jump by ~180° near gimbal
//! lock. [`OrientationSampler`] rejects those jumps, clamps to the usable
//! tilt range and blends each accepted reading with the previous stable one.
//! [`TiltEmulator`] produces the same kind of stream from held arrow keys.

use crate::config::OrientationConfig;

/// Front-back (`beta`) and left-right (`gamma`) tilt in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    pub beta: f32,
    pub gamma: f32,
}

impl Orientation {
    pub fn new(beta: f32, gamma: f32) -> Self {
        Self { beta, gamma }
    }
}

/// Missing or non-finite readings count as level.
#[inline]
pub fn sanitize_reading(value: Option<f64>) -> f32 {
    match value {
        Some(v) if v.is_finite() => v as f32,
        _ => 0.0,
    }
}

#[derive(Clone, Debug)]
pub struct OrientationSampler {
    cfg: OrientationConfig,
    stable: Orientation,
    rejected: u64,
}

impl OrientationSampler {
    pub fn new(cfg: OrientationConfig) -> Self {
        Self {
            cfg,
            stable: Orientation::default(),
            rejected: 0,
        }
    }

    /// Feed one raw reading and return the stable orientation afterwards.
    pub fn push(&mut self, beta: Option<f64>, gamma: Option<f64>) -> Orientation {
        let raw = Orientation::new(sanitize_reading(beta), sanitize_reading(gamma));
        let d_beta = (raw.beta - self.stable.beta).abs();
        let d_gamma = (raw.gamma - self.stable.gamma).abs();
        if d_beta > self.cfg.reject_delta_deg || d_gamma > self.cfg.reject_delta_deg {
            self.rejected += 1;
            log::debug!(
                "[orientation] rejected jump beta {:.1}->{:.1} gamma {:.1}->{:.1}",
                self.stable.beta,
                raw.beta,
                self.stable.gamma,
                raw.gamma
            );
            return self.stable;
        }
        let limit = self.cfg.clamp_deg;
        let w = self.cfg.prev_weight;
        let clamped_beta = raw.beta.clamp(-limit, limit);
        let clamped_gamma = raw.gamma.clamp(-limit, limit);
        self.stable = Orientation::new(
            w * self.stable.beta + (1.0 - w) * clamped_beta,
            w * self.stable.gamma + (1.0 - w) * clamped_gamma,
        );
        self.stable
    }

    pub fn current(&self) -> Orientation {
        self.stable
    }

    /// Number of readings discarded as gimbal-lock spikes.
    pub fn rejected_count(&self) -> u64 {
        self.rejected
    }

    pub fn reset(&mut self) {
        self.stable = Orientation::default();
        self.rejected = 0;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TiltKey {
    Up,
    Down,
    Left,
    Right,
}

pub const TILT_RAMP_DEG_PER_SEC: f32 = 60.0;
pub const TILT_RETURN_DEG_PER_SEC: f32 = 90.0;
pub const TILT_LIMIT_DEG: f32 = 30.0;

/// Keyboard stand-in for a motion sensor.
///
/// Up/Down drive `beta`, Left/Right drive `gamma`. Held keys ramp toward the
/// limit; released axes spring back to level.
#[derive(Clone, Debug, Default)]
pub struct TiltEmulator {
    beta: f32,
    gamma: f32,
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl TiltEmulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, key: TiltKey, pressed: bool) {
        match key {
            TiltKey::Up => self.up = pressed,
            TiltKey::Down => self.down = pressed,
            TiltKey::Left => self.left = pressed,
            TiltKey::Right => self.right = pressed,
        }
    }

    pub fn is_active(&self) -> bool {
        self.up || self.down || self.left || self.right || self.beta != 0.0 || self.gamma != 0.0
    }

    pub fn step(&mut self, dt_sec: f32) -> Orientation {
        let dt = dt_sec.max(0.0);
        self.beta = step_axis(self.beta, axis_target(self.down, self.up), dt);
        self.gamma = step_axis(self.gamma, axis_target(self.right, self.left), dt);
        self.current()
    }

    pub fn current(&self) -> Orientation {
        Orientation::new(self.beta, self.gamma)
    }
}

fn axis_target(positive: bool, negative: bool) -> Option<f32> {
    match (positive, negative) {
        (true, false) => Some(TILT_LIMIT_DEG),
        (false, true) => Some(-TILT_LIMIT_DEG),
        _ => None,
    }
}

fn step_axis(value: f32, target: Option<f32>, dt: f32) -> f32 {
    let (goal, rate) = match target {
        Some(t) => (t, TILT_RAMP_DEG_PER_SEC),
        None => (0.0, TILT_RETURN_DEG_PER_SEC),
    };
    let max_step = rate * dt;
    let delta = goal - value;
    if delta.abs() <= max_step {
        goal
    } else {
        value + max_step * delta.signum()
    }
}
