use crate::config::GravityConfig;
use crate::orientation::Orientation;
use glam::Vec2;

/// Maps smoothed device tilt to a 2D acceleration in world space (y down).
///
/// Fast tilting briefly strengthens gravity so quick head moves feel
/// responsive; the strength itself is low-pass filtered across frames.
#[derive(Clone, Debug)]
pub struct GravityModel {
    cfg: GravityConfig,
    previous: Option<Orientation>,
    smoothed_strength: Option<f32>,
}

impl GravityModel {
    pub fn new(cfg: GravityConfig) -> Self {
        Self {
            cfg,
            previous: None,
            smoothed_strength: None,
        }
    }

    pub fn smoothed_strength(&self) -> Option<f32> {
        self.smoothed_strength
    }

    pub fn reset(&mut self) {
        self.previous = None;
        self.smoothed_strength = None;
    }

    /// Advance one frame with the current stable orientation.
    pub fn step(&mut self, current: Orientation) -> Vec2 {
        let previous = self.previous.unwrap_or(current);
        let c = &self.cfg;

        let d_beta = current.beta - previous.beta;
        let d_gamma = current.gamma - previous.gamma;
        let total_change = (d_beta * d_beta + d_gamma * d_gamma).sqrt();
        let change_multiplier = (1.0 + total_change / c.change_divisor).min(c.change_multiplier_max);
        let dynamic_strength = c.base_strength * change_multiplier;
        let strength = match self.smoothed_strength {
            Some(prev) => {
                c.strength_prev_weight * prev + (1.0 - c.strength_prev_weight) * dynamic_strength
            }
            None => dynamic_strength,
        };

        self.previous = Some(current);
        self.smoothed_strength = Some(strength);
        gravity_vector(current, strength, c)
    }
}

/// Tilt-to-acceleration mapping for a given smoothed strength.
pub fn gravity_vector(o: Orientation, strength: f32, c: &GravityConfig) -> Vec2 {
    let gamma = o.gamma;
    let is_horizontal = (gamma.abs() - 90.0).abs() < 30.0;
    let is_vertical = gamma.abs() < 45.0 || gamma.abs() > 135.0;

    let gamma_sensitivity = if is_vertical {
        c.vertical_gamma_sensitivity
    } else {
        1.0
    };
    let gx = gamma.to_radians().sin() * strength * gamma_sensitivity;

    let vertical_boost = if is_vertical { c.vertical_boost } else { 1.0 };
    let beta_sin = o.beta.to_radians().sin();
    let gy = if is_horizontal {
        beta_sin * strength * c.horizontal_beta_scale
    } else {
        beta_sin * strength * vertical_boost
    };
    // Sensor noise must not lift particles against gravity.
    let gy = gy.max(-strength * c.max_upward_fraction);

    Vec2::new(gx, gy)
}
