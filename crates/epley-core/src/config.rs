use crate::constants::*;
use thiserror::Error;

/// Reasons a [`SimConfig`] cannot drive a simulation.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("inner radius {inner} must be positive and smaller than outer radius {outer}")]
    RingRadii { inner: f32, outer: f32 },
    #[error("tube width {tube} cannot fit a particle of radius {radius}")]
    TubeTooNarrow { tube: f32, radius: f32 },
    #[error("{field} must be a positive, finite number (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be finite and non-negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("particle count must be at least 1")]
    NoParticles,
}

#[derive(Clone, Debug)]
pub struct GeometryConfig {
    pub ring_center: [f32; 2],
    pub outer_radius: f32,
    pub inner_radius: f32,
    pub cupula_angle_deg: f32,
    pub cupula_width: f32,
    pub right_vestibule_angle_deg: f32,
    pub left_vestibule_angle_deg: f32,
    pub vestibule_distance: f32,
    pub vestibule_radius: f32,
    pub bridge_start: f32,
    pub gap_half_angle_deg: f32,
    pub spawn_offset_deg: f32,
    pub world_size: [f32; 2],
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            ring_center: RING_CENTER,
            outer_radius: RING_OUTER_RADIUS,
            inner_radius: RING_INNER_RADIUS,
            cupula_angle_deg: CUPULA_ANGLE_DEG,
            cupula_width: CUPULA_WIDTH,
            right_vestibule_angle_deg: RIGHT_EAR_VESTIBULE_ANGLE_DEG,
            left_vestibule_angle_deg: LEFT_EAR_VESTIBULE_ANGLE_DEG,
            vestibule_distance: VESTIBULE_DISTANCE,
            vestibule_radius: VESTIBULE_RADIUS,
            bridge_start: BRIDGE_START,
            gap_half_angle_deg: VESTIBULE_GAP_HALF_ANGLE_DEG,
            spawn_offset_deg: SPAWN_OFFSET_DEG,
            world_size: WORLD_SIZE,
        }
    }
}

#[derive(Clone, Debug)]
pub struct OrientationConfig {
    pub clamp_deg: f32,
    pub reject_delta_deg: f32,
    pub prev_weight: f32,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            clamp_deg: ORIENTATION_CLAMP_DEG,
            reject_delta_deg: GIMBAL_REJECT_DELTA_DEG,
            prev_weight: ORIENTATION_PREV_WEIGHT,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GravityConfig {
    pub base_strength: f32,
    pub change_divisor: f32,
    pub change_multiplier_max: f32,
    pub strength_prev_weight: f32,
    pub vertical_gamma_sensitivity: f32,
    pub vertical_boost: f32,
    pub horizontal_beta_scale: f32,
    pub max_upward_fraction: f32,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            base_strength: GRAVITY_BASE_STRENGTH,
            change_divisor: GRAVITY_CHANGE_DIVISOR,
            change_multiplier_max: GRAVITY_CHANGE_MULTIPLIER_MAX,
            strength_prev_weight: GRAVITY_STRENGTH_PREV_WEIGHT,
            vertical_gamma_sensitivity: GRAVITY_VERTICAL_GAMMA_SENSITIVITY,
            vertical_boost: GRAVITY_VERTICAL_BOOST,
            horizontal_beta_scale: GRAVITY_HORIZONTAL_BETA_SCALE,
            max_upward_fraction: GRAVITY_MAX_UPWARD_FRACTION,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    pub particle_count: usize,
    pub particle_radius: f32,
    pub cluster_spacing: f32,
    pub cluster_jitter: f32,
    pub damping: f32,
    pub ring_restitution: f32,
    pub ring_bounce_scale: f32,
    pub vestibule_restitution: f32,
    pub vestibule_damping: f32,
    pub settle_speed: f32,
    pub snap_velocity_scale: f32,
    pub cupula_velocity_scale: f32,
    pub pair_separation_fraction: f32,
    pub pair_restitution: f32,
    pub pair_repulsion: f32,
    pub min_speed: f32,
    pub dissolve_rate: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            particle_radius: PARTICLE_RADIUS,
            cluster_spacing: CLUSTER_SPACING,
            cluster_jitter: CLUSTER_JITTER,
            damping: VELOCITY_DAMPING,
            ring_restitution: RING_RESTITUTION,
            ring_bounce_scale: RING_BOUNCE_SCALE,
            vestibule_restitution: VESTIBULE_RESTITUTION,
            vestibule_damping: VESTIBULE_DAMPING,
            settle_speed: SETTLE_SPEED,
            snap_velocity_scale: SNAP_VELOCITY_SCALE,
            cupula_velocity_scale: CUPULA_VELOCITY_SCALE,
            pair_separation_fraction: PAIR_SEPARATION_FRACTION,
            pair_restitution: PAIR_RESTITUTION,
            pair_repulsion: PAIR_REPULSION,
            min_speed: MIN_SPEED,
            dissolve_rate: DISSOLVE_RATE,
        }
    }
}

#[derive(Clone, Debug)]
pub struct StageConfig {
    pub debounce_ms: f64,
    pub final_debounce_ms: f64,
    pub crossfade_ms: f64,
    /// Forced cue duration per commit, indexed by `to - 2` for commits into
    /// stages 2..=5.
    pub cue_override_ms: [f64; 4],
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            debounce_ms: STAGE_DEBOUNCE_MS,
            final_debounce_ms: FINAL_STAGE_DEBOUNCE_MS,
            crossfade_ms: AVATAR_CROSSFADE_MS,
            cue_override_ms: CUE_OVERRIDE_MS,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CueConfig {
    pub grace_ms: f64,
    pub contact_buffer: f32,
    pub off_delay_ms: f64,
    pub contact_lockout_ms: f64,
    pub fast_speed: f32,
    pub fast_particles: usize,
}

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            grace_ms: CUE_GRACE_MS,
            contact_buffer: CUE_CONTACT_BUFFER,
            off_delay_ms: CUE_OFF_DELAY_MS,
            contact_lockout_ms: CUE_CONTACT_LOCKOUT_MS,
            fast_speed: CUE_FAST_SPEED,
            fast_particles: CUE_FAST_PARTICLES,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CompletionConfig {
    pub fade_steps: u32,
    pub fade_step_ms: f64,
    pub indicator_radius: f32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            fade_steps: FADE_STEPS,
            fade_step_ms: FADE_STEP_MS,
            indicator_radius: COMPLETION_INDICATOR_RADIUS,
        }
    }
}

/// Full tuning set for one simulation instance.
#[derive(Clone, Debug, Default)]
pub struct SimConfig {
    pub geometry: GeometryConfig,
    pub orientation: OrientationConfig,
    pub gravity: GravityConfig,
    pub physics: PhysicsConfig,
    pub stage: StageConfig,
    pub cue: CueConfig,
    pub completion: CompletionConfig,
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.geometry;
        if !(g.inner_radius > 0.0 && g.inner_radius < g.outer_radius) {
            return Err(ConfigError::RingRadii {
                inner: g.inner_radius,
                outer: g.outer_radius,
            });
        }
        let p = &self.physics;
        positive("particle_radius", p.particle_radius as f64)?;
        let tube = g.outer_radius - g.inner_radius;
        if tube < 2.0 * p.particle_radius {
            return Err(ConfigError::TubeTooNarrow {
                tube,
                radius: p.particle_radius,
            });
        }
        if p.particle_count == 0 {
            return Err(ConfigError::NoParticles);
        }
        positive("vestibule_radius", g.vestibule_radius as f64)?;
        positive("cupula_width", g.cupula_width as f64)?;
        positive("dissolve_rate", p.dissolve_rate as f64)?;
        for (field, value) in [
            ("damping", p.damping),
            ("ring_restitution", p.ring_restitution),
            ("ring_bounce_scale", p.ring_bounce_scale),
            ("vestibule_restitution", p.vestibule_restitution),
            ("vestibule_damping", p.vestibule_damping),
            ("snap_velocity_scale", p.snap_velocity_scale),
            ("cupula_velocity_scale", p.cupula_velocity_scale),
            ("pair_separation_fraction", p.pair_separation_fraction),
            ("pair_restitution", p.pair_restitution),
            ("pair_repulsion", p.pair_repulsion),
            ("min_speed", p.min_speed),
            ("cluster_jitter", p.cluster_jitter),
        ] {
            non_negative(field, value as f64)?;
        }
        positive("orientation.clamp_deg", self.orientation.clamp_deg as f64)?;
        positive("gravity.change_divisor", self.gravity.change_divisor as f64)?;
        positive("stage.debounce_ms", self.stage.debounce_ms)?;
        positive("stage.final_debounce_ms", self.stage.final_debounce_ms)?;
        positive("stage.crossfade_ms", self.stage.crossfade_ms)?;
        for ms in self.stage.cue_override_ms {
            non_negative("stage.cue_override_ms", ms)?;
        }
        non_negative("cue.grace_ms", self.cue.grace_ms)?;
        positive("cue.off_delay_ms", self.cue.off_delay_ms)?;
        non_negative("cue.contact_lockout_ms", self.cue.contact_lockout_ms)?;
        positive("completion.fade_step_ms", self.completion.fade_step_ms)?;
        if self.completion.fade_steps == 0 {
            return Err(ConfigError::NotPositive {
                field: "completion.fade_steps",
                value: 0.0,
            });
        }
        Ok(())
    }
}
