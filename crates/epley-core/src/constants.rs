// Tuning constants for the canal simulation. Values are tuned for feel on a
// phone held in portrait, not derived from a physical model.

// World layout (logical units, y grows downward)
pub const WORLD_SIZE: [f32; 2] = [440.0, 440.0];
pub const RING_CENTER: [f32; 2] = [220.0, 200.0];
pub const RING_OUTER_RADIUS: f32 = 150.0;
pub const RING_INNER_RADIUS: f32 = 110.0;

// Cupula obstacle at the bottom center of the ring
pub const CUPULA_ANGLE_DEG: f32 = 90.0;
pub const CUPULA_WIDTH: f32 = 12.0;

// Vestibule chamber and the bridge that joins it to the ring
pub const RIGHT_EAR_VESTIBULE_ANGLE_DEG: f32 = 60.0;
pub const LEFT_EAR_VESTIBULE_ANGLE_DEG: f32 = 120.0;
pub const VESTIBULE_DISTANCE: f32 = 195.0; // ring center -> vestibule center
pub const VESTIBULE_RADIUS: f32 = 50.0;
pub const BRIDGE_START: f32 = 130.0; // distance from ring center along the vestibule axis
pub const VESTIBULE_GAP_HALF_ANGLE_DEG: f32 = 8.0; // outer wall opening around the bridge

// Spawn cluster
pub const SPAWN_OFFSET_DEG: f32 = 30.0; // right ear: cupula + 30, left ear: cupula - 30
pub const PARTICLE_COUNT: usize = 4;
pub const PARTICLE_RADIUS: f32 = 6.0;
pub const CLUSTER_SPACING: f32 = 7.0; // half spacing of the 2x2 grid
pub const CLUSTER_JITTER: f32 = 0.5;

// Orientation sampling
pub const ORIENTATION_CLAMP_DEG: f32 = 30.0;
pub const GIMBAL_REJECT_DELTA_DEG: f32 = 90.0;
pub const ORIENTATION_PREV_WEIGHT: f32 = 0.3; // stable = w*prev + (1-w)*clamped

// Gravity mapping
pub const GRAVITY_BASE_STRENGTH: f32 = 0.08;
pub const GRAVITY_CHANGE_DIVISOR: f32 = 15.0;
pub const GRAVITY_CHANGE_MULTIPLIER_MAX: f32 = 2.2;
pub const GRAVITY_STRENGTH_PREV_WEIGHT: f32 = 0.7;
pub const GRAVITY_VERTICAL_GAMMA_SENSITIVITY: f32 = 0.6;
pub const GRAVITY_VERTICAL_BOOST: f32 = 1.2;
pub const GRAVITY_HORIZONTAL_BETA_SCALE: f32 = 0.1;
pub const GRAVITY_MAX_UPWARD_FRACTION: f32 = 0.15;

// Particle integration
pub const VELOCITY_DAMPING: f32 = 0.96;
pub const RING_RESTITUTION: f32 = 1.1;
pub const RING_BOUNCE_SCALE: f32 = 0.97;
pub const VESTIBULE_RESTITUTION: f32 = 1.2;
pub const VESTIBULE_DAMPING: f32 = 0.7;
pub const SETTLE_SPEED: f32 = 0.1; // per-axis threshold that starts dissolving
pub const SNAP_VELOCITY_SCALE: f32 = 0.8;
pub const CUPULA_VELOCITY_SCALE: f32 = 0.7;
pub const PAIR_SEPARATION_FRACTION: f32 = 0.6;
pub const PAIR_RESTITUTION: f32 = 0.85;
pub const PAIR_REPULSION: f32 = 0.02;
pub const MIN_SPEED: f32 = 0.008;
pub const DISSOLVE_RATE: f32 = 0.02; // radius lost per tick

// Stage tracking (milliseconds)
pub const STAGE_DEBOUNCE_MS: f64 = 300.0;
pub const FINAL_STAGE_DEBOUNCE_MS: f64 = 50.0;
pub const AVATAR_CROSSFADE_MS: f64 = 600.0;
pub const CUE_OVERRIDE_MS: [f64; 4] = [10_000.0, 3_000.0, 5_000.0, 2_000.0]; // 1->2 .. 4->5

// Nystagmus cue (milliseconds / speed units)
pub const CUE_GRACE_MS: f64 = 2_000.0;
pub const CUE_CONTACT_BUFFER: f32 = 15.0;
pub const CUE_OFF_DELAY_MS: f64 = 1_500.0;
pub const CUE_CONTACT_LOCKOUT_MS: f64 = 500.0;
pub const CUE_FAST_SPEED: f32 = 0.2;
pub const CUE_FAST_PARTICLES: usize = 3;

// Completion sequence
pub const FADE_STEPS: u32 = 20;
pub const FADE_STEP_MS: f64 = 50.0;
pub const COMPLETION_INDICATOR_RADIUS: f32 = 60.0;
