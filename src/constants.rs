/// Presentation constants for the browser front-end.
///
/// Simulation tuning lives in `epley_core::constants`; these only affect how
/// a frame is drawn and heard.
// DOM contract
pub const CANVAS_ID: &str = "sim-canvas";
pub const EAR_LEFT_ID: &str = "ear-left";
pub const EAR_RIGHT_ID: &str = "ear-right";
pub const PERSPECTIVE_PATIENT_ID: &str = "perspective-patient";
pub const PERSPECTIVE_CLINICIAN_ID: &str = "perspective-clinician";
pub const ENABLE_MOTION_ID: &str = "enable-motion";
pub const RESET_ID: &str = "reset";
pub const STAGE_NUMBER_ID: &str = "stage-number";
pub const STAGE_LABEL_ID: &str = "stage-label";
pub const CUE_INDICATOR_ID: &str = "cue-indicator";
pub const SELECT_OVERLAY_ID: &str = "select-overlay";

// Class toggled on the chosen selection buttons and the lit cue indicator
pub const ACTIVE_CLASS: &str = "active";
pub const HIDDEN_CLASS: &str = "hidden";

// Palette
pub const BACKGROUND: &str = "#0b1220";
pub const CANAL_FILL: &str = "rgba(120, 170, 230, 0.18)";
pub const CANAL_STROKE: &str = "rgba(160, 200, 255, 0.75)";
pub const CUPULA_FILL: &str = "rgba(240, 170, 90, 0.9)";
pub const PARTICLE_FILL: &str = "#f4f1e8";
pub const CUE_ON: &str = "#ff6b6b";
pub const CUE_OFF: &str = "rgba(255, 255, 255, 0.25)";
pub const INDICATOR_FILL: &str = "rgba(90, 200, 140, 1)";
pub const TEXT_FILL: &str = "#e8eefc";

pub const CANAL_LINE_WIDTH: f64 = 2.0; // world units
pub const DISSOLVING_ALPHA: f64 = 0.55;

// Avatar card in the top-left corner (world units)
pub const AVATAR_ORIGIN: [f32; 2] = [12.0, 12.0];
pub const AVATAR_SIZE: f32 = 56.0;

// Cue eye in the top-right corner (world units)
pub const CUE_EYE_RADIUS: f32 = 14.0;
pub const CUE_EYE_BEAT_HZ: f64 = 3.0; // pupil jerk frequency while the cue is on

// Cue tone
pub const CUE_TONE_HZ: f32 = 440.0;
pub const CUE_TONE_LEVEL: f32 = 0.08;
pub const CUE_TONE_RAMP_SEC: f64 = 0.08;

// Keyboard tilt never runs with a dt larger than this (tab switches)
pub const MAX_FRAME_DT_SEC: f32 = 0.1;
