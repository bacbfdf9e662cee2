pub mod clock;
pub mod completion;
pub mod config;
pub mod constants;
pub mod cue;
pub mod fade;
pub mod geometry;
pub mod gravity;
pub mod orientation;
pub mod particle;
pub mod physics;
pub mod simulation;
pub mod stage;
pub mod state;
pub mod timer;

pub use clock::*;
pub use config::*;
pub use geometry::{Geometry, Region};
pub use orientation::{Orientation, OrientationSampler, TiltEmulator, TiltKey};
pub use particle::{Lifecycle, Particle};
pub use simulation::*;
pub use state::*;
