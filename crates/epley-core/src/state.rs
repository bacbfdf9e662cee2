//! Selection and output types shared with the front-ends.
//!
//! Nothing here references a platform API; the web and native front-ends
//! read these to draw the canal, drive the cue tone and show the stage.

use glam::Vec2;
use smallvec::SmallVec;

/// Which labyrinth is being treated. The geometry is mirrored between the two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ear {
    Left,
    Right,
}

impl Ear {
    pub fn name(self) -> &'static str {
        match self {
            Ear::Left => "left",
            Ear::Right => "right",
        }
    }
}

/// Point of view of the trainee. Only the clinician sees the nystagmus cue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Perspective {
    Patient,
    Clinician,
}

impl Perspective {
    pub fn name(self) -> &'static str {
        match self {
            Perspective::Patient => "patient",
            Perspective::Clinician => "clinician",
        }
    }
}

/// Inputs collaborators must supply before the tick loop may run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub ear: Option<Ear>,
    pub perspective: Option<Perspective>,
    pub orientation_permitted: bool,
}

impl Selection {
    /// Ear and perspective, when both are chosen.
    pub fn chosen(&self) -> Option<(Ear, Perspective)> {
        Some((self.ear?, self.perspective?))
    }

    pub fn is_complete(&self) -> bool {
        self.chosen().is_some() && self.orientation_permitted
    }
}

/// Per-particle render data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleView {
    pub position: Vec2,
    pub radius: f32,
    pub dissolving: bool,
}

/// Avatar image blend. `blend` runs 0 -> 1 from `previous_stage` to `stage`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AvatarView {
    pub stage: u8,
    pub previous_stage: u8,
    pub blend: f32,
    pub opacity: f32,
}

/// A committed stage promotion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageCommit {
    pub from: u8,
    pub to: u8,
    pub at: f64,
}

/// Everything a front-end needs to present one frame.
#[derive(Clone, Debug)]
pub struct Frame {
    pub stage: u8,
    pub stage_label: &'static str,
    pub cue_active: bool,
    pub completed: bool,
    pub avatar: AvatarView,
    pub indicator_opacity: f32,
    pub particles: SmallVec<[ParticleView; 4]>,
    /// Set on the tick a promotion was committed.
    pub commit: Option<StageCommit>,
}
