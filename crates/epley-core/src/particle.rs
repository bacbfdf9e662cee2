use crate::geometry::Region;
use crate::state::ParticleView;
use glam::Vec2;

/// Where a particle is in its one-way journey to the vestibule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Lifecycle {
    Active,
    EnteredVestibule,
    Dissolving { original_radius: f32 },
}

/// A single otoconium.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    lifecycle: Lifecycle,
    region: Region,
}

impl Particle {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            radius,
            lifecycle: Lifecycle::Active,
            region: Region::Ring,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Last valid region the particle was resolved into.
    pub fn region(&self) -> Region {
        self.region
    }

    pub(crate) fn set_region(&mut self, region: Region) {
        self.region = region;
    }

    pub fn entered_vestibule(&self) -> bool {
        !matches!(self.lifecycle, Lifecycle::Active)
    }

    pub fn is_dissolving(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Dissolving { .. })
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Latch the vestibule flag. Returns `true` only on the first call.
    pub fn mark_entered(&mut self) -> bool {
        if self.lifecycle == Lifecycle::Active {
            self.lifecycle = Lifecycle::EnteredVestibule;
            true
        } else {
            false
        }
    }

    /// Start shrinking. Implies the vestibule latch. Returns `true` only once.
    pub fn start_dissolving(&mut self) -> bool {
        if self.is_dissolving() {
            return false;
        }
        self.lifecycle = Lifecycle::Dissolving {
            original_radius: self.radius,
        };
        true
    }

    pub fn view(&self) -> ParticleView {
        ParticleView {
            position: self.position,
            radius: self.radius,
            dissolving: self.is_dissolving(),
        }
    }
}
