//! Nystagmus cue for the clinician view.
//!
//! A pure transition over [`CueState`]. Rules, in order: a due turn-off fires;
//! the post-spawn grace period forces the cue off; a stage override forces it
//! on; cupula contact records the contact and arms a turn-off; shortly after
//! contact velocity cannot switch the cue on; otherwise enough fast particles
//! switch it on and a quiet spell switches it off after a delay.

use crate::clock::Millis;
use crate::config::CueConfig;
use crate::geometry::Geometry;
use crate::particle::Particle;
use crate::timer::Deadline;

/// What the cue rules need to know about the particles this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CueObservation {
    pub fast_particles: usize,
    pub cupula_contact: bool,
}

impl CueObservation {
    pub fn from_particles(particles: &[Particle], geometry: &Geometry, cfg: &CueConfig) -> Self {
        let zone = geometry.cupula.expanded(cfg.contact_buffer);
        Self {
            fast_particles: particles.iter().filter(|p| p.speed() > cfg.fast_speed).count(),
            cupula_contact: particles
                .iter()
                .any(|p| p.radius > 0.0 && zone.intersects_box(p.position, p.radius)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CueState {
    pub active: bool,
    pub spawned_at: Millis,
    pub off_deadline: Deadline,
    pub last_contact: Option<Millis>,
    pub override_until: Option<Millis>,
}

impl CueState {
    pub fn spawned(now: Millis) -> Self {
        Self {
            active: false,
            spawned_at: now,
            off_deadline: Deadline::IDLE,
            last_contact: None,
            override_until: None,
        }
    }

    /// Force the cue on until `now + duration_ms`, replacing any earlier override.
    pub fn with_override(self, now: Millis, duration_ms: Millis) -> Self {
        Self {
            override_until: Some(now + duration_ms),
            ..self
        }
    }

    pub fn in_grace(&self, now: Millis, cfg: &CueConfig) -> bool {
        now - self.spawned_at < cfg.grace_ms
    }

    pub fn step(mut self, obs: CueObservation, now: Millis, cfg: &CueConfig) -> CueState {
        if self.off_deadline.fire(now) {
            self.active = false;
        }

        if self.in_grace(now, cfg) {
            self.active = false;
            self.off_deadline.cancel();
            return self;
        }

        match self.override_until {
            Some(until) if now < until => {
                self.active = true;
                self.off_deadline.cancel();
                return self;
            }
            Some(_) => self.override_until = None,
            None => {}
        }

        if obs.cupula_contact {
            self.last_contact = Some(now);
            if self.active {
                self.off_deadline.schedule_if_idle(now, cfg.off_delay_ms);
            }
            return self;
        }

        let locked_out = self
            .last_contact
            .is_some_and(|t| now - t < cfg.contact_lockout_ms);

        if !locked_out && obs.fast_particles >= cfg.fast_particles {
            self.active = true;
            self.off_deadline.cancel();
        } else if self.active {
            self.off_deadline.schedule_if_idle(now, cfg.off_delay_ms);
        }
        self
    }
}
