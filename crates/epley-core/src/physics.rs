//! Per-tick particle integration.
//!
//! Each tick: gravity and damping, tentative move, vestibule latch, region
//! resolution (ring walls, vestibule walls or soft snap), cupula push-back,
//! pairwise collisions and finally a minimum-speed floor. Dissolving
//! particles only shrink.

use crate::config::PhysicsConfig;
use crate::geometry::{angle_deg, angular_distance_deg, Geometry, Region};
use crate::particle::Particle;
use glam::Vec2;
use rand::Rng;
use smallvec::SmallVec;

/// Lifecycle changes observed during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub entered: usize,
    pub dissolving: usize,
}

#[inline]
fn reflect(velocity: Vec2, wall_normal: Vec2, restitution: f32) -> Vec2 {
    velocity - wall_normal * ((1.0 + restitution) * velocity.dot(wall_normal))
}

pub struct ParticleSimulator {
    cfg: PhysicsConfig,
    geometry: Geometry,
    particles: SmallVec<[Particle; 4]>,
}

impl ParticleSimulator {
    pub fn new(cfg: PhysicsConfig, geometry: Geometry) -> Self {
        Self {
            cfg,
            geometry,
            particles: SmallVec::new(),
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Replace the current particles, e.g. to start from a prepared state.
    pub fn set_particles(&mut self, particles: impl IntoIterator<Item = Particle>) {
        self.particles = particles.into_iter().collect();
    }

    /// Discard everything and lay out a fresh cluster beside the cupula.
    pub fn spawn<R: Rng>(&mut self, rng: &mut R) {
        let jitter = self.cfg.cluster_jitter;
        let radius = self.cfg.particle_radius;
        self.particles = self
            .geometry
            .spawn_cluster(self.cfg.particle_count, self.cfg.cluster_spacing)
            .into_iter()
            .map(|p| {
                let offset = if jitter > 0.0 {
                    Vec2::new(rng.gen_range(-jitter..=jitter), rng.gen_range(-jitter..=jitter))
                } else {
                    Vec2::ZERO
                };
                Particle::new(self.geometry.clamp_to_ring(p + offset, radius), radius)
            })
            .collect();
    }

    pub fn all_entered(&self) -> bool {
        !self.particles.is_empty() && self.particles.iter().all(|p| p.entered_vestibule())
    }

    pub fn step(&mut self, gravity: Vec2) -> TickReport {
        let mut report = TickReport::default();
        for i in 0..self.particles.len() {
            let mut p = self.particles[i];
            if p.is_dissolving() {
                p.radius = (p.radius - self.cfg.dissolve_rate).max(0.0);
            } else {
                self.integrate(&mut p, gravity, &mut report);
            }
            self.particles[i] = p;
        }
        self.resolve_pairs();
        self.apply_speed_floor();
        report
    }

    fn integrate(&self, p: &mut Particle, gravity: Vec2, report: &mut TickReport) {
        let g = &self.geometry;
        p.velocity = (p.velocity + gravity) * self.cfg.damping;
        let mut pos = p.position + p.velocity;

        // The bridge and chamber overlap the ring's outer half; the ring wins
        // there, so sliding past the opening does not count as entering.
        if g.inside_ring(pos) {
            pos = self.resolve_ring(p, pos);
            p.set_region(Region::Ring);
        } else if g.inside_vestibule(pos) {
            if p.mark_entered() {
                report.entered += 1;
                log::debug!("[physics] particle entered vestibule at ({:.1},{:.1})", pos.x, pos.y);
            }
            pos = self.resolve_vestibule(p, pos);
            p.set_region(Region::Vestibule);
            let settle = self.cfg.settle_speed;
            if p.velocity.x.abs() < settle && p.velocity.y.abs() < settle && p.start_dissolving() {
                report.dissolving += 1;
                log::debug!("[physics] particle settled, dissolving");
            }
        } else {
            pos = g.snap_into(pos, p.radius, p.region());
            p.velocity *= self.cfg.snap_velocity_scale;
        }

        if g.cupula_collision(pos, p.radius) && !g.inside_vestibule(pos) {
            let away = (pos - g.cupula.center())
                .try_normalize()
                .unwrap_or_else(|| (pos - g.center).try_normalize().unwrap_or(Vec2::Y).perp());
            pos += away * (p.radius + g.tube_width * 0.5);
            pos = g.snap_into(pos, p.radius, Region::Ring);
            p.velocity *= self.cfg.cupula_velocity_scale;
        }

        p.position = pos;
    }

    fn resolve_ring(&self, p: &mut Particle, mut pos: Vec2) -> Vec2 {
        let g = &self.geometry;
        let rel = pos - g.center;
        let dist = rel.length();
        let Some(outward) = rel.try_normalize() else {
            return pos;
        };
        let r = p.radius;

        if dist + r > g.outer_radius && !g.in_vestibule_gap(angle_deg(rel)) {
            pos = g.center + outward * (g.outer_radius - r);
            self.bounce(p, outward, self.cfg.ring_restitution, self.cfg.ring_bounce_scale);
        }
        if dist - r < g.inner_radius {
            pos = g.center + outward * (g.inner_radius + r);
            self.bounce(p, -outward, self.cfg.ring_restitution, self.cfg.ring_bounce_scale);
        }
        pos
    }

    fn resolve_vestibule(&self, p: &mut Particle, mut pos: Vec2) -> Vec2 {
        let g = &self.geometry;
        let r = p.radius;
        if g.inside_vestibule_chamber(pos) {
            let rel = pos - g.vestibule_center;
            if let Some(outward) = rel.try_normalize() {
                let in_mouth = angular_distance_deg(angle_deg(outward), angle_deg(g.bridge_mouth_dir()))
                    < g.vestibule_mouth_half_angle_deg();
                if rel.length() + r > g.vestibule_radius && !in_mouth {
                    pos = g.vestibule_center + outward * (g.vestibule_radius - r).max(0.0);
                    self.bounce(p, outward, self.cfg.vestibule_restitution, 1.0);
                }
            }
        } else {
            let local = g.bridge_local(pos);
            let half = (g.tube_width * 0.5 - r).max(0.0);
            if local.y.abs() > half {
                let side = g.bridge_normal() * local.y.signum();
                pos -= side * (local.y.abs() - half);
                self.bounce(p, side, self.cfg.vestibule_restitution, 1.0);
            }
        }
        p.velocity *= self.cfg.vestibule_damping;
        pos
    }

    /// Reflect off a wall whose outward normal is `wall_normal`, but only when
    /// the particle is still moving into it.
    fn bounce(&self, p: &mut Particle, wall_normal: Vec2, restitution: f32, scale: f32) {
        if p.velocity.dot(wall_normal) > 0.0 {
            p.velocity = reflect(p.velocity, wall_normal, restitution) * scale;
        }
    }

    fn resolve_pairs(&mut self) {
        let n = self.particles.len();
        let g = &self.geometry;
        let c = &self.cfg;
        for i in 0..n {
            for j in (i + 1)..n {
                let (mut a, mut b) = (self.particles[i], self.particles[j]);
                if a.is_dissolving() || b.is_dissolving() {
                    continue;
                }
                let delta = b.position - a.position;
                let dist = delta.length();
                let min_dist = a.radius + b.radius;
                if dist >= min_dist {
                    continue;
                }
                // coincident centers split along the canal
                let normal = if dist > 0.0 {
                    delta / dist
                } else {
                    (a.position - g.center).try_normalize().unwrap_or(Vec2::X).perp()
                };
                let shift = normal * ((min_dist - dist) * c.pair_separation_fraction * 0.5);
                a.position -= shift;
                b.position += shift;

                let approach = (a.velocity - b.velocity).dot(normal);
                if approach > 0.0 {
                    let impulse = (1.0 + c.pair_restitution) * approach * 0.5;
                    a.velocity -= normal * impulse;
                    b.velocity += normal * impulse;
                }
                a.velocity -= normal * c.pair_repulsion;
                b.velocity += normal * c.pair_repulsion;

                a.position = g.snap_into(a.position, a.radius, a.region());
                b.position = g.snap_into(b.position, b.radius, b.region());
                self.particles[i] = a;
                self.particles[j] = b;
            }
        }
    }

    fn apply_speed_floor(&mut self) {
        let min = self.cfg.min_speed;
        for p in self.particles.iter_mut().filter(|p| !p.is_dissolving()) {
            let speed = p.velocity.length();
            if speed > 0.0 && speed < min {
                p.velocity *= min / speed;
            }
        }
    }
}
