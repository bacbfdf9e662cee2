// Particle integration: containment, wall response, collisions, dissolving.

use epley_core::geometry::{angle_deg, angular_distance_deg};
use epley_core::physics::ParticleSimulator;
use epley_core::{Ear, Geometry, GeometryConfig, Lifecycle, Particle, PhysicsConfig};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn simulator(ear: Ear) -> ParticleSimulator {
    let geometry = Geometry::new(&GeometryConfig::default(), ear);
    ParticleSimulator::new(PhysicsConfig::default(), geometry)
}

fn assert_sane(sim: &ParticleSimulator, tick: usize) {
    let g = sim.geometry();
    for p in sim.particles() {
        assert!(
            p.position.is_finite() && p.velocity.is_finite() && p.radius.is_finite(),
            "non-finite particle at tick {tick}: {p:?}"
        );
        assert!(p.radius >= 0.0);
        if p.radius > 0.0 {
            assert!(
                g.is_in_valid_space(p.position),
                "particle escaped at tick {tick}: {p:?}"
            );
        }
    }
}

#[test]
fn spawn_places_cluster_in_ring() {
    let mut sim = simulator(Ear::Right);
    sim.spawn(&mut StdRng::seed_from_u64(7));
    assert_eq!(sim.particles().len(), 4);
    let g = sim.geometry();
    for p in sim.particles() {
        assert!(g.inside_ring(p.position));
        assert_eq!(p.lifecycle(), Lifecycle::Active);
        assert_eq!(p.velocity, Vec2::ZERO);
    }
    assert!(!sim.all_entered());
}

#[test]
fn long_runs_stay_finite_and_contained() {
    let tilts = [
        Vec2::ZERO,
        Vec2::new(0.0, 0.08),
        Vec2::new(0.05, 0.02),
        Vec2::new(-0.17, 0.0),
        Vec2::new(0.0, -0.012),
    ];
    for (seed, ear) in [(1u64, Ear::Right), (2, Ear::Left)] {
        let mut sim = simulator(ear);
        sim.spawn(&mut StdRng::seed_from_u64(seed));
        let mut entered_seen = [false; 4];
        for tick in 0..10_000 {
            let g = tilts[(tick / 700) % tilts.len()];
            sim.step(g);
            assert_sane(&sim, tick);
            for (seen, p) in entered_seen.iter_mut().zip(sim.particles()) {
                // the vestibule latch never resets within a run
                assert!(!*seen || p.entered_vestibule());
                *seen = p.entered_vestibule();
            }
        }
    }
}

/// A particle somewhere in valid space: mostly the ring, sometimes the chamber.
fn random_particle(rng: &mut StdRng, g: &Geometry, radius: f32) -> Particle {
    let position = if rng.gen_bool(0.2) {
        let reach = g.vestibule_radius - radius;
        let dir = Vec2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU));
        g.vestibule_center + dir * rng.gen_range(0.0..reach)
    } else {
        let dist = rng.gen_range(g.inner_radius + radius..=g.outer_radius - radius);
        g.point_at(rng.gen_range(0.0..360.0), dist)
    };
    let velocity = Vec2::new(rng.gen_range(-3.0..=3.0), rng.gen_range(-3.0..=3.0));
    Particle::new(position, radius).with_velocity(velocity)
}

#[test]
fn random_initial_states_stay_finite_and_contained() {
    for seed in 0..12u64 {
        let ear = if seed % 2 == 0 { Ear::Right } else { Ear::Left };
        let mut sim = simulator(ear);
        let g = sim.geometry().clone();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut particles: Vec<Particle> =
            (0..4).map(|_| random_particle(&mut rng, &g, 6.0)).collect();
        if seed % 3 == 0 {
            // exactly coincident pair
            particles[1] = particles[0];
        }
        sim.set_particles(particles);

        let gravity = Vec2::new(rng.gen_range(-0.17..=0.17), rng.gen_range(-0.012..=0.18));
        for tick in 0..10_000 {
            sim.step(gravity);
            assert_sane(&sim, tick);
        }
    }
}

#[test]
fn coincident_resting_pair_separates() {
    let mut sim = simulator(Ear::Right);
    let g = sim.geometry().clone();
    let at = g.point_at(200.0, g.mid_radius());
    sim.set_particles([Particle::new(at, 6.0), Particle::new(at, 6.0)]);
    for tick in 0..200 {
        sim.step(Vec2::ZERO);
        assert_sane(&sim, tick);
    }
    let [a, b] = [sim.particles()[0], sim.particles()[1]];
    assert!(a.position.distance(b.position) > 11.0);
}

#[test]
fn steady_downward_gravity_settles_beside_cupula() {
    let mut sim = simulator(Ear::Right);
    sim.spawn(&mut StdRng::seed_from_u64(42));
    let g = sim.geometry().clone();
    let from_cupula = |p: &Particle| angular_distance_deg(angle_deg(p.position - g.center), 90.0);
    let before: Vec<f32> = sim.particles().iter().map(from_cupula).collect();

    for tick in 0..500 {
        sim.step(Vec2::new(0.0, 0.08));
        assert_sane(&sim, tick);
    }
    for (p, start) in sim.particles().iter().zip(&before) {
        let now = from_cupula(p);
        assert!(now < *start, "moved away from the cupula: {start} -> {now}");
        assert!(now < 20.0, "still {now} degrees from the cupula");
        assert!(g.inside_ring(p.position));
    }
}

#[test]
fn sliding_past_bridge_opening_is_not_entering() {
    let mut sim = simulator(Ear::Right);
    let g = sim.geometry().clone();
    // outer half of the tube, where the bridge overlaps the ring
    sim.set_particles(
        [55.0f32, 62.0, 68.0]
            .iter()
            .map(|&a| Particle::new(g.point_at(a, 140.0), 6.0)),
    );
    for tick in 0..120 {
        let report = sim.step(Vec2::ZERO);
        assert_eq!(report.entered, 0, "latched at tick {tick}");
    }
    assert!(sim
        .particles()
        .iter()
        .all(|p| p.lifecycle() == Lifecycle::Active));
    assert!(!sim.all_entered());

    // past the outer wall along the bridge it does count
    sim.set_particles([Particle::new(g.point_at(60.0, 165.0), 6.0)]);
    let report = sim.step(Vec2::ZERO);
    assert_eq!(report.entered, 1);
    assert!(sim.all_entered());
}

#[test]
fn resting_particle_in_vestibule_dissolves() {
    let mut sim = simulator(Ear::Right);
    let center = sim.geometry().vestibule_center;
    sim.set_particles([Particle::new(center, 6.0)]);

    let report = sim.step(Vec2::ZERO);
    assert_eq!(report.entered, 1);
    assert_eq!(report.dissolving, 1);
    assert!(sim.particles()[0].is_dissolving());
    assert!(sim.all_entered());

    let mut last = sim.particles()[0].radius;
    // 6.0 / 0.02 ticks, plus slack for float error
    for _ in 0..305 {
        let report = sim.step(Vec2::ZERO);
        assert_eq!(report.dissolving, 0);
        let r = sim.particles()[0].radius;
        assert!(r <= last);
        last = r;
    }
    assert_eq!(last, 0.0);
    assert!(matches!(
        sim.particles()[0].lifecycle(),
        Lifecycle::Dissolving { original_radius } if original_radius == 6.0
    ));
}

#[test]
fn outer_wall_reflects_only_inbound_motion() {
    let mut sim = simulator(Ear::Right);
    let g = sim.geometry().clone();

    // moving into the wall at 180 degrees: pushed back and reflected
    let start = g.point_at(180.0, 144.0);
    sim.set_particles([Particle::new(start, 6.0).with_velocity(Vec2::new(-0.5, 0.0))]);
    sim.step(Vec2::ZERO);
    let p = sim.particles()[0];
    assert!((p.position.distance(g.center) - 144.0).abs() < 1e-3);
    assert!(p.velocity.x > 0.0);

    // already overlapping but moving away: clamped, velocity untouched
    let start = g.point_at(180.0, 145.0);
    sim.set_particles([Particle::new(start, 6.0).with_velocity(Vec2::new(0.5, 0.0))]);
    sim.step(Vec2::ZERO);
    let p = sim.particles()[0];
    assert!((p.position.distance(g.center) - 144.0).abs() < 1e-3);
    assert!((p.velocity.x - 0.48).abs() < 1e-4);
}

#[test]
fn inner_wall_reflects_inbound_motion() {
    let mut sim = simulator(Ear::Right);
    let g = sim.geometry().clone();
    let start = g.point_at(180.0, 116.0);
    sim.set_particles([Particle::new(start, 6.0).with_velocity(Vec2::new(0.5, 0.0))]);
    sim.step(Vec2::ZERO);
    let p = sim.particles()[0];
    assert!(p.position.distance(g.center) >= 116.0 - 1e-3);
    assert!(p.velocity.x < 0.0);
}

#[test]
fn cupula_pushes_particles_back() {
    let mut sim = simulator(Ear::Right);
    let g = sim.geometry().clone();
    let start = Vec2::new(g.cupula.max.x + 9.0, g.cupula.center().y);
    sim.set_particles([Particle::new(start, 6.0).with_velocity(Vec2::new(-5.0, 0.0))]);
    sim.step(Vec2::ZERO);
    let p = sim.particles()[0];
    assert!(!g.cupula_collision(p.position, p.radius));
    assert!(p.position.x > g.cupula.max.x);
    assert!(g.inside_ring(p.position));
    // damped by the cupula on top of the usual damping
    assert!(p.velocity.length() < 4.8 * 0.75);
}

#[test]
fn overlapping_pair_separates() {
    let mut sim = simulator(Ear::Right);
    let g = sim.geometry().clone();
    let a = g.point_at(180.0, 130.0);
    let b = a + Vec2::new(0.0, 4.0);
    sim.set_particles([Particle::new(a, 6.0), Particle::new(b, 6.0)]);
    sim.step(Vec2::ZERO);
    let (pa, pb) = (sim.particles()[0], sim.particles()[1]);
    assert!(pa.position.distance(pb.position) > 4.0);
    // repulsion drives them apart even without an approach velocity
    assert!(pb.velocity.y > pa.velocity.y);
}

#[test]
fn approaching_pair_exchanges_momentum() {
    let mut sim = simulator(Ear::Right);
    let g = sim.geometry().clone();
    let a = g.point_at(180.0, 130.0);
    let b = a + Vec2::new(0.0, 11.0);
    sim.set_particles([
        Particle::new(a, 6.0).with_velocity(Vec2::new(0.0, 1.0)),
        Particle::new(b, 6.0).with_velocity(Vec2::new(0.0, -1.0)),
    ]);
    sim.step(Vec2::ZERO);
    let (pa, pb) = (sim.particles()[0], sim.particles()[1]);
    assert!(pa.velocity.y < 0.0);
    assert!(pb.velocity.y > 0.0);
}

#[test]
fn slow_particles_keep_a_minimum_speed() {
    let mut sim = simulator(Ear::Right);
    let g = sim.geometry().clone();
    let start = g.point_at(180.0, 130.0);
    sim.set_particles([Particle::new(start, 6.0).with_velocity(Vec2::new(0.0, 0.005))]);
    sim.step(Vec2::ZERO);
    let speed = sim.particles()[0].speed();
    assert!((speed - PhysicsConfig::default().min_speed).abs() < 1e-6);

    // a particle at rest stays at rest
    sim.set_particles([Particle::new(start, 6.0)]);
    sim.step(Vec2::ZERO);
    assert_eq!(sim.particles()[0].velocity, Vec2::ZERO);
}

#[test]
fn dissolving_particles_skip_collisions() {
    let mut sim = simulator(Ear::Right);
    let c = sim.geometry().vestibule_center;
    sim.set_particles([Particle::new(c, 6.0), Particle::new(c + Vec2::new(5.0, 0.0), 6.0)]);
    sim.step(Vec2::ZERO);
    assert!(sim.particles().iter().all(|p| p.is_dissolving()));
    let before: Vec<Vec2> = sim.particles().iter().map(|p| p.position).collect();
    sim.step(Vec2::ZERO);
    let after: Vec<Vec2> = sim.particles().iter().map(|p| p.position).collect();
    assert_eq!(before, after);
}
