//! The single owner of simulation state.
//!
//! Front-ends feed [`SimEvent`]s in and call [`Simulation::tick`] once per
//! display frame. Everything derived from a run (particles, stage, cue,
//! completion, gravity smoothing) lives in one [`Run`] record that is replaced
//! wholesale on every spawn, so there is never a stale timer to cancel.

use crate::clock::{Clock, Millis};
use crate::completion::{hits_indicator, CompletionState};
use crate::config::{ConfigError, SimConfig};
use crate::cue::{CueObservation, CueState};
use crate::geometry::Geometry;
use crate::gravity::GravityModel;
use crate::orientation::{Orientation, OrientationSampler};
use crate::physics::ParticleSimulator;
use crate::stage::{candidate_stage, cue_override_ms, stage_label, AvatarBlend, StageState};
use crate::state::{Ear, Frame, Perspective, Selection};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimEvent {
    SelectEar(Ear),
    SelectPerspective(Perspective),
    OrientationPermission(bool),
    /// Raw device tilt in degrees; `None` when the sensor left a field empty.
    Orientation {
        beta: Option<f64>,
        gamma: Option<f64>,
    },
    Reset,
    /// Tap in world coordinates.
    Tap {
        x: f32,
        y: f32,
    },
    Teardown,
}

/// State of one run, from spawn to the next spawn.
pub struct Run {
    pub ear: Ear,
    pub perspective: Perspective,
    pub physics: ParticleSimulator,
    pub gravity: GravityModel,
    pub stage: StageState,
    pub avatar: AvatarBlend,
    pub cue: CueState,
    pub completion: CompletionState,
    pub spawned_at: Millis,
    pub ticks: u64,
}

pub struct Simulation<C: Clock> {
    config: SimConfig,
    clock: C,
    rng: StdRng,
    selection: Selection,
    sampler: OrientationSampler,
    run: Option<Run>,
    runs_started: u64,
}

impl<C: Clock> Simulation<C> {
    pub fn new(config: SimConfig, seed: u64, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let sampler = OrientationSampler::new(config.orientation.clone());
        Ok(Self {
            config,
            clock,
            rng: StdRng::seed_from_u64(seed),
            selection: Selection::default(),
            sampler,
            run: None,
            runs_started: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// True while the tick loop should be driven.
    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn run(&self) -> Option<&Run> {
        self.run.as_ref()
    }

    pub fn run_mut(&mut self) -> Option<&mut Run> {
        self.run.as_mut()
    }

    /// Number of spawns so far, including respawns.
    pub fn runs_started(&self) -> u64 {
        self.runs_started
    }

    pub fn orientation(&self) -> Orientation {
        self.sampler.current()
    }

    pub fn stage(&self) -> Option<u8> {
        self.run.as_ref().map(|r| r.stage.current)
    }

    pub fn cue_active(&self) -> bool {
        self.run.as_ref().is_some_and(|r| r.cue.active)
    }

    pub fn completed(&self) -> bool {
        self.run.as_ref().is_some_and(|r| r.completion.is_fired())
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        self.run.as_ref().map(|r| r.physics.geometry())
    }

    pub fn handle(&mut self, event: SimEvent) {
        match event {
            SimEvent::SelectEar(ear) => {
                self.selection.ear = Some(ear);
                self.sync_selection();
            }
            SimEvent::SelectPerspective(perspective) => {
                self.selection.perspective = Some(perspective);
                self.sync_selection();
            }
            SimEvent::OrientationPermission(granted) => {
                log::info!("[sim] orientation permission {}", if granted { "granted" } else { "denied" });
                self.selection.orientation_permitted = granted;
                if granted {
                    if self.run.is_none() {
                        self.sync_selection();
                    }
                } else {
                    self.stop();
                }
            }
            SimEvent::Orientation { beta, gamma } => {
                self.sampler.push(beta, gamma);
            }
            SimEvent::Reset => {
                if self.selection.is_complete() {
                    log::info!("[sim] reset requested");
                    self.respawn();
                }
            }
            SimEvent::Tap { x, y } => self.on_tap(Vec2::new(x, y)),
            SimEvent::Teardown => {
                log::info!("[sim] teardown");
                self.selection.ear = None;
                self.selection.perspective = None;
                self.stop();
            }
        }
    }

    fn sync_selection(&mut self) {
        if self.selection.is_complete() {
            self.respawn();
        } else {
            self.stop();
        }
    }

    fn on_tap(&mut self, point: Vec2) {
        let Some(run) = self.run.as_ref() else {
            return;
        };
        if !run.completion.is_fired() {
            return;
        }
        let center = run.physics.geometry().center;
        if hits_indicator(point, center, self.config.completion.indicator_radius) {
            log::info!("[gesture] completion indicator tapped");
            self.respawn();
        }
    }

    fn stop(&mut self) {
        if self.run.take().is_some() {
            log::info!("[sim] stopped");
        }
    }

    /// Replace the current run with a fresh cluster beside the cupula.
    fn respawn(&mut self) {
        let Some((ear, perspective)) = self.selection.chosen() else {
            return;
        };
        let now = self.clock.now_ms();
        let geometry = Geometry::new(&self.config.geometry, ear);
        let mut physics = ParticleSimulator::new(self.config.physics.clone(), geometry);
        physics.spawn(&mut self.rng);
        self.runs_started += 1;
        log::info!(
            "[sim] spawned {} particles, ear={} perspective={} run={}",
            physics.particles().len(),
            ear.name(),
            perspective.name(),
            self.runs_started
        );
        self.run = Some(Run {
            ear,
            perspective,
            physics,
            gravity: GravityModel::new(self.config.gravity.clone()),
            stage: StageState::default(),
            avatar: AvatarBlend::default(),
            cue: CueState::spawned(now),
            completion: CompletionState::default(),
            spawned_at: now,
            ticks: 0,
        });
    }

    /// Advance one frame. Returns `None` when the loop should not be running.
    pub fn tick(&mut self) -> Option<Frame> {
        let now = self.clock.now_ms();
        let cfg = &self.config;
        let orientation = self.sampler.current();
        let run = self.run.as_mut()?;
        run.ticks += 1;

        let g = run.gravity.step(orientation);
        let report = run.physics.step(g);
        if report.dissolving > 0 {
            log::debug!("[sim] {} particle(s) began dissolving", report.dissolving);
        }

        let geometry = run.physics.geometry();
        let angles = run.physics.particles().iter().map(|p| geometry.angle_of(p.position));
        let mut commit = None;
        if let Some(candidate) = candidate_stage(run.ear, angles) {
            let (next, committed) = run.stage.step(candidate, now, &cfg.stage);
            run.stage = next;
            if let Some(c) = committed {
                log::info!("[stage] {} -> {} at {:.0}ms", c.from, c.to, c.at - run.spawned_at);
                run.avatar.on_commit(&c, &cfg.stage);
                if run.perspective == Perspective::Clinician {
                    if let Some(ms) = cue_override_ms(c.to, &cfg.stage) {
                        run.cue = run.cue.with_override(now, ms);
                    }
                }
                commit = Some(c);
            }
        }

        if run.perspective == Perspective::Clinician {
            let obs = CueObservation::from_particles(run.physics.particles(), run.physics.geometry(), &cfg.cue);
            let was_active = run.cue.active;
            run.cue = run.cue.step(obs, now, &cfg.cue);
            if run.cue.active != was_active {
                log::debug!("[cue] {}", if run.cue.active { "on" } else { "off" });
            }
        } else {
            run.cue.active = false;
        }

        if run
            .completion
            .check(run.physics.all_entered(), run.stage.current, now)
        {
            log::info!("[sim] run complete after {} ticks", run.ticks);
        }

        let mut frame = Self::snapshot(run, now, cfg);
        frame.commit = commit;
        Some(frame)
    }

    /// Current frame without advancing, e.g. to redraw after an event.
    pub fn frame(&self) -> Option<Frame> {
        let now = self.clock.now_ms();
        self.run.as_ref().map(|run| Self::snapshot(run, now, &self.config))
    }

    fn snapshot(run: &Run, now: Millis, cfg: &SimConfig) -> Frame {
        let stage = run.stage.current;
        Frame {
            stage,
            stage_label: stage_label(stage),
            cue_active: run.cue.active,
            completed: run.completion.is_fired(),
            avatar: run
                .avatar
                .view(now, run.completion.avatar_opacity(now, &cfg.completion)),
            indicator_opacity: run.completion.indicator_opacity(now, &cfg.completion),
            particles: run.physics.particles().iter().map(|p| p.view()).collect(),
            commit: None,
        }
    }
}
