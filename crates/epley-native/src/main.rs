use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use epley_core::{
    Ear, Frame, InstantClock, Perspective, SimConfig, SimEvent, Simulation, TiltEmulator, TiltKey,
};
use glam::Vec2;

mod audio;
mod gpu;
mod scene;

use gpu::Renderer;
use scene::SceneParams;

const IDLE_TITLE: &str = "Epley trainer | L/R ear, P/C perspective";

enum KeyAction {
    Event(SimEvent),
    Tilt(TiltKey),
}

fn key_action(key: &Key) -> Option<KeyAction> {
    match key {
        Key::Named(NamedKey::ArrowUp) => Some(KeyAction::Tilt(TiltKey::Up)),
        Key::Named(NamedKey::ArrowDown) => Some(KeyAction::Tilt(TiltKey::Down)),
        Key::Named(NamedKey::ArrowLeft) => Some(KeyAction::Tilt(TiltKey::Left)),
        Key::Named(NamedKey::ArrowRight) => Some(KeyAction::Tilt(TiltKey::Right)),
        Key::Named(NamedKey::Space) => Some(KeyAction::Event(SimEvent::Reset)),
        Key::Character(s) => match s.as_str() {
            "l" | "L" => Some(KeyAction::Event(SimEvent::SelectEar(Ear::Left))),
            "r" | "R" => Some(KeyAction::Event(SimEvent::SelectEar(Ear::Right))),
            "p" | "P" => Some(KeyAction::Event(SimEvent::SelectPerspective(Perspective::Patient))),
            "c" | "C" => Some(KeyAction::Event(SimEvent::SelectPerspective(Perspective::Clinician))),
            _ => None,
        },
        _ => None,
    }
}

/// Simulation plus the desktop stand-ins for phone sensors.
struct Trainer {
    sim: Simulation<InstantClock>,
    tilt: TiltEmulator,
    cue_gate: Arc<AtomicBool>,
    indicator_radius: f32,
    cursor: Vec2,
    last_tick: Instant,
    title: String,
}

impl Trainer {
    fn on_key(&mut self, key: &Key, pressed: bool, repeat: bool) {
        match key_action(key) {
            Some(KeyAction::Tilt(k)) => self.tilt.set_key(k, pressed),
            Some(KeyAction::Event(ev)) if pressed && !repeat => self.sim.handle(ev),
            _ => {}
        }
    }

    fn title_for(&self, frame: Option<&Frame>) -> String {
        match frame {
            Some(f) => format!(
                "Epley trainer | stage {}: {} | cue {}{}",
                f.stage,
                f.stage_label,
                if f.cue_active { "on" } else { "off" },
                if f.completed { " | complete, click the center" } else { "" }
            ),
            None => IDLE_TITLE.to_string(),
        }
    }

    /// Step the tilt emulator and the simulation, then rebuild the scene.
    fn advance(&mut self, gpu: &mut Renderer) {
        let now = Instant::now();
        let dt = (now - self.last_tick).as_secs_f32().min(0.1);
        self.last_tick = now;

        let o = self.tilt.step(dt);
        self.sim.handle(SimEvent::Orientation {
            beta: Some(o.beta as f64),
            gamma: Some(o.gamma as f64),
        });
        let frame = self.sim.tick();
        self.cue_gate
            .store(frame.as_ref().is_some_and(|f| f.cue_active), Ordering::Relaxed);

        let title = self.title_for(frame.as_ref());
        if title != self.title {
            gpu.window.set_title(&title);
            self.title = title;
        }

        let params = SceneParams {
            world: gpu.view.world,
            show_cue: self.sim.selection().perspective == Some(Perspective::Clinician),
            indicator_radius: self.indicator_radius,
        };
        scene::build_instances(frame.as_ref(), self.sim.geometry(), params, &mut gpu.instances);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cue_gate = Arc::new(AtomicBool::new(false));
    let _audio_stream = audio::start_cue_tone(Arc::clone(&cue_gate));

    let config = SimConfig::default();
    let world = Vec2::from(config.geometry.world_size);
    let indicator_radius = config.completion.indicator_radius;
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let mut sim = Simulation::new(config, seed, InstantClock::new())?;
    // The arrow keys are the motion sensor here.
    sim.handle(SimEvent::OrientationPermission(true));

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(IDLE_TITLE)
        .with_inner_size(LogicalSize::new(640.0, 640.0))
        .build(&event_loop)?;

    let mut gpu = pollster::block_on(Renderer::new(&window, world))?;
    let mut trainer = Trainer {
        sim,
        tilt: TiltEmulator::new(),
        cue_gate,
        indicator_radius,
        cursor: Vec2::ZERO,
        last_tick: Instant::now(),
        title: String::new(),
    };

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => gpu.resize(size),
            WindowEvent::CloseRequested => {
                trainer.sim.handle(SimEvent::Teardown);
                elwt.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => trainer.on_key(
                &event.logical_key,
                event.state == ElementState::Pressed,
                event.repeat,
            ),
            WindowEvent::CursorMoved { position, .. } => {
                trainer.cursor = Vec2::new(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            } => {
                let p = gpu.view.to_world(trainer.cursor);
                trainer.sim.handle(SimEvent::Tap { x: p.x, y: p.y });
            }
            _ => {}
        },
        Event::AboutToWait => {
            trainer.advance(&mut gpu);
            if let Err(err) = gpu.render() {
                match err {
                    wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                        gpu.resize(gpu.window.inner_size())
                    }
                    wgpu::SurfaceError::OutOfMemory => {
                        log::error!("[render] out of memory, closing");
                        elwt.exit();
                    }
                    other => log::warn!("[render] skipped frame: {other:?}"),
                }
            }
            gpu.window.request_redraw();
        }
        _ => {}
    })?;
    Ok(())
}
