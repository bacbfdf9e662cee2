#![cfg(target_arch = "wasm32")]
use epley_core::{Ear, InstantClock, Perspective, SimConfig, SimEvent, Simulation, TiltEmulator};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;
mod render;

use constants::*;

fn wire_canvas_resize(window: &web::Window, canvas: &web::HtmlCanvasElement) {
    dom::fit_canvas_to_display(canvas);
    let canvas = canvas.clone();
    dom::listen(window, "resize", move || dom::fit_canvas_to_display(&canvas));
}

/// Shared handles every event listener needs.
#[derive(Clone)]
pub(crate) struct App {
    pub sim: frame::SharedSim,
    pub tilt: Rc<RefCell<TiltEmulator>>,
    pub frame_ctx: Rc<RefCell<frame::FrameContext>>,
    pub loop_handle: Rc<RefCell<Option<frame::LoopHandle>>>,
    pub cue_tone: Rc<RefCell<Option<audio::CueTone>>>,
    pub document: web::Document,
}

impl App {
    pub fn world_size(&self) -> Vec2 {
        Vec2::from(self.sim.borrow().config().geometry.world_size)
    }

    /// Apply one event and keep the loop and overlay in step with the result.
    pub fn dispatch(&self, event: SimEvent) {
        let (runs_before, running_before, selection_before) = {
            let sim = self.sim.borrow();
            (sim.runs_started(), sim.is_running(), sim.selection())
        };
        self.sim.borrow_mut().handle(event);
        let (runs_after, running_after, selection_after) = {
            let sim = self.sim.borrow();
            (sim.runs_started(), sim.is_running(), sim.selection())
        };
        if runs_after != runs_before || running_after != running_before {
            self.restart_loop();
        }
        if selection_after != selection_before {
            overlay::sync(&self.document, selection_after);
        }
    }

    /// Cancel any running loop, then start a fresh one if the simulation runs.
    pub fn restart_loop(&self) {
        if let Some(handle) = self.loop_handle.borrow_mut().take() {
            handle.cancel();
        }
        if self.sim.borrow().is_running() {
            *self.loop_handle.borrow_mut() = Some(frame::start_loop(self.frame_ctx.clone()));
        } else {
            self.frame_ctx.borrow_mut().idle();
        }
    }

    pub fn stop_loop(&self) {
        if let Some(handle) = self.loop_handle.borrow_mut().take() {
            handle.cancel();
        }
        self.frame_ctx.borrow_mut().idle();
    }

    pub fn resume_audio(&self) {
        if let Some(tone) = self.cue_tone.borrow().as_ref() {
            tone.resume();
        }
    }
}

fn wire_selection_buttons(app: &App) {
    let buttons: [(&str, SimEvent); 4] = [
        (EAR_LEFT_ID, SimEvent::SelectEar(Ear::Left)),
        (EAR_RIGHT_ID, SimEvent::SelectEar(Ear::Right)),
        (PERSPECTIVE_PATIENT_ID, SimEvent::SelectPerspective(Perspective::Patient)),
        (PERSPECTIVE_CLINICIAN_ID, SimEvent::SelectPerspective(Perspective::Clinician)),
    ];
    for (id, event) in buttons {
        let app_click = app.clone();
        dom::on_click(&app.document, id, move || {
            let app = &app_click;
            app.resume_audio();
            app.dispatch(event);
        });
    }
    let app_reset = app.clone();
    dom::on_click(&app.document, RESET_ID, move || {
        app_reset.dispatch(SimEvent::Reset);
    });
}

fn wire_pagehide(window: &web::Window, app: &App) {
    let app = app.clone();
    dom::listen(window, "pagehide", move || {
        log::info!("[frame] pagehide, stopping loop");
        app.stop_loop();
        app.sim.borrow_mut().handle(SimEvent::Teardown);
        overlay::sync(&app.document, app.sim.borrow().selection());
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("epley-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("[init] trainer failed to start: {e:?}");
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("not running in a browser window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("window has no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|_| anyhow::anyhow!("#{CANVAS_ID} is not a canvas"))?;
    wire_canvas_resize(&window, &canvas);

    let config = SimConfig::default();
    let world = Vec2::from(config.geometry.world_size);
    let indicator_radius = config.completion.indicator_radius;
    let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let sim = Simulation::new(config, seed, InstantClock::new())
        .map_err(|e| anyhow::anyhow!("invalid simulation config: {e}"))?;
    let sim = Rc::new(RefCell::new(sim));

    let renderer = match render::CanvasRenderer::new(&canvas, world, indicator_radius) {
        Ok(r) => Some(r),
        Err(e) => {
            log::error!("[render] {:?}", e);
            None
        }
    };

    // The simulation keeps running without sound if the audio graph fails.
    let cue_tone = match web::AudioContext::new()
        .map_err(|e| anyhow::anyhow!("AudioContext error: {:?}", e))
        .and_then(|ctx| audio::CueTone::new(&ctx))
    {
        Ok(t) => Some(t),
        Err(e) => {
            log::warn!("[audio] cue tone unavailable: {:?}", e);
            None
        }
    };
    let cue_tone = Rc::new(RefCell::new(cue_tone));

    let tilt = Rc::new(RefCell::new(TiltEmulator::new()));
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(
        sim.clone(),
        document.clone(),
        canvas.clone(),
        renderer,
        cue_tone.clone(),
        tilt.clone(),
    )));

    let app = App {
        sim,
        tilt,
        frame_ctx,
        loop_handle: Rc::new(RefCell::new(None)),
        cue_tone,
        document: document.clone(),
    };

    wire_selection_buttons(&app);
    events::wire_enable_motion(&app, &document);
    events::wire_device_orientation(&app);
    events::wire_keyboard(&app);
    events::wire_tap(&app, &canvas);
    wire_pagehide(&window, &app);
    overlay::sync(&document, app.sim.borrow().selection());

    Ok(())
}
