use crate::audio::CueTone;
use crate::constants::*;
use crate::dom;
use crate::render::CanvasRenderer;
use epley_core::{InstantClock, Perspective, Simulation, TiltEmulator};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type SharedSim = Rc<RefCell<Simulation<InstantClock>>>;

pub struct FrameContext {
    pub sim: SharedSim,
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub renderer: Option<CanvasRenderer>,
    pub cue_tone: Rc<RefCell<Option<CueTone>>>,
    pub tilt: Rc<RefCell<TiltEmulator>>,
    pub started: Instant,
    pub last_instant: Instant,
    last_stage: Option<u8>,
    last_cue: Option<bool>,
}

impl FrameContext {
    pub fn new(
        sim: SharedSim,
        document: web::Document,
        canvas: web::HtmlCanvasElement,
        renderer: Option<CanvasRenderer>,
        cue_tone: Rc<RefCell<Option<CueTone>>>,
        tilt: Rc<RefCell<TiltEmulator>>,
    ) -> Self {
        let now = Instant::now();
        Self {
            sim,
            document,
            canvas,
            renderer,
            cue_tone,
            tilt,
            started: now,
            last_instant: now,
            last_stage: None,
            last_cue: None,
        }
    }

    /// One display frame. Returns `false` once the simulation stops running.
    pub fn frame(&mut self) -> bool {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32().min(MAX_FRAME_DT_SEC);
        self.last_instant = now;

        {
            let mut tilt = self.tilt.borrow_mut();
            if tilt.is_active() {
                let o = tilt.step(dt_sec);
                self.sim.borrow_mut().handle(epley_core::SimEvent::Orientation {
                    beta: Some(o.beta as f64),
                    gamma: Some(o.gamma as f64),
                });
            }
        }

        let mut sim = self.sim.borrow_mut();
        let Some(frame) = sim.tick() else {
            drop(sim);
            self.idle();
            return false;
        };
        let show_cue = sim.selection().perspective == Some(Perspective::Clinician);

        dom::fit_canvas_to_display(&self.canvas);
        if let (Some(r), Some(g)) = (&self.renderer, sim.geometry()) {
            r.render(&frame, g, show_cue, (now - self.started).as_secs_f64());
        }
        drop(sim);

        if self.last_stage != Some(frame.stage) {
            dom::set_text(&self.document, STAGE_NUMBER_ID, &frame.stage.to_string());
            dom::set_text(&self.document, STAGE_LABEL_ID, frame.stage_label);
            self.last_stage = Some(frame.stage);
        }
        if self.last_cue != Some(frame.cue_active) {
            dom::toggle_class(&self.document, CUE_INDICATOR_ID, ACTIVE_CLASS, frame.cue_active);
            self.last_cue = Some(frame.cue_active);
        }
        if let Some(tone) = self.cue_tone.borrow_mut().as_mut() {
            tone.set_active(frame.cue_active);
        }
        true
    }

    /// Silence outputs while no loop is running.
    pub fn idle(&mut self) {
        if let Some(tone) = self.cue_tone.borrow_mut().as_mut() {
            tone.set_active(false);
        }
        dom::toggle_class(&self.document, CUE_INDICATOR_ID, ACTIVE_CLASS, false);
        self.last_cue = None;
        self.last_stage = None;
    }
}

type RafClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A running requestAnimationFrame loop.
///
/// The closure re-arms itself each frame; `cancel` drops the pending frame
/// and the closure, so nothing touches state after cancellation.
pub struct LoopHandle {
    raf_id: Rc<Cell<Option<i32>>>,
    tick: RafClosure,
}

impl LoopHandle {
    pub fn cancel(&self) {
        if let Some(id) = self.raf_id.take() {
            if let Some(w) = web::window() {
                _ = w.cancel_animation_frame(id);
            }
        }
        self.tick.borrow_mut().take();
    }
}

fn request_frame(tick: &RafClosure) -> Option<i32> {
    let w = web::window()?;
    let guard = tick.borrow();
    let cb = guard.as_ref()?;
    w.request_animation_frame(cb.as_ref().unchecked_ref()).ok()
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> LoopHandle {
    let tick: RafClosure = Rc::new(RefCell::new(None));
    let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let tick_clone = tick.clone();
    let raf_clone = raf_id.clone();
    frame_ctx.borrow_mut().last_instant = Instant::now();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        raf_clone.set(None);
        if frame_ctx.borrow_mut().frame() {
            raf_clone.set(request_frame(&tick_clone));
        } else {
            log::info!("[frame] loop ended");
        }
    }) as Box<dyn FnMut()>));
    raf_id.set(request_frame(&tick));
    LoopHandle { raf_id, tick }
}
