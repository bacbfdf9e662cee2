use crate::input::{key_action, KeyAction};
use crate::App;
use epley_core::SimEvent;
use wasm_bindgen::JsCast;
use web_sys as web;

fn handle_key(app: &App, ev: &web::KeyboardEvent, pressed: bool) {
    let Some(action) = key_action(&ev.key()) else {
        return;
    };
    ev.prevent_default();
    match action {
        KeyAction::Tilt(key) => {
            app.tilt.borrow_mut().set_key(key, pressed);
            // Arrow keys stand in for a motion sensor on desktops.
            if pressed && !app.sim.borrow().selection().orientation_permitted {
                log::info!("[input] keyboard tilt in use");
                app.dispatch(SimEvent::OrientationPermission(true));
            }
        }
        _ if !pressed || ev.repeat() => {}
        KeyAction::Ear(ear) => app.dispatch(SimEvent::SelectEar(ear)),
        KeyAction::Perspective(p) => app.dispatch(SimEvent::SelectPerspective(p)),
        KeyAction::Reset => app.dispatch(SimEvent::Reset),
    }
}

pub fn wire_keyboard(app: &App) {
    let Some(window) = web::window() else {
        return;
    };
    for (name, pressed) in [("keydown", true), ("keyup", false)] {
        let app = app.clone();
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
            handle_key(&app, &ev, pressed);
        }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
