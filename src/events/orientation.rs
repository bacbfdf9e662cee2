use crate::constants::ENABLE_MOTION_ID;
use crate::dom;
use crate::App;
use epley_core::SimEvent;
use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// iOS gates motion events behind `DeviceOrientationEvent.requestPermission()`;
/// everywhere else the events simply arrive.
async fn request_motion_permission() -> bool {
    let Some(window) = web::window() else {
        return false;
    };
    let ctor = match Reflect::get(&window, &JsValue::from_str("DeviceOrientationEvent")) {
        Ok(c) if !c.is_undefined() => c,
        _ => {
            log::info!("[orientation] no sensor API, keyboard tilt only");
            return true;
        }
    };
    let Some(request) = Reflect::get(&ctor, &JsValue::from_str("requestPermission"))
        .ok()
        .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
    else {
        return true;
    };
    let promise = match request.call0(&ctor).map(|p| p.dyn_into::<js_sys::Promise>()) {
        Ok(Ok(p)) => p,
        Ok(Err(_)) | Err(_) => {
            log::warn!("[orientation] requestPermission did not return a promise");
            return false;
        }
    };
    match JsFuture::from(promise).await {
        Ok(v) => v.as_string().as_deref() == Some("granted"),
        Err(e) => {
            log::warn!("[orientation] permission request failed: {:?}", e);
            false
        }
    }
}

pub fn wire_enable_motion(app: &App, document: &web::Document) {
    let app = app.clone();
    dom::on_click(document, ENABLE_MOTION_ID, move || {
        // Runs inside the click gesture, which is also what unlocks audio.
        app.resume_audio();
        let app = app.clone();
        spawn_local(async move {
            let granted = request_motion_permission().await;
            app.dispatch(SimEvent::OrientationPermission(granted));
        });
    });
}

pub fn wire_device_orientation(app: &App) {
    let Some(window) = web::window() else {
        return;
    };
    let app = app.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::DeviceOrientationEvent| {
        if app.tilt.borrow().is_active() {
            return;
        }
        app.sim.borrow_mut().handle(SimEvent::Orientation {
            beta: ev.beta(),
            gamma: ev.gamma(),
        });
    }) as Box<dyn FnMut(_)>);
    _ = window.add_event_listener_with_callback("deviceorientation", closure.as_ref().unchecked_ref());
    closure.forget();
}
