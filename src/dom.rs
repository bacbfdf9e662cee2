//! Small DOM helpers for the overlay and canvas.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

fn element(document: &web::Document, id: &str) -> Option<web::Element> {
    let found = document.get_element_by_id(id);
    if found.is_none() {
        log::warn!("[dom] no element #{id}");
    }
    found
}

/// Attach a listener for the page's lifetime.
pub fn listen(target: &web::EventTarget, event: &str, handler: impl FnMut() + 'static) {
    let closure = Closure::<dyn FnMut()>::new(handler);
    if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        log::warn!("[dom] could not listen for {event}: {e:?}");
    }
    closure.forget();
}

pub fn on_click(document: &web::Document, id: &str, handler: impl FnMut() + 'static) {
    if let Some(el) = element(document, id) {
        listen(&el, "click", handler);
    }
}

/// Match the canvas backing store to its displayed size in device pixels.
pub fn fit_canvas_to_display(canvas: &web::HtmlCanvasElement) {
    let ratio = web::window().map_or(1.0, |w| w.device_pixel_ratio());
    let rect = canvas.get_bounding_client_rect();
    let width = ((rect.width() * ratio).round() as u32).max(1);
    let height = ((rect.height() * ratio).round() as u32).max(1);
    if canvas.width() != width || canvas.height() != height {
        canvas.set_width(width);
        canvas.set_height(height);
    }
}

pub fn set_text(document: &web::Document, id: &str, text: &str) {
    if let Some(el) = element(document, id) {
        el.set_text_content(Some(text));
    }
}

pub fn toggle_class(document: &web::Document, id: &str, class: &str, on: bool) {
    if let Some(el) = element(document, id) {
        _ = el.class_list().toggle_with_force(class, on);
    }
}
