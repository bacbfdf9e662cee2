use crate::input::{css_to_backing_px, ViewTransform};
use crate::App;
use epley_core::SimEvent;
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    css_to_backing_px(
        Vec2::new(
            ev.client_x() as f32 - rect.left() as f32,
            ev.client_y() as f32 - rect.top() as f32,
        ),
        Vec2::new(rect.width() as f32, rect.height() as f32),
        Vec2::new(canvas.width() as f32, canvas.height() as f32),
    )
}

/// Taps on the canvas become world-space `Tap` events.
pub fn wire_tap(app: &App, canvas: &web::HtmlCanvasElement) {
    let app = app.clone();
    let canvas_c = canvas.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let px = pointer_canvas_px(&ev, &canvas_c);
        let view = ViewTransform::fit(
            app.world_size(),
            Vec2::new(canvas_c.width() as f32, canvas_c.height() as f32),
        );
        let world = view.to_world(px);
        log::debug!("[gesture] tap at world ({:.1},{:.1})", world.x, world.y);
        app.dispatch(SimEvent::Tap {
            x: world.x,
            y: world.y,
        });
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
    closure.forget();
}
