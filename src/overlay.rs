use crate::constants::*;
use crate::dom;
use epley_core::{Ear, Perspective, Selection};
use web_sys as web;

fn set_visible(document: &web::Document, visible: bool) {
    dom::toggle_class(document, SELECT_OVERLAY_ID, HIDDEN_CLASS, !visible);
    if let Some(el) = document.get_element_by_id(SELECT_OVERLAY_ID) {
        // pages without the stylesheet still hide the overlay
        _ = el.set_attribute("style", if visible { "" } else { "display:none" });
    }
}

/// Mirror the selection into the overlay: highlight chosen buttons and hide
/// the overlay once the loop can run.
pub fn sync(document: &web::Document, selection: Selection) {
    dom::toggle_class(document, EAR_LEFT_ID, ACTIVE_CLASS, selection.ear == Some(Ear::Left));
    dom::toggle_class(document, EAR_RIGHT_ID, ACTIVE_CLASS, selection.ear == Some(Ear::Right));
    dom::toggle_class(
        document,
        PERSPECTIVE_PATIENT_ID,
        ACTIVE_CLASS,
        selection.perspective == Some(Perspective::Patient),
    );
    dom::toggle_class(
        document,
        PERSPECTIVE_CLINICIAN_ID,
        ACTIVE_CLASS,
        selection.perspective == Some(Perspective::Clinician),
    );
    dom::toggle_class(document, ENABLE_MOTION_ID, ACTIVE_CLASS, selection.orientation_permitted);
    set_visible(document, !selection.is_complete());
}
