use crate::constants::{GESTURE_BUTTON_ID, HELP_ID, STATUS_ID};
use evergreen_core::{GestureStatus, MorphTarget};
use web_sys as web;

#[inline]
pub fn show(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(HELP_ID) {
        let cl = el.class_list();
        _ = cl.remove_1("hidden");
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(HELP_ID) {
        let cl = el.class_list();
        _ = cl.add_1("hidden");
        // fallback
        _ = el.set_attribute("style", "display:none");
    }
}

#[inline]
pub fn is_hidden(document: &web::Document) -> bool {
    if let Some(el) = document.get_element_by_id(HELP_ID) {
        if el.class_list().contains("hidden") {
            return true;
        }
        return el
            .get_attribute("style")
            .map(|s| s.contains("display:none"))
            .unwrap_or(false);
    }
    false
}

#[inline]
pub fn toggle(document: &web::Document) {
    if is_hidden(document) {
        show(document);
    } else {
        hide(document);
    }
}

/// One-line status text for the gesture/morph display.
pub fn status_text(status: &GestureStatus, target: MorphTarget) -> String {
    let label = status.label.as_deref().unwrap_or("none");
    let camera = if status.active { "on" } else { "off" };
    let mut text = format!(
        "Mode: {} • Gesture: {} • Camera: {} ({})",
        target.name(),
        label,
        camera,
        status.phase.name()
    );
    if let Some(err) = &status.error {
        text.push_str(" • ");
        text.push_str(err);
    }
    text
}

/// Update the status overlay text and the gesture button state.
pub fn update_status(document: &web::Document, text: &str, active: bool) {
    if let Some(el) = document.get_element_by_id(STATUS_ID) {
        el.set_text_content(Some(text));
    }
    if let Some(btn) = document.get_element_by_id(GESTURE_BUTTON_ID) {
        _ = btn.set_attribute("aria-pressed", if active { "true" } else { "false" });
    }
}
