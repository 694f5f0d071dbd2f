use super::keys::{action_for_key, KeyAction};
use crate::gesture::WebGestureBackend;
use crate::overlay;
use evergreen_core::{GesturePipeline, Scene};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn handle_global_keydown(
    ev: &web::KeyboardEvent,
    scene: &Rc<RefCell<Scene>>,
    gestures: &Rc<RefCell<GesturePipeline<WebGestureBackend>>>,
    canvas: &web::HtmlCanvasElement,
) {
    let Some(action) = action_for_key(&ev.key()) else {
        return;
    };
    match action {
        KeyAction::ToggleMorph => {
            scene.borrow_mut().toggle();
            ev.prevent_default();
        }
        KeyAction::ToggleGestures => {
            let mut g = gestures.borrow_mut();
            g.toggle();
            log::info!("[keys] gesture control enabled={}", g.is_enabled());
        }
        KeyAction::ToggleHelp => {
            if let Some(doc) = crate::dom::window_document() {
                overlay::toggle(&doc);
            }
            ev.prevent_default();
        }
        KeyAction::Fullscreen => {
            if let Some(doc) = crate::dom::window_document() {
                if doc.fullscreen_element().is_some() {
                    doc.exit_fullscreen();
                } else {
                    _ = canvas.request_fullscreen();
                }
            }
            ev.prevent_default();
        }
    }
}

pub fn wire_global_keydown(
    scene: Rc<RefCell<Scene>>,
    gestures: Rc<RefCell<GesturePipeline<WebGestureBackend>>>,
    canvas: web::HtmlCanvasElement,
) {
    if let Some(window) = web::window() {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                handle_global_keydown(&ev, &scene, &gestures, &canvas);
            }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
