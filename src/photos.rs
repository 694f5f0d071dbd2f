use crate::constants::PHOTO_INPUT_ID;
use evergreen_core::PhotoContent;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Photos measured and waiting to be handed to the scene on the next frame.
pub type PhotoQueue = Rc<RefCell<Vec<PhotoContent>>>;

/// Wire the file input: each chosen image becomes an object URL, is decoded
/// once to measure its aspect ratio, then queued.
pub fn wire_photo_input(document: &web::Document, queue: PhotoQueue) {
    let Some(input) = document
        .get_element_by_id(PHOTO_INPUT_ID)
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
    else {
        log::info!("[photos] no #{} element; uploads disabled", PHOTO_INPUT_ID);
        return;
    };
    let input_for_change = input.clone();
    let closure = Closure::wrap(Box::new(move || {
        let Some(files) = input_for_change.files() else {
            return;
        };
        for i in 0..files.length() {
            if let Some(file) = files.get(i) {
                queue_file(&file, queue.clone());
            }
        }
        // allow choosing the same files again
        input_for_change.set_value("");
    }) as Box<dyn FnMut()>);
    _ = input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn queue_file(file: &web::File, queue: PhotoQueue) {
    let url = match web::Url::create_object_url_with_blob(file) {
        Ok(u) => u,
        Err(e) => {
            log::warn!("[photos] object URL failed: {:?}", e);
            return;
        }
    };
    let img = match web::HtmlImageElement::new() {
        Ok(i) => i,
        Err(e) => {
            log::warn!("[photos] image element failed: {:?}", e);
            return;
        }
    };
    let img_for_load = img.clone();
    let url_for_load = url.clone();
    let onload = Closure::once(move || {
        let w = img_for_load.natural_width() as f32;
        let h = img_for_load.natural_height().max(1) as f32;
        queue
            .borrow_mut()
            .push(PhotoContent::new(url_for_load, w / h));
    });
    img.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget();
    img.set_src(&url);
}
