use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Existing `<video>` by id, or a hidden, muted one appended to the body.
pub fn video_element(document: &web::Document, id: &str) -> anyhow::Result<web::HtmlVideoElement> {
    if let Some(el) = document.get_element_by_id(id) {
        return el
            .dyn_into::<web::HtmlVideoElement>()
            .map_err(|e| anyhow::anyhow!("#{id} is not a video element: {:?}", e));
    }
    let el = document
        .create_element("video")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    el.set_id(id);
    _ = el.set_attribute("playsinline", "");
    _ = el.set_attribute("muted", "");
    _ = el.set_attribute("style", "display:none");
    if let Some(body) = document.body() {
        _ = body.append_child(&el);
    }
    el.dyn_into::<web::HtmlVideoElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))
}
