#![cfg(target_arch = "wasm32")]
use evergreen_core::{GestureConfig, GesturePipeline, Scene, SceneConfig};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod gesture;
mod overlay;
mod photos;
mod render;
mod webcam;

use constants::*;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

fn wire_buttons(
    document: &web::Document,
    scene: &Rc<RefCell<Scene>>,
    gestures: &Rc<RefCell<GesturePipeline<gesture::WebGestureBackend>>>,
) {
    let scene_toggle = scene.clone();
    dom::add_click_listener(document, TOGGLE_BUTTON_ID, move || {
        scene_toggle.borrow_mut().toggle();
    });

    let gestures_toggle = gestures.clone();
    dom::add_click_listener(document, GESTURE_BUTTON_ID, move || {
        gestures_toggle.borrow_mut().toggle();
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("evergreen-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{CANVAS_ID}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);

    let scene = Scene::new(&SceneConfig::default())?;
    let scene = Rc::new(RefCell::new(scene));

    // Gesture control starts off; manual toggle is always available
    let video = dom::video_element(&document, VIDEO_ID)?;
    let gestures = Rc::new(RefCell::new(GesturePipeline::new(
        gesture::WebGestureBackend::new(video),
        GestureConfig::default(),
    )));

    let photo_queue: photos::PhotoQueue = Rc::new(RefCell::new(Vec::new()));
    photos::wire_photo_input(&document, photo_queue.clone());

    wire_buttons(&document, &scene, &gestures);
    events::wire_global_keydown(scene.clone(), gestures.clone(), canvas.clone());

    let gpu = frame::init_gpu(&canvas).await;

    let now = Instant::now();
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        scene,
        gestures,
        photos: photo_queue,
        canvas,
        document,
        gpu,
        started: now,
        last_instant: now,
        commands: Vec::new(),
        last_status: String::new(),
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
