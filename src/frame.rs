use crate::gesture::WebGestureBackend;
use crate::overlay;
use crate::photos::PhotoQueue;
use crate::render;
use evergreen_core::{GestureCommand, GesturePipeline, Scene};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub scene: Rc<RefCell<Scene>>,
    pub gestures: Rc<RefCell<GesturePipeline<WebGestureBackend>>>,
    pub photos: PhotoQueue,

    pub canvas: web::HtmlCanvasElement,
    pub document: web::Document,
    pub gpu: Option<render::GpuState<'a>>,

    pub started: Instant,
    pub last_instant: Instant,
    pub commands: Vec<GestureCommand>,
    pub last_status: String,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;
        let now_ms = (now - self.started).as_secs_f64() * 1000.0;

        // gesture inference never blocks: poll whatever has arrived
        self.commands.clear();
        self.gestures.borrow_mut().poll(now_ms, &mut self.commands);

        let mut scene = self.scene.borrow_mut();
        scene.apply_gestures(&self.commands);

        let uploaded: Vec<_> = self.photos.borrow_mut().drain(..).collect();
        if !uploaded.is_empty() {
            scene.add_photos(uploaded);
        }

        // the morph clock runs even without a drawable surface
        let morph = scene.advance(dt_sec);
        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(self.canvas.width(), self.canvas.height());
            if let Err(e) = g.render(&mut scene, &morph) {
                log::error!("render error: {:?}", e);
            }
        }

        let status = self.gestures.borrow().status();
        let text = overlay::status_text(&status, scene.target());
        if text != self.last_status {
            overlay::update_status(&self.document, &text, status.active);
            self.last_status = text;
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
