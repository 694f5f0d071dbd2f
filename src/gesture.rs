//! Bridges the page-provided gesture recognizer into the core pipeline.

use crate::constants::{GESTURE_FACTORY_GLOBAL, RECOGNIZE_METHOD};
use crate::webcam::{self, WebcamStream};
use evergreen_core::{
    deferred, Classification, Deferred, GestureBackend, GestureError, GestureModel, Ranked,
};
use js_sys::{Array, Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

pub struct WebGestureBackend {
    video: web::HtmlVideoElement,
}

impl WebGestureBackend {
    pub fn new(video: web::HtmlVideoElement) -> Self {
        Self { video }
    }
}

/// Recognizer object returned by the page factory.
pub struct JsGestureModel {
    recognizer: JsValue,
    recognize: Function,
}

impl GestureBackend for WebGestureBackend {
    type Stream = WebcamStream;
    type Model = JsGestureModel;

    fn load_model(&mut self) -> Deferred<JsGestureModel> {
        let (completer, reply) = deferred();
        spawn_local(async move {
            completer.complete(load_recognizer().await);
        });
        reply
    }

    fn open_camera(&mut self) -> Deferred<WebcamStream> {
        let (completer, reply) = deferred();
        let video = self.video.clone();
        spawn_local(async move {
            completer.complete(webcam::open(video).await);
        });
        reply
    }
}

impl GestureModel<WebcamStream> for JsGestureModel {
    fn classify(&mut self, stream: &WebcamStream, timestamp_ms: f64) -> Deferred<Ranked> {
        let video: &JsValue = stream.video().as_ref();
        let result =
            self.recognize
                .call2(&self.recognizer, video, &JsValue::from_f64(timestamp_ms));
        let value = match result {
            Ok(v) => v,
            Err(e) => return Deferred::failed(GestureError::Classifier(format!("{:?}", e))),
        };
        // synchronous recognizers answer in-frame; promise-based ones resolve later
        match value.dyn_into::<Promise>() {
            Ok(promise) => {
                let (completer, reply) = deferred();
                spawn_local(async move {
                    let outcome = JsFuture::from(promise)
                        .await
                        .map(|v| parse_ranked(&v))
                        .map_err(|e| GestureError::Classifier(format!("{:?}", e)));
                    completer.complete(outcome);
                });
                reply
            }
            Err(value) => Deferred::ready(parse_ranked(&value)),
        }
    }
}

async fn load_recognizer() -> Result<JsGestureModel, GestureError> {
    let fail = |e: JsValue| GestureError::ModelLoad(format!("{:?}", e));
    let window = web::window().ok_or_else(|| GestureError::ModelLoad("no window".into()))?;
    let factory = Reflect::get(&window, &JsValue::from_str(GESTURE_FACTORY_GLOBAL))
        .map_err(fail)?
        .dyn_into::<Function>()
        .map_err(|_| {
            GestureError::ModelLoad(format!("window.{GESTURE_FACTORY_GLOBAL} is not a function"))
        })?;
    let pending = factory.call0(&window).map_err(fail)?;
    let recognizer = match pending.dyn_into::<Promise>() {
        Ok(p) => JsFuture::from(p).await.map_err(fail)?,
        Err(v) => v,
    };
    let recognize = Reflect::get(&recognizer, &JsValue::from_str(RECOGNIZE_METHOD))
        .map_err(fail)?
        .dyn_into::<Function>()
        .map_err(|_| GestureError::ModelLoad(format!("recognizer has no {RECOGNIZE_METHOD}()")))?;
    log::info!("[gesture] recognizer loaded");
    Ok(JsGestureModel {
        recognizer,
        recognize,
    })
}

/// Read `{ gestures: [[{ categoryName, score }]] }`, first hand only,
/// sorted best first.
fn parse_ranked(result: &JsValue) -> Ranked {
    let mut ranked = Ranked::new();
    let Ok(gestures) = Reflect::get(result, &JsValue::from_str("gestures")) else {
        return ranked;
    };
    let Ok(hands) = gestures.dyn_into::<Array>() else {
        return ranked;
    };
    let Ok(first_hand) = hands.get(0).dyn_into::<Array>() else {
        return ranked;
    };
    for category in first_hand.iter() {
        let label = Reflect::get(&category, &JsValue::from_str("categoryName"))
            .ok()
            .and_then(|v| v.as_string());
        let score = Reflect::get(&category, &JsValue::from_str("score"))
            .ok()
            .and_then(|v| v.as_f64());
        if let (Some(label), Some(score)) = (label, score) {
            ranked.push(Classification::new(label, score as f32));
        }
    }
    ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    ranked
}
