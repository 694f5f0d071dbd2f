use crate::constants::HAVE_CURRENT_DATA;
use evergreen_core::{GestureError, VideoStream};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Live `getUserMedia` stream attached to a `<video>` element.
pub struct WebcamStream {
    stream: web::MediaStream,
    video: web::HtmlVideoElement,
    stopped: bool,
}

/// Ask for the camera and start playback into `video`.
pub async fn open(video: web::HtmlVideoElement) -> Result<WebcamStream, GestureError> {
    let denied = |e: JsValue| GestureError::CameraDenied(format!("{:?}", e));
    let window = web::window().ok_or_else(|| GestureError::CameraDenied("no window".into()))?;
    let devices = window.navigator().media_devices().map_err(denied)?;
    let constraints = web::MediaStreamConstraints::new();
    constraints.set_video(&JsValue::TRUE);
    constraints.set_audio(&JsValue::FALSE);
    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(denied)?;
    let stream = JsFuture::from(promise)
        .await
        .map_err(denied)?
        .dyn_into::<web::MediaStream>()
        .map_err(denied)?;

    let mut webcam = WebcamStream {
        stream,
        video,
        stopped: false,
    };
    webcam.video.set_muted(true);
    webcam.video.set_src_object(Some(&webcam.stream));
    match webcam.video.play() {
        Ok(p) => {
            if let Err(e) = JsFuture::from(p).await {
                // release the tracks before reporting the failure
                webcam.stop();
                return Err(denied(e));
            }
        }
        Err(e) => {
            webcam.stop();
            return Err(denied(e));
        }
    }
    log::info!("[gesture] webcam playing");
    Ok(webcam)
}

impl WebcamStream {
    pub fn video(&self) -> &web::HtmlVideoElement {
        &self.video
    }

    fn tracks(&self) -> Vec<web::MediaStreamTrack> {
        self.stream
            .get_tracks()
            .iter()
            .filter_map(|t| t.dyn_into::<web::MediaStreamTrack>().ok())
            .collect()
    }
}

impl VideoStream for WebcamStream {
    fn frame_timestamp(&self) -> Option<f64> {
        if self.stopped || self.video.ready_state() < HAVE_CURRENT_DATA {
            return None;
        }
        Some(self.video.current_time())
    }

    fn is_live(&self) -> bool {
        !self.stopped
            && self
                .tracks()
                .iter()
                .any(|t| t.ready_state() == web::MediaStreamTrackState::Live)
    }

    fn stop(&mut self) {
        if self.stopped {
            return;
        }
        for track in self.tracks() {
            track.stop();
        }
        self.video.set_src_object(None);
        self.stopped = true;
    }
}

impl Drop for WebcamStream {
    fn drop(&mut self) {
        self.stop();
    }
}
