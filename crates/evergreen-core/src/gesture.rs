//! Gesture classification pipeline.
//!
//! Turns a continuous camera stream into discrete SCATTER/GATHER commands.
//! Model loading, camera access and inference are all [`Deferred`] results
//! polled from the frame loop, so a slow classifier never blocks a frame.
//!
//! Phases: `Uninitialized -> Loading -> Ready -> Active`, with `Error`
//! reachable from `Loading` (model failure), from `Ready` (camera denied) and
//! from `Active` (stream ended). Failures only ever disable the pipeline; the
//! morph controller is never driven by an error.

use crate::constants::GESTURE_CONFIDENCE_THRESHOLD;
use crate::error::GestureError;
use crate::morph::MorphTarget;
use crate::task::{Deferred, TaskPoll};
use fnv::FnvHashMap;
use smallvec::SmallVec;

const MAX_IN_FLIGHT: usize = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GesturePhase {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    Active,
    Error,
}

impl GesturePhase {
    pub fn name(self) -> &'static str {
        match self {
            GesturePhase::Uninitialized => "off",
            GesturePhase::Loading => "loading",
            GesturePhase::Ready => "ready",
            GesturePhase::Active => "active",
            GesturePhase::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureCommand {
    Scatter,
    Gather,
}

impl GestureCommand {
    #[inline]
    pub fn target(self) -> MorphTarget {
        match self {
            GestureCommand::Scatter => MorphTarget::Scattered,
            GestureCommand::Gather => MorphTarget::Gathered,
        }
    }
}

/// Labels the pipeline reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureLabel {
    OpenHand,
    ClosedFist,
}

impl GestureLabel {
    /// Accepts `open-hand`, `Open_Palm`, `closed-fist`, `Closed_Fist` and
    /// similar spellings. Anything else is unrecognized.
    pub fn parse(label: &str) -> Option<Self> {
        let norm = label.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match norm.as_str() {
            "open-hand" | "open-palm" => Some(GestureLabel::OpenHand),
            "closed-fist" | "fist" => Some(GestureLabel::ClosedFist),
            _ => None,
        }
    }

    #[inline]
    pub fn command(self) -> GestureCommand {
        match self {
            GestureLabel::OpenHand => GestureCommand::Scatter,
            GestureLabel::ClosedFist => GestureCommand::Gather,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

impl Classification {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Classifier output, best match first.
pub type Ranked = SmallVec<[Classification; 4]>;

/// Map the top-ranked result to a command.
///
/// Below-threshold and unrecognized labels yield `None`, which is distinct
/// from either command.
pub fn command_for(ranked: &[Classification], threshold: f32) -> Option<GestureCommand> {
    let top = ranked.first()?;
    if !(top.confidence > threshold) {
        return None;
    }
    GestureLabel::parse(&top.label).map(GestureLabel::command)
}

/// Live camera stream owned by the pipeline while active.
pub trait VideoStream {
    /// Timestamp of the frame currently presented, if any.
    fn frame_timestamp(&self) -> Option<f64>;
    /// `false` once the device or permission is gone.
    fn is_live(&self) -> bool;
    /// Stop every track. Must be idempotent.
    fn stop(&mut self);
}

/// Initialized classifier.
pub trait GestureModel<S: ?Sized> {
    fn classify(&mut self, stream: &S, timestamp_ms: f64) -> Deferred<Ranked>;
}

/// Host capabilities the pipeline needs.
pub trait GestureBackend {
    type Stream: VideoStream;
    type Model: GestureModel<Self::Stream>;

    fn load_model(&mut self) -> Deferred<Self::Model>;
    fn open_camera(&mut self) -> Deferred<Self::Stream>;
}

#[derive(Clone, Copy, Debug)]
pub struct GestureConfig {
    pub threshold: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            threshold: GESTURE_CONFIDENCE_THRESHOLD,
        }
    }
}

/// What the status display shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GestureStatus {
    pub phase: GesturePhase,
    pub active: bool,
    pub label: Option<String>,
    pub error: Option<String>,
}

pub struct GesturePipeline<B: GestureBackend> {
    backend: B,
    config: GestureConfig,
    phase: GesturePhase,
    enabled: bool,
    model: Option<B::Model>,
    pending_model: Option<Deferred<B::Model>>,
    pending_camera: Option<Deferred<B::Stream>>,
    stream: Option<B::Stream>,
    last_frame_timestamp: Option<f64>,
    last_inference_ms: f64,
    in_flight: FnvHashMap<u64, Deferred<Ranked>>,
    last_classification: Option<Classification>,
    last_error: Option<GestureError>,
}

impl<B: GestureBackend> GesturePipeline<B> {
    pub fn new(backend: B, config: GestureConfig) -> Self {
        Self {
            backend,
            config,
            phase: GesturePhase::Uninitialized,
            enabled: false,
            model: None,
            pending_model: None,
            pending_camera: None,
            stream: None,
            last_frame_timestamp: None,
            last_inference_ms: f64::NEG_INFINITY,
            in_flight: FnvHashMap::default(),
            last_classification: None,
            last_error: None,
        }
    }

    #[inline]
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    #[inline]
    pub fn last_error(&self) -> Option<&GestureError> {
        self.last_error.as_ref()
    }

    /// Request gesture control. Loads the model once; later calls only
    /// reopen the camera.
    pub fn enable(&mut self) {
        self.enabled = true;
        if self.model.is_some() {
            self.request_camera();
            return;
        }
        if self.pending_model.is_none() {
            log::info!("[gesture] loading model");
            self.pending_model = Some(self.backend.load_model());
            self.phase = GesturePhase::Loading;
            self.last_error = None;
        }
    }

    /// Stop polling and release the camera. The model stays loaded.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.release_stream();
        if self.phase == GesturePhase::Active {
            self.phase = GesturePhase::Ready;
        }
        log::info!("[gesture] disabled");
    }

    pub fn toggle(&mut self) {
        if self.enabled {
            self.disable();
        } else {
            self.enable();
        }
    }

    /// Non-blocking per-frame step. Commands for newly classified frames are
    /// appended to `out`, oldest frame first.
    pub fn poll(&mut self, now_ms: f64, out: &mut Vec<GestureCommand>) {
        self.poll_model();
        self.poll_camera();
        if self.phase == GesturePhase::Active {
            self.sample(now_ms);
        }
        self.drain_inferences(out);
    }

    pub fn status(&self) -> GestureStatus {
        let label = self
            .last_classification
            .as_ref()
            .filter(|c| c.confidence > self.config.threshold)
            .map(|c| c.label.clone());
        GestureStatus {
            phase: self.phase,
            active: self.phase == GesturePhase::Active,
            label,
            error: self.last_error.as_ref().map(|e| e.to_string()),
        }
    }

    fn request_camera(&mut self) {
        if self.stream.is_some() || self.pending_camera.is_some() {
            return;
        }
        log::info!("[gesture] requesting camera");
        self.pending_camera = Some(self.backend.open_camera());
        self.phase = GesturePhase::Ready;
        self.last_error = None;
    }

    fn poll_model(&mut self) {
        let Some(pending) = self.pending_model.as_ref() else {
            return;
        };
        match pending.poll() {
            TaskPoll::Pending => {}
            TaskPoll::Ready(model) => {
                self.pending_model = None;
                self.model = Some(model);
                self.phase = GesturePhase::Ready;
                log::info!("[gesture] model ready");
                if self.enabled {
                    self.request_camera();
                }
            }
            TaskPoll::Failed(err) => {
                self.pending_model = None;
                self.fail(err);
            }
        }
    }

    fn poll_camera(&mut self) {
        let Some(pending) = self.pending_camera.as_ref() else {
            return;
        };
        match pending.poll() {
            TaskPoll::Pending => {}
            TaskPoll::Ready(mut stream) => {
                self.pending_camera = None;
                if self.enabled && self.model.is_some() {
                    self.stream = Some(stream);
                    self.last_frame_timestamp = None;
                    self.phase = GesturePhase::Active;
                    log::info!("[gesture] camera active");
                } else {
                    // disabled while the permission prompt was open
                    stream.stop();
                }
            }
            TaskPoll::Failed(err) => {
                self.pending_camera = None;
                if self.enabled {
                    self.fail(err);
                }
            }
        }
    }

    fn sample(&mut self, now_ms: f64) {
        let (Some(stream), Some(model)) = (self.stream.as_ref(), self.model.as_mut()) else {
            return;
        };
        if !stream.is_live() {
            self.fail(GestureError::StreamEnded);
            return;
        }
        let Some(frame_ts) = stream.frame_timestamp() else {
            return;
        };
        if self.last_frame_timestamp == Some(frame_ts) || self.in_flight.len() >= MAX_IN_FLIGHT {
            return;
        }
        self.last_frame_timestamp = Some(frame_ts);
        let ts = if now_ms > self.last_inference_ms {
            now_ms
        } else {
            self.last_inference_ms + 1.0
        };
        self.last_inference_ms = ts;
        let reply = model.classify(stream, ts);
        self.in_flight.insert(frame_ts.to_bits(), reply);
    }

    fn drain_inferences(&mut self, out: &mut Vec<GestureCommand>) {
        if self.in_flight.is_empty() {
            return;
        }
        let mut done: SmallVec<[(f64, Ranked); 4]> = SmallVec::new();
        self.in_flight.retain(|key, reply| match reply.poll() {
            TaskPoll::Pending => true,
            TaskPoll::Ready(ranked) => {
                done.push((f64::from_bits(*key), ranked));
                false
            }
            TaskPoll::Failed(err) => {
                log::debug!("[gesture] inference failed: {err}");
                false
            }
        });
        done.sort_by(|a, b| a.0.total_cmp(&b.0));
        for (_, ranked) in done {
            self.last_classification = ranked.first().cloned();
            if let Some(cmd) = command_for(&ranked, self.config.threshold) {
                out.push(cmd);
            }
        }
    }

    fn release_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            log::info!("[gesture] camera released");
        }
        self.in_flight.clear();
        self.last_frame_timestamp = None;
        self.last_classification = None;
    }

    fn fail(&mut self, err: GestureError) {
        log::warn!("[gesture] {err}; falling back to manual control");
        self.release_stream();
        self.enabled = false;
        self.phase = GesturePhase::Error;
        self.last_error = Some(err);
    }
}

impl<B: GestureBackend> Drop for GesturePipeline<B> {
    fn drop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
        }
    }
}
