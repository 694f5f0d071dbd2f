// Host-side tests for the gesture classification pipeline, driven by a
// scripted backend whose deferred results are completed by hand.

use evergreen_core::*;
use smallvec::smallvec;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Default)]
struct StreamState {
    timestamp: Option<f64>,
    ended: bool,
    stopped: bool,
}

struct FakeStream {
    state: Rc<RefCell<StreamState>>,
}

impl VideoStream for FakeStream {
    fn frame_timestamp(&self) -> Option<f64> {
        self.state.borrow().timestamp
    }

    fn is_live(&self) -> bool {
        let s = self.state.borrow();
        !s.ended && !s.stopped
    }

    fn stop(&mut self) {
        self.state.borrow_mut().stopped = true;
    }
}

#[derive(Default)]
struct Script {
    loads: Cell<usize>,
    opens: Cell<usize>,
    model_reply: RefCell<Option<Completer<FakeModel>>>,
    camera_reply: RefCell<Option<Completer<FakeStream>>>,
    // `None` leaves inferences pending in `pending`
    answer: RefCell<Option<Ranked>>,
    pending: RefCell<Vec<(f64, Completer<Ranked>)>>,
    classify_timestamps: RefCell<Vec<f64>>,
}

struct FakeModel {
    script: Rc<Script>,
}

impl GestureModel<FakeStream> for FakeModel {
    fn classify(&mut self, stream: &FakeStream, timestamp_ms: f64) -> Deferred<Ranked> {
        self.script.classify_timestamps.borrow_mut().push(timestamp_ms);
        if let Some(ranked) = self.script.answer.borrow().clone() {
            return Deferred::ready(ranked);
        }
        let frame = stream.state.borrow().timestamp.unwrap_or_default();
        let (completer, reply) = deferred();
        self.script.pending.borrow_mut().push((frame, completer));
        reply
    }
}

struct FakeBackend {
    script: Rc<Script>,
}

impl GestureBackend for FakeBackend {
    type Stream = FakeStream;
    type Model = FakeModel;

    fn load_model(&mut self) -> Deferred<FakeModel> {
        self.script.loads.set(self.script.loads.get() + 1);
        let (completer, reply) = deferred();
        *self.script.model_reply.borrow_mut() = Some(completer);
        reply
    }

    fn open_camera(&mut self) -> Deferred<FakeStream> {
        self.script.opens.set(self.script.opens.get() + 1);
        let (completer, reply) = deferred();
        *self.script.camera_reply.borrow_mut() = Some(completer);
        reply
    }
}

fn ranked(label: &str, confidence: f32) -> Ranked {
    smallvec![Classification::new(label, confidence)]
}

fn pipeline() -> (GesturePipeline<FakeBackend>, Rc<Script>) {
    let script = Rc::new(Script::default());
    let p = GesturePipeline::new(
        FakeBackend {
            script: script.clone(),
        },
        GestureConfig::default(),
    );
    (p, script)
}

fn resolve_model(script: &Rc<Script>) {
    let completer = script.model_reply.borrow_mut().take().expect("model requested");
    completer.resolve(FakeModel {
        script: script.clone(),
    });
}

fn resolve_camera(script: &Script) -> Rc<RefCell<StreamState>> {
    let state = Rc::new(RefCell::new(StreamState::default()));
    let completer = script.camera_reply.borrow_mut().take().expect("camera requested");
    completer.resolve(FakeStream {
        state: state.clone(),
    });
    state
}

/// Enable, load the model and open the camera; the stream has no frame yet.
fn activate(
    p: &mut GesturePipeline<FakeBackend>,
    script: &Rc<Script>,
) -> Rc<RefCell<StreamState>> {
    let mut out = Vec::new();
    p.enable();
    resolve_model(script);
    p.poll(0.0, &mut out);
    let stream = resolve_camera(script);
    p.poll(1.0, &mut out);
    assert_eq!(p.phase(), GesturePhase::Active);
    assert!(out.is_empty());
    stream
}

fn show_frame(stream: &Rc<RefCell<StreamState>>, ts: f64) {
    stream.borrow_mut().timestamp = Some(ts);
}

#[test]
fn label_parsing_accepts_common_spellings() {
    assert_eq!(GestureLabel::parse("open-hand"), Some(GestureLabel::OpenHand));
    assert_eq!(GestureLabel::parse("Open_Palm"), Some(GestureLabel::OpenHand));
    assert_eq!(GestureLabel::parse("closed-fist"), Some(GestureLabel::ClosedFist));
    assert_eq!(GestureLabel::parse("Closed_Fist"), Some(GestureLabel::ClosedFist));
    assert_eq!(GestureLabel::parse("Thumb_Up"), None);
    assert_eq!(GestureLabel::parse("None"), None);
}

#[test]
fn command_requires_confidence_strictly_above_threshold() {
    assert_eq!(command_for(&ranked("open-hand", 0.4), 0.5), None);
    assert_eq!(command_for(&ranked("open-hand", 0.5), 0.5), None);
    assert_eq!(
        command_for(&ranked("open-hand", 0.51), 0.5),
        Some(GestureCommand::Scatter)
    );
    assert_eq!(
        command_for(&ranked("closed-fist", 0.9), 0.5),
        Some(GestureCommand::Gather)
    );
    assert_eq!(command_for(&[], 0.5), None);
}

#[test]
fn only_top_ranked_label_counts() {
    let r: Ranked = smallvec![
        Classification::new("None", 0.9),
        Classification::new("open-hand", 0.8),
    ];
    assert_eq!(command_for(&r, 0.5), None);
}

#[test]
fn starts_uninitialized_without_touching_backend() {
    let (mut p, script) = pipeline();
    let mut out = Vec::new();
    p.poll(0.0, &mut out);
    assert_eq!(p.phase(), GesturePhase::Uninitialized);
    assert_eq!(script.loads.get(), 0);
    assert_eq!(script.opens.get(), 0);
}

#[test]
fn model_load_is_one_shot() {
    let (mut p, script) = pipeline();
    p.enable();
    p.enable();
    p.toggle();
    p.toggle();
    assert_eq!(p.phase(), GesturePhase::Loading);
    assert_eq!(script.loads.get(), 1);
}

#[test]
fn confident_open_hand_scatters_once_per_frame() {
    let (mut p, script) = pipeline();
    let stream = activate(&mut p, &script);
    *script.answer.borrow_mut() = Some(ranked("open-hand", 0.8));
    let mut out = Vec::new();

    show_frame(&stream, 100.0);
    p.poll(16.0, &mut out);
    assert_eq!(out, vec![GestureCommand::Scatter]);

    // same video frame: no new inference, no repeated command
    p.poll(32.0, &mut out);
    p.poll(48.0, &mut out);
    assert_eq!(out, vec![GestureCommand::Scatter]);
    assert_eq!(script.classify_timestamps.borrow().len(), 1);

    show_frame(&stream, 133.0);
    p.poll(64.0, &mut out);
    assert_eq!(out, vec![GestureCommand::Scatter, GestureCommand::Scatter]);

    let status = p.status();
    assert!(status.active);
    assert_eq!(status.label.as_deref(), Some("open-hand"));
}

#[test]
fn low_confidence_produces_no_command() {
    let (mut p, script) = pipeline();
    let stream = activate(&mut p, &script);
    *script.answer.borrow_mut() = Some(ranked("open-hand", 0.4));
    let mut out = Vec::new();
    for i in 0..5 {
        show_frame(&stream, i as f64);
        p.poll(10.0 + i as f64, &mut out);
    }
    assert!(out.is_empty());
    assert_eq!(script.classify_timestamps.borrow().len(), 5);
    assert_eq!(p.status().label, None);
}

#[test]
fn inference_timestamps_are_strictly_increasing() {
    let (mut p, script) = pipeline();
    let stream = activate(&mut p, &script);
    *script.answer.borrow_mut() = Some(ranked("None", 0.9));
    let mut out = Vec::new();
    for (i, now) in [50.0, 50.0, 40.0, 60.0].into_iter().enumerate() {
        show_frame(&stream, i as f64);
        p.poll(now, &mut out);
    }
    let ts = script.classify_timestamps.borrow();
    assert_eq!(ts.len(), 4);
    assert!(ts.windows(2).all(|w| w[1] > w[0]), "{ts:?}");
}

#[test]
fn slow_inferences_are_bounded_and_drained_in_frame_order() {
    let (mut p, script) = pipeline();
    let stream = activate(&mut p, &script);
    let mut out = Vec::new();
    for i in 0..6 {
        show_frame(&stream, i as f64);
        p.poll(10.0 * (i + 1) as f64, &mut out);
    }
    assert_eq!(script.pending.borrow().len(), 4);
    assert!(out.is_empty());

    let mut pending = std::mem::take(&mut *script.pending.borrow_mut());
    pending.sort_by(|a, b| b.0.total_cmp(&a.0));
    // answer newest first; commands still come out oldest frame first
    let (_, newest) = pending.remove(0);
    newest.resolve(ranked("closed-fist", 0.9));
    let (_, older) = pending.remove(0);
    older.resolve(ranked("open-hand", 0.9));
    drop(pending);

    p.poll(100.0, &mut out);
    assert_eq!(out, vec![GestureCommand::Scatter, GestureCommand::Gather]);
    assert_eq!(p.phase(), GesturePhase::Active);
}

#[test]
fn abandoned_inference_is_ignored() {
    let (mut p, script) = pipeline();
    let stream = activate(&mut p, &script);
    let mut out = Vec::new();
    show_frame(&stream, 1.0);
    p.poll(10.0, &mut out);
    script.pending.borrow_mut().clear();
    p.poll(20.0, &mut out);
    assert!(out.is_empty());
    assert_eq!(p.phase(), GesturePhase::Active);
    assert!(p.last_error().is_none());
}

#[test]
fn model_failure_falls_back_to_manual_control() {
    let (mut p, script) = pipeline();
    let mut morph = MorphController::default();
    let mut out = Vec::new();
    p.enable();
    script
        .model_reply
        .borrow_mut()
        .take()
        .unwrap()
        .reject(GestureError::ModelLoad("404".into()));
    p.poll(0.0, &mut out);
    assert_eq!(p.phase(), GesturePhase::Error);
    assert!(!p.is_enabled());
    assert!(matches!(p.last_error(), Some(GestureError::ModelLoad(_))));
    assert!(out.is_empty());
    assert_eq!(script.opens.get(), 0);

    for cmd in &out {
        morph.apply_gesture(*cmd);
    }
    assert_eq!(morph.target(), MorphTarget::Gathered);
    morph.toggle();
    assert_eq!(morph.target(), MorphTarget::Scattered);
}

#[test]
fn camera_denial_is_an_error_state() {
    let (mut p, script) = pipeline();
    let mut out = Vec::new();
    p.enable();
    resolve_model(&script);
    p.poll(0.0, &mut out);
    assert_eq!(p.phase(), GesturePhase::Ready);
    script
        .camera_reply
        .borrow_mut()
        .take()
        .unwrap()
        .reject(GestureError::CameraDenied("NotAllowedError".into()));
    p.poll(1.0, &mut out);
    assert_eq!(p.phase(), GesturePhase::Error);
    assert!(p.has_model());
    assert!(p.status().error.is_some());
}

#[test]
fn disable_releases_camera_and_keeps_model() {
    let (mut p, script) = pipeline();
    let stream = activate(&mut p, &script);
    p.disable();
    assert!(stream.borrow().stopped);
    assert_eq!(p.phase(), GesturePhase::Ready);
    assert!(!p.status().active);

    p.enable();
    assert_eq!(script.loads.get(), 1);
    assert_eq!(script.opens.get(), 2);
    let second = resolve_camera(&script);
    let mut out = Vec::new();
    p.poll(5.0, &mut out);
    assert_eq!(p.phase(), GesturePhase::Active);
    assert!(!second.borrow().stopped);
}

#[test]
fn results_arriving_after_disable_are_dropped() {
    let (mut p, script) = pipeline();
    let stream = activate(&mut p, &script);
    let mut out = Vec::new();
    show_frame(&stream, 1.0);
    p.poll(10.0, &mut out);
    p.disable();
    for (_, c) in script.pending.borrow_mut().drain(..) {
        c.resolve(ranked("open-hand", 0.99));
    }
    p.poll(20.0, &mut out);
    assert!(out.is_empty());
}

#[test]
fn ended_stream_moves_to_error_and_stops_tracks() {
    let (mut p, script) = pipeline();
    let stream = activate(&mut p, &script);
    stream.borrow_mut().ended = true;
    let mut out = Vec::new();
    p.poll(10.0, &mut out);
    assert_eq!(p.phase(), GesturePhase::Error);
    assert_eq!(p.last_error(), Some(&GestureError::StreamEnded));
    assert!(stream.borrow().stopped);
}

#[test]
fn camera_granted_after_disable_is_stopped() {
    let (mut p, script) = pipeline();
    let mut out = Vec::new();
    p.enable();
    resolve_model(&script);
    p.poll(0.0, &mut out);
    p.disable();
    let late = resolve_camera(&script);
    p.poll(1.0, &mut out);
    assert!(late.borrow().stopped);
    assert_ne!(p.phase(), GesturePhase::Active);
}

#[test]
fn dropping_pipeline_stops_stream() {
    let (mut p, script) = pipeline();
    let stream = activate(&mut p, &script);
    drop(p);
    assert!(stream.borrow().stopped);
}

#[test]
fn deferred_reports_abandoned_completer() {
    let (completer, reply) = deferred::<u32>();
    assert!(reply.is_pending());
    assert_eq!(reply.poll(), TaskPoll::Pending);
    drop(completer);
    assert!(!reply.is_pending());
    assert_eq!(reply.poll(), TaskPoll::Failed(GestureError::Abandoned));

    let (completer, reply) = deferred::<u32>();
    completer.resolve(7);
    assert_eq!(reply.poll(), TaskPoll::Ready(7));
    assert_eq!(Deferred::ready(3).poll(), TaskPoll::Ready(3));
}
