// Browser-side element ids and tuning. The page provides these elements;
// missing optional ones are created or skipped at startup.

// Elements
pub const CANVAS_ID: &str = "app-canvas";
pub const VIDEO_ID: &str = "gesture-video";
pub const PHOTO_INPUT_ID: &str = "photo-input";
pub const STATUS_ID: &str = "status-overlay";
pub const HELP_ID: &str = "help-overlay";
pub const TOGGLE_BUTTON_ID: &str = "toggle-btn";
pub const GESTURE_BUTTON_ID: &str = "gesture-btn";

// Global async factory installed by the page: `() => Promise<recognizer>`,
// where `recognizer.recognizeForVideo(video, timestampMs)` returns
// `{ gestures: [[{ categoryName, score }, ...]] }`.
pub const GESTURE_FACTORY_GLOBAL: &str = "createGestureRecognizer";
pub const RECOGNIZE_METHOD: &str = "recognizeForVideo";

// HTMLMediaElement.readyState at which a decoded frame is available
pub const HAVE_CURRENT_DATA: u16 = 2;

// Scene clear color
pub const CLEAR_RGB: [f64; 3] = [0.01, 0.02, 0.04];
