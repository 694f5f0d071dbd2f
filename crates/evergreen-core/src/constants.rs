use glam::Vec3;

// Shared layout/morph tuning constants used by both web and native frontends.

// Tree (gathered) cone
pub const TREE_HEIGHT: f32 = 12.0;
pub const TREE_BASE_RADIUS: f32 = 4.0;
pub const TREE_ANGLE_STEP: f32 = 0.5; // radians advanced per index

// Scatter shell
pub const SCATTER_MIN_RADIUS: f32 = 8.0;
pub const SCATTER_MAX_RADIUS: f32 = 23.0;

// Gallery rings (photos in scattered mode)
pub const GALLERY_RADIUS: f32 = 6.0;
pub const GALLERY_SLOTS_PER_RING: usize = 8;
pub const GALLERY_RING_SPACING: f32 = 2.5;

// Morph smoothing
pub const MORPH_SMOOTHING: f32 = 0.05; // fraction of remaining distance per tick
pub const MORPH_SNAP_EPSILON: f32 = 0.001;
pub const MORPH_MIN_STEP: f32 = 1.0e-6; // keeps tiny factors from stalling in f32

// Idle spin (tree view only)
pub const IDLE_SPIN_THRESHOLD: f32 = 0.5;
pub const IDLE_SPIN_RAD_PER_SEC: f32 = 0.12;

// Population sizes
pub const AMBIENT_COUNT: usize = 3500;
pub const ORNAMENT_COUNT: usize = 180;
pub const GIFT_COUNT: usize = 40;
pub const PHOTO_PLACEHOLDERS: usize = 8;

// Photo framing
pub const PHOTO_SCALE_GATHERED: f32 = 0.8;
pub const PHOTO_SCALE_GALLERY: f32 = 2.5;
pub const PHOTO_TREE_PUSH: f32 = 1.15; // photos hang slightly outside the cone
pub const PHOTO_FLOAT_SPEED: f32 = 0.9;
pub const PHOTO_FLOAT_AMPLITUDE: f32 = 0.08;
pub const PHOTO_ASPECT_MIN: f32 = 0.25;
pub const PHOTO_ASPECT_MAX: f32 = 4.0;
pub const PLACEHOLDER_TINT: [f32; 4] = [0.55, 0.55, 0.58, 0.35];
pub const PHOTO_TINT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

// Gesture classification
pub const GESTURE_CONFIDENCE_THRESHOLD: f32 = 0.5;

// Camera framing: tree close-up vs. scattered overview
pub const CAMERA_EYE_GATHERED: [f32; 3] = [0.0, 2.0, 22.0];
pub const CAMERA_EYE_SCATTERED: [f32; 3] = [0.0, 5.0, 40.0];
pub const CAMERA_FOVY: f32 = std::f32::consts::FRAC_PI_4;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 200.0;

// Default scatter seed for reproducible sessions
pub const DEFAULT_SEED: u64 = 42;

#[inline]
pub fn camera_eye_gathered() -> Vec3 {
    Vec3::from(CAMERA_EYE_GATHERED)
}

#[inline]
pub fn camera_eye_scattered() -> Vec3 {
    Vec3::from(CAMERA_EYE_SCATTERED)
}
