//! Position generators for the two scene configurations.
//!
//! All functions are index-addressed and free of shared state. Callers
//! guarantee `total >= 1`; population constructors reject empty populations
//! before any generator runs.

use crate::constants::*;
use glam::{Quat, Vec3};
use rand::Rng;
use std::f32::consts::{PI, TAU};

/// Point on the downward-widening spiral cone for index `i` of `total`.
#[inline]
pub fn tree_position(i: usize, total: usize) -> Vec3 {
    debug_assert!(total >= 1, "tree_position called with total == 0");
    let t = i as f32 / total as f32;
    let y = t * TREE_HEIGHT - TREE_HEIGHT / 2.0;
    let radius = TREE_BASE_RADIUS * (1.0 - t);
    let angle = i as f32 * TREE_ANGLE_STEP;
    Vec3::new(angle.cos() * radius, y, angle.sin() * radius)
}

/// Uniform point in the spherical shell between the scatter radii.
///
/// Draws from `rng`, so results must be cached per entity.
pub fn scatter_position<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let theta = rng.gen::<f32>() * TAU;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    let r = SCATTER_MIN_RADIUS + rng.gen::<f32>() * (SCATTER_MAX_RADIUS - SCATTER_MIN_RADIUS);
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.cos(),
        r * phi.sin() * theta.sin(),
    )
}

/// Placement of one photo in the stacked gallery rings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GallerySlot {
    pub ring: usize,
    pub slot: usize,
    pub position: Vec3,
    pub orientation: Quat,
}

/// Ring/slot assignment for index `i` of `total` gallery entries.
pub fn gallery_position(i: usize, total: usize) -> GallerySlot {
    debug_assert!(total >= 1, "gallery_position called with total == 0");
    let ring = i / GALLERY_SLOTS_PER_RING;
    let slot = i % GALLERY_SLOTS_PER_RING;
    let rings = total.div_ceil(GALLERY_SLOTS_PER_RING).max(1);
    let half_span = (rings - 1) as f32 * GALLERY_RING_SPACING * 0.5;
    let y = ring as f32 * GALLERY_RING_SPACING - half_span;

    // odd rings are staggered by half a slot so frames don't stack vertically
    let slot_angle = TAU / GALLERY_SLOTS_PER_RING as f32;
    let stagger = if ring % 2 == 1 { slot_angle * 0.5 } else { 0.0 };
    let angle = slot as f32 * slot_angle + stagger;
    let position = Vec3::new(
        angle.sin() * GALLERY_RADIUS,
        y,
        angle.cos() * GALLERY_RADIUS,
    );

    // facing the origin, then flipped so the picture side is seen from outside
    let orientation = look_at_origin(position) * Quat::from_rotation_y(PI);
    GallerySlot {
        ring,
        slot,
        position,
        orientation,
    }
}

/// Yaw rotation that turns local +Z toward the scene origin (horizontal plane).
#[inline]
pub fn look_at_origin(position: Vec3) -> Quat {
    let dir = Vec3::new(-position.x, 0.0, -position.z);
    if dir.length_squared() < 1e-8 {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_y(dir.x.atan2(dir.z))
}

/// Yaw rotation that turns local +Z away from the vertical spiral axis.
#[inline]
pub fn outward_orientation(position: Vec3) -> Quat {
    if position.x * position.x + position.z * position.z < 1e-8 {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_y(position.x.atan2(position.z))
}
