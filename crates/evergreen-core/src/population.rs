//! Entity populations: one fixed dual-position record per entity, evaluated
//! every frame against the shared [`MorphFrame`].

use crate::constants::*;
use crate::error::SceneError;
use crate::layout::{gallery_position, outward_orientation, scatter_position, tree_position};
use crate::morph::MorphFrame;
use glam::{EulerRot, Quat, Vec3};
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityClass {
    Ambient,
    Ornament,
    Gift,
    Photo,
}

impl EntityClass {
    /// Shape code read by the scene shader.
    #[inline]
    pub fn shape(self) -> f32 {
        match self {
            EntityClass::Ambient => 0.0,
            EntityClass::Ornament => 1.0,
            EntityClass::Gift => 2.0,
            EntityClass::Photo => 3.0,
        }
    }
}

/// Randomised per-entity parameters fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Auxiliary {
    pub scale: f32,
    pub tint: [f32; 4],
    pub phase: f32,
    pub rotation_seed: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub index: usize,
    pub gathered: Vec3,
    pub scattered: Vec3,
    pub aux: Auxiliary,
}

impl Entity {
    /// Blend of the two targets; exact at both ends.
    #[inline]
    pub fn position_at(&self, progress: f32) -> Vec3 {
        mix_vec3(self.gathered, self.scattered, progress)
    }
}

/// Current render transform of one entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub tint: [f32; 4],
}

/// Anything the batch updater can evaluate per frame.
pub trait Population {
    fn class(&self) -> EntityClass;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn transform_at(&self, index: usize, frame: &MorphFrame) -> Transform;
}

#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

#[inline]
pub fn mix_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

/// Small vertical float added after interpolation.
#[inline]
fn float_offset(phase: f32, elapsed: f32, speed: f32, amplitude: f32) -> Vec3 {
    Vec3::Y * ((elapsed * speed + phase).sin() * amplitude)
}

// ---------------- Fixed-size classes ----------------

/// Static tuning for one fixed-size entity class.
#[derive(Clone, Copy, Debug)]
pub struct ClassProfile {
    pub class: EntityClass,
    pub scale_range: (f32, f32),
    pub palette: &'static [[f32; 4]],
    pub jitter: f32,
    pub surface_push: f32,
    pub float_amplitude: f32,
    pub float_speed: f32,
    pub compact_scale: f32,
    pub expanded_scale: f32,
    pub tumble_speed: f32,
}

pub const AMBIENT_PROFILE: ClassProfile = ClassProfile {
    class: EntityClass::Ambient,
    scale_range: (0.03, 0.09),
    palette: &[
        [0.10, 0.55, 0.25, 0.9],
        [0.16, 0.70, 0.32, 0.9],
        [0.95, 0.82, 0.35, 0.9],
        [0.85, 0.95, 1.00, 0.8],
    ],
    jitter: 0.35,
    surface_push: 1.0,
    float_amplitude: 0.06,
    float_speed: 1.4,
    compact_scale: 1.0,
    expanded_scale: 1.25,
    tumble_speed: 0.0,
};

pub const ORNAMENT_PROFILE: ClassProfile = ClassProfile {
    class: EntityClass::Ornament,
    scale_range: (0.14, 0.28),
    palette: &[
        [0.85, 0.10, 0.12, 1.0],
        [0.95, 0.75, 0.20, 1.0],
        [0.80, 0.82, 0.88, 1.0],
        [0.20, 0.35, 0.85, 1.0],
    ],
    jitter: 0.0,
    surface_push: 1.08,
    float_amplitude: 0.1,
    float_speed: 1.1,
    compact_scale: 1.0,
    expanded_scale: 1.2,
    tumble_speed: 0.4,
};

pub const GIFT_PROFILE: ClassProfile = ClassProfile {
    class: EntityClass::Gift,
    scale_range: (0.35, 0.6),
    palette: &[
        [0.75, 0.12, 0.15, 1.0],
        [0.12, 0.45, 0.22, 1.0],
        [0.92, 0.88, 0.80, 1.0],
        [0.55, 0.20, 0.60, 1.0],
    ],
    jitter: 0.0,
    surface_push: 1.12,
    float_amplitude: 0.15,
    float_speed: 0.8,
    compact_scale: 1.0,
    expanded_scale: 1.3,
    tumble_speed: 0.6,
};

/// Ambient points, ornaments and gifts: fixed capacity, random scatter cached.
#[derive(Clone, Debug)]
pub struct ClassPopulation {
    profile: ClassProfile,
    entities: Vec<Entity>,
}

impl ClassPopulation {
    pub fn new<R: Rng + ?Sized>(
        profile: ClassProfile,
        count: usize,
        rng: &mut R,
    ) -> Result<Self, SceneError> {
        if count == 0 {
            return Err(SceneError::EmptyPopulation {
                class: profile.class,
            });
        }
        let entities = (0..count)
            .map(|index| {
                let mut gathered = tree_position(index, count);
                gathered.x *= profile.surface_push;
                gathered.z *= profile.surface_push;
                if profile.jitter > 0.0 {
                    gathered += Vec3::new(
                        rng.gen_range(-1.0..1.0),
                        rng.gen_range(-1.0..1.0),
                        rng.gen_range(-1.0..1.0),
                    ) * profile.jitter;
                }
                let scattered = scatter_position(rng);
                let (lo, hi) = profile.scale_range;
                let aux = Auxiliary {
                    scale: rng.gen_range(lo..=hi),
                    tint: profile.palette[rng.gen_range(0..profile.palette.len())],
                    phase: rng.gen::<f32>() * std::f32::consts::TAU,
                    rotation_seed: rng.gen::<f32>() * std::f32::consts::TAU,
                };
                Entity {
                    index,
                    gathered,
                    scattered,
                    aux,
                }
            })
            .collect::<Vec<_>>();
        log::info!("[scene] built {:?} population n={}", profile.class, count);
        Ok(Self { profile, entities })
    }

    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
}

impl Population for ClassPopulation {
    fn class(&self) -> EntityClass {
        self.profile.class
    }

    fn len(&self) -> usize {
        self.entities.len()
    }

    fn transform_at(&self, index: usize, frame: &MorphFrame) -> Transform {
        let e = &self.entities[index];
        let p = &self.profile;
        let local = e.position_at(frame.progress)
            + float_offset(e.aux.phase, frame.elapsed, p.float_speed, p.float_amplitude);
        let spin = Quat::from_rotation_y(frame.spin_angle);
        let tumble = Quat::from_euler(
            EulerRot::YXZ,
            e.aux.rotation_seed + frame.elapsed * p.tumble_speed,
            e.aux.rotation_seed * 0.5,
            0.0,
        );
        let scale = e.aux.scale * mix(p.compact_scale, p.expanded_scale, frame.progress);
        Transform {
            position: spin * local,
            rotation: spin * tumble,
            scale: Vec3::splat(scale),
            tint: e.aux.tint,
        }
    }
}

// ---------------- Photos ----------------

/// Externally supplied photo descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct PhotoContent {
    pub source: String,
    pub aspect: f32,
}

impl PhotoContent {
    pub fn new(source: impl Into<String>, aspect: f32) -> Self {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect.clamp(PHOTO_ASPECT_MIN, PHOTO_ASPECT_MAX)
        } else {
            1.0
        };
        Self {
            source: source.into(),
            aspect,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PhotoSlot {
    Placeholder,
    Filled(PhotoContent),
}

#[derive(Clone, Debug)]
pub struct PhotoEntity {
    pub entity: Entity,
    pub slot: PhotoSlot,
    pub gathered_rotation: Quat,
    pub gallery_rotation: Quat,
}

impl PhotoEntity {
    #[inline]
    pub fn is_placeholder(&self) -> bool {
        matches!(self.slot, PhotoSlot::Placeholder)
    }
}

/// Outcome of [`PhotoGallery::add_photos`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhotoUpdate {
    pub replaced: Vec<usize>,
    pub appended: usize,
}

/// Framed photos: starts with placeholders, fills them in index order, then
/// grows by appending.
#[derive(Clone, Debug)]
pub struct PhotoGallery {
    photos: Vec<PhotoEntity>,
}

impl PhotoGallery {
    pub fn new(placeholders: usize) -> Result<Self, SceneError> {
        if placeholders == 0 {
            return Err(SceneError::EmptyPopulation {
                class: EntityClass::Photo,
            });
        }
        let mut gallery = Self {
            photos: Vec::with_capacity(placeholders),
        };
        for _ in 0..placeholders {
            gallery.push_slot(PhotoSlot::Placeholder);
        }
        gallery.relayout();
        Ok(gallery)
    }

    pub fn photos(&self) -> &[PhotoEntity] {
        &self.photos
    }

    pub fn placeholder_count(&self) -> usize {
        self.photos.iter().filter(|p| p.is_placeholder()).count()
    }

    /// Fill placeholders first (lowest index first), then append.
    pub fn add_photos<I>(&mut self, items: I) -> PhotoUpdate
    where
        I: IntoIterator<Item = PhotoContent>,
    {
        let mut update = PhotoUpdate::default();
        for content in items {
            match self.photos.iter().position(PhotoEntity::is_placeholder) {
                Some(i) => {
                    self.photos[i].slot = PhotoSlot::Filled(content);
                    update.replaced.push(i);
                }
                None => {
                    self.push_slot(PhotoSlot::Filled(content));
                    update.appended += 1;
                }
            }
        }
        if update.appended > 0 {
            self.relayout();
        }
        log::info!(
            "[photos] replaced={} appended={} total={}",
            update.replaced.len(),
            update.appended,
            self.photos.len()
        );
        update
    }

    /// Swap the content of an existing entry. Returns `false` if out of range.
    pub fn replace_content(&mut self, index: usize, content: PhotoContent) -> bool {
        match self.photos.get_mut(index) {
            Some(p) => {
                p.slot = PhotoSlot::Filled(content);
                true
            }
            None => false,
        }
    }

    fn push_slot(&mut self, slot: PhotoSlot) {
        let index = self.photos.len();
        let phase = (index as f32 * 1.618_034).fract() * std::f32::consts::TAU;
        self.photos.push(PhotoEntity {
            entity: Entity {
                index,
                gathered: Vec3::ZERO,
                scattered: Vec3::ZERO,
                aux: Auxiliary {
                    scale: 1.0,
                    tint: PHOTO_TINT,
                    phase,
                    rotation_seed: 0.0,
                },
            },
            slot,
            gathered_rotation: Quat::IDENTITY,
            gallery_rotation: Quat::IDENTITY,
        });
    }

    // both layouts depend on the population size
    fn relayout(&mut self) {
        let total = self.photos.len();
        for (i, p) in self.photos.iter_mut().enumerate() {
            let mut gathered = tree_position(i, total);
            gathered.x *= PHOTO_TREE_PUSH;
            gathered.z *= PHOTO_TREE_PUSH;
            let gallery = gallery_position(i, total);
            p.entity.gathered = gathered;
            p.entity.scattered = gallery.position;
            p.gathered_rotation = outward_orientation(gathered);
            p.gallery_rotation = gallery.orientation;
        }
    }
}

impl Population for PhotoGallery {
    fn class(&self) -> EntityClass {
        EntityClass::Photo
    }

    fn len(&self) -> usize {
        self.photos.len()
    }

    fn transform_at(&self, index: usize, frame: &MorphFrame) -> Transform {
        let p = &self.photos[index];
        let local = p.entity.position_at(frame.progress)
            + float_offset(
                p.entity.aux.phase,
                frame.elapsed,
                PHOTO_FLOAT_SPEED,
                PHOTO_FLOAT_AMPLITUDE,
            );
        let spin = Quat::from_rotation_y(frame.spin_angle);
        let facing = p
            .gathered_rotation
            .slerp(p.gallery_rotation, frame.progress);
        let size = mix(PHOTO_SCALE_GATHERED, PHOTO_SCALE_GALLERY, frame.progress);
        let (aspect, tint) = match &p.slot {
            PhotoSlot::Placeholder => (1.0, PLACEHOLDER_TINT),
            PhotoSlot::Filled(content) => (content.aspect, p.entity.aux.tint),
        };
        Transform {
            position: spin * local,
            rotation: spin * facing,
            scale: Vec3::new(size * aspect, size, 1.0),
            tint,
        }
    }
}
