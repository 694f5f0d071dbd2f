use crate::batch::{BatchUpdater, ClassBuffers, InstanceSink};
use crate::constants::*;
use crate::error::SceneError;
use crate::gesture::GestureCommand;
use crate::morph::{MorphController, MorphFrame, MorphTarget};
use crate::population::{
    ClassPopulation, PhotoContent, PhotoGallery, PhotoUpdate, AMBIENT_PROFILE, GIFT_PROFILE,
    ORNAMENT_PROFILE,
};
use rand::prelude::*;

#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub ambient_count: usize,
    pub ornament_count: usize,
    pub gift_count: usize,
    pub photo_placeholders: usize,
    pub smoothing: f32,
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ambient_count: AMBIENT_COUNT,
            ornament_count: ORNAMENT_COUNT,
            gift_count: GIFT_COUNT,
            photo_placeholders: PHOTO_PLACEHOLDERS,
            smoothing: MORPH_SMOOTHING,
            seed: DEFAULT_SEED,
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> Result<(), SceneError> {
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(SceneError::InvalidSmoothing(self.smoothing));
        }
        Ok(())
    }
}

/// All populations plus the single morph controller that drives them.
pub struct Scene {
    morph: MorphController,
    ambient: ClassPopulation,
    ornaments: ClassPopulation,
    gifts: ClassPopulation,
    photos: PhotoGallery,
    batch: BatchUpdater,
}

impl Scene {
    pub fn new(config: &SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let ambient = ClassPopulation::new(AMBIENT_PROFILE, config.ambient_count, &mut rng)?;
        let ornaments = ClassPopulation::new(ORNAMENT_PROFILE, config.ornament_count, &mut rng)?;
        let gifts = ClassPopulation::new(GIFT_PROFILE, config.gift_count, &mut rng)?;
        let photos = PhotoGallery::new(config.photo_placeholders)?;
        log::info!(
            "[scene] ready: ambient={} ornaments={} gifts={} photos={}",
            config.ambient_count,
            config.ornament_count,
            config.gift_count,
            config.photo_placeholders
        );
        Ok(Self {
            morph: MorphController::new(config.smoothing),
            ambient,
            ornaments,
            gifts,
            photos,
            batch: BatchUpdater::new(),
        })
    }

    #[inline]
    pub fn morph(&self) -> &MorphController {
        &self.morph
    }

    #[inline]
    pub fn target(&self) -> MorphTarget {
        self.morph.target()
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.morph.progress()
    }

    pub fn ambient(&self) -> &ClassPopulation {
        &self.ambient
    }

    pub fn ornaments(&self) -> &ClassPopulation {
        &self.ornaments
    }

    pub fn gifts(&self) -> &ClassPopulation {
        &self.gifts
    }

    pub fn photos(&self) -> &PhotoGallery {
        &self.photos
    }

    pub fn toggle(&mut self) {
        self.morph.toggle();
    }

    pub fn apply_gesture(&mut self, command: GestureCommand) -> bool {
        self.morph.apply_gesture(command)
    }

    pub fn apply_gestures(&mut self, commands: &[GestureCommand]) {
        for &c in commands {
            self.morph.apply_gesture(c);
        }
    }

    pub fn add_photos<I>(&mut self, items: I) -> PhotoUpdate
    where
        I: IntoIterator<Item = PhotoContent>,
    {
        self.photos.add_photos(items)
    }

    /// Swap the content of an existing photo. Returns `false` if out of range.
    pub fn replace_photo(&mut self, index: usize, content: PhotoContent) -> bool {
        self.photos.replace_content(index, content)
    }

    /// Advance the morph clock once, without touching any buffers.
    ///
    /// Frontends call this every frame even when nothing can be drawn, so
    /// progress and spin keep moving through surface loss.
    pub fn advance(&mut self, dt_sec: f32) -> MorphFrame {
        self.morph.tick(dt_sec)
    }

    /// Commit every population for `frame` into `buffers`.
    pub fn upload<S: InstanceSink>(&mut self, frame: &MorphFrame, buffers: &mut ClassBuffers<S>) {
        self.batch.update(&self.ambient, frame, &mut buffers.ambient);
        self.batch.update(&self.ornaments, frame, &mut buffers.ornaments);
        self.batch.update(&self.gifts, frame, &mut buffers.gifts);
        self.batch.update(&self.photos, frame, &mut buffers.photos);
    }

    /// [`advance`](Self::advance) then [`upload`](Self::upload).
    pub fn tick<S: InstanceSink>(&mut self, dt_sec: f32, buffers: &mut ClassBuffers<S>) -> MorphFrame {
        let frame = self.advance(dt_sec);
        self.upload(&frame, buffers);
        frame
    }
}
