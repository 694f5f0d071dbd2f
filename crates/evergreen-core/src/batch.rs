use crate::morph::MorphFrame;
use crate::population::{EntityClass, Population, Transform};

/// GPU-side per-instance record. Layout matches `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub position: [f32; 3],
    pub shape: f32,
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    pub _pad: f32,
    pub color: [f32; 4],
}

impl InstanceRaw {
    pub fn from_transform(t: &Transform, class: EntityClass) -> Self {
        Self {
            position: t.position.to_array(),
            shape: class.shape(),
            rotation: t.rotation.to_array(),
            scale: t.scale.to_array(),
            _pad: 0.0,
            color: t.tint,
        }
    }
}

/// Destination of one population's instances for the current frame.
///
/// `commit` receives the complete set for the frame, never a partial one.
pub trait InstanceSink {
    fn commit(&mut self, instances: &[InstanceRaw]);
}

impl InstanceSink for Vec<InstanceRaw> {
    fn commit(&mut self, instances: &[InstanceRaw]) {
        self.clear();
        self.extend_from_slice(instances);
    }
}

/// Evaluates a population into a reusable staging buffer, then commits once.
#[derive(Debug, Default)]
pub struct BatchUpdater {
    staging: Vec<InstanceRaw>,
    commits: u64,
}

impl BatchUpdater {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of instances committed.
    pub fn update<P, S>(&mut self, population: &P, frame: &MorphFrame, sink: &mut S) -> usize
    where
        P: Population + ?Sized,
        S: InstanceSink + ?Sized,
    {
        let class = population.class();
        let n = population.len();
        self.staging.clear();
        self.staging.reserve(n);
        for i in 0..n {
            let t = population.transform_at(i, frame);
            self.staging.push(InstanceRaw::from_transform(&t, class));
        }
        sink.commit(&self.staging);
        self.commits += 1;
        n
    }

    /// Total commits issued since creation.
    #[inline]
    pub fn commits(&self) -> u64 {
        self.commits
    }
}

/// One sink per entity class.
#[derive(Debug, Default)]
pub struct ClassBuffers<S> {
    pub ambient: S,
    pub ornaments: S,
    pub gifts: S,
    pub photos: S,
}

impl<S> ClassBuffers<S> {
    pub fn get(&self, class: EntityClass) -> &S {
        match class {
            EntityClass::Ambient => &self.ambient,
            EntityClass::Ornament => &self.ornaments,
            EntityClass::Gift => &self.gifts,
            EntityClass::Photo => &self.photos,
        }
    }
}
