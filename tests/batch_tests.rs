// Host-side tests for the batch transform updater.

use evergreen_core::*;
use rand::prelude::*;

/// Sink that records every commit it receives.
#[derive(Default)]
struct RecordingSink {
    commits: Vec<Vec<InstanceRaw>>,
}

impl InstanceSink for RecordingSink {
    fn commit(&mut self, instances: &[InstanceRaw]) {
        self.commits.push(instances.to_vec());
    }
}

#[test]
fn instance_layout_matches_shader_stride() {
    assert_eq!(std::mem::size_of::<InstanceRaw>(), 64);
    assert_eq!(std::mem::align_of::<InstanceRaw>(), 4);
}

#[test]
fn whole_population_is_committed_once() {
    let mut rng = StdRng::seed_from_u64(2);
    let pop = ClassPopulation::new(AMBIENT_PROFILE, 3500, &mut rng).unwrap();
    let mut batch = BatchUpdater::new();
    let mut sink = RecordingSink::default();
    let n = batch.update(&pop, &MorphFrame::default(), &mut sink);
    assert_eq!(n, 3500);
    assert_eq!(sink.commits.len(), 1);
    assert_eq!(sink.commits[0].len(), 3500);
    assert_eq!(batch.commits(), 1);
}

#[test]
fn committed_instances_match_transforms() {
    let mut rng = StdRng::seed_from_u64(4);
    let pop = ClassPopulation::new(ORNAMENT_PROFILE, 12, &mut rng).unwrap();
    let frame = MorphFrame {
        progress: 0.3,
        elapsed: 1.5,
        spin_angle: 0.4,
    };
    let mut sink: Vec<InstanceRaw> = Vec::new();
    BatchUpdater::new().update(&pop, &frame, &mut sink);
    for (i, raw) in sink.iter().enumerate() {
        let t = pop.transform_at(i, &frame);
        assert_eq!(*raw, InstanceRaw::from_transform(&t, EntityClass::Ornament));
        assert_eq!(raw.shape, EntityClass::Ornament.shape());
    }
}

#[test]
fn vec_sink_replaces_previous_frame() {
    let mut gallery = PhotoGallery::new(8).unwrap();
    let mut batch = BatchUpdater::new();
    let mut sink: Vec<InstanceRaw> = Vec::new();
    batch.update(&gallery, &MorphFrame::default(), &mut sink);
    assert_eq!(sink.len(), 8);

    gallery.add_photos((0..10).map(|i| PhotoContent::new(format!("p{i}"), 1.0)));
    batch.update(&gallery, &MorphFrame::default(), &mut sink);
    assert_eq!(sink.len(), 10);
    assert_eq!(batch.commits(), 2);
}

#[test]
fn class_buffers_route_by_class() {
    let mut buffers: ClassBuffers<Vec<InstanceRaw>> = ClassBuffers::default();
    buffers.gifts.commit(&[InstanceRaw::default(); 3]);
    assert_eq!(buffers.get(EntityClass::Gift).len(), 3);
    for class in [EntityClass::Ambient, EntityClass::Ornament, EntityClass::Photo] {
        assert!(buffers.get(class).is_empty());
    }
}
