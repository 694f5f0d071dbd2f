// Host-side tests for the morph progress controller.

use evergreen_core::*;

fn ticks_to_settle(factor: f32, from: f32, to: f32, limit: usize) -> Option<usize> {
    let mut p = from;
    for n in 1..=limit {
        let next = approach(p, to, factor);
        if to > from {
            assert!(next >= p, "not monotone: {p} -> {next}");
        } else {
            assert!(next <= p, "not monotone: {p} -> {next}");
        }
        assert!((0.0..=1.0).contains(&next));
        p = next;
        if p == to {
            return Some(n);
        }
    }
    None
}

#[test]
fn approach_reaches_exact_bounds_for_any_factor() {
    for factor in [0.001_f32, 0.05, 0.5, 0.999, 1.0] {
        assert!(
            ticks_to_settle(factor, 0.0, 1.0, 20_000).is_some(),
            "factor {factor} never reached 1.0"
        );
        assert!(
            ticks_to_settle(factor, 1.0, 0.0, 20_000).is_some(),
            "factor {factor} never reached 0.0"
        );
    }
}

#[test]
fn approach_snaps_inside_epsilon() {
    assert_eq!(approach(0.9995, 1.0, 0.05), 1.0);
    assert_eq!(approach(0.0005, 0.0, 0.05), 0.0);
    assert_eq!(approach(1.0, 1.0, 0.05), 1.0);
}

#[test]
fn approach_never_overshoots() {
    let next = approach(0.2, 1.0, 1.0);
    assert_eq!(next, 1.0);
    let next = approach(0.8, 0.0, 1.0);
    assert_eq!(next, 0.0);
}

#[test]
fn default_smoothing_settles_in_reasonable_frames() {
    let n = ticks_to_settle(MORPH_SMOOTHING, 0.0, 1.0, 1000).expect("settles");
    assert!(n > 10 && n < 200, "n={n}");
}

#[test]
fn controller_starts_gathered_at_zero() {
    let m = MorphController::default();
    assert_eq!(m.target(), MorphTarget::Gathered);
    assert_eq!(m.progress(), 0.0);
    assert_eq!(m.frame(), MorphFrame::default());
}

#[test]
fn toggle_flips_target_and_progress_follows() {
    let mut m = MorphController::new(0.5);
    m.toggle();
    assert_eq!(m.target(), MorphTarget::Scattered);
    for _ in 0..100 {
        m.tick(1.0 / 60.0);
    }
    assert_eq!(m.progress(), 1.0);
    m.toggle();
    assert_eq!(m.target(), MorphTarget::Gathered);
    for _ in 0..100 {
        m.tick(1.0 / 60.0);
    }
    assert_eq!(m.progress(), 0.0);
}

#[test]
fn gesture_commands_are_idempotent() {
    let mut m = MorphController::default();
    assert!(!m.apply_gesture(GestureCommand::Gather));
    assert!(m.apply_gesture(GestureCommand::Scatter));
    assert!(!m.apply_gesture(GestureCommand::Scatter));
    assert_eq!(m.target(), MorphTarget::Scattered);
    assert!(m.apply_gesture(GestureCommand::Gather));
    assert_eq!(m.target(), MorphTarget::Gathered);
}

#[test]
fn reversal_mid_transition_turns_around_smoothly() {
    let mut m = MorphController::new(0.1);
    m.set_target(MorphTarget::Scattered);
    for _ in 0..5 {
        m.tick(0.016);
    }
    let mid = m.progress();
    assert!(mid > 0.0 && mid < 1.0);
    m.set_target(MorphTarget::Gathered);
    let next = m.tick(0.016).progress;
    assert!(next < mid);
    assert!(mid - next < 0.1 * mid + 1e-6);
}

#[test]
fn spin_accumulates_only_in_tree_view() {
    let mut m = MorphController::new(0.05);
    let f = m.tick(1.0);
    assert!((f.spin_angle - IDLE_SPIN_RAD_PER_SEC).abs() < 1e-6);

    m.set_target(MorphTarget::Scattered);
    while m.progress() < IDLE_SPIN_THRESHOLD {
        m.tick(0.016);
    }
    let held = m.frame().spin_angle;
    for _ in 0..50 {
        assert_eq!(m.tick(0.5).spin_angle, held);
    }
}

#[test]
fn elapsed_ignores_negative_dt() {
    let mut m = MorphController::default();
    m.tick(0.25);
    let f = m.tick(-1.0);
    assert_eq!(f.elapsed, 0.25);
}

#[test]
fn target_names_for_status_text() {
    assert_eq!(MorphTarget::Gathered.name(), "tree");
    assert_eq!(MorphTarget::Scattered.name(), "scattered");
    assert_eq!(MorphTarget::Gathered.flipped(), MorphTarget::Scattered);
    assert_eq!(MorphTarget::Scattered.bound(), 1.0);
}
