use crate::constants::*;
use crate::gesture::GestureCommand;

/// Discrete configuration the scene is heading toward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MorphTarget {
    #[default]
    Gathered,
    Scattered,
}

impl MorphTarget {
    /// Progress value this target settles at.
    #[inline]
    pub fn bound(self) -> f32 {
        match self {
            MorphTarget::Gathered => 0.0,
            MorphTarget::Scattered => 1.0,
        }
    }

    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            MorphTarget::Gathered => MorphTarget::Scattered,
            MorphTarget::Scattered => MorphTarget::Gathered,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MorphTarget::Gathered => "tree",
            MorphTarget::Scattered => "scattered",
        }
    }
}

/// One smoothing step from `current` toward `target`.
///
/// Moves by `factor` of the remaining distance, never overshoots, and snaps
/// to `target` once within [`MORPH_SNAP_EPSILON`]. The step never shrinks
/// below [`MORPH_MIN_STEP`], so any factor in (0, 1] terminates.
#[inline]
pub fn approach(current: f32, target: f32, factor: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= MORPH_SNAP_EPSILON {
        return target;
    }
    let mut step = diff * factor;
    if step.abs() < MORPH_MIN_STEP {
        step = MORPH_MIN_STEP.copysign(diff);
    }
    let next = current + step;
    let overshot = (target - next) * diff <= 0.0;
    if overshot || (target - next).abs() <= MORPH_SNAP_EPSILON {
        target
    } else {
        next.clamp(0.0, 1.0)
    }
}

/// Per-frame snapshot handed by reference to every population.
///
/// Produced once per tick, so all populations observe the same values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MorphFrame {
    pub progress: f32,
    pub elapsed: f32,
    pub spin_angle: f32,
}

/// Single writer of the morph progress.
#[derive(Clone, Debug)]
pub struct MorphController {
    target: MorphTarget,
    progress: f32,
    smoothing: f32,
    elapsed: f32,
    spin_angle: f32,
}

impl Default for MorphController {
    fn default() -> Self {
        Self::new(MORPH_SMOOTHING)
    }
}

impl MorphController {
    pub fn new(smoothing: f32) -> Self {
        Self {
            target: MorphTarget::Gathered,
            progress: 0.0,
            smoothing,
            elapsed: 0.0,
            spin_angle: 0.0,
        }
    }

    #[inline]
    pub fn target(&self) -> MorphTarget {
        self.target
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn toggle(&mut self) {
        self.target = self.target.flipped();
        log::info!("[morph] target -> {}", self.target.name());
    }

    /// Returns `true` when the target actually changed.
    pub fn set_target(&mut self, target: MorphTarget) -> bool {
        if self.target == target {
            return false;
        }
        self.target = target;
        log::info!("[morph] target -> {}", target.name());
        true
    }

    /// Idempotent: repeating a command for the current target is a no-op.
    pub fn apply_gesture(&mut self, command: GestureCommand) -> bool {
        self.set_target(command.target())
    }

    /// Advance one rendered frame and publish the snapshot for this tick.
    pub fn tick(&mut self, dt_sec: f32) -> MorphFrame {
        let dt_sec = dt_sec.max(0.0);
        self.progress = approach(self.progress, self.target.bound(), self.smoothing);
        self.elapsed += dt_sec;
        // spin only accumulates in the tree view; the angle is held past the midpoint
        if self.progress < IDLE_SPIN_THRESHOLD {
            self.spin_angle = (self.spin_angle + IDLE_SPIN_RAD_PER_SEC * dt_sec)
                % std::f32::consts::TAU;
        }
        self.frame()
    }

    /// Snapshot of the last published values without advancing.
    pub fn frame(&self) -> MorphFrame {
        MorphFrame {
            progress: self.progress,
            elapsed: self.elapsed,
            spin_angle: self.spin_angle,
        }
    }
}
