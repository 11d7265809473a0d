//=========================================================================
// Movement Task
//=========================================================================
//
// Time-boxed interpolation of a pose toward a target.
//
//   elapsed += dt  →  t = clamp(elapsed / duration)  →  smoothstep(t)
//     position:    linear lerp
//     orientation: shortest-arc slerp
//
// The terminal step writes the target pose verbatim instead of the last
// interpolated value, so chained moves never accumulate drift.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::math::Pose;

//=== MovementStep ========================================================

/// Pose produced by one step of a [`MovementTask`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementStep {
    pub pose: Pose,
    pub finished: bool,
}

//=== MovementTask ========================================================

/// Interpolates from `start` to `target` over `duration` seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementTask {
    start: Pose,
    target: Pose,
    duration: f32,
    elapsed: f32,
    finished: bool,
}

impl MovementTask {
    /// Creates a task. A zero, negative or non-finite `duration` completes
    /// on its first step.
    pub fn new(start: Pose, target: Pose, duration: f32) -> Self {
        Self {
            start,
            target,
            duration,
            elapsed: 0.0,
            finished: false,
        }
    }

    //--- Stepping ---------------------------------------------------------

    /// Advances by `dt` seconds and returns the pose for this step.
    ///
    /// Non-finite or negative `dt` counts as zero.
    pub fn step(&mut self, dt: f32) -> MovementStep {
        if self.finished {
            return MovementStep { pose: self.target, finished: true };
        }

        if !(self.duration.is_finite() && self.duration > 0.0) {
            return self.finish();
        }

        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }

        if self.elapsed >= self.duration {
            return self.finish();
        }

        MovementStep {
            pose: self.sample(self.elapsed / self.duration),
            finished: false,
        }
    }

    fn finish(&mut self) -> MovementStep {
        self.finished = true;
        self.elapsed = self.duration.max(0.0);
        MovementStep { pose: self.target, finished: true }
    }

    /// Interpolated pose at raw progress `t` (eased internally).
    pub fn sample(&self, t: f32) -> Pose {
        self.start.interpolate(self.target, t)
    }

    /// Consumes the task, yielding one pose per step of `dt` seconds and
    /// ending with the exact target pose.
    ///
    /// A non-positive `dt` cannot make progress; the sequence then snaps
    /// straight to the target.
    pub fn poses(mut self, dt: f32) -> impl Iterator<Item = Pose> {
        if !(dt.is_finite() && dt > 0.0) {
            self.duration = 0.0;
        }
        let mut done = false;
        std::iter::from_fn(move || {
            if done {
                return None;
            }
            let step = self.step(dt);
            done = step.finished;
            Some(step.pose)
        })
    }

    //--- Queries ----------------------------------------------------------

    pub fn start(&self) -> Pose {
        self.start
    }

    pub fn target(&self) -> Pose {
        self.target
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
