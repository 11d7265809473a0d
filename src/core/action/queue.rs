//=========================================================================
// Action Queue
//=========================================================================
//
// Ordered single-consumer queue of deferred, time-boxed actions for one
// owner (a camera, a prop). Runs strictly one action at a time.
//
// Tick lifecycle:
// ```text
//   enqueue() ─────> pending (never starts synchronously)
//   tick(dt):  idle? ─pop head─> start ─> step(dt) ─finished?─> Completed
//                                                        └─no──> running
//   clear():   drop pending, abort running (pose stays where it was)
// ```
//
// A completed action frees the queue for the *next* tick, so an action
// enqueued in reaction to a completion starts one tick later.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::movement::MovementTask;
use crate::core::math::Pose;

//=== ActionId ============================================================

/// Identifier assigned to an action at enqueue time, unique per queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(u64);

impl ActionId {
    pub fn get(self) -> u64 {
        self.0
    }
}

//=== QueuedAction ========================================================

/// A unit of deferred work.
#[derive(Debug, Clone, PartialEq)]
pub enum QueuedAction {
    /// Movement with an explicit start pose.
    Movement(MovementTask),

    /// Movement starting from wherever the owner is when the action begins.
    MoveTo { target: Pose, duration: f32 },

    /// Timed wait; holds the queue without touching the pose.
    Wait { duration: f32 },
}

impl QueuedAction {
    pub fn duration(&self) -> f32 {
        match self {
            Self::Movement(task) => task.duration(),
            Self::MoveTo { duration, .. } | Self::Wait { duration } => *duration,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Movement(_) | Self::MoveTo { .. } => ActionKind::Movement,
            Self::Wait { .. } => ActionKind::Wait,
        }
    }
}

/// Coarse category of an action, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Movement,
    Wait,
}

//=== ActionEvent =========================================================

/// Lifecycle notifications produced by the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEvent {
    Started { id: ActionId, kind: ActionKind },
    Completed { id: ActionId, kind: ActionKind },
    /// Stopped early by `clear`/`stop_current`; never snapped to target.
    Aborted { id: ActionId, kind: ActionKind },
}

impl ActionEvent {
    pub fn id(&self) -> ActionId {
        match *self {
            Self::Started { id, .. } | Self::Completed { id, .. } | Self::Aborted { id, .. } => id,
        }
    }
}

//=== Running Actions =====================================================

#[derive(Debug)]
struct WaitTask {
    duration: f32,
    elapsed: f32,
}

impl WaitTask {
    fn step(&mut self, dt: f32) -> bool {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        !(self.duration.is_finite() && self.elapsed < self.duration)
    }
}

#[derive(Debug)]
enum Running {
    Movement(MovementTask),
    Wait(WaitTask),
}

impl Running {
    fn kind(&self) -> ActionKind {
        match self {
            Self::Movement(_) => ActionKind::Movement,
            Self::Wait(_) => ActionKind::Wait,
        }
    }
}

//=== ActionQueue =========================================================

/// FIFO of [`QueuedAction`]s applied to one owner's pose.
#[derive(Debug)]
pub struct ActionQueue {
    owner: String,
    pose: Pose,
    pending: VecDeque<(ActionId, QueuedAction)>,
    current: Option<(ActionId, Running)>,
    next_id: u64,
}

impl ActionQueue {
    //--- Construction -----------------------------------------------------

    /// Creates an idle queue for `owner`, resting at `pose`.
    pub fn new(owner: impl Into<String>, pose: Pose) -> Self {
        Self {
            owner: owner.into(),
            pose,
            pending: VecDeque::new(),
            current: None,
            next_id: 1,
        }
    }

    //--- Enqueue ----------------------------------------------------------

    /// Appends an action. Never starts it; the head is picked up on the
    /// next [`tick`](Self::tick).
    pub fn enqueue(&mut self, action: QueuedAction) -> ActionId {
        let id = ActionId(self.next_id);
        self.next_id += 1;
        trace!(
            target: "action",
            "[{}] Enqueued {:?} {:?} ({}s)",
            self.owner,
            id,
            action.kind(),
            action.duration()
        );
        self.pending.push_back((id, action));
        id
    }

    pub fn enqueue_movement(&mut self, start: Pose, target: Pose, duration: f32) -> ActionId {
        self.enqueue(QueuedAction::Movement(MovementTask::new(start, target, duration)))
    }

    pub fn enqueue_move_to(&mut self, target: Pose, duration: f32) -> ActionId {
        self.enqueue(QueuedAction::MoveTo { target, duration })
    }

    pub fn enqueue_wait(&mut self, duration: f32) -> ActionId {
        self.enqueue(QueuedAction::Wait { duration })
    }

    //--- Update -----------------------------------------------------------

    /// Runs one scheduling step.
    ///
    /// Starts the head action if idle and advances the running action by
    /// `dt`. At most one action starts and at most one completes per tick.
    pub fn tick(&mut self, dt: f32) -> Vec<ActionEvent> {
        let mut events = Vec::new();

        if self.current.is_none() {
            if let Some((id, action)) = self.pending.pop_front() {
                let running = self.begin(action);
                debug!(target: "action", "[{}] Started {:?} {:?}", self.owner, id, running.kind());
                events.push(ActionEvent::Started { id, kind: running.kind() });
                self.current = Some((id, running));
            }
        }

        let Some((id, running)) = self.current.as_mut() else {
            return events;
        };

        let finished = match running {
            Running::Movement(task) => {
                let step = task.step(dt);
                self.pose = step.pose;
                step.finished
            }
            Running::Wait(wait) => wait.step(dt),
        };

        if finished {
            let (id, kind) = (*id, running.kind());
            debug!(target: "action", "[{}] Completed {:?}", self.owner, id);
            self.current = None;
            events.push(ActionEvent::Completed { id, kind });
        }

        events
    }

    fn begin(&self, action: QueuedAction) -> Running {
        match action {
            QueuedAction::Movement(task) => Running::Movement(task),
            QueuedAction::MoveTo { target, duration } => {
                Running::Movement(MovementTask::new(self.pose, target, duration))
            }
            QueuedAction::Wait { duration } => Running::Wait(WaitTask { duration, elapsed: 0.0 }),
        }
    }

    //--- Abort ------------------------------------------------------------

    /// Aborts the running action, leaving the pose where it was.
    pub fn stop_current(&mut self) -> Option<ActionEvent> {
        let (id, running) = self.current.take()?;
        debug!(target: "action", "[{}] Aborted {:?}", self.owner, id);
        Some(ActionEvent::Aborted { id, kind: running.kind() })
    }

    /// Drops every pending action and aborts the running one.
    pub fn clear(&mut self) -> Option<ActionEvent> {
        if !self.pending.is_empty() {
            debug!(target: "action", "[{}] Dropped {} pending action(s)", self.owner, self.pending.len());
        }
        self.pending.clear();
        self.stop_current()
    }

    //--- Queries ----------------------------------------------------------

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Current pose of the owned resource.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<ActionId> {
        self.current.as_ref().map(|(id, _)| *id)
    }

    /// Pending actions, excluding the running one.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.current.is_none()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::{Quat, Vec3};
    use pretty_assertions::assert_eq;

    const DT: f32 = 0.25;

    fn at(x: f32) -> Pose {
        Pose::new(Vec3::new(x, 0.0, 0.0), Quat::IDENTITY)
    }

    fn drain(queue: &mut ActionQueue, max_ticks: usize) -> Vec<(usize, ActionEvent)> {
        let mut log = Vec::new();
        for tick in 1..=max_ticks {
            for event in queue.tick(DT) {
                log.push((tick, event));
            }
            if queue.is_empty() {
                break;
            }
        }
        log
    }

    //--- Ordering ---------------------------------------------------------

    #[test]
    fn enqueue_does_not_start_synchronously() {
        let mut q = ActionQueue::new("camera", at(0.0));
        q.enqueue_wait(1.0);
        assert!(!q.is_running());
        assert_eq!(q.len(), 1);

        q.tick(DT);
        assert!(q.is_running());
        assert_eq!(q.len(), 0);
    }

    #[test]
    fn actions_run_fifo_and_back_to_back() {
        let mut q = ActionQueue::new("camera", at(0.0));
        let a = q.enqueue_wait(1.0);
        let b = q.enqueue_wait(2.0);

        let log = drain(&mut q, 100);
        assert_eq!(
            log,
            vec![
                (1, ActionEvent::Started { id: a, kind: ActionKind::Wait }),
                (4, ActionEvent::Completed { id: a, kind: ActionKind::Wait }),
                (5, ActionEvent::Started { id: b, kind: ActionKind::Wait }),
                (12, ActionEvent::Completed { id: b, kind: ActionKind::Wait }),
            ]
        );
        // 12 ticks × 0.25 s = 3.0 s = 1.0 + 2.0
    }

    #[test]
    fn enqueue_after_completion_starts_next_tick() {
        let mut q = ActionQueue::new("camera", at(0.0));
        q.enqueue_wait(0.25);
        let events = q.tick(DT);
        assert!(matches!(events.last(), Some(ActionEvent::Completed { .. })));

        let next = q.enqueue_wait(0.25);
        assert!(!q.is_running());
        let events = q.tick(DT);
        assert_eq!(events[0], ActionEvent::Started { id: next, kind: ActionKind::Wait });
    }

    //--- Movement ---------------------------------------------------------

    #[test]
    fn move_to_captures_pose_when_started() {
        let mut q = ActionQueue::new("camera", at(0.0));
        q.enqueue_move_to(at(4.0), 0.5);
        q.enqueue_move_to(at(8.0), 0.5);

        drain(&mut q, 100);
        assert_eq!(q.pose(), at(8.0));
    }

    #[test]
    fn explicit_start_movement_snaps_to_target() {
        let mut q = ActionQueue::new("prop", at(0.0));
        let target = Pose::from_euler_degrees(Vec3::new(1.0, 2.0, 3.0), 30.0, 45.0, 0.0);
        q.enqueue_movement(at(10.0), target, 0.75);

        drain(&mut q, 100);
        assert_eq!(q.pose(), target);
    }

    #[test]
    fn zero_duration_move_completes_on_first_tick() {
        let mut q = ActionQueue::new("camera", at(0.0));
        let id = q.enqueue_move_to(at(3.0), 0.0);
        let events = q.tick(DT);
        assert_eq!(
            events,
            vec![
                ActionEvent::Started { id, kind: ActionKind::Movement },
                ActionEvent::Completed { id, kind: ActionKind::Movement },
            ]
        );
        assert_eq!(q.pose(), at(3.0));
    }

    //--- Abort ------------------------------------------------------------

    #[test]
    fn clear_aborts_without_snapping() {
        let mut q = ActionQueue::new("camera", at(0.0));
        let id = q.enqueue_move_to(at(4.0), 1.0);
        q.enqueue_wait(5.0);

        q.tick(DT);
        q.tick(DT);
        let mid = q.pose();
        assert_eq!(mid, at(2.0));

        assert_eq!(q.clear(), Some(ActionEvent::Aborted { id, kind: ActionKind::Movement }));
        assert!(q.is_empty());
        assert_eq!(q.pose(), mid);

        // Nothing left to run
        assert!(q.tick(DT).is_empty());
        assert_eq!(q.pose(), mid);
    }

    #[test]
    fn stop_current_keeps_pending() {
        let mut q = ActionQueue::new("camera", at(0.0));
        q.enqueue_wait(1.0);
        let next = q.enqueue_wait(1.0);
        q.tick(DT);

        assert!(q.stop_current().is_some());
        assert_eq!(q.len(), 1);
        assert_eq!(q.tick(DT)[0].id(), next);
    }

    #[test]
    fn clear_on_idle_queue_is_none() {
        let mut q = ActionQueue::new("camera", at(0.0));
        assert_eq!(q.clear(), None);
    }
}
