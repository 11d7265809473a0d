//=========================================================================
// Director
//=========================================================================
//
// Composition root for scene-level systems on the logic thread.
//
// Architecture:
//   Director
//     ├─ ChoicePresenter           (one session at a time)
//     ├─ ActionQueue per owner     ("camera", "contract", ...)
//     └─ PoseRegistry              (named movement targets)
//
// Tick order:
//   1. Events queued by apply() since the last tick
//   2. Presenter tick → Presentation signals → SessionResolved
//   3. Action queues, in owner registration order
//
// Nothing here is global: the host builds one Director and hands it to
// whatever drives the ticks (the threaded engine or a test).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::action::ActionQueue;
use crate::core::choice::{ChoicePresenter, PresenterConfig};
use crate::core::command_bridge::{DirectorCommand, DirectorEvent};
use crate::core::error::{ConfigurationError, PresenterError};
use crate::core::math::Pose;
use crate::core::registry::PoseRegistry;

//=== Director ============================================================

/// Owns the presenter, the per-owner action queues and the pose registry.
#[derive(Debug)]
pub struct Director {
    presenter: ChoicePresenter,
    queues: Vec<ActionQueue>,
    owners: HashMap<String, usize>,
    poses: PoseRegistry,
    outbox: Vec<DirectorEvent>,
}

impl Director {
    //--- Construction -----------------------------------------------------

    pub fn new(config: PresenterConfig) -> Result<Self, ConfigurationError> {
        Ok(Self {
            presenter: ChoicePresenter::new(config)?,
            queues: Vec::new(),
            owners: HashMap::new(),
            poses: PoseRegistry::new(),
            outbox: Vec::new(),
        })
    }

    /// Registers an action owner resting at `pose`.
    ///
    /// Returns `false` and leaves the existing queue untouched when the
    /// name is already taken.
    pub fn register_owner(&mut self, name: impl Into<String>, pose: Pose) -> bool {
        let name = name.into();
        if self.owners.contains_key(&name) {
            warn!(target: "director", "Owner '{}' already registered", name);
            return false;
        }
        debug!(target: "director", "Registered owner '{}'", name);
        self.owners.insert(name.clone(), self.queues.len());
        self.queues.push(ActionQueue::new(name, pose));
        true
    }

    //--- Commands ---------------------------------------------------------

    /// Routes one driver command. Rejections surface as
    /// [`DirectorEvent::CommandRejected`] on the next tick.
    pub fn apply(&mut self, command: DirectorCommand) {
        match command {
            DirectorCommand::Present { candidates, show_unavailable } => {
                let show = show_unavailable.unwrap_or(self.presenter.config().show_unavailable);
                match self.presenter.present_filtered(candidates, show, None) {
                    Ok(id) => self.outbox.push(DirectorEvent::SessionOpened(id)),
                    Err(e) => self.reject(e.to_string()),
                }
            }

            DirectorCommand::Select(id) => {
                if !self.presenter.select(id.clone()) {
                    self.reject(format!("select '{}': no choice session is open", id));
                }
            }

            DirectorCommand::Hover(id) => {
                self.presenter.hover(id);
            }

            DirectorCommand::SubmitFocused => {
                if !self.presenter.submit_focused() {
                    self.reject("submit: nothing is focused".to_string());
                }
            }

            DirectorCommand::CancelSession => {
                let result = match self.presenter.current_session() {
                    Some(session) => self.presenter.cancel(session),
                    None => Err(PresenterError::NoOpenSession),
                };
                if let Err(e) = result {
                    self.reject(e.to_string());
                }
            }

            DirectorCommand::MoveTo { owner, target, duration } => {
                if let Some(queue) = self.queue_for(&owner) {
                    queue.enqueue_move_to(target, duration);
                }
            }

            DirectorCommand::MoveToNamed { owner, pose, duration } => {
                let Some(target) = self.poses.get(&pose) else {
                    warn!(target: "director", "Unknown pose '{}' for '{}'", pose, owner);
                    self.reject(format!("unknown pose '{}'", pose));
                    return;
                };
                if let Some(queue) = self.queue_for(&owner) {
                    queue.enqueue_move_to(target, duration);
                }
            }

            DirectorCommand::Movement { owner, start, target, duration } => {
                if let Some(queue) = self.queue_for(&owner) {
                    queue.enqueue_movement(start, target, duration);
                }
            }

            DirectorCommand::Wait { owner, seconds } => {
                if let Some(queue) = self.queue_for(&owner) {
                    queue.enqueue_wait(seconds);
                }
            }

            DirectorCommand::ClearQueue { owner } => {
                let aborted = self.queue_for(&owner).and_then(|queue| queue.clear());
                if let Some(event) = aborted {
                    self.outbox.push(DirectorEvent::Action { owner, event });
                }
            }

            DirectorCommand::Shutdown => {
                debug!(target: "director", "Shutdown is handled by the engine loop");
            }
        }
    }

    fn queue_for(&mut self, owner: &str) -> Option<&mut ActionQueue> {
        match self.owners.get(owner) {
            Some(&index) => self.queues.get_mut(index),
            None => {
                warn!(target: "director", "Unknown action owner '{}'", owner);
                self.outbox
                    .push(DirectorEvent::CommandRejected(format!("unknown owner '{}'", owner)));
                None
            }
        }
    }

    fn reject(&mut self, reason: String) {
        warn!(target: "director", "Command rejected: {}", reason);
        self.outbox.push(DirectorEvent::CommandRejected(reason));
    }

    //--- Update -----------------------------------------------------------

    /// Runs one scheduling step and returns everything that happened.
    pub fn tick(&mut self, dt: f32) -> Vec<DirectorEvent> {
        let mut events = std::mem::take(&mut self.outbox);

        let outcome = self.presenter.tick(dt);
        events.extend(
            self.presenter
                .take_signals()
                .into_iter()
                .map(DirectorEvent::Presentation),
        );
        if let Some(outcome) = outcome {
            info!(target: "director", "Session {:?} resolved", outcome.session);
            events.push(DirectorEvent::SessionResolved(outcome));
        }

        for queue in &mut self.queues {
            for event in queue.tick(dt) {
                events.push(DirectorEvent::Action {
                    owner: queue.owner().to_string(),
                    event,
                });
            }
        }

        events
    }

    //--- Accessors --------------------------------------------------------

    pub fn presenter(&self) -> &ChoicePresenter {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut ChoicePresenter {
        &mut self.presenter
    }

    pub fn queue(&self, owner: &str) -> Option<&ActionQueue> {
        self.owners.get(owner).and_then(|&i| self.queues.get(i))
    }

    pub fn queue_mut(&mut self, owner: &str) -> Option<&mut ActionQueue> {
        let index = *self.owners.get(owner)?;
        self.queues.get_mut(index)
    }

    pub fn poses(&self) -> &PoseRegistry {
        &self.poses
    }

    pub fn poses_mut(&mut self) -> &mut PoseRegistry {
        &mut self.poses
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{ActionEvent, ActionKind};
    use crate::core::choice::{ChoiceCandidate, PresentationSignal};
    use crate::core::math::{Quat, Vec3};
    use pretty_assertions::assert_eq;

    const DT: f32 = 0.25;

    fn director() -> Director {
        let mut d = Director::new(PresenterConfig::default()).unwrap();
        d.register_owner("camera", Pose::IDENTITY);
        d.register_owner("contract", Pose::IDENTITY);
        d
    }

    fn at(x: f32) -> Pose {
        Pose::new(Vec3::new(x, 0.0, 0.0), Quat::IDENTITY)
    }

    fn present(d: &mut Director, ids: &[&str]) {
        let candidates = ids
            .iter()
            .map(|id| ChoiceCandidate::new(*id, id.to_uppercase(), "next").with_hold(2.0))
            .collect();
        d.apply(DirectorCommand::Present { candidates, show_unavailable: None });
    }

    fn rejections(events: &[DirectorEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, DirectorEvent::CommandRejected(_)))
            .count()
    }

    /// Ticks until some item reports it became interactable.
    fn tick_until_visible(d: &mut Director) -> Vec<DirectorEvent> {
        let mut all = Vec::new();
        for _ in 0..20 {
            let events = d.tick(DT);
            let visible = events.iter().any(|e| {
                matches!(
                    e,
                    DirectorEvent::Presentation(PresentationSignal::InteractableChanged {
                        interactable: true,
                        ..
                    })
                )
            });
            all.extend(events);
            if visible {
                return all;
            }
        }
        panic!("no item became visible");
    }

    //--- Choice Routing ---------------------------------------------------

    #[test]
    fn present_then_select_resolves_with_winner() {
        let mut d = director();
        present(&mut d, &["a", "b"]);

        let events = tick_until_visible(&mut d);
        assert!(matches!(events[0], DirectorEvent::SessionOpened(_)));

        d.apply(DirectorCommand::Select("b".into()));
        let events = d.tick(DT);

        let outcome = events.iter().find_map(|e| match e {
            DirectorEvent::SessionResolved(outcome) => Some(outcome.clone()),
            _ => None,
        });
        let outcome = outcome.expect("session should resolve on the selection tick");
        assert_eq!(outcome.selected_id().map(|id| id.as_str()), Some("b"));
        assert!(!d.presenter().is_open());
    }

    #[test]
    fn second_present_is_rejected() {
        let mut d = director();
        present(&mut d, &["a"]);
        present(&mut d, &["b"]);

        let events = d.tick(DT);
        assert_eq!(rejections(&events), 1);
    }

    #[test]
    fn cancel_without_session_is_rejected() {
        let mut d = director();
        d.apply(DirectorCommand::CancelSession);
        assert_eq!(rejections(&d.tick(DT)), 1);
    }

    #[test]
    fn cancel_session_resolves_with_no_selection() {
        let mut d = director();
        present(&mut d, &["a"]);
        d.tick(DT);

        d.apply(DirectorCommand::CancelSession);
        let events = d.tick(DT);
        let resolved = events.iter().any(|e| {
            matches!(e, DirectorEvent::SessionResolved(outcome) if outcome.selection.is_none())
        });
        assert!(resolved);
    }

    #[test]
    fn submit_focused_picks_first_item() {
        let mut d = director();
        present(&mut d, &["a", "b"]);
        tick_until_visible(&mut d);

        d.apply(DirectorCommand::SubmitFocused);
        let events = d.tick(DT);
        let winner = events.iter().find_map(|e| match e {
            DirectorEvent::SessionResolved(outcome) => outcome.selected_id().cloned(),
            _ => None,
        });
        assert_eq!(winner.as_ref().map(|id| id.as_str()), Some("a"));
    }

    //--- Action Routing ---------------------------------------------------

    #[test]
    fn move_to_named_resolves_through_registry() {
        let mut d = director();
        d.poses_mut().register("desk", at(4.0));
        d.apply(DirectorCommand::MoveToNamed {
            owner: "camera".into(),
            pose: "desk".into(),
            duration: 0.5,
        });

        let mut completed = false;
        for _ in 0..4 {
            completed |= d.tick(DT).iter().any(|e| {
                matches!(e, DirectorEvent::Action { event: ActionEvent::Completed { .. }, .. })
            });
        }
        assert!(completed);
        assert_eq!(d.queue("camera").map(|q| q.pose()), Some(at(4.0)));
    }

    #[test]
    fn unknown_pose_and_owner_are_rejected() {
        let mut d = director();
        d.apply(DirectorCommand::MoveToNamed {
            owner: "camera".into(),
            pose: "nowhere".into(),
            duration: 1.0,
        });
        d.apply(DirectorCommand::Wait { owner: "ghost".into(), seconds: 1.0 });

        let events = d.tick(DT);
        assert_eq!(rejections(&events), 2);
        assert!(d.queue("camera").is_some_and(|q| q.is_empty()));
    }

    #[test]
    fn owners_tick_in_registration_order() {
        let mut d = director();
        d.apply(DirectorCommand::Wait { owner: "contract".into(), seconds: 1.0 });
        d.apply(DirectorCommand::Wait { owner: "camera".into(), seconds: 1.0 });

        let owners: Vec<String> = d
            .tick(DT)
            .into_iter()
            .filter_map(|e| match e {
                DirectorEvent::Action { owner, .. } => Some(owner),
                _ => None,
            })
            .collect();
        assert_eq!(owners, vec!["camera".to_string(), "contract".to_string()]);
    }

    #[test]
    fn clear_queue_reports_abort_on_next_tick() {
        let mut d = director();
        d.apply(DirectorCommand::MoveTo { owner: "camera".into(), target: at(4.0), duration: 1.0 });
        d.tick(DT);

        d.apply(DirectorCommand::ClearQueue { owner: "camera".into() });
        let events = d.tick(DT);
        assert!(matches!(
            events.as_slice(),
            [DirectorEvent::Action { event: ActionEvent::Aborted { kind: ActionKind::Movement, .. }, .. }]
        ));
        assert_eq!(d.queue("camera").map(|q| q.pose()), Some(at(4.0 * 0.15625)));
    }

    #[test]
    fn duplicate_owner_is_refused() {
        let mut d = director();
        assert!(!d.register_owner("camera", at(9.0)));
        assert_eq!(d.queue("camera").map(|q| q.pose()), Some(Pose::IDENTITY));
    }
}
