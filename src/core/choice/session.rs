//=========================================================================
// Choice Presenter
//=========================================================================
//
// Presents a batch of candidates, arbitrates "first selection wins", and
// resolves every session to exactly one outcome.
//
// Architecture:
// ```text
//   ChoicePresenter
//     ├─ pool:    ItemPool        (grow-only, slot indexed)
//     ├─ scopes:  ScopeTree       (driver tokens + one scope per session)
//     ├─ signals: SignalQueue     (drained by the presentation layer)
//     └─ session: Option<OpenSession>
//
//   tick(dt):
//     1. scope already cancelled?  → driver cancel, pending selections dropped
//     2. else first valid selection wins → winner hides, scope cancelled
//     3. every active item advanced with the same cancellation poll
//     4. cancelled or no active items → deactivate all, release scope,
//        return SessionOutcome
// ```
//
// Because the scope is polled once before any item advances, every item
// in the batch observes a cancellation in the same step.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::candidate::{CandidateId, ChoiceCandidate};
use super::config::PresenterConfig;
use super::item::ItemExit;
use super::pool::ItemPool;
use super::signals::{PresentationSignal, SignalQueue};
use super::PresentationItem;
use crate::core::error::{ConfigurationError, PresenterError};
use crate::core::scope::{ScopeId, ScopeTree};

//=== SessionId ===========================================================

/// Identifier of one presentation batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub fn get(self) -> u64 {
        self.0
    }
}

//=== SessionOutcome ======================================================

/// Resolved value of a session: the selected candidate, or `None` when the
/// driver cancelled it or every item expired unselected.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub session: SessionId,
    pub selection: Option<ChoiceCandidate>,
}

impl SessionOutcome {
    pub fn selected_id(&self) -> Option<&CandidateId> {
        self.selection.as_ref().map(|c| &c.id)
    }
}

//=== OpenSession =========================================================

#[derive(Debug)]
struct OpenSession {
    id: SessionId,
    scope: ScopeId,
    pending: VecDeque<CandidateId>,
    focused: Option<usize>,
}

//=== ChoicePresenter =====================================================

/// Driver-facing choice session manager.
///
/// At most one session is open at a time; a second [`present`](Self::present)
/// while one is open is rejected without touching any state.
#[derive(Debug)]
pub struct ChoicePresenter {
    config: PresenterConfig,
    pool: ItemPool,
    scopes: ScopeTree,
    signals: SignalQueue,
    session: Option<OpenSession>,
    next_session: u64,
}

impl ChoicePresenter {
    //--- Construction -----------------------------------------------------

    /// Creates a presenter, validating its configuration.
    pub fn new(config: PresenterConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let template = config
            .item_template
            .ok_or(ConfigurationError::MissingItemTemplate)?;

        Ok(Self {
            pool: ItemPool::new(template, config.fades(), config.max_slots),
            config,
            scopes: ScopeTree::new(),
            signals: SignalQueue::new(),
            session: None,
            next_session: 1,
        })
    }

    //--- Driver Tokens ----------------------------------------------------

    /// Creates a driver-owned cancellation token to pass to `present`.
    pub fn new_token(&mut self) -> ScopeId {
        self.scopes.create()
    }

    /// Cancels a driver token; any session linked to it resolves to `None`
    /// on the next tick.
    pub fn cancel_token(&mut self, token: ScopeId) {
        self.scopes.cancel(token);
    }

    /// Releases a driver token once the driver no longer needs it.
    ///
    /// A released token reads as cancelled, so any session still linked to
    /// it resolves to `None` on the next tick.
    pub fn release_token(&mut self, token: ScopeId) {
        self.scopes.release(token);
    }

    //--- Session Control --------------------------------------------------

    /// Opens a session using the configured availability filter.
    pub fn present(
        &mut self,
        candidates: Vec<ChoiceCandidate>,
        token: Option<ScopeId>,
    ) -> Result<SessionId, PresenterError> {
        let show_unavailable = self.config.show_unavailable;
        self.present_filtered(candidates, show_unavailable, token)
    }

    /// Opens a session, overriding the availability filter for this batch.
    ///
    /// Unavailable candidates are skipped unless `show_unavailable` is set;
    /// skipped candidates take no slot.
    pub fn present_filtered(
        &mut self,
        candidates: Vec<ChoiceCandidate>,
        show_unavailable: bool,
        token: Option<ScopeId>,
    ) -> Result<SessionId, PresenterError> {
        if let Some(open) = &self.session {
            warn!(target: "choice", "Rejected present: session {:?} still open", open.id);
            return Err(PresenterError::SessionAlreadyActive { active: open.id });
        }

        let eligible: Vec<ChoiceCandidate> = candidates
            .into_iter()
            .filter(|c| {
                let keep = c.available || show_unavailable;
                if !keep {
                    debug!(target: "choice", "Skipping unavailable candidate '{}'", c.id);
                }
                keep
            })
            .collect();

        let scope = match token {
            Some(parent) => self.scopes.linked_child(parent),
            None => self.scopes.create(),
        };

        let usable = self.pool.grow_to(eligible.len());
        for (slot, candidate) in eligible.into_iter().take(usable).enumerate() {
            let anchor = self.pool.layout_anchor(candidate.placement);
            if let Some(item) = self.pool.acquire_or_create(slot) {
                item.activate(candidate, scope, anchor);
            }
        }

        let id = SessionId(self.next_session);
        self.next_session += 1;

        let focused = pick_focus(&self.pool);
        apply_focus(&mut self.pool, focused);

        info!(
            target: "choice",
            "Session {:?} opened with {} item(s), focus {:?}",
            id,
            self.pool.active_count(),
            focused
        );

        self.session = Some(OpenSession {
            id,
            scope,
            pending: VecDeque::new(),
            focused,
        });
        Ok(id)
    }

    /// Requests cancellation of the open session; it resolves to `None` on
    /// the next tick.
    pub fn cancel(&mut self, session: SessionId) -> Result<(), PresenterError> {
        let open = self.session.as_ref().ok_or(PresenterError::NoOpenSession)?;
        if open.id != session {
            return Err(PresenterError::StaleSession { requested: session });
        }
        debug!(target: "choice", "Session {:?} cancelled by driver", session);
        self.scopes.cancel(open.scope);
        Ok(())
    }

    //--- Input ------------------------------------------------------------

    /// Queues a selection request for the open session.
    ///
    /// Requests are arbitrated on the next tick; requests for candidates
    /// that are not `Visible` at that point are ignored. Returns `false`
    /// when no session is open.
    pub fn select(&mut self, candidate: impl Into<CandidateId>) -> bool {
        let candidate = candidate.into();
        match self.session.as_mut() {
            Some(open) => {
                open.pending.push_back(candidate);
                true
            }
            None => {
                debug!(target: "choice", "Selection of '{}' with no open session ignored", candidate);
                false
            }
        }
    }

    /// Queues selection of the currently focused item.
    pub fn submit_focused(&mut self) -> bool {
        let focused = self
            .session
            .as_ref()
            .and_then(|open| open.focused)
            .and_then(|slot| self.pool.get(slot))
            .and_then(|item| item.candidate())
            .map(|c| c.id.clone());

        match focused {
            Some(id) => self.select(id),
            None => false,
        }
    }

    /// Moves highlight and focus to the active item bound to `candidate`.
    pub fn hover(&mut self, candidate: impl Into<CandidateId>) -> bool {
        let candidate = candidate.into();
        let Some(open) = self.session.as_mut() else {
            return false;
        };
        let Some(slot) = find_slot(&self.pool, &candidate, false) else {
            return false;
        };
        open.focused = Some(slot);
        apply_focus(&mut self.pool, Some(slot));
        true
    }

    //--- Update -----------------------------------------------------------

    /// Advances the open session by one scheduling step.
    ///
    /// Returns the outcome on the step the session resolves; by then every
    /// item of the batch is back in `Idle`.
    pub fn tick(&mut self, dt: f32) -> Option<SessionOutcome> {
        let open = self.session.as_mut()?;
        let mut winner: Option<ChoiceCandidate> = None;

        //--- Step 1: Arbitrate ---------------------------------------------
        let driver_cancelled = self.scopes.is_cancelled(open.scope);
        if driver_cancelled {
            if !open.pending.is_empty() {
                debug!(target: "choice", "Dropping {} selection(s): session cancelled", open.pending.len());
            }
            open.pending.clear();
        }

        while let Some(requested) = open.pending.pop_front() {
            if winner.is_some() {
                debug!(target: "choice", "Selection of '{}' lost the race", requested);
                continue;
            }
            let Some(slot) = find_slot(&self.pool, &requested, true) else {
                debug!(target: "choice", "Selection of '{}' ignored: not visible", requested);
                continue;
            };
            if let Some(item) = self.pool.get_mut(slot) {
                let candidate = item.candidate().cloned();
                if item.select(&mut self.signals) {
                    winner = candidate;
                }
            }
        }

        if winner.is_some() {
            self.scopes.cancel(open.scope);
        }

        //--- Step 2: Advance -----------------------------------------------
        let cancelled = self.scopes.is_cancelled(open.scope);
        let mut faulted = Vec::new();
        for item in self.pool.iter_mut().filter(|i| i.is_active()) {
            if let Err(fault) = item.advance(dt, cancelled, &mut self.signals) {
                warn!(target: "choice", "Slot {} faulted ({}); removed from batch", item.slot(), fault);
                faulted.push(item.slot());
            }
        }
        for slot in faulted {
            self.pool.deactivate(slot, ItemExit::Faulted, &mut self.signals);
        }

        //--- Step 3: Resolve or refocus ------------------------------------
        if !cancelled && self.pool.active_count() > 0 {
            let still_focused = open
                .focused
                .and_then(|slot| self.pool.get(slot))
                .is_some_and(|item| item.is_active());
            if !still_focused {
                open.focused = pick_focus(&self.pool);
                apply_focus(&mut self.pool, open.focused);
            }
            return None;
        }

        let open = self.session.take()?;
        self.pool.deactivate_all(ItemExit::Cancelled, &mut self.signals);
        self.scopes.release(open.scope);

        info!(
            target: "choice",
            "Session {:?} resolved: {}",
            open.id,
            winner.as_ref().map_or("no selection", |c| c.id.as_str())
        );

        Some(SessionOutcome {
            session: open.id,
            selection: winner,
        })
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn current_session(&self) -> Option<SessionId> {
        self.session.as_ref().map(|open| open.id)
    }

    /// Slot of the focused item, if a session is open.
    pub fn focused_slot(&self) -> Option<usize> {
        self.session.as_ref().and_then(|open| open.focused)
    }

    pub fn pool(&self) -> &ItemPool {
        &self.pool
    }

    pub fn items(&self) -> impl Iterator<Item = &PresentationItem> {
        self.pool.iter()
    }

    pub fn config(&self) -> &PresenterConfig {
        &self.config
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    /// Drains presentation signals produced since the last call.
    pub fn take_signals(&mut self) -> Vec<PresentationSignal> {
        self.signals.take()
    }
}

//--- Focus Helpers -------------------------------------------------------

/// First highlighted active item by slot order, else first active item.
fn pick_focus(pool: &ItemPool) -> Option<usize> {
    let mut first_active = None;
    for item in pool.iter().filter(|i| i.is_active()) {
        if item.is_highlighted() {
            return Some(item.slot());
        }
        first_active.get_or_insert(item.slot());
    }
    first_active
}

/// Highlights exactly the focused slot.
fn apply_focus(pool: &mut ItemPool, focused: Option<usize>) {
    let Some(focused) = focused else {
        return;
    };
    for item in pool.iter_mut() {
        item.set_highlighted(item.slot() == focused);
    }
}

fn find_slot(pool: &ItemPool, candidate: &CandidateId, visible_only: bool) -> Option<usize> {
    pool.iter()
        .filter(|item| item.is_active())
        .filter(|item| !visible_only || item.is_interactable())
        .find(|item| item.candidate().is_some_and(|c| &c.id == candidate))
        .map(|item| item.slot())
}

//=========================================================================
// Unit Tests
//=========================================================================
