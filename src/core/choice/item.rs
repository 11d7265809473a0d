//=========================================================================
// Presentation Item
//=========================================================================
//
// One pooled on-screen choice slot and its lifecycle state machine.
//
// Lifecycle:
// ```text
//   Idle ─activate─> Delaying ─> FadingIn ─> Visible ─> FadingOut ─> Idle
//                       │           │          │  └─select──────────> Idle
//                       └───────────┴──────────┴─cancelled──────────> Idle
// ```
//
// `advance(dt)` spends the step budget across as many phases as it
// covers, so a batch's total runtime is exactly the sum of its phase
// durations regardless of step size. The shared scope is polled once at
// the top of every advance, before any transition is evaluated.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::candidate::ChoiceCandidate;
use super::config::{FadeTiming, ItemTemplate};
use super::signals::{PresentationSignal, SignalQueue};
use crate::core::scope::ScopeId;

//=== Phase ===============================================================

/// Named lifecycle state of a presentation item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Delaying,
    FadingIn,
    Visible,
    FadingOut,
}

/// Why an item returned to [`Phase::Idle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemExit {
    /// Hold elapsed and the fade-out completed.
    Expired,
    /// This item won the selection; hidden instantly.
    Selected,
    /// The session scope was cancelled; hidden without fading.
    Cancelled,
    /// The item's lifecycle failed and it was pulled from the batch.
    Faulted,
}

//=== ItemFault ===========================================================

/// Lifecycle failure isolated to a single item.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ItemFault {
    #[error("non-finite timing in phase {0:?}")]
    NonFiniteTiming(Phase),

    #[error("invalid step of {0} seconds")]
    InvalidStep(f32),
}

//=== PhaseState ==========================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum PhaseState {
    Idle,
    Delaying { remaining: f32 },
    FadingIn { elapsed: f32 },
    Visible { remaining: f32 },
    FadingOut { elapsed: f32 },
}

impl PhaseState {
    fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::Idle,
            Self::Delaying { .. } => Phase::Delaying,
            Self::FadingIn { .. } => Phase::FadingIn,
            Self::Visible { .. } => Phase::Visible,
            Self::FadingOut { .. } => Phase::FadingOut,
        }
    }

    fn timer(&self) -> f32 {
        match *self {
            Self::Idle => 0.0,
            Self::Delaying { remaining } | Self::Visible { remaining } => remaining,
            Self::FadingIn { elapsed } | Self::FadingOut { elapsed } => elapsed,
        }
    }
}

//=== PresentationItem ====================================================

/// A reusable choice slot.
///
/// Items are created by the pool, bound to a candidate for one session,
/// and returned to `Idle` (never destroyed) when the session resolves.
#[derive(Debug)]
pub struct PresentationItem {
    slot: usize,
    candidate: Option<ChoiceCandidate>,
    state: PhaseState,
    opacity: f32,
    anchor: (f32, f32),
    placed_anchor: (f32, f32),
    rest_anchor: (f32, f32),
    scope: Option<ScopeId>,
    fades: FadeTiming,
    highlighted: bool,
    last_exit: Option<ItemExit>,
}

impl PresentationItem {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(slot: usize, template: &ItemTemplate, fades: FadeTiming) -> Self {
        Self {
            slot,
            candidate: None,
            state: PhaseState::Idle,
            opacity: 0.0,
            anchor: template.rest_anchor,
            placed_anchor: template.rest_anchor,
            rest_anchor: template.rest_anchor,
            scope: None,
            fades,
            highlighted: false,
            last_exit: None,
        }
    }

    //--- Activation -------------------------------------------------------

    /// Binds a candidate and starts its delay countdown.
    ///
    /// `placed_anchor` is where the item moves when its delay ends.
    pub(crate) fn activate(
        &mut self,
        candidate: ChoiceCandidate,
        scope: ScopeId,
        placed_anchor: (f32, f32),
    ) {
        debug!(target: "choice", "Slot {} activated with '{}'", self.slot, candidate.id);

        self.state = PhaseState::Delaying { remaining: candidate.delay };
        self.candidate = Some(candidate);
        self.opacity = 0.0;
        self.anchor = self.rest_anchor;
        self.placed_anchor = placed_anchor;
        self.scope = Some(scope);
        self.last_exit = None;
    }

    /// Returns the item to `Idle`, emitting the matching signals.
    ///
    /// No-op on an idle item.
    pub(crate) fn deactivate(&mut self, exit: ItemExit, signals: &mut SignalQueue) {
        if self.state == PhaseState::Idle {
            return;
        }

        if self.is_interactable() {
            signals.push(PresentationSignal::InteractableChanged {
                slot: self.slot,
                interactable: false,
            });
        }

        debug!(
            target: "choice",
            "Slot {} exits {:?} from {:?}",
            self.slot,
            exit,
            self.state.phase()
        );

        self.state = PhaseState::Idle;
        self.opacity = 0.0;
        self.anchor = self.rest_anchor;
        self.candidate = None;
        self.scope = None;
        self.last_exit = Some(exit);

        signals.push(PresentationSignal::Hidden { slot: self.slot, exit });
    }

    //--- Update -----------------------------------------------------------

    /// Advances the lifecycle by `dt` seconds.
    ///
    /// `cancelled` is the poll result of the item's session scope for this
    /// step. Returns the exit reason when the item reached `Idle`.
    pub(crate) fn advance(
        &mut self,
        dt: f32,
        cancelled: bool,
        signals: &mut SignalQueue,
    ) -> Result<Option<ItemExit>, ItemFault> {
        if self.state == PhaseState::Idle {
            return Ok(None);
        }

        if cancelled {
            self.deactivate(ItemExit::Cancelled, signals);
            return Ok(Some(ItemExit::Cancelled));
        }

        if !dt.is_finite() || dt < 0.0 {
            return Err(ItemFault::InvalidStep(dt));
        }
        if !self.state.timer().is_finite() {
            return Err(ItemFault::NonFiniteTiming(self.state.phase()));
        }

        let mut budget = dt;

        loop {
            match self.state {
                PhaseState::Idle => return Ok(None),

                PhaseState::Delaying { remaining } => {
                    if budget < remaining {
                        self.state = PhaseState::Delaying { remaining: remaining - budget };
                        return Ok(None);
                    }
                    budget -= remaining.max(0.0);
                    self.anchor = self.placed_anchor;
                    self.state = PhaseState::FadingIn { elapsed: 0.0 };
                    signals.push(PresentationSignal::Shown {
                        slot: self.slot,
                        anchor: self.anchor,
                    });
                }

                PhaseState::FadingIn { elapsed } => {
                    let left = self.fades.fade_in - elapsed;
                    if budget < left {
                        let elapsed = elapsed + budget;
                        self.opacity = elapsed / self.fades.fade_in;
                        self.state = PhaseState::FadingIn { elapsed };
                        return Ok(None);
                    }
                    budget -= left.max(0.0);
                    self.opacity = 1.0;
                    self.state = PhaseState::Visible { remaining: self.hold()? };
                    signals.push(PresentationSignal::InteractableChanged {
                        slot: self.slot,
                        interactable: true,
                    });
                }

                PhaseState::Visible { remaining } => {
                    if budget < remaining {
                        self.state = PhaseState::Visible { remaining: remaining - budget };
                        return Ok(None);
                    }
                    budget -= remaining.max(0.0);
                    signals.push(PresentationSignal::InteractableChanged {
                        slot: self.slot,
                        interactable: false,
                    });
                    self.state = PhaseState::FadingOut { elapsed: 0.0 };
                }

                PhaseState::FadingOut { elapsed } => {
                    let left = self.fades.fade_out - elapsed;
                    if budget < left {
                        let elapsed = elapsed + budget;
                        self.opacity = 1.0 - elapsed / self.fades.fade_out;
                        self.state = PhaseState::FadingOut { elapsed };
                        return Ok(None);
                    }
                    self.deactivate(ItemExit::Expired, signals);
                    return Ok(Some(ItemExit::Expired));
                }
            }
        }
    }

    /// Selected exit: only a `Visible` item can win, and it hides at once.
    ///
    /// Returns `false` (and changes nothing) in any other phase.
    pub(crate) fn select(&mut self, signals: &mut SignalQueue) -> bool {
        if !self.is_interactable() {
            return false;
        }
        self.deactivate(ItemExit::Selected, signals);
        true
    }

    fn hold(&self) -> Result<f32, ItemFault> {
        let hold = self.candidate.as_ref().map_or(0.0, |c| c.hold);
        if hold.is_finite() {
            Ok(hold)
        } else {
            Err(ItemFault::NonFiniteTiming(Phase::Visible))
        }
    }

    //--- Highlight --------------------------------------------------------

    pub(crate) fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    //--- Queries ----------------------------------------------------------

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn anchor(&self) -> (f32, f32) {
        self.anchor
    }

    pub fn candidate(&self) -> Option<&ChoiceCandidate> {
        self.candidate.as_ref()
    }

    pub fn scope(&self) -> Option<ScopeId> {
        self.scope
    }

    /// `true` while bound to a candidate (any phase but `Idle`).
    pub fn is_active(&self) -> bool {
        self.state != PhaseState::Idle
    }

    /// `true` only in `Visible`: the surface should accept input.
    pub fn is_interactable(&self) -> bool {
        matches!(self.state, PhaseState::Visible { .. })
    }

    /// Highlight flag; survives deactivation so focus can carry over.
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn last_exit(&self) -> Option<ItemExit> {
        self.last_exit
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scope::ScopeTree;

    const FADES: FadeTiming = FadeTiming { fade_in: 0.25, fade_out: 0.25 };

    fn item() -> PresentationItem {
        PresentationItem::new(0, &ItemTemplate::default(), FADES)
    }

    fn activated(delay: f32, hold: f32) -> (PresentationItem, SignalQueue) {
        let mut tree = ScopeTree::new();
        let scope = tree.create();
        let mut item = item();
        let candidate = ChoiceCandidate::new("a", "A", "Node_A")
            .with_delay(delay)
            .with_hold(hold);
        item.activate(candidate, scope, (-25.0, 85.0));
        (item, SignalQueue::new())
    }

    //--- Lifecycle --------------------------------------------------------

    #[test]
    fn full_lifecycle_step_by_step() {
        let (mut item, mut signals) = activated(0.5, 0.5);
        assert_eq!(item.phase(), Phase::Delaying);
        assert_eq!(item.opacity(), 0.0);

        // 0.25: still delaying
        assert_eq!(item.advance(0.25, false, &mut signals), Ok(None));
        assert_eq!(item.phase(), Phase::Delaying);

        // 0.5: delay over, fade-in starts with no budget left
        item.advance(0.25, false, &mut signals).unwrap();
        assert_eq!(item.phase(), Phase::FadingIn);
        assert_eq!(item.anchor(), (-25.0, 85.0));

        // 0.75: fade-in complete
        item.advance(0.25, false, &mut signals).unwrap();
        assert_eq!(item.phase(), Phase::Visible);
        assert_eq!(item.opacity(), 1.0);
        assert!(item.is_interactable());

        // 1.25: hold over
        item.advance(0.25, false, &mut signals).unwrap();
        item.advance(0.25, false, &mut signals).unwrap();
        assert_eq!(item.phase(), Phase::FadingOut);
        assert!(!item.is_interactable());

        // 1.5: fade-out complete
        assert_eq!(item.advance(0.25, false, &mut signals), Ok(Some(ItemExit::Expired)));
        assert_eq!(item.phase(), Phase::Idle);
        assert!(item.candidate().is_none());

        let kinds: Vec<_> = signals.take();
        assert_eq!(
            kinds,
            vec![
                PresentationSignal::Shown { slot: 0, anchor: (-25.0, 85.0) },
                PresentationSignal::InteractableChanged { slot: 0, interactable: true },
                PresentationSignal::InteractableChanged { slot: 0, interactable: false },
                PresentationSignal::Hidden { slot: 0, exit: ItemExit::Expired },
            ]
        );
    }

    #[test]
    fn fade_in_interpolates_linearly() {
        let (mut item, mut signals) = activated(0.0, 1.0);
        item.advance(0.125, false, &mut signals).unwrap();
        assert_eq!(item.phase(), Phase::FadingIn);
        assert_eq!(item.opacity(), 0.5);
    }

    #[test]
    fn large_step_spans_multiple_phases() {
        let (mut item, mut signals) = activated(0.5, 1.0);
        // delay 0.5 + fade 0.25 + hold 1.0 + fade 0.25 = 2.0
        assert_eq!(item.advance(1.75, false, &mut signals), Ok(None));
        assert_eq!(item.phase(), Phase::FadingOut);
        assert_eq!(item.advance(0.25, false, &mut signals), Ok(Some(ItemExit::Expired)));
    }

    #[test]
    fn zero_step_makes_no_progress() {
        let (mut item, mut signals) = activated(0.5, 1.0);
        item.advance(0.0, false, &mut signals).unwrap();
        assert_eq!(item.phase(), Phase::Delaying);
    }

    //--- Cancellation -----------------------------------------------------

    #[test]
    fn cancel_mid_delay_skips_fade() {
        let (mut item, mut signals) = activated(1.0, 1.0);
        item.advance(0.25, false, &mut signals).unwrap();

        assert_eq!(item.advance(0.25, true, &mut signals), Ok(Some(ItemExit::Cancelled)));
        assert_eq!(item.phase(), Phase::Idle);
        assert_eq!(
            signals.take(),
            vec![PresentationSignal::Hidden { slot: 0, exit: ItemExit::Cancelled }]
        );
    }

    #[test]
    fn cancel_mid_fade_in_hides_abruptly() {
        let (mut item, mut signals) = activated(0.0, 1.0);
        item.advance(0.125, false, &mut signals).unwrap();
        assert!(item.opacity() > 0.0);

        item.advance(0.125, true, &mut signals).unwrap();
        assert_eq!(item.phase(), Phase::Idle);
        assert_eq!(item.opacity(), 0.0);
    }

    #[test]
    fn cancel_while_visible_drops_interactivity() {
        let (mut item, mut signals) = activated(0.0, 1.0);
        item.advance(0.25, false, &mut signals).unwrap();
        signals.take();

        item.advance(0.25, true, &mut signals).unwrap();
        assert_eq!(
            signals.take(),
            vec![
                PresentationSignal::InteractableChanged { slot: 0, interactable: false },
                PresentationSignal::Hidden { slot: 0, exit: ItemExit::Cancelled },
            ]
        );
    }

    //--- Selection --------------------------------------------------------

    #[test]
    fn select_only_while_visible() {
        let (mut item, mut signals) = activated(0.0, 1.0);
        assert!(!item.select(&mut signals));

        item.advance(0.25, false, &mut signals).unwrap();
        assert!(item.select(&mut signals));
        assert_eq!(item.phase(), Phase::Idle);
        assert_eq!(item.last_exit(), Some(ItemExit::Selected));
        // No fade-out step for the winner
        assert_eq!(item.opacity(), 0.0);
    }

    //--- Faults -----------------------------------------------------------

    #[test]
    fn non_finite_delay_faults() {
        let (mut item, mut signals) = activated(f32::NAN, 1.0);
        assert_eq!(
            item.advance(0.25, false, &mut signals),
            Err(ItemFault::NonFiniteTiming(Phase::Delaying))
        );
    }

    #[test]
    fn negative_step_faults() {
        let (mut item, mut signals) = activated(0.0, 1.0);
        assert_eq!(
            item.advance(-1.0, false, &mut signals),
            Err(ItemFault::InvalidStep(-1.0))
        );
    }

    #[test]
    fn highlight_survives_deactivation() {
        let (mut item, mut signals) = activated(0.0, 1.0);
        item.set_highlighted(true);
        item.deactivate(ItemExit::Cancelled, &mut signals);
        assert!(item.is_highlighted());
    }
}
