//=========================================================================
// Choice System
//=========================================================================
//
// Timed, independently animated choices with single-winner arbitration.
//
// Architecture:
//   ChoicePresenter
//     ├─ ItemPool ── PresentationItem (per slot, phase state machine)
//     ├─ ScopeTree (session scope linked to the driver's token)
//     └─ SignalQueue (Shown / InteractableChanged / Hidden)
//
// Flow:
//   present() → tick(dt)* → SessionOutcome { selection | none }
//
//=========================================================================

//=== Module Declarations =================================================

mod candidate;
mod config;
mod item;
mod pool;
mod session;
mod signals;

//=== Public API ==========================================================

pub use candidate::{
    CandidateId, ChoiceCandidate, HorizontalZone, Placement, VerticalZone, DEFAULT_DELAY_SECONDS,
    DEFAULT_HOLD_SECONDS,
};
pub use config::{FadeTiming, ItemTemplate, PlacementLayout, PresenterConfig};
pub use item::{ItemExit, ItemFault, Phase, PresentationItem};
pub use pool::ItemPool;
pub use session::{ChoicePresenter, SessionId, SessionOutcome};
pub use signals::{PresentationSignal, SignalQueue};
