//=========================================================================
// Action System
//=========================================================================
//
// Deferred, time-boxed work applied to a single owner's pose.
//
// Architecture:
//   ActionQueue (one per owner)
//     └─ QueuedAction → Running { MovementTask | Wait }
//
//=========================================================================

//=== Module Declarations =================================================

mod movement;
mod queue;

//=== Public API ==========================================================

pub use movement::{MovementStep, MovementTask};
pub use queue::{ActionEvent, ActionId, ActionKind, ActionQueue, QueuedAction};
