//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types.
//
// Usage:
//   use aetheric_director::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine runtime
pub use crate::engine::{Engine, EngineBuilder, EngineHandle};

// Composition root
pub use crate::core::command_bridge::{DirectorCommand, DirectorEvent};
pub use crate::core::director::Director;
pub use crate::core::registry::PoseRegistry;

// Choice system
pub use crate::core::choice::{
    CandidateId, ChoiceCandidate, ChoicePresenter, HorizontalZone, PresentationSignal,
    PresenterConfig, SessionId, SessionOutcome, VerticalZone,
};

// Action system
pub use crate::core::action::{ActionEvent, ActionKind, ActionQueue};

// Math and errors
pub use crate::core::error::{ConfigurationError, EngineError, PresenterError};
pub use crate::core::math::{Pose, Quat, Vec3};
