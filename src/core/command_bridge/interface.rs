//=========================================================================
// Command Bridge Interface
//=========================================================================
//
// Driver-to-director contract: commands in, events out.
//
// Both enums cross the thread boundary of the threaded engine, and are
// also what a single-threaded host feeds to `Director::apply` directly.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::action::ActionEvent;
use crate::core::choice::{CandidateId, ChoiceCandidate, PresentationSignal, SessionId, SessionOutcome};
use crate::core::math::Pose;

//=== DirectorCommand =====================================================

/// Requests sent from the driver to the director.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectorCommand {
    /// Opens a choice session. `show_unavailable` overrides the presenter
    /// default for this batch when set.
    Present {
        candidates: Vec<ChoiceCandidate>,
        show_unavailable: Option<bool>,
    },

    /// Selection request from the input layer.
    Select(CandidateId),

    /// Pointer hover over a candidate.
    Hover(CandidateId),

    /// Keyboard confirm of the focused candidate.
    SubmitFocused,

    /// Cancels the open session; it resolves with no selection.
    CancelSession,

    /// Moves `owner` from wherever it is when the action starts.
    MoveTo {
        owner: String,
        target: Pose,
        duration: f32,
    },

    /// Moves `owner` to a pose registered by name.
    MoveToNamed {
        owner: String,
        pose: String,
        duration: f32,
    },

    /// Moves `owner` along an explicit start → target path.
    Movement {
        owner: String,
        start: Pose,
        target: Pose,
        duration: f32,
    },

    Wait { owner: String, seconds: f32 },

    /// Drops pending actions of `owner` and aborts the running one.
    ClearQueue { owner: String },

    /// Stops the engine loop.
    Shutdown,
}

//=== DirectorEvent =======================================================

/// Notifications produced by the director, in tick order.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectorEvent {
    SessionOpened(SessionId),
    SessionResolved(SessionOutcome),
    Presentation(PresentationSignal),
    Action { owner: String, event: ActionEvent },
    CommandRejected(String),
}
