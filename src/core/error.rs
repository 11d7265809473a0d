//=========================================================================
// Error Types
//=========================================================================
//
// Error taxonomy shared across the choice presenter, the director and
// the engine runtime.
//
//   ConfigurationError  → setup-time, fatal, returned from builders
//   PresenterError      → per-call rejection, no state mutated
//   MetadataParseError  → recovered locally with defaults (see candidate)
//   EngineError         → runtime surface of the threaded engine
//
// Cancellation is not an error anywhere in this crate: a cancelled
// session resolves to "no selection" and an aborted action reports
// `ActionEvent::Aborted`.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::choice::SessionId;

//=== ConfigurationError ==================================================

/// Missing or invalid wiring detected while building a presenter or engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("no presentation item template configured")]
    MissingItemTemplate,

    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidDuration { name: &'static str, value: f32 },

    #[error("max_slots must be at least 1")]
    ZeroSlotCap,
}

//=== PresenterError ======================================================

/// Rejected presenter operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresenterError {
    #[error("choice session {active:?} is already active")]
    SessionAlreadyActive { active: SessionId },

    #[error("no choice session is open")]
    NoOpenSession,

    #[error("session handle {requested:?} does not match the open session")]
    StaleSession { requested: SessionId },
}

//=== MetadataParseError ==================================================

/// Malformed `parameter:value` hint on a candidate.
///
/// Never escapes candidate construction; callers log it and substitute the
/// documented default.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetadataParseError {
    #[error("hint {0:?} is not in 'parameter:value' form")]
    MissingSeparator(String),

    #[error("hint {field} has unparseable number {raw:?}")]
    InvalidNumber { field: &'static str, raw: String },

    #[error("hint {field} value {value} is out of range")]
    OutOfRange { field: &'static str, value: f32 },

    #[error("hint {field} has unknown zone {raw:?}")]
    UnknownZone { field: &'static str, raw: String },

    #[error("hint {0} is missing")]
    Missing(&'static str),
}

//=== EngineError =========================================================

/// Failures of the threaded engine runtime.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("director command channel is disconnected")]
    Disconnected,

    #[error("director thread panicked")]
    ThreadPanicked,
}
