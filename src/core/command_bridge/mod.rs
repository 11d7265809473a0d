//=========================================================================
// Command Bridge
//=========================================================================
//
// Bridges the driver thread with the director running on the core thread.
//
// Components:
// - `interface`: command and event types (the contract)
// - `command_collector`: core-side bounded command collection
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod command_collector;
mod interface;

//=== Public API ==========================================================

pub use interface::{DirectorCommand, DirectorEvent};

//=== Internal API ========================================================

pub(crate) use command_collector::{CommandCollector, TickControl};
