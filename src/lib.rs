//=========================================================================
// Aetheric Director: Library Root
//
// Deterministic, tick-driven choice presentation and action sequencing
// for narrative scenes.
//
// Responsibilities:
// - Expose the single-threaded `Director` for hosts that own their loop
// - Expose the threaded `Engine` facade for hosts that do not
// - Keep scheduling explicit: nothing advances outside a `tick(dt)`
//
// Typical usage:
// ```no_run
// use aetheric_director::prelude::*;
//
// let mut director = Director::new(PresenterConfig::default()).unwrap();
// director.register_owner("camera", Pose::IDENTITY);
// director.apply(DirectorCommand::Present {
//     candidates: vec![ChoiceCandidate::new("stay", "Stay", "stay_node")],
//     show_unavailable: None,
// });
// let events = director.tick(1.0 / 60.0);
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds every subsystem: choice presentation, action queues,
// cancellation scopes, math and the director composing them.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `engine` defines the threaded entry point and its handle.
//
mod engine;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineHandle};
