//=========================================================================
// Core Systems Orchestrator
//=========================================================================
//
// Central coordinator for the director running on the logic thread.
//
// Architecture:
//   driver ──Sender<DirectorCommand>──> CommandCollector
//                                          │ take_commands()
//                                          ▼
//                                     Director::apply → Director::tick(dt)
//                                          │
//   driver <──Receiver<DirectorEvent>──────┘
//
// The orchestrator owns the director outright and advances it at a fixed
// rate with a fixed `dt = 1 / tps`, so simulated time never depends on
// wall-clock jitter. Communication with the driver is message passing
// only.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod action;
pub mod choice;
pub mod command_bridge;
pub mod director;
pub mod error;
pub mod math;
pub mod registry;
pub mod scope;

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use log::{debug, info};

//=== Internal Dependencies ===============================================

use command_bridge::{CommandCollector, DirectorCommand, DirectorEvent, TickControl};
use director::Director;

//=== CoreSystemsOrchestrator =============================================

/// Owns the [`Director`] until it moves onto the logic thread.
pub(crate) struct CoreSystemsOrchestrator {
    director: Director,
}

impl CoreSystemsOrchestrator {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(director: Director) -> Self {
        Self { director }
    }

    /// Runs host setup against the director before the thread starts.
    pub(crate) fn init_director<F>(&mut self, init_fn: F)
    where
        F: FnOnce(&mut Director),
    {
        init_fn(&mut self.director);
    }

    //--- spawn_core_thread() ---------------------------------------------

    /// Spawns the logic thread ticking the director at `tps`.
    ///
    /// Each tick:
    ///  1. Collects driver commands (bounded)
    ///  2. Applies them, then ticks the director with the fixed step
    ///  3. Forwards the resulting events
    ///  4. Sleeps to maintain fixed pacing
    ///
    /// Exits on `Shutdown` or when every command sender is dropped.
    pub(crate) fn spawn_core_thread(
        self,
        commands: Receiver<DirectorCommand>,
        events: Sender<DirectorEvent>,
        tps: f64,
    ) -> thread::JoinHandle<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);
        let dt = (1.0 / tps) as f32;

        thread::spawn(move || {
            let mut director = self.director;
            let mut collector = CommandCollector::new(commands);
            let mut ticks: u64 = 0;

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Gather driver commands --------------------------
                if collector.collect_frame() == TickControl::Exit {
                    info!(target: "engine", "Core thread exiting after {} tick(s)", ticks);
                    break;
                }

                //--- Step 2: Apply and advance -------------------------------
                for command in collector.take_commands() {
                    director.apply(command);
                }
                let produced = director.tick(dt);
                ticks += 1;

                //--- Step 3: Forward events ----------------------------------
                for event in produced {
                    if events.send(event).is_err() {
                        debug!(target: "engine", "Event receiver dropped; discarding events");
                        break;
                    }
                }

                //--- Step 4: Maintain deterministic pacing ------------------
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
        })
    }
}
