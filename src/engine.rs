//=========================================================================
// Aetheric Director Engine
//
// Threaded entry point: runs a Director on its own logic thread.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──start()──>  EngineHandle
//         │                          │                     │
//         ├─ with_tps()              └─ init(|director|)   ├─ send()
//         ├─ with_channel_capacity()                       ├─ events()
//         └─ with_presenter_config()                       └─ shutdown()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread::JoinHandle;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::choice::PresenterConfig;
use crate::core::command_bridge::{DirectorCommand, DirectorEvent};
use crate::core::director::Director;
use crate::core::error::{ConfigurationError, EngineError};
use crate::core::CoreSystemsOrchestrator;

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (director ticks per second)
/// - **Channel capacity**: 128 commands
/// - **Presenter**: [`PresenterConfig::default`]
///
/// # Examples
///
/// ```no_run
/// use aetheric_director::EngineBuilder;
/// use aetheric_director::core::math::Pose;
///
/// let handle = EngineBuilder::new()
///     .with_tps(120.0)
///     .build()
///     .expect("valid configuration")
///     .init(|director| {
///         director.register_owner("camera", Pose::IDENTITY);
///     })
///     .start();
///
/// handle.shutdown().expect("clean shutdown");
/// ```
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    presenter: PresenterConfig,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            presenter: PresenterConfig::default(),
        }
    }

    /// Sets the tick rate of the logic thread. Each tick advances
    /// simulated time by exactly `1 / tps` seconds.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the capacity of the driver → director command channel.
    ///
    /// `send` blocks once this many commands are waiting.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    pub fn with_presenter_config(mut self, config: PresenterConfig) -> Self {
        self.presenter = config;
        self
    }

    /// Builds the engine, validating the presenter configuration.
    pub fn build(self) -> Result<Engine, ConfigurationError> {
        info!(
            target: "engine",
            "Building engine (TPS: {}, channel: {})",
            self.tps,
            self.channel_capacity
        );

        let director = Director::new(self.presenter).map_err(|e| {
            error!(target: "engine", "Invalid presenter configuration: {}", e);
            e
        })?;

        Ok(Engine {
            orchestrator: CoreSystemsOrchestrator::new(director),
            tps: self.tps,
            channel_capacity: self.channel_capacity,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Configured engine that has not started yet.
///
/// ```text
/// Engine::start()
///   └─► CoreSystemsOrchestrator (Logic Thread @ TPS)
///         └─► Director: ChoicePresenter, ActionQueues, PoseRegistry
///
/// Communication: crossbeam channels (DirectorCommand in, DirectorEvent out)
/// ```
pub struct Engine {
    orchestrator: CoreSystemsOrchestrator,
    tps: f64,
    channel_capacity: usize,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Gives mutable access to the [`Director`] before the thread starts,
    /// for registering owners and named poses.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut Director),
    {
        info!(target: "engine", "Initializing director");
        self.orchestrator.init_director(init_fn);
        self
    }

    //--- Execution --------------------------------------------------------

    /// Spawns the logic thread and returns the driver's handle.
    pub fn start(self) -> EngineHandle {
        info!(target: "engine", "Starting engine runtime (TPS: {})", self.tps);

        let (command_tx, command_rx) = bounded(self.channel_capacity);
        let (event_tx, event_rx) = unbounded();

        let thread = self
            .orchestrator
            .spawn_core_thread(command_rx, event_tx, self.tps);
        info!(target: "engine", "Core logic thread spawned");

        EngineHandle {
            commands: command_tx,
            events: event_rx,
            thread: Some(thread),
        }
    }
}

//=== EngineHandle ========================================================

/// Driver-side handle to a running engine.
///
/// Dropping the handle without calling [`shutdown`](Self::shutdown) still
/// stops and joins the logic thread.
pub struct EngineHandle {
    commands: Sender<DirectorCommand>,
    events: Receiver<DirectorEvent>,
    thread: Option<JoinHandle<()>>,
}

impl EngineHandle {
    /// Sends a command; it is applied at the start of the next tick.
    pub fn send(&self, command: DirectorCommand) -> Result<(), EngineError> {
        self.commands
            .send(command)
            .map_err(|_| EngineError::Disconnected)
    }

    /// Events produced by the director, in tick order.
    pub fn events(&self) -> &Receiver<DirectorEvent> {
        &self.events
    }

    /// Stops the logic thread and waits for it to exit.
    pub fn shutdown(mut self) -> Result<(), EngineError> {
        self.stop()
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };

        // A disconnected channel means the thread is already on its way out
        let _ = self.commands.send(DirectorCommand::Shutdown);

        match thread.join() {
            Ok(()) => {
                info!(target: "engine", "Engine shutdown complete");
                Ok(())
            }
            Err(e) => {
                error!(target: "engine", "Core thread panicked: {:?}", e);
                Err(EngineError::ThreadPanicked)
            }
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
