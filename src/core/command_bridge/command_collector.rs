//=========================================================================
// Command Collector
//=========================================================================
//
// Driver command collector with bounded polling and shutdown detection.
//
// Architecture:
//   Receiver<DirectorCommand> → collect_frame() → commands → TickControl
//
// Bounded polling keeps one flooding driver from starving the tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::DirectorCommand;

//=== TickControl =========================================================

/// Update loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== CommandCollector ====================================================

/// Drains driver commands once per tick, up to a fixed budget.
pub(crate) struct CommandCollector {
    receiver: Receiver<DirectorCommand>,
    commands: Vec<DirectorCommand>,
}

impl CommandCollector {
    pub(crate) const MAX_COMMANDS_PER_FRAME: usize = 100;

    pub(crate) fn new(receiver: Receiver<DirectorCommand>) -> Self {
        Self {
            receiver,
            commands: Vec::with_capacity(8),
        }
    }

    /// Collects pending commands; leftovers wait for the next frame.
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.commands.clear();

        while self.commands.len() < Self::MAX_COMMANDS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(DirectorCommand::Shutdown) => {
                    debug!(target: "engine", "Shutdown command received");
                    return TickControl::Exit;
                }
                Ok(command) => self.commands.push(command),
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if self.commands.len() >= Self::MAX_COMMANDS_PER_FRAME {
            warn!(target: "engine", "Command backlog: drained {} commands this frame", self.commands.len());
        }

        TickControl::Continue
    }

    #[cfg(test)]
    pub(crate) fn commands(&self) -> &[DirectorCommand] {
        &self.commands
    }

    /// Takes ownership of this frame's commands, leaving an empty vec.
    pub(crate) fn take_commands(&mut self) -> Vec<DirectorCommand> {
        std::mem::take(&mut self.commands)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn wait(seconds: f32) -> DirectorCommand {
        DirectorCommand::Wait { owner: "camera".into(), seconds }
    }

    #[test]
    fn collect_handles_empty_queue() {
        let (_tx, rx) = unbounded::<DirectorCommand>();
        let mut collector = CommandCollector::new(rx);

        assert_eq!(collector.collect_frame(), TickControl::Continue);
        assert!(collector.commands().is_empty());
    }

    #[test]
    fn collect_preserves_send_order() {
        let (tx, rx) = unbounded();
        let mut collector = CommandCollector::new(rx);

        tx.send(wait(1.0)).unwrap();
        tx.send(DirectorCommand::SubmitFocused).unwrap();

        assert_eq!(collector.collect_frame(), TickControl::Continue);
        assert_eq!(collector.take_commands(), vec![wait(1.0), DirectorCommand::SubmitFocused]);
    }

    #[test]
    fn collect_returns_exit_on_shutdown() {
        let (tx, rx) = unbounded();
        let mut collector = CommandCollector::new(rx);

        tx.send(wait(1.0)).unwrap();
        tx.send(DirectorCommand::Shutdown).unwrap();

        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }

    #[test]
    fn collect_returns_exit_on_disconnect() {
        let (tx, rx) = unbounded::<DirectorCommand>();
        let mut collector = CommandCollector::new(rx);
        drop(tx);

        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }

    #[test]
    fn collect_is_bounded_per_frame() {
        let (tx, rx) = unbounded();
        let mut collector = CommandCollector::new(rx);

        for _ in 0..CommandCollector::MAX_COMMANDS_PER_FRAME + 5 {
            tx.send(DirectorCommand::SubmitFocused).unwrap();
        }

        collector.collect_frame();
        assert_eq!(collector.commands().len(), CommandCollector::MAX_COMMANDS_PER_FRAME);

        collector.collect_frame();
        assert_eq!(collector.commands().len(), 5);
    }
}
