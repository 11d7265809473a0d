//=========================================================================
// Presentation Signals
//=========================================================================
//
// Outbox of per-item side effects for the (external) presentation layer.
//
// Items push signals while they are advanced; the driver drains the queue
// at the tick boundary and drives its surfaces from them:
//
//   Shown                → place surface at anchor, start showing it
//   InteractableChanged  → toggle raycast blocking / input acceptance
//   Hidden               → deactivate surface
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::item::ItemExit;

//=== PresentationSignal ==================================================

/// Side effect of a presentation item's phase change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PresentationSignal {
    /// The item finished its delay and is placed at `anchor`.
    Shown { slot: usize, anchor: (f32, f32) },

    /// The item started (`true`) or stopped (`false`) accepting selection.
    InteractableChanged { slot: usize, interactable: bool },

    /// The item left the batch and returned to the pool.
    Hidden { slot: usize, exit: ItemExit },
}

impl PresentationSignal {
    /// Slot index the signal refers to.
    pub fn slot(&self) -> usize {
        match *self {
            Self::Shown { slot, .. }
            | Self::InteractableChanged { slot, .. }
            | Self::Hidden { slot, .. } => slot,
        }
    }
}

//=== SignalQueue =========================================================

/// FIFO of presentation signals, drained once per tick.
#[derive(Debug, Default)]
pub struct SignalQueue {
    queue: Vec<PresentationSignal>,
}

impl SignalQueue {
    /// Creates a new empty signal queue.
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Appends a signal.
    pub fn push(&mut self, signal: PresentationSignal) {
        self.queue.push(signal);
    }

    /// Returns an iterator over the queued signals.
    pub fn iter(&self) -> impl Iterator<Item = &PresentationSignal> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Takes all signals, leaving the queue empty.
    pub fn take(&mut self) -> Vec<PresentationSignal> {
        std::mem::take(&mut self.queue)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
