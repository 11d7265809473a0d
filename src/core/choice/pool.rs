//=========================================================================
// Item Pool
//=========================================================================
//
// Grow-only arena of presentation items indexed by slot.
//
// Items are created lazily up to the largest batch ever requested and
// then reused forever: a resolved session deactivates its items but never
// drops them.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::candidate::Placement;
use super::config::{FadeTiming, ItemTemplate};
use super::item::{ItemExit, PresentationItem};
use super::signals::SignalQueue;

//=== ItemPool ============================================================

/// Slot-indexed, never-shrinking pool of [`PresentationItem`]s.
#[derive(Debug)]
pub struct ItemPool {
    items: Vec<PresentationItem>,
    template: ItemTemplate,
    fades: FadeTiming,
    max_slots: Option<usize>,
}

impl ItemPool {
    pub(crate) fn new(template: ItemTemplate, fades: FadeTiming, max_slots: Option<usize>) -> Self {
        Self {
            items: Vec::new(),
            template,
            fades,
            max_slots,
        }
    }

    //--- Allocation -------------------------------------------------------

    /// Ensures at least `count` slots exist (bounded by the slot cap).
    ///
    /// Returns the number of slots usable for this batch.
    pub(crate) fn grow_to(&mut self, count: usize) -> usize {
        let wanted = match self.max_slots {
            Some(cap) if count > cap => {
                warn!(target: "choice", "Batch of {} exceeds slot cap {}; truncating", count, cap);
                cap
            }
            _ => count,
        };

        while self.items.len() < wanted {
            let slot = self.items.len();
            debug!(target: "choice", "Creating presentation item for slot {}", slot);
            self.items.push(PresentationItem::new(slot, &self.template, self.fades));
        }
        wanted
    }

    /// Returns the item at `slot`, creating slots up to it if needed.
    ///
    /// `None` when `slot` is beyond the slot cap.
    pub(crate) fn acquire_or_create(&mut self, slot: usize) -> Option<&mut PresentationItem> {
        if self.grow_to(slot + 1) <= slot {
            return None;
        }
        self.items.get_mut(slot)
    }

    //--- Deactivation -----------------------------------------------------

    pub(crate) fn deactivate(&mut self, slot: usize, exit: ItemExit, signals: &mut SignalQueue) {
        if let Some(item) = self.items.get_mut(slot) {
            item.deactivate(exit, signals);
        }
    }

    pub(crate) fn deactivate_all(&mut self, exit: ItemExit, signals: &mut SignalQueue) {
        for item in &mut self.items {
            item.deactivate(exit, signals);
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Number of items ever created.
    pub fn high_water_mark(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, slot: usize) -> Option<&PresentationItem> {
        self.items.get(slot)
    }

    pub(crate) fn get_mut(&mut self, slot: usize) -> Option<&mut PresentationItem> {
        self.items.get_mut(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PresentationItem> {
        self.items.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut PresentationItem> {
        self.items.iter_mut()
    }

    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_active()).count()
    }

    /// Anchor an item bound to `placement` moves to once shown.
    pub fn layout_anchor(&self, placement: Placement) -> (f32, f32) {
        self.template.layout.anchor(placement)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
