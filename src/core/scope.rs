//=========================================================================
// Cancellation Scopes
//=========================================================================
//
// Arena of linkable cancellation flags.
//
// Architecture:
//   ScopeTree
//     └─ nodes: Vec<ScopeNode>   (free-list reuse, generation-checked)
//
//   ScopeId ──is_cancelled()──> self or any ancestor cancelled or released
//
// Cancellation is stored once on the node it was requested on and
// resolved lazily on poll by walking the parent chain. Children never
// write to parents, so cancelling a child cannot leak upward.
//
// Single-threaded by construction: the tree lives inside the scheduler
// and is only touched from the tick that owns it.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{trace, warn};

//=== ScopeId =============================================================

/// Handle to a scope in a [`ScopeTree`].
///
/// Handles carry a generation so a handle kept past [`ScopeTree::release`]
/// can never alias a newer scope that reused the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId {
    index: u32,
    generation: u32,
}

//=== ScopeState ==========================================================

/// Observable state of a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeState {
    Active,
    Cancelled,
}

//=== ScopeNode ===========================================================

#[derive(Debug)]
struct ScopeNode {
    generation: u32,
    parent: Option<ScopeId>,
    cancelled: bool,
    live: bool,
}

//=== ScopeTree ===========================================================

/// Owner of every cancellation scope for one scheduler.
#[derive(Debug, Default)]
pub struct ScopeTree {
    nodes: Vec<ScopeNode>,
    free: Vec<u32>,
}

impl ScopeTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    //--- Creation ---------------------------------------------------------

    /// Creates an unlinked, active scope.
    pub fn create(&mut self) -> ScopeId {
        self.allocate(None)
    }

    /// Creates a scope cancelled whenever `parent` is cancelled or its own
    /// [`cancel`](Self::cancel) is called.
    ///
    /// A released parent has revoked its permission, so linking to one
    /// yields a scope that is already cancelled.
    pub fn linked_child(&mut self, parent: ScopeId) -> ScopeId {
        if !self.is_live(parent) {
            warn!(target: "scope", "Linking to released scope {:?}; child starts cancelled", parent);
            let child = self.allocate(None);
            self.cancel(child);
            return child;
        }
        self.allocate(Some(parent))
    }

    fn allocate(&mut self, parent: Option<ScopeId>) -> ScopeId {
        if let Some(index) = self.free.pop() {
            let node = &mut self.nodes[index as usize];
            node.generation = node.generation.wrapping_add(1);
            node.parent = parent;
            node.cancelled = false;
            node.live = true;
            return ScopeId { index, generation: node.generation };
        }

        let index = self.nodes.len() as u32;
        self.nodes.push(ScopeNode {
            generation: 0,
            parent,
            cancelled: false,
            live: true,
        });
        ScopeId { index, generation: 0 }
    }

    //--- Cancellation -----------------------------------------------------

    /// Requests cancellation. Idempotent; affects `id` and every scope
    /// linked below it, never its ancestors.
    pub fn cancel(&mut self, id: ScopeId) {
        match self.node_mut(id) {
            Some(node) => {
                if !node.cancelled {
                    trace!(target: "scope", "Scope {:?} cancelled", id);
                }
                node.cancelled = true;
            }
            None => trace!(target: "scope", "Cancel on released scope {:?} ignored", id),
        }
    }

    /// Non-blocking poll: `true` when the scope or any ancestor is cancelled.
    ///
    /// A released (stale) handle reports `true`: its permission is revoked.
    /// The same holds for any scope linked below a released ancestor.
    pub fn is_cancelled(&self, id: ScopeId) -> bool {
        let Some(mut node) = self.node(id) else {
            return true;
        };

        loop {
            if node.cancelled {
                return true;
            }
            let Some(parent) = node.parent else {
                return false;
            };
            match self.node(parent) {
                Some(parent) => node = parent,
                None => return true,
            }
        }
    }

    /// Returns the scope state as an enum.
    pub fn state(&self, id: ScopeId) -> ScopeState {
        if self.is_cancelled(id) {
            ScopeState::Cancelled
        } else {
            ScopeState::Active
        }
    }

    //--- Lifetime ---------------------------------------------------------

    /// Frees a scope slot for reuse. Scopes still linked below it read as
    /// cancelled from then on.
    pub fn release(&mut self, id: ScopeId) {
        if let Some(node) = self.node_mut(id) {
            node.live = false;
            node.parent = None;
            self.free.push(id.index);
        }
    }

    /// Returns `true` while the handle refers to an unreleased scope.
    pub fn is_live(&self, id: ScopeId) -> bool {
        self.node(id).is_some()
    }

    /// Number of unreleased scopes.
    pub fn live_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    //--- Internal Helpers -------------------------------------------------

    fn node(&self, id: ScopeId) -> Option<&ScopeNode> {
        self.nodes
            .get(id.index as usize)
            .filter(|n| n.live && n.generation == id.generation)
    }

    fn node_mut(&mut self, id: ScopeId) -> Option<&mut ScopeNode> {
        self.nodes
            .get_mut(id.index as usize)
            .filter(|n| n.live && n.generation == id.generation)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
