//! Fixed-capacity node arena with an intrusive free chain.
//!
//! All node storage for one tree is reserved up front. Unused slots are
//! threaded into a singly-linked chain through their `right` field, and
//! `acquire` pops the head of that chain. Slots are never handed back.

use std::fmt;
use std::ops::{Index, IndexMut};

use tracing::{instrument, trace};

use crate::domain::error::{DomainError, DomainResult};

/// Value stored in every tree node.
pub type NodeValue = i32;

/// Stable handle to an arena slot.
///
/// The slot index doubles as the node's identity in graph dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Index of the slot inside the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node{}", self.0)
    }
}

/// A single arena slot.
///
/// While a slot sits on the free chain, `right` links to the next free
/// slot and `left` is unused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub value: NodeValue,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Pre-allocated node storage for one tree.
#[derive(Debug)]
pub struct NodeArena {
    slots: Vec<Node>,
    /// Head of the free chain, None once the arena is exhausted
    free: Option<NodeId>,
    allocated: usize,
}

impl NodeArena {
    /// Reserve storage for exactly `capacity` nodes and thread every slot
    /// into the free chain.
    #[instrument(level = "debug")]
    pub fn with_capacity(capacity: usize) -> DomainResult<Self> {
        if capacity == 0 {
            return Err(DomainError::InvalidCapacity { capacity });
        }

        let mut slots: Vec<Node> = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| DomainError::MemoryError { capacity })?;
        slots.resize(capacity, Node::default());

        for (index, slot) in slots.iter_mut().enumerate().take(capacity - 1) {
            slot.right = Some(NodeId(index + 1));
        }

        Ok(Self {
            slots,
            free: Some(NodeId(0)),
            allocated: 0,
        })
    }

    /// Pop the head of the free chain and initialize it as a fresh node.
    pub fn acquire(&mut self, value: NodeValue) -> DomainResult<NodeId> {
        let id = self.free.ok_or(DomainError::Overflow {
            capacity: self.capacity(),
        })?;

        let slot = &mut self.slots[id.0];
        self.free = slot.right;
        slot.value = value;
        slot.left = None;
        slot.right = None;
        self.allocated += 1;

        trace!(slot = id.0, value, "acquired node");
        Ok(id)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of nodes handed out so far.
    pub fn len(&self) -> usize {
        self.allocated
    }

    pub fn is_empty(&self) -> bool {
        self.allocated == 0
    }

    pub fn remaining(&self) -> usize {
        self.capacity() - self.allocated
    }

    pub fn is_full(&self) -> bool {
        self.free.is_none()
    }

    /// Handle for an allocated slot, None for free or out-of-range indices.
    ///
    /// The chain is popped in slot order and never refilled, so the
    /// allocated slots are always `0..len()`.
    pub fn slot(&self, index: usize) -> Option<NodeId> {
        (index < self.allocated).then_some(NodeId(index))
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.0 < self.allocated {
            self.slots.get(id.0)
        } else {
            None
        }
    }

    /// Walk the free chain from its head.
    pub fn free_slots(&self) -> FreeSlots<'_> {
        FreeSlots {
            arena: self,
            next: self.free,
        }
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.slots[id.0]
    }
}

impl IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.slots[id.0]
    }
}

/// Iterator over the slots still on the free chain.
pub struct FreeSlots<'a> {
    arena: &'a NodeArena,
    next: Option<NodeId>,
}

impl Iterator for FreeSlots<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.arena.slots.get(current.0).and_then(|slot| slot.right);
        Some(current)
    }
}
