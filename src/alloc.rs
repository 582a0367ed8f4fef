use tracing::debug;

use crate::{Color, Node, NodeId, Result, Slot, Tree, TreeError};

impl<K, V, O> Tree<K, V, O> {
    /// Allocates a detached red node holding `key` and `value`.
    ///
    /// The node is not part of the tree until it is handed to
    /// [`Tree::insert`]; until then it can be released with
    /// [`Tree::release_detached`].
    pub fn alloc_node(&mut self, key: K, value: V) -> Result<NodeId> {
        if let Some(limit) = self.config.max_nodes {
            if self.allocated >= limit {
                tracing::warn!(limit, "node limit reached");
                return Err(TreeError::CapacityExceeded { limit });
            }
        }

        let node = Node::new(key, value);
        if !self.free.is_nil() {
            let id = self.free;
            let Some(Slot::Free { next }) = self.slots.get(id.index()) else {
                return Err(TreeError::invariant("free list points at a live slot"));
            };
            self.free = *next;
            self.slots[id.index()] = Slot::Occupied(node);
            self.allocated += 1;
            debug!(slot = id.index(), "reused node slot");
            return Ok(id);
        }

        if self.slots.len() > u32::MAX as usize {
            tracing::warn!("node index space exhausted");
            return Err(TreeError::CapacityExceeded {
                limit: u32::MAX as usize,
            });
        }
        if self.slots.len() == self.slots.capacity() {
            // Grow geometrically, starting from the configured capacity.
            let additional = if self.slots.len() <= 1 {
                self.config.initial_capacity.max(1)
            } else {
                self.slots.len()
            };
            self.slots.try_reserve(additional)?;
        }
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Slot::Occupied(node));
        self.allocated += 1;
        debug!(slot = id.index(), "allocated node slot");
        Ok(id)
    }

    /// Releases a node that was allocated but never inserted.
    pub fn release_detached(&mut self, id: NodeId) -> Result<(K, V)> {
        match self.slots.get(id.index()) {
            Some(Slot::Occupied(node)) if node.linked => Err(TreeError::invariant(format!(
                "node {} is linked into the tree",
                id.index()
            ))),
            _ => self.release(id),
        }
    }

    /// Returns the slot to the free list and hands the payload back.
    pub(crate) fn release(&mut self, id: NodeId) -> Result<(K, V)> {
        if id.is_nil() {
            return Err(TreeError::invariant("the sentinel cannot be released"));
        }
        let next = self.free;
        let Some(slot) = self.slots.get_mut(id.index()) else {
            return Err(TreeError::invariant(format!(
                "node {} is not allocated",
                id.index()
            )));
        };
        match std::mem::replace(slot, Slot::Free { next }) {
            Slot::Occupied(node) => {
                self.free = id;
                self.allocated -= 1;
                debug!(slot = id.index(), "released node slot");
                Ok(node.into_parts())
            }
            other => {
                *slot = other;
                Err(TreeError::invariant(format!(
                    "node {} is not allocated",
                    id.index()
                )))
            }
        }
    }

    /// Drops every node and resets the arena to its empty state.
    pub(crate) fn reset_arena(&mut self) {
        self.slots.truncate(1);
        self.free = NodeId::NIL;
        self.root = NodeId::NIL;
        self.allocated = 0;
        self.len = 0;
    }
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(key: K, value: V) -> Self {
        Node {
            parent: NodeId::NIL,
            left: NodeId::NIL,
            right: NodeId::NIL,
            color: Color::Red,
            linked: false,
            key,
            value,
        }
    }

    pub(crate) fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}
