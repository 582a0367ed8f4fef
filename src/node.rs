use std::fmt::{self, Debug};

use crate::{Color, Node, NodeId, Slot, Tree};

// Public API.
impl<K, V> Node<K, V> {
    #[inline(always)]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline(always)]
    pub fn value(&self) -> &V {
        &self.value
    }

    #[inline(always)]
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    #[inline(always)]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline(always)]
    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    #[inline(always)]
    pub fn is_black(&self) -> bool {
        self.color == Color::Black
    }

    /// Replaces the value, handing the previous one back to the caller.
    #[inline]
    pub(crate) fn replace_value(&mut self, value: V) -> V {
        std::mem::replace(&mut self.value, value)
    }
}

impl<K, V> Debug for Node<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}::({:?},{:?})", self.color, self.key, self.value)
    }
}

// Link accessors. Reading through the sentinel (or a free slot) yields the
// sentinel and black; writing through it is a no-op, so slot 0 never changes.
impl<K, V, O> Tree<K, V, O> {
    /// The terminal marker; every failed lookup returns it.
    #[inline(always)]
    pub const fn sentinel() -> NodeId {
        NodeId::NIL
    }

    #[inline(always)]
    pub fn node(&self, id: NodeId) -> Option<&Node<K, V>> {
        match self.slots.get(id.index()) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<K, V>> {
        match self.slots.get_mut(id.index()) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline(always)]
    pub fn parent(&self, id: NodeId) -> NodeId {
        self.node(id).map_or(NodeId::NIL, |n| n.parent)
    }

    #[inline(always)]
    pub fn left(&self, id: NodeId) -> NodeId {
        self.node(id).map_or(NodeId::NIL, |n| n.left)
    }

    #[inline(always)]
    pub fn right(&self, id: NodeId) -> NodeId {
        self.node(id).map_or(NodeId::NIL, |n| n.right)
    }

    #[inline(always)]
    pub fn color(&self, id: NodeId) -> Color {
        self.node(id).map_or(Color::Black, |n| n.color)
    }

    #[inline(always)]
    pub(crate) fn is_red(&self, id: NodeId) -> bool {
        self.color(id) == Color::Red
    }

    #[inline(always)]
    pub(crate) fn is_black(&self, id: NodeId) -> bool {
        self.color(id) == Color::Black
    }

    #[inline(always)]
    pub(crate) fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(node) = self.node_mut(id) {
            node.parent = parent;
        }
    }

    #[inline(always)]
    pub(crate) fn set_left(&mut self, id: NodeId, left: NodeId) {
        if let Some(node) = self.node_mut(id) {
            node.left = left;
        }
    }

    #[inline(always)]
    pub(crate) fn set_right(&mut self, id: NodeId, right: NodeId) {
        if let Some(node) = self.node_mut(id) {
            node.right = right;
        }
    }

    #[inline(always)]
    pub(crate) fn set_color(&mut self, id: NodeId, color: Color) {
        if let Some(node) = self.node_mut(id) {
            node.color = color;
        }
    }

    #[inline(always)]
    pub(crate) fn key_of(&self, id: NodeId) -> Option<&K> {
        self.node(id).map(Node::key)
    }
}
