//! An ordered key-value container backed by a red-black tree.
//!
//! Nodes live in a per-tree arena and refer to each other through [`NodeId`]s.
//! Slot 0 of every arena is the terminal marker: it stands in for "no child"
//! and "no parent", is always black, and is never written to. Lookups that
//! miss return it, so callers test for absence by comparing against
//! [`Tree::sentinel`].
//!
//! ```
//! use rbkv::Tree;
//!
//! let mut tree = Tree::new();
//! tree.set("b".to_string(), 2).unwrap();
//! tree.set("a".to_string(), 1).unwrap();
//! assert!(tree.is_member("a"));
//! assert_eq!(tree.search("zz"), Tree::<String, i32>::sentinel());
//! assert!(tree.delete_key("a"));
//! ```
#![forbid(unsafe_code)]

mod alloc;
mod config;
mod error;
mod iter;
mod node;
mod order;
mod root;
mod tree;
mod verify;

pub use config::TreeConfig;
pub use error::{Result, TreeError};
pub use iter::{IntoIter, Iter, Keys, Values, ValuesMut};
pub use order::{KeyOrder, Natural, ShortLex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

/// Handle to a node inside a [`Tree`].
///
/// Handles are only meaningful for the tree that produced them. A handle to a
/// deleted node may be reused by a later allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The terminal marker of every tree.
    pub const NIL: NodeId = NodeId(0);

    #[inline(always)]
    pub const fn is_nil(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

pub struct Node<K, V> {
    pub(crate) parent: NodeId,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) color: Color,
    pub(crate) linked: bool,
    key: K,
    value: V,
}

/// One arena slot. Slot 0 is always [`Slot::Nil`].
pub(crate) enum Slot<K, V> {
    Nil,
    Occupied(Node<K, V>),
    Free { next: NodeId },
}

/// A red-black tree mapping keys to values under the ordering `O`.
///
/// The default ordering is [`ShortLex`]: shorter keys first, then bytewise.
pub struct Tree<K, V, O = ShortLex> {
    slots: Vec<Slot<K, V>>,
    free: NodeId,
    root: NodeId,
    len: usize,
    allocated: usize,
    order: O,
    config: TreeConfig,
}
