use std::{
    borrow::Borrow,
    cmp::Ordering::*,
    fmt::{self, Debug},
};

use crate::{KeyOrder, Node, NodeId, Result, ShortLex, Slot, Tree, TreeConfig};

impl<K, V> Tree<K, V, ShortLex> {
    /// An empty tree under the default [`ShortLex`] ordering.
    pub fn new() -> Self {
        Self::with_order(ShortLex)
    }
}

impl<K, V, O: Default> Default for Tree<K, V, O> {
    fn default() -> Self {
        Self::with_order(O::default())
    }
}

impl<K, V, O> Tree<K, V, O> {
    pub fn with_order(order: O) -> Self {
        Self::with_config(TreeConfig::default(), order)
    }

    pub fn with_config(config: TreeConfig, order: O) -> Self {
        Tree {
            slots: vec![Slot::Nil],
            free: NodeId::NIL,
            root: NodeId::NIL,
            len: 0,
            allocated: 0,
            order,
            config,
        }
    }

    pub fn order(&self) -> &O {
        &self.order
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every node, including detached ones.
    pub fn clear(&mut self) {
        self.reset_arena();
    }

    /// Leftmost node of the subtree rooted at `node`; the sentinel maps to
    /// itself.
    pub fn minimum(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(left) = self.node(current).map(|n| n.left) {
            if left.is_nil() {
                break;
            }
            current = left;
        }
        current
    }

    /// Rightmost node of the subtree rooted at `node`.
    pub fn maximum(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(right) = self.node(current).map(|n| n.right) {
            if right.is_nil() {
                break;
            }
            current = right;
        }
        current
    }

    /// Next node in key order, or the sentinel when `node` is the maximum.
    pub fn successor(&self, node: NodeId) -> NodeId {
        if node.is_nil() {
            return NodeId::NIL;
        }
        let right = self.right(node);
        if !right.is_nil() {
            return self.minimum(right);
        }
        // Everything below is smaller: climb while we are a right child. The
        // first ancestor we reach from its left is the answer.
        let mut current = node;
        let mut parent = self.parent(current);
        while !parent.is_nil() && current == self.right(parent) {
            current = parent;
            parent = self.parent(current);
        }
        parent
    }

    /// Previous node in key order, or the sentinel when `node` is the minimum.
    pub fn predecessor(&self, node: NodeId) -> NodeId {
        if node.is_nil() {
            return NodeId::NIL;
        }
        let left = self.left(node);
        if !left.is_nil() {
            return self.maximum(left);
        }
        let mut current = node;
        let mut parent = self.parent(current);
        while !parent.is_nil() && current == self.left(parent) {
            current = parent;
            parent = self.parent(current);
        }
        parent
    }

    pub fn first(&self) -> NodeId {
        self.minimum(self.root)
    }

    pub fn last(&self) -> NodeId {
        self.maximum(self.root)
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.node(self.first()).map(|n| (n.key(), n.value()))
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.node(self.last()).map(|n| (n.key(), n.value()))
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.first();
        if first.is_nil() {
            return None;
        }
        self.delete(first).ok()
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.last();
        if last.is_nil() {
            return None;
        }
        self.delete(last).ok()
    }
}

// Map API.
impl<K, V, O> Tree<K, V, O> {
    /// Finds the node holding `key`, or returns the sentinel.
    pub fn search<Q>(&self, key: &Q) -> NodeId
    where
        K: Borrow<Q>,
        O: KeyOrder<Q>,
        Q: ?Sized,
    {
        let mut cursor = self.root;
        while let Some(candidate) = self.node(cursor) {
            match self.order.compare(key, candidate.key().borrow()) {
                Equal => return cursor,
                Less => cursor = candidate.left,
                Greater => cursor = candidate.right,
            }
        }
        NodeId::NIL
    }

    pub fn is_member<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        O: KeyOrder<Q>,
        Q: ?Sized,
    {
        !self.search(key).is_nil()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        O: KeyOrder<Q>,
        Q: ?Sized,
    {
        self.node(self.search(key)).map(Node::value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        O: KeyOrder<Q>,
        Q: ?Sized,
    {
        let id = self.search(key);
        self.node_mut(id).map(Node::value_mut)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        O: KeyOrder<Q>,
        Q: ?Sized,
    {
        self.node(self.search(key)).map(|n| (n.key(), n.value()))
    }

    /// Inserts or overwrites. Returns the value `key` held before, if any.
    pub fn set(&mut self, key: K, value: V) -> Result<Option<V>>
    where
        O: KeyOrder<K>,
    {
        let found = self.search(&key);
        if let Some(node) = self.node_mut(found) {
            return Ok(Some(node.replace_value(value)));
        }
        self.insert_new(key, value)?;
        Ok(None)
    }

    /// Allocates and inserts a node, keeping any existing equal keys.
    pub fn insert_new(&mut self, key: K, value: V) -> Result<NodeId>
    where
        O: KeyOrder<K>,
    {
        let id = self.alloc_node(key, value)?;
        self.insert(id)?;
        Ok(id)
    }

    /// Removes `key`. Returns whether it was present.
    pub fn delete_key<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        O: KeyOrder<Q>,
        Q: ?Sized,
    {
        self.remove(key).is_some()
    }

    /// Removes `key` and returns its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        O: KeyOrder<Q>,
        Q: ?Sized,
    {
        let id = self.search(key);
        if id.is_nil() {
            return None;
        }
        self.delete(id).ok().map(|(_, value)| value)
    }
}

impl<K: Debug, V: Debug, O> Debug for Tree<K, V, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Natural;

    use pretty_assertions::assert_eq;

    #[test]
    fn tree_ctor_works() {
        let tree = Tree::<String, String>::new();
        assert_eq!(Tree::<String, String>::sentinel(), tree.root());
        assert_eq!(0, tree.len());
        assert!(tree.is_empty());
        assert_eq!(false, tree.is_member("forty two"));
        assert_eq!(NodeId::NIL, tree.first());
        assert_eq!(NodeId::NIL, tree.last());
    }

    #[test]
    fn default_uses_default_order() {
        let tree: Tree<u64, (), Natural> = Tree::default();
        assert_eq!(&Natural, tree.order());
        assert_eq!(&TreeConfig::default(), tree.config());
    }

    #[test]
    fn set_then_get() {
        let mut tree = Tree::new();
        assert_eq!(None, tree.set("forty two".to_string(), 42).unwrap());
        assert_eq!(None, tree.set("zero".to_string(), 0).unwrap());
        assert_eq!(None, tree.set("hundo".to_string(), 100).unwrap());
        assert_eq!(3, tree.len());

        assert_eq!(Some(&42), tree.get("forty two"));
        assert_eq!(Some(&0), tree.get("zero"));
        assert_eq!(Some(&100), tree.get("hundo"));
        assert_eq!(None, tree.get("one"));
        assert_eq!(
            Some((&"zero".to_string(), &0)),
            tree.get_key_value("zero")
        );
    }

    #[test]
    fn set_same_key_overwrites() {
        let mut tree = Tree::new();
        assert_eq!(None, tree.set("x".to_string(), "1".to_string()).unwrap());
        assert_eq!(
            Some("1".to_string()),
            tree.set("x".to_string(), "2".to_string()).unwrap()
        );
        assert_eq!(1, tree.len());
        assert_eq!(Some(&"2".to_string()), tree.get("x"));
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut tree = Tree::with_order(Natural);
        tree.set(1, String::from("hello")).unwrap();
        tree.get_mut(&1).unwrap().push('!');
        assert_eq!(Some(&String::from("hello!")), tree.get(&1));
        assert_eq!(None, tree.get_mut(&2));
    }

    #[test]
    fn shortlex_orders_by_length_first() {
        let mut tree = Tree::new();
        for k in ["10", "9", "100", "a", "b"] {
            tree.set(k.to_string(), ()).unwrap();
        }
        let keys: Vec<&str> = tree.keys().map(String::as_str).collect();
        assert_eq!(vec!["9", "a", "b", "10", "100"], keys);
    }

    #[test]
    fn custom_order_via_closure() {
        let mut tree = Tree::with_order(|a: &i32, b: &i32| b.cmp(a));
        for k in [3, 1, 2] {
            tree.set(k, ()).unwrap();
        }
        assert_eq!(vec![&3, &2, &1], tree.keys().collect::<Vec<_>>());
        assert!(tree.is_member(&2));
    }

    #[test]
    fn min_max_successor_predecessor() {
        let mut tree = Tree::with_order(Natural);
        for k in [50, 20, 80, 10, 30, 70, 90] {
            tree.set(k, k).unwrap();
        }
        let key = |id: NodeId| tree.node(id).map(|n| *n.key());

        assert_eq!(Some(10), key(tree.first()));
        assert_eq!(Some(90), key(tree.last()));
        assert_eq!(Some(70), key(tree.minimum(tree.search(&80))));
        assert_eq!(Some(30), key(tree.maximum(tree.search(&20))));
        assert_eq!(Some(30), key(tree.successor(tree.search(&20))));
        assert_eq!(Some(50), key(tree.successor(tree.search(&30))));
        assert_eq!(Some(30), key(tree.predecessor(tree.search(&50))));
        assert_eq!(Some(70), key(tree.predecessor(tree.search(&80))));
        assert_eq!(NodeId::NIL, tree.successor(tree.search(&90)));
        assert_eq!(NodeId::NIL, tree.predecessor(tree.search(&10)));
        assert_eq!(NodeId::NIL, tree.successor(NodeId::NIL));
        assert_eq!(NodeId::NIL, tree.minimum(NodeId::NIL));
        assert_eq!(NodeId::NIL, tree.maximum(NodeId::NIL));
    }

    #[test]
    fn delete_key_reports_presence() {
        let mut tree = Tree::new();
        assert_eq!(false, tree.delete_key("a"));
        assert_eq!(NodeId::NIL, tree.root());

        tree.set("a".to_string(), 1).unwrap();
        tree.set("b".to_string(), 2).unwrap();
        assert_eq!(false, tree.delete_key("c"));
        assert_eq!(2, tree.len());
        assert_eq!(true, tree.delete_key("a"));
        assert_eq!(false, tree.delete_key("a"));
        assert_eq!(NodeId::NIL, tree.search("a"));
        assert_eq!(Some(2), tree.remove("b"));
        assert!(tree.is_empty());
        assert_eq!(NodeId::NIL, tree.root());
    }

    #[test]
    fn pop_first_and_last() {
        let mut tree = Tree::with_order(Natural);
        assert_eq!(None, tree.pop_first());
        assert_eq!(None, tree.pop_last());

        for k in [42, 0, 100] {
            tree.set(k, k.to_string()).unwrap();
        }
        assert_eq!(Some((0, "0".to_string())), tree.pop_first());
        assert_eq!(Some((100, "100".to_string())), tree.pop_last());
        assert_eq!(Some((&42, &"42".to_string())), tree.first_key_value());
        assert_eq!(Some((&42, &"42".to_string())), tree.last_key_value());
        assert_eq!(1, tree.len());
    }

    #[test]
    fn clear_resets_everything() {
        let mut tree = Tree::with_order(Natural);
        for k in 0..10 {
            tree.set(k, ()).unwrap();
        }
        tree.alloc_node(99, ()).unwrap();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(NodeId::NIL, tree.root());
        assert_eq!(false, tree.is_member(&3));
        tree.set(3, ()).unwrap();
        assert_eq!(1, tree.len());
        tree.check().unwrap();
    }

    #[test]
    fn debug_renders_as_map() {
        let mut tree = Tree::with_order(Natural);
        tree.set(2, "b").unwrap();
        tree.set(1, "a").unwrap();
        assert_eq!("{1: \"a\", 2: \"b\"}", format!("{tree:?}"));
    }
}
