use std::{borrow::Borrow, iter::FusedIterator, ops::Index};

use crate::{KeyOrder, NodeId, Slot, Tree};

impl<K, V, O> Tree<K, V, O> {
    /// Gets an iterator over the entries of the tree, in key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbkv::{Natural, Tree};
    ///
    /// let mut tree = Tree::with_order(Natural);
    /// tree.set(2, "b").unwrap();
    /// tree.set(1, "a").unwrap();
    ///
    /// let entries: Vec<_> = tree.iter().collect();
    /// assert_eq!(entries, [(&1, &"a"), (&2, &"b")]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V, O> {
        Iter {
            tree: self,
            front: self.first(),
            back: self.last(),
            len: self.len,
        }
    }

    /// Gets an iterator over the keys of the tree, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V, O> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the tree, in order by key.
    pub fn values(&self) -> Values<'_, K, V, O> {
        Values { inner: self.iter() }
    }

    /// Gets a mutable iterator over the values of the tree, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbkv::{Natural, Tree};
    ///
    /// let mut tree = Tree::with_order(Natural);
    /// tree.set(1, String::from("hello")).unwrap();
    /// tree.set(2, String::from("goodbye")).unwrap();
    ///
    /// for value in tree.values_mut() {
    ///     value.push_str("!");
    /// }
    ///
    /// let values: Vec<String> = tree.values().cloned().collect();
    /// assert_eq!(values, [String::from("hello!"), String::from("goodbye!")]);
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, V> {
        // Rank every linked node by an in-order walk, then hand out the
        // disjoint borrows of the arena in that order.
        let mut rank = vec![usize::MAX; self.slots.len()];
        let mut current = self.first();
        let mut next_rank = 0;
        while !current.is_nil() && next_rank < self.len {
            rank[current.index()] = next_rank;
            next_rank += 1;
            current = self.successor(current);
        }

        let mut ordered: Vec<Option<&mut V>> = Vec::with_capacity(next_rank);
        ordered.resize_with(next_rank, || None);
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if let Slot::Occupied(node) = slot {
                if let Some(place) = ordered.get_mut(rank[index]) {
                    *place = Some(node.value_mut());
                }
            }
        }
        ValuesMut {
            inner: ordered.into_iter().flatten().collect::<Vec<_>>().into_iter(),
        }
    }
}

impl<K, Q, V, O> Index<&Q> for Tree<K, V, O>
where
    K: Borrow<Q>,
    O: KeyOrder<Q>,
    Q: ?Sized,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `Tree`.
    #[inline]
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

pub struct Iter<'a, K, V, O> {
    tree: &'a Tree<K, V, O>,
    front: NodeId,
    back: NodeId,
    len: usize,
}

impl<'a, K, V, O> Iterator for Iter<'a, K, V, O> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.tree.node(self.front)?;
        self.len -= 1;
        self.front = self.tree.successor(self.front);
        Some((node.key(), node.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<'a, K, V, O> DoubleEndedIterator for Iter<'a, K, V, O> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.tree.node(self.back)?;
        self.len -= 1;
        self.back = self.tree.predecessor(self.back);
        Some((node.key(), node.value()))
    }
}

impl<K, V, O> ExactSizeIterator for Iter<'_, K, V, O> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<K, V, O> FusedIterator for Iter<'_, K, V, O> {}

impl<K, V, O> Clone for Iter<'_, K, V, O> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            len: self.len,
        }
    }
}

impl<'a, K, V, O> IntoIterator for &'a Tree<K, V, O> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, O>;

    fn into_iter(self) -> Iter<'a, K, V, O> {
        self.iter()
    }
}

/// An iterator over the keys of a `Tree`.
///
/// This `struct` is created by the [`keys`] method on [`Tree`].
///
/// [`keys`]: Tree::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V, O> {
    inner: Iter<'a, K, V, O>,
}

impl<'a, K, V, O> Iterator for Keys<'a, K, V, O> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V, O> DoubleEndedIterator for Keys<'a, K, V, O> {
    fn next_back(&mut self) -> Option<&'a K> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V, O> ExactSizeIterator for Keys<'_, K, V, O> {}
impl<K, V, O> FusedIterator for Keys<'_, K, V, O> {}

/// An iterator over the values of a `Tree`.
///
/// This `struct` is created by the [`values`] method on [`Tree`].
///
/// [`values`]: Tree::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V, O> {
    inner: Iter<'a, K, V, O>,
}

impl<'a, K, V, O> Iterator for Values<'a, K, V, O> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V, O> DoubleEndedIterator for Values<'a, K, V, O> {
    fn next_back(&mut self) -> Option<&'a V> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V, O> ExactSizeIterator for Values<'_, K, V, O> {}
impl<K, V, O> FusedIterator for Values<'_, K, V, O> {}

/// A mutable iterator over the values of a `Tree`.
///
/// This `struct` is created by the [`values_mut`] method on [`Tree`].
///
/// [`values_mut`]: Tree::values_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ValuesMut<'a, V> {
    inner: std::vec::IntoIter<&'a mut V>,
}

impl<'a, V> Iterator for ValuesMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, V> DoubleEndedIterator for ValuesMut<'a, V> {
    fn next_back(&mut self) -> Option<&'a mut V> {
        self.inner.next_back()
    }
}

impl<V> ExactSizeIterator for ValuesMut<'_, V> {}
impl<V> FusedIterator for ValuesMut<'_, V> {}

/// An owning iterator over the entries of a `Tree`, sorted by key.
pub struct IntoIter<K, V, O>(Tree<K, V, O>);

impl<K, V, O> IntoIterator for Tree<K, V, O> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, O>;

    fn into_iter(self) -> IntoIter<K, V, O> {
        IntoIter(self)
    }
}

impl<K, V, O> Iterator for IntoIter<K, V, O> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.0.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len, Some(self.0.len))
    }
}

impl<K, V, O> DoubleEndedIterator for IntoIter<K, V, O> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.0.pop_last()
    }
}

impl<K, V, O> ExactSizeIterator for IntoIter<K, V, O> {}
impl<K, V, O> FusedIterator for IntoIter<K, V, O> {}

#[cfg(test)]
mod test {
    use crate::{Natural, Tree};
    use pretty_assertions::assert_eq;

    fn tree_of(keys: impl IntoIterator<Item = i32>) -> Tree<i32, String, Natural> {
        let mut tree = Tree::with_order(Natural);
        for k in keys {
            tree.set(k, k.to_string()).unwrap();
        }
        tree
    }

    #[test]
    fn iter_empty() {
        let tree = tree_of([]);
        assert_eq!(None, tree.iter().next());
        assert_eq!(None, tree.iter().next_back());
        assert_eq!(0, tree.keys().len());
    }

    #[test]
    fn iter() {
        let tree = tree_of([100, 0, 42]);
        let mut iter = tree.iter();
        assert_eq!(3, iter.len());
        assert_eq!(Some((&0, &"0".to_string())), iter.next());
        assert_eq!(Some((&42, &"42".to_string())), iter.next());
        assert_eq!(Some((&100, &"100".to_string())), iter.next());
        assert_eq!(None, iter.next());
        assert_eq!(None, iter.next());
    }

    #[test]
    fn iter_rev_insert() {
        let tree = tree_of((0..128).rev());
        let keys: Vec<i32> = tree.keys().copied().collect();
        assert_eq!((0..128).collect::<Vec<_>>(), keys);
    }

    #[test]
    fn iter_both_ends_meet() {
        let tree = tree_of(0..5);
        let mut iter = tree.keys();
        assert_eq!(Some(&0), iter.next());
        assert_eq!(Some(&4), iter.next_back());
        assert_eq!(Some(&1), iter.next());
        assert_eq!(Some(&3), iter.next_back());
        assert_eq!(Some(&2), iter.next());
        assert_eq!(None, iter.next_back());
        assert_eq!(None, iter.next());
    }

    #[test]
    fn values_rev() {
        let tree = tree_of([2, 1, 3]);
        let values: Vec<&str> = tree.values().rev().map(String::as_str).collect();
        assert_eq!(vec!["3", "2", "1"], values);
    }

    #[test]
    fn values_mut_in_key_order() {
        let mut tree = tree_of([5, 1, 3, 2, 4]);
        tree.delete_key(&3);
        tree.set(6, "6".to_string()).unwrap();
        let mut seen = Vec::new();
        for value in tree.values_mut() {
            seen.push(value.clone());
            value.push('!');
        }
        assert_eq!(vec!["1", "2", "4", "5", "6"], seen);
        assert_eq!(Some(&"4!".to_string()), tree.get(&4));
    }

    #[test]
    fn into_iter_drains_in_order() {
        let tree = tree_of([3, 1, 2]);
        let mut iter = tree.into_iter();
        assert_eq!(Some((3, "3".to_string())), iter.next_back());
        assert_eq!(vec![(1, "1".to_string()), (2, "2".to_string())], iter.collect::<Vec<_>>());
    }

    #[test]
    fn for_loop() {
        let tree = tree_of([1, 2]);
        let mut total = 0;
        for (k, _v) in &tree {
            total += k;
        }
        assert_eq!(3, total);
    }

    #[test]
    fn index_passes() {
        let mut tree = Tree::new();
        let forty_two = "forty two".to_string();
        tree.set(forty_two.clone(), forty_two.clone()).unwrap();
        assert_eq!(forty_two, tree["forty two"]);
        assert_eq!(forty_two, tree[&forty_two]);
    }

    #[test]
    #[should_panic]
    fn index_panics() {
        let tree: Tree<usize, (), Natural> = Tree::with_order(Natural);
        assert_eq!((), tree[&42]);
    }
}
