use tracing::trace;

use crate::{Color, KeyOrder, NodeId, Result, Tree, TreeError};

// Public
impl<K, V, O> Tree<K, V, O> {
    /// Left rotation around `x`.
    ///
    /// ```text
    ///       |                 |
    ///       x                 y
    ///      / \      -->      / \
    ///     a   y             x   c
    ///        / \           / \
    ///       b   c         a   b
    /// ```
    ///
    /// The in-order sequence of keys is preserved and no color changes, so a
    /// rotation on its own can leave the tree unbalanced.
    pub fn rotate_left(&mut self, x: NodeId) -> Result<()> {
        self.require_linked(x)?;
        if self.right(x).is_nil() {
            return Err(TreeError::invariant(format!(
                "cannot rotate node {} left without a right child",
                x.index()
            )));
        }
        self.rotate_left_at(x);
        Ok(())
    }

    /// Right rotation around `y`, the mirror of [`Tree::rotate_left`].
    ///
    /// ```text
    ///         |               |
    ///         y               x
    ///        / \    -->      / \
    ///       x   c           a   y
    ///      / \                 / \
    ///     a   b               b   c
    /// ```
    pub fn rotate_right(&mut self, y: NodeId) -> Result<()> {
        self.require_linked(y)?;
        if self.left(y).is_nil() {
            return Err(TreeError::invariant(format!(
                "cannot rotate node {} right without a left child",
                y.index()
            )));
        }
        self.rotate_right_at(y);
        Ok(())
    }

    /// Links a node obtained from [`Tree::alloc_node`] into the tree and
    /// rebalances.
    ///
    /// Keys equal to an existing key are not merged: the node is placed after
    /// its equals. Use [`Tree::set`] for upserts.
    pub fn insert(&mut self, node: NodeId) -> Result<()>
    where
        O: KeyOrder<K>,
    {
        match self.node(node) {
            Some(n) if !n.linked => {}
            Some(_) => {
                return Err(TreeError::invariant(format!(
                    "node {} is already linked",
                    node.index()
                )));
            }
            None => {
                return Err(TreeError::invariant(format!(
                    "node {} is not allocated",
                    node.index()
                )));
            }
        }

        let mut parent = NodeId::NIL;
        let mut went_left = false;
        if let Some(key) = self.key_of(node) {
            let mut cursor = self.root;
            while let Some(candidate) = self.node(cursor) {
                parent = cursor;
                went_left = self.order.less_than(key, candidate.key());
                cursor = if went_left {
                    candidate.left
                } else {
                    candidate.right
                };
            }
        }

        if let Some(n) = self.node_mut(node) {
            n.parent = parent;
            n.left = NodeId::NIL;
            n.right = NodeId::NIL;
            n.color = Color::Red;
            n.linked = true;
        }
        if parent.is_nil() {
            self.root = node;
        } else if went_left {
            self.set_left(parent, node);
        } else {
            self.set_right(parent, node);
        }
        self.len += 1;

        self.insert_fixup(node);
        Ok(())
    }

    /// Unlinks `node`, rebalances, releases its slot and returns the payload.
    pub fn delete(&mut self, node: NodeId) -> Result<(K, V)> {
        self.require_linked(node)?;

        let mut removed_color = self.color(node);
        let child;
        let child_parent;

        if self.left(node).is_nil() {
            child = self.right(node);
            child_parent = self.parent(node);
            self.transplant(node, child);
        } else if self.right(node).is_nil() {
            child = self.left(node);
            child_parent = self.parent(node);
            self.transplant(node, child);
        } else {
            let successor = self.minimum(self.right(node));
            removed_color = self.color(successor);
            child = self.right(successor);

            if self.parent(successor) == node {
                /*
                 * The successor is node's right child.
                 *
                 *    (n)          (s)
                 *    / \          / \
                 *  (l) (s)  ->  (l) (c)
                 *        \
                 *        (c)
                 */
                child_parent = successor;
            } else {
                /*
                 * The successor is the leftmost node under node's right
                 * child; its right child takes its place first.
                 *
                 *    (n)          (s)
                 *    / \          / \
                 *  (l) (r)  ->  (l) (r)
                 *      /            /
                 *    (p)          (p)
                 *    /            /
                 *  (s)          (c)
                 *    \
                 *    (c)
                 */
                child_parent = self.parent(successor);
                self.transplant(successor, child);
                let right = self.right(node);
                self.set_right(successor, right);
                self.set_parent(right, successor);
            }

            self.transplant(node, successor);
            let left = self.left(node);
            self.set_left(successor, left);
            self.set_parent(left, successor);
            self.set_color(successor, self.color(node));
        }

        if removed_color == Color::Black {
            self.delete_fixup(child, child_parent);
        }

        if let Some(n) = self.node_mut(node) {
            n.linked = false;
        }
        self.len -= 1;
        self.release(node)
    }
}

// Private
impl<K, V, O> Tree<K, V, O> {
    fn require_linked(&self, id: NodeId) -> Result<()> {
        match self.node(id) {
            Some(n) if n.linked => Ok(()),
            Some(_) => Err(TreeError::invariant(format!(
                "node {} is not linked into the tree",
                id.index()
            ))),
            None => Err(TreeError::invariant(format!(
                "node {} is not allocated",
                id.index()
            ))),
        }
    }

    /// Points `parent`'s link to `old` at `new` instead, or the root when
    /// `parent` is the sentinel.
    #[inline]
    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        if parent.is_nil() {
            self.root = new;
        } else if self.left(parent) == old {
            self.set_left(parent, new);
        } else {
            self.set_right(parent, new);
        }
    }

    /// Puts the subtree rooted at `new` where `old` was. `old` keeps its own
    /// links.
    #[inline]
    fn transplant(&mut self, old: NodeId, new: NodeId) {
        let parent = self.parent(old);
        self.replace_child(parent, old, new);
        self.set_parent(new, parent);
    }

    fn rotate_left_at(&mut self, x: NodeId) {
        let y = self.right(x);
        let inner = self.left(y);
        self.set_right(x, inner);
        self.set_parent(inner, x);

        let parent = self.parent(x);
        self.set_parent(y, parent);
        self.replace_child(parent, x, y);

        self.set_left(y, x);
        self.set_parent(x, y);
        trace!(x = x.index(), y = y.index(), "rotate left");
    }

    fn rotate_right_at(&mut self, y: NodeId) {
        let x = self.left(y);
        let inner = self.right(x);
        self.set_left(y, inner);
        self.set_parent(inner, y);

        let parent = self.parent(y);
        self.set_parent(x, parent);
        self.replace_child(parent, y, x);

        self.set_right(x, y);
        self.set_parent(y, x);
        trace!(x = x.index(), y = y.index(), "rotate right");
    }

    fn insert_fixup(&mut self, mut node: NodeId) {
        // Loop invariant: node is red. The only possible violation is a red
        // parent; a red parent is never the root, so gparent is a real node.
        while self.is_red(self.parent(node)) {
            let mut parent = self.parent(node);
            let gparent = self.parent(parent);

            if parent == self.left(gparent) {
                let uncle = self.right(gparent);
                if self.is_red(uncle) {
                    /*
                     * Case 1 - uncle is red (color flips).
                     *
                     *       G            g
                     *      / \          / \
                     *     p   u  -->   P   U
                     *    /            /
                     *   n            n
                     *
                     * g may now have a red parent: continue from g.
                     */
                    trace!(node = node.index(), "insert fixup: case 1");
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(gparent, Color::Red);
                    node = gparent;
                    continue;
                }

                if node == self.right(parent) {
                    /*
                     * Case 2 - uncle is black, node is an inner grandchild
                     * (left rotate at parent).
                     *
                     *      G             G
                     *     / \           / \
                     *    p   U  -->    n   U
                     *     \           /
                     *      n         p
                     */
                    trace!(node = node.index(), "insert fixup: case 2");
                    node = parent;
                    self.rotate_left_at(node);
                    parent = self.parent(node);
                }

                /*
                 * Case 3 - uncle is black, node is an outer grandchild
                 * (right rotate at gparent).
                 *
                 *        G           P
                 *       / \         / \
                 *      p   U  -->  n   g
                 *     /                 \
                 *    n                   U
                 */
                trace!(node = node.index(), "insert fixup: case 3");
                self.set_color(parent, Color::Black);
                self.set_color(gparent, Color::Red);
                self.rotate_right_at(gparent);
            } else {
                let uncle = self.left(gparent);
                if self.is_red(uncle) {
                    /* Case 1 - color flips */
                    trace!(node = node.index(), "insert fixup: case 1 (mirrored)");
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(gparent, Color::Red);
                    node = gparent;
                    continue;
                }

                if node == self.left(parent) {
                    /* Case 2 - right rotate at parent */
                    trace!(node = node.index(), "insert fixup: case 2 (mirrored)");
                    node = parent;
                    self.rotate_right_at(node);
                    parent = self.parent(node);
                }

                /* Case 3 - left rotate at gparent */
                trace!(node = node.index(), "insert fixup: case 3 (mirrored)");
                self.set_color(parent, Color::Black);
                self.set_color(gparent, Color::Red);
                self.rotate_left_at(gparent);
            }
        }

        let root = self.root;
        self.set_color(root, Color::Black);
    }

    /// `node` carries an extra black; `parent` is tracked separately because
    /// `node` may be the sentinel, whose links are never written.
    fn delete_fixup(&mut self, mut node: NodeId, mut parent: NodeId) {
        while node != self.root && self.is_black(node) {
            if node == self.left(parent) {
                let mut sibling = self.right(parent);
                if self.is_red(sibling) {
                    /*
                     * Case 1 - sibling is red (left rotate at parent).
                     *
                     *     P               S
                     *    / \             / \
                     *   N   s    -->    p   Sr
                     *      / \         / \
                     *     Sl  Sr      N   Sl
                     */
                    trace!(parent = parent.index(), "delete fixup: case 1");
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_left_at(parent);
                    sibling = self.right(parent);
                }

                if self.is_black(self.left(sibling)) && self.is_black(self.right(sibling)) {
                    /*
                     * Case 2 - both of sibling's children are black
                     * (sibling color flip, deficit moves up).
                     *
                     *    (p)           (p)
                     *    / \           / \
                     *   N   S    -->  N   s
                     *      / \           / \
                     *     Sl  Sr        Sl  Sr
                     */
                    trace!(parent = parent.index(), "delete fixup: case 2");
                    self.set_color(sibling, Color::Red);
                    node = parent;
                    parent = self.parent(node);
                    continue;
                }

                if self.is_black(self.right(sibling)) {
                    /*
                     * Case 3 - far child black, near child red
                     * (right rotate at sibling).
                     *
                     *   (p)           (p)
                     *   / \           / \
                     *  N   S    -->  N   Sl
                     *     / \             \
                     *    sl  Sr            s
                     *                       \
                     *                        Sr
                     */
                    trace!(parent = parent.index(), "delete fixup: case 3");
                    self.set_color(self.left(sibling), Color::Black);
                    self.set_color(sibling, Color::Red);
                    self.rotate_right_at(sibling);
                    sibling = self.right(parent);
                }

                /*
                 * Case 4 - far child red (left rotate at parent + color
                 * flips). s takes p's color; p and sr turn black.
                 *
                 *      (p)             (s)
                 *      / \             / \
                 *     N   S     -->   P   Sr
                 *        / \         / \
                 *      (sl) sr      N  (sl)
                 */
                trace!(parent = parent.index(), "delete fixup: case 4");
                self.set_color(sibling, self.color(parent));
                self.set_color(parent, Color::Black);
                self.set_color(self.right(sibling), Color::Black);
                self.rotate_left_at(parent);
                node = self.root;
            } else {
                let mut sibling = self.left(parent);
                if self.is_red(sibling) {
                    /* Case 1 - right rotate at parent */
                    trace!(parent = parent.index(), "delete fixup: case 1 (mirrored)");
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_right_at(parent);
                    sibling = self.left(parent);
                }

                if self.is_black(self.left(sibling)) && self.is_black(self.right(sibling)) {
                    /* Case 2 - sibling color flip */
                    trace!(parent = parent.index(), "delete fixup: case 2 (mirrored)");
                    self.set_color(sibling, Color::Red);
                    node = parent;
                    parent = self.parent(node);
                    continue;
                }

                if self.is_black(self.left(sibling)) {
                    /* Case 3 - left rotate at sibling */
                    trace!(parent = parent.index(), "delete fixup: case 3 (mirrored)");
                    self.set_color(self.right(sibling), Color::Black);
                    self.set_color(sibling, Color::Red);
                    self.rotate_left_at(sibling);
                    sibling = self.left(parent);
                }

                /* Case 4 - right rotate at parent + color flips */
                trace!(parent = parent.index(), "delete fixup: case 4 (mirrored)");
                self.set_color(sibling, self.color(parent));
                self.set_color(parent, Color::Black);
                self.set_color(self.left(sibling), Color::Black);
                self.rotate_right_at(parent);
                node = self.root;
            }
        }

        self.set_color(node, Color::Black);
    }
}
