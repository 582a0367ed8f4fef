use std::{cmp::Ordering, fmt::Debug, fmt::Write};

use crate::{Color, KeyOrder, NodeId, Result, Tree, TreeError};

impl<K, V, O> Tree<K, V, O> {
    /// Checks every red-black invariant, link symmetry, key order and the
    /// element count. Returns the black-height of the root (sentinel
    /// included, root excluded).
    pub fn check(&self) -> Result<usize>
    where
        O: KeyOrder<K>,
    {
        if self.color(NodeId::NIL) != Color::Black {
            return Err(TreeError::invariant("sentinel is not black"));
        }
        if self.root.is_nil() {
            if self.len != 0 {
                return Err(TreeError::invariant(format!(
                    "empty tree reports {} entries",
                    self.len
                )));
            }
            return Ok(0);
        }
        if self.is_red(self.root) {
            return Err(TreeError::invariant("root is red"));
        }
        if !self.parent(self.root).is_nil() {
            return Err(TreeError::invariant("root has a parent"));
        }

        // Post-order walk computing, per node, the number of black nodes on
        // every path down to a sentinel (node and sentinel included).
        let mut black_count = vec![0usize; self.slots.len()];
        let mut visited = 0usize;
        let mut stack = vec![(self.root, false)];
        while let Some((id, children_done)) = stack.pop() {
            let node = self.node(id).ok_or_else(|| {
                TreeError::invariant(format!("link to unallocated node {}", id.index()))
            })?;
            if !children_done {
                visited += 1;
                if visited > self.len {
                    return Err(TreeError::invariant("more reachable nodes than entries"));
                }
                if !node.linked {
                    return Err(TreeError::invariant(format!(
                        "node {} is reachable but not linked",
                        id.index()
                    )));
                }
                stack.push((id, true));
                for child in [node.left, node.right] {
                    if child.is_nil() {
                        continue;
                    }
                    if self.parent(child) != id {
                        return Err(TreeError::invariant(format!(
                            "node {} does not point back to its parent {}",
                            child.index(),
                            id.index()
                        )));
                    }
                    if node.is_red() && self.is_red(child) {
                        return Err(TreeError::invariant(format!(
                            "red node {} has a red child {}",
                            id.index(),
                            child.index()
                        )));
                    }
                    stack.push((child, false));
                }
                continue;
            }

            let below = |child: NodeId| {
                if child.is_nil() {
                    1
                } else {
                    black_count[child.index()]
                }
            };
            let (left, right) = (below(node.left), below(node.right));
            if left != right {
                return Err(TreeError::invariant(format!(
                    "node {} has black-heights {} and {}",
                    id.index(),
                    left,
                    right
                )));
            }
            black_count[id.index()] = left + usize::from(node.is_black());
        }
        if visited != self.len {
            return Err(TreeError::invariant(format!(
                "{} reachable nodes but {} entries",
                visited, self.len
            )));
        }

        let mut previous = self.first();
        let mut current = self.successor(previous);
        while let (Some(a), Some(b)) = (self.node(previous), self.node(current)) {
            if self.order.compare(a.key(), b.key()) == Ordering::Greater {
                return Err(TreeError::invariant(format!(
                    "node {} is out of order",
                    current.index()
                )));
            }
            previous = current;
            current = self.successor(current);
        }

        Ok(black_count[self.root.index()] - usize::from(self.is_black(self.root)))
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack = Vec::new();
        if !self.root.is_nil() {
            stack.push((self.root, 1));
        }
        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            for child in [self.left(id), self.right(id)] {
                if !child.is_nil() {
                    stack.push((child, depth + 1));
                }
            }
        }
        height
    }

    /// One line per node in pre-order: key, color and the keys of the
    /// parent and children (`NIL` for the sentinel).
    pub fn dump(&self) -> String
    where
        K: Debug,
    {
        let label = |id: NodeId| match self.key_of(id) {
            Some(key) => format!("{key:?}"),
            None => "NIL".to_string(),
        };

        let mut out = String::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            // Writing into a String cannot fail.
            let _ = writeln!(
                out,
                "Node: {}, Color: {:?}, P: {}, LC: {}, RC: {}",
                label(id),
                node.color(),
                label(node.parent),
                label(node.left),
                label(node.right),
            );
            stack.push(node.right);
            stack.push(node.left);
        }
        out
    }
}
