/// Construction-time settings for a [`crate::Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    /// Number of node slots reserved when the first node is allocated.
    pub initial_capacity: usize,
    /// Upper bound on live nodes; `None` means bounded only by memory.
    pub max_nodes: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            initial_capacity: 16,
            max_nodes: None,
        }
    }
}

impl TreeConfig {
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }
}
