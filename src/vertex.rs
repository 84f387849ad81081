use alloc::vec::Vec;

/// Traversal state of a [`Vertex`] during a single sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    NotVisited,
    InProgress,
    Visited,
}

/// A registered node: its key, the caller's payload and its outgoing edges.
///
/// The payload is an `Option` so it can be moved out once the node is emitted.
#[derive(Debug)]
pub struct Vertex<K, T> {
    pub key: K,
    pub payload: Option<T>,
    pub state: State,
    pub dependencies: Vec<K>,
}

impl<K, T> Vertex<K, T> {
    pub fn new(key: K, payload: T) -> Self {
        Vertex {
            key,
            payload: Some(payload),
            state: State::NotVisited,
            dependencies: Vec::new(),
        }
    }
}

impl<K: PartialEq, T> Vertex<K, T> {
    /// Number of dependencies on other nodes, used to order the traversal
    pub fn weight(&self) -> usize {
        self.dependencies
            .iter()
            .filter(|&dependency| dependency != &self.key)
            .count()
    }
}
