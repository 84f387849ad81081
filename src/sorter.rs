use crate::error::{Error, Result};
use crate::vertex::{State, Vertex};
use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// Orders payloads so every node comes after the nodes it depends on.
///
/// Nodes are registered under a unique key, edges are declared between keys and
/// [`GraphSorter::sort`] consumes the whole graph, returning the payloads in
/// depth first postorder.
///
/// ```
/// use toposort::GraphSorter;
///
/// let mut sorter = GraphSorter::new();
///
/// sorter
///     .add_node("app", "load app")
///     .add_node("core", "load core")
///     .add_node("util", "load util");
///
/// sorter.add_dependency("app", "core").unwrap();
/// sorter.add_dependency("core", "util").unwrap();
///
/// assert_eq!(
///     sorter.sort(),
///     Ok(vec!["load util", "load core", "load app"]),
/// );
/// assert!(sorter.is_empty());
/// ```
///
/// For circular connections the order inside the cycle is undetermined, unless
/// the sorter is created with [`GraphSorter::strict`] in which case the sort fails.
#[derive(Debug)]
pub struct GraphSorter<K, T> {
    vertices: Vec<Vertex<K, T>>,
    index: FxHashMap<K, usize>,
    allow_cycles: bool,
}

impl<K, T> GraphSorter<K, T> {
    /// Create a new sorter that tolerates cycles
    pub fn new() -> Self {
        Self::with_allow_cycles(true)
    }

    /// Create a new sorter that fails on the first cycle it encounters
    pub fn strict() -> Self {
        Self::with_allow_cycles(false)
    }

    /// Create a new sorter with an explicit cycle policy
    pub fn with_allow_cycles(allow_cycles: bool) -> Self {
        GraphSorter {
            vertices: Vec::new(),
            index: FxHashMap::default(),
            allow_cycles,
        }
    }

    /// Create a new sorter that tolerates cycles, with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        GraphSorter {
            vertices: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            allow_cycles: true,
        }
    }

    /// Whether cycles are tolerated during [`GraphSorter::sort`]
    pub fn allows_cycles(&self) -> bool {
        self.allow_cycles
    }

    /// Number of registered nodes
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if no nodes are registered
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Drop all nodes and edges without sorting
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.index.clear();
    }
}

impl<K, T> Default for GraphSorter<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone + Debug, T> GraphSorter<K, T> {
    /// Register a node, replacing any node previously registered under `key`.
    ///
    /// A replaced node keeps its position in the registration order but loses
    /// its dependencies.
    pub fn add_node(&mut self, key: K, payload: T) -> &mut Self {
        let vertex = Vertex::new(key.clone(), payload);

        match self.index.get(&key) {
            Some(&i) => self.vertices[i] = vertex,
            None => {
                self.index.insert(key, self.vertices.len());
                self.vertices.push(vertex);
            }
        }

        self
    }

    /// Check if a node is registered under `key`
    pub fn has_node(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Declare that `from` depends on `to`.
    ///
    /// `from` has to be registered already, `to` only needs to exist by the time
    /// [`GraphSorter::sort`] is called.
    ///
    /// ```
    /// use toposort::{Error, GraphSorter};
    ///
    /// let mut sorter: GraphSorter<&str, ()> = GraphSorter::new();
    ///
    /// assert_eq!(
    ///     sorter.add_dependency("a", "b").err(),
    ///     Some(Error::UnknownNode("a")),
    /// );
    /// ```
    pub fn add_dependency(&mut self, from: K, to: K) -> Result<&mut Self, K> {
        let i = self.position(from)?;
        self.vertices[i].dependencies.push(to);
        Ok(self)
    }

    /// Declare that `from` depends on every key in `to`, in iteration order
    pub fn add_dependencies<I>(&mut self, from: K, to: I) -> Result<&mut Self, K>
    where
        I: IntoIterator<Item = K>,
    {
        let i = self.position(from)?;
        self.vertices[i].dependencies.extend(to);
        Ok(self)
    }

    /// Get the declared dependencies of a node in the order they were added
    pub fn dependencies(&self, key: &K) -> Option<&[K]> {
        self.index
            .get(key)
            .map(|&i| self.vertices[i].dependencies.as_slice())
    }

    /// Sort the graph and return the payloads, leaving the sorter empty.
    ///
    /// Nodes with fewer dependencies are visited first, nodes with an equal
    /// number of dependencies are visited in registration order. Self references
    /// are not counted.
    ///
    /// On failure no payloads are returned and the graph is kept as is, so edges
    /// can be fixed before sorting again.
    pub fn sort(&mut self) -> Result<Vec<T>, K> {
        debug!(
            nodes = self.vertices.len(),
            allow_cycles = self.allow_cycles,
            "sorting graph"
        );

        let mut order: Vec<usize> = (0..self.vertices.len()).collect();
        // stable, ties keep the registration order
        order.sort_by_cached_key(|&i| self.vertices[i].weight());

        let mut result = Vec::with_capacity(self.vertices.len());

        for node in order {
            if self.vertices[node].state == State::NotVisited {
                if let Err(e) = self.visit(node, &mut result) {
                    self.reset_states();
                    return Err(e);
                }
            }
        }

        let sorted: Vec<T> = result
            .into_iter()
            .filter_map(|i| self.vertices[i].payload.take())
            .collect();

        self.clear();

        debug!(sorted = sorted.len(), "sorted graph");

        Ok(sorted)
    }

    fn position(&self, key: K) -> Result<usize, K> {
        match self.index.get(&key) {
            Some(&i) => Ok(i),
            None => Err(Error::UnknownNode(key)),
        }
    }

    fn visit(&mut self, node: usize, result: &mut Vec<usize>) -> Result<(), K> {
        self.vertices[node].state = State::InProgress;

        for edge in 0..self.vertices[node].dependencies.len() {
            let dependency = self.resolve(node, edge)?;

            // self references never block a node
            if dependency == node {
                continue;
            }

            match self.vertices[dependency].state {
                State::Visited => (),
                State::InProgress if !self.allow_cycles => {
                    return Err(Error::CyclicDependency {
                        from: self.vertices[node].key.clone(),
                        to: self.vertices[dependency].key.clone(),
                    });
                }
                State::InProgress => self.settle(node, dependency, result)?,
                State::NotVisited => self.visit(dependency, result)?,
            }
        }

        self.vertices[node].state = State::Visited;
        result.push(node);

        Ok(())
    }

    /// Visit what is left of an in-progress ancestor's dependencies, so as much
    /// of the cycle as possible is emitted before the ancestor itself.
    fn settle(&mut self, node: usize, ancestor: usize, result: &mut Vec<usize>) -> Result<(), K> {
        trace!(
            from = ?self.vertices[node].key,
            to = ?self.vertices[ancestor].key,
            "tolerating circular dependency"
        );

        for edge in 0..self.vertices[ancestor].dependencies.len() {
            let dependency = self.resolve(ancestor, edge)?;

            if self.vertices[dependency].state == State::NotVisited {
                self.visit(dependency, result)?;
            }
        }

        Ok(())
    }

    fn resolve(&self, node: usize, edge: usize) -> Result<usize, K> {
        let vertex = &self.vertices[node];
        let key = &vertex.dependencies[edge];

        self.index
            .get(key)
            .copied()
            .ok_or_else(|| Error::MissingDependency {
                node: vertex.key.clone(),
                dependency: key.clone(),
            })
    }

    fn reset_states(&mut self) {
        for vertex in self.vertices.iter_mut() {
            vertex.state = State::NotVisited;
        }
    }
}
