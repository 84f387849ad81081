use core::fmt::Debug;

/// Error type for failures of [`crate::GraphSorter`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error<K: Debug> {
    /// A node depends on a key that was never registered.
    ///
    /// for example, `"a"` depends on `"b"` but only `"a"` was added
    #[error("dependency not found: {node:?} depends on unregistered {dependency:?}")]
    MissingDependency {
        /// Node owning the unresolved edge
        node: K,
        /// Key that could not be resolved
        dependency: K,
    },
    /// A back-edge was found while cycles are not allowed.
    ///
    /// for example, a -> b -> a
    #[error("circular dependency between {from:?} and {to:?}")]
    CyclicDependency {
        /// Node whose edge closes the cycle
        from: K,
        /// In-progress node the edge points back to
        to: K,
    },
    /// An edge was added from a key that is not registered.
    #[error("cannot add a dependency from unregistered node {0:?}")]
    UnknownNode(K),
}

/// Result alias for [`Error`].
pub type Result<T, K> = core::result::Result<T, Error<K>>;
