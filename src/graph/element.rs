//! Node and edge storage types.

use std::fmt;

/// Stable positional handle of a node inside a [`Graph`](super::Graph).
///
/// A handle is valid until the next structural mutation of its graph
/// (node removal or `clear()`); removing a node shifts every later handle
/// down by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    /// Creates a handle for the given position.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the position this handle points at.
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Traversal bookkeeping carried by every node and edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementStatus {
    /// Not touched by the current traversal.
    #[default]
    NotVisited,
    /// On the path currently being explored.
    InProgress,
    /// Fully handled (the origin of an all-paths search stays here while it runs).
    Visited,
}

/// A node: user payload, its current position and its traversal status.
#[derive(Debug, Clone)]
pub struct Node<N> {
    pub(crate) index: NodeIndex,
    pub(crate) data: N,
    pub(crate) status: ElementStatus,
}

impl<N> Node<N> {
    pub(crate) fn new(index: NodeIndex, data: N) -> Self {
        Self {
            index,
            data,
            status: ElementStatus::NotVisited,
        }
    }

    /// Position of this node in its graph.
    #[must_use]
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// The payload.
    #[must_use]
    pub fn data(&self) -> &N {
        &self.data
    }

    /// Mutable access to the payload.
    pub fn data_mut(&mut self) -> &mut N {
        &mut self.data
    }

    /// Current traversal status.
    #[must_use]
    pub fn status(&self) -> ElementStatus {
        self.status
    }

    /// Overrides the traversal status.
    pub fn set_status(&mut self, status: ElementStatus) {
        self.status = status;
    }
}

/// Directed edge, stored in the adjacency list of its origin node.
#[derive(Debug, Clone)]
pub struct Edge<E> {
    pub(crate) target: NodeIndex,
    pub(crate) data: E,
    pub(crate) weight: u16,
    pub(crate) status: ElementStatus,
}

impl<E> Edge<E> {
    /// The node this edge points at.
    #[must_use]
    pub fn target(&self) -> NodeIndex {
        self.target
    }

    /// The payload.
    #[must_use]
    pub fn data(&self) -> &E {
        &self.data
    }

    /// Cost of traversing this edge.
    #[must_use]
    pub fn weight(&self) -> u16 {
        self.weight
    }

    /// Current traversal status.
    #[must_use]
    pub fn status(&self) -> ElementStatus {
        self.status
    }

    /// Overrides the traversal status.
    pub fn set_status(&mut self, status: ElementStatus) {
        self.status = status;
    }
}
