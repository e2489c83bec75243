//! Generic directed graph container.
//!
//! [`Graph`] is an arena: nodes live in a `Vec` and are addressed by
//! [`NodeIndex`] handles, and every node owns an ordered list of outgoing
//! [`Edge`]s. The container provides:
//!
//! - Structural operations (add, remove, connect, lookup)
//! - Dijkstra shortest paths ([`Graph::shortest_path`] and friends)
//! - Lazy enumeration of all simple paths ([`Graph::all_paths`]) driven by a
//!   caller-supplied [`PathVisitor`]
//!
//! # Index Invariant
//!
//! A node's [`index()`](Node::index) always equals its position in
//! [`nodes()`](Graph::nodes). Removing a node renumbers every later node and
//! re-targets or deletes every edge in the same call, so no handle held by the
//! graph itself is ever stale. Handles held by callers are only valid until the
//! next removal or [`clear()`](Graph::clear).
//!
//! # Example
//!
//! ```
//! use audio_router::graph::Graph;
//!
//! let mut graph: Graph<&str, ()> = Graph::new();
//! let a = graph.add_node("a");
//! let b = graph.add_node("b");
//! let c = graph.add_node("c");
//! graph.connect_nodes(a, b, ());
//! graph.connect_nodes(b, c, ());
//! graph.connect_nodes_weighted(a, c, (), 5);
//!
//! assert_eq!(graph.shortest_path(a, c), Some(vec![a, b, c]));
//! assert_eq!(graph.all_paths(a, c, ()).count(), 2);
//! ```

mod element;
mod paths;
mod shortest;

pub use element::{Edge, ElementStatus, Node, NodeIndex};
pub use paths::{AllPaths, PathVisitor};
pub use shortest::PathPosition;

/// Weight given to edges created with [`Graph::connect_nodes`].
pub const DEFAULT_WEIGHT: u16 = 1;

/// Directed graph with node payload `N` and edge payload `E`.
///
/// Not thread-safe: all mutation (including traversal status updates made by
/// [`all_paths`](Graph::all_paths)) goes through `&mut self`.
#[derive(Debug, Clone)]
pub struct Graph<N, E> {
    nodes: Vec<Node<N>>,
    adjacency: Vec<Vec<Edge<E>>>,
    cyclic: bool,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> Graph<N, E> {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            adjacency: Vec::new(),
            cyclic: false,
        }
    }

    /// Creates a graph holding the given nodes, in order, without edges.
    pub fn from_nodes(payloads: impl IntoIterator<Item = N>) -> Self {
        let mut graph = Self::new();
        for payload in payloads {
            graph.add_node(payload);
        }
        graph
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// All nodes, in index order.
    #[must_use]
    pub fn nodes(&self) -> &[Node<N>] {
        &self.nodes
    }

    /// The node at `index`, if it exists.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> Option<&Node<N>> {
        self.nodes.get(index.0)
    }

    /// Mutable access to the node at `index`, if it exists.
    pub fn node_mut(&mut self, index: NodeIndex) -> Option<&mut Node<N>> {
        self.nodes.get_mut(index.0)
    }

    /// Outgoing edges of `index`, in insertion order. Empty for a dead handle.
    #[must_use]
    pub fn edges(&self, index: NodeIndex) -> &[Edge<E>] {
        self.adjacency.get(index.0).map_or(&[], Vec::as_slice)
    }

    /// Appends a node and returns its handle.
    pub fn add_node(&mut self, payload: N) -> NodeIndex {
        let index = NodeIndex(self.nodes.len());
        self.nodes.push(Node::new(index, payload));
        self.adjacency.push(Vec::new());
        index
    }

    /// Removes a node, every edge pointing at it, and renumbers later nodes.
    ///
    /// Returns the payload, or `None` if `index` is not a live handle.
    /// Runs in O(V + E); for bulk rebuilds prefer [`clear()`](Self::clear)
    /// followed by fresh inserts.
    pub fn remove_node(&mut self, index: NodeIndex) -> Option<N> {
        let position = index.0;
        if position >= self.nodes.len() {
            return None;
        }

        let removed = self.nodes.remove(position);
        self.adjacency.remove(position);

        for edges in &mut self.adjacency {
            edges.retain(|edge| edge.target != index);
            for edge in edges.iter_mut() {
                if edge.target.0 > position {
                    edge.target.0 -= 1;
                }
            }
        }
        for node in &mut self.nodes[position..] {
            node.index.0 -= 1;
        }

        Some(removed.data)
    }

    /// Adds a directed edge with [`DEFAULT_WEIGHT`].
    ///
    /// Duplicate edges are not detected; check with [`has_edge`](Self::has_edge)
    /// first if that matters. Returns false if either handle is dead.
    pub fn connect_nodes(&mut self, from: NodeIndex, to: NodeIndex, data: E) -> bool {
        self.connect_nodes_weighted(from, to, data, DEFAULT_WEIGHT)
    }

    /// Adds a directed edge with an explicit weight.
    pub fn connect_nodes_weighted(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        data: E,
        weight: u16,
    ) -> bool {
        if to.0 >= self.nodes.len() {
            return false;
        }
        let Some(edges) = self.adjacency.get_mut(from.0) else {
            return false;
        };
        edges.push(Edge {
            target: to,
            data,
            weight,
            status: ElementStatus::NotVisited,
        });
        true
    }

    /// First edge from `from` to `to`.
    #[must_use]
    pub fn find_edge(&self, from: NodeIndex, to: NodeIndex) -> Option<&Edge<E>> {
        self.edges(from).iter().find(|edge| edge.target == to)
    }

    /// Returns true if at least one edge goes from `from` to `to`.
    #[must_use]
    pub fn has_edge(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.find_edge(from, to).is_some()
    }

    /// Removes every edge from `from` to `to`. Returns true if any was removed.
    pub fn remove_edge(&mut self, from: NodeIndex, to: NodeIndex) -> bool {
        let Some(edges) = self.adjacency.get_mut(from.0) else {
            return false;
        };
        let before = edges.len();
        edges.retain(|edge| edge.target != to);
        edges.len() != before
    }

    /// Removes every edge, from any node, that points at `to`.
    pub fn remove_edges_to(&mut self, to: NodeIndex) {
        for edges in &mut self.adjacency {
            edges.retain(|edge| edge.target != to);
        }
    }

    /// True if a traversal has observed a cycle since the last
    /// [`clear()`](Self::clear). Not maintained on structural changes.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        self.cyclic
    }

    /// Resets the traversal status of every node and edge. Topology is kept.
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.status = ElementStatus::NotVisited;
        }
        for edge in self.adjacency.iter_mut().flatten() {
            edge.status = ElementStatus::NotVisited;
        }
    }

    /// Removes all nodes and edges.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.adjacency.clear();
        self.cyclic = false;
    }

    /// Calls `f` once per node with its outgoing edges, in index order.
    pub fn trace(&self, mut f: impl FnMut(&Node<N>, &[Edge<E>])) {
        for (node, edges) in self.nodes.iter().zip(&self.adjacency) {
            f(node, edges);
        }
    }

    /// Sums the weights along `path`, using the cheapest edge between each
    /// consecutive pair. `None` if some pair is not connected.
    #[must_use]
    pub fn path_weight(&self, path: &[NodeIndex]) -> Option<u32> {
        path.windows(2).try_fold(0u32, |total, pair| {
            self.edges(pair[0])
                .iter()
                .filter(|edge| edge.target == pair[1])
                .map(|edge| u32::from(edge.weight))
                .min()
                .map(|weight| total.saturating_add(weight))
        })
    }

    pub(crate) fn mark_cyclic(&mut self) {
        self.cyclic = true;
    }
}

impl<N: PartialEq, E> Graph<N, E> {
    /// First node whose payload equals `payload`.
    #[must_use]
    pub fn find_node(&self, payload: &N) -> Option<NodeIndex> {
        self.nodes
            .iter()
            .find(|node| node.data == *payload)
            .map(|node| node.index)
    }

    /// Removes the first node whose payload equals `payload`.
    pub fn remove_node_with(&mut self, payload: &N) -> Option<N> {
        let index = self.find_node(payload)?;
        self.remove_node(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(len: usize) -> (Graph<usize, ()>, Vec<NodeIndex>) {
        let mut graph = Graph::from_nodes(0..len);
        let handles: Vec<_> = (0..len).map(NodeIndex::new).collect();
        for pair in handles.windows(2) {
            graph.connect_nodes(pair[0], pair[1], ());
        }
        (graph, handles)
    }

    fn assert_indices_consistent<N, E>(graph: &Graph<N, E>) {
        for (position, node) in graph.nodes().iter().enumerate() {
            assert_eq!(node.index().get(), position);
        }
        for node in graph.nodes() {
            for edge in graph.edges(node.index()) {
                assert!(edge.target().get() < graph.len());
            }
        }
    }

    #[test]
    fn test_add_node_assigns_positions() {
        let mut graph: Graph<&str, ()> = Graph::new();
        assert!(graph.is_empty());
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        assert_eq!(a.get(), 0);
        assert_eq!(b.get(), 1);
        assert_eq!(graph.node(b).map(|n| *n.data()), Some("b"));
        assert!(graph.node(NodeIndex::new(2)).is_none());
    }

    #[test]
    fn test_remove_node_renumbers_and_drops_edges() {
        let (mut graph, n) = chain(4);
        graph.connect_nodes(n[3], n[1], ());

        assert_eq!(graph.remove_node(n[1]), Some(1));
        assert_indices_consistent(&graph);
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.edge_count(), 1);

        // old node 2 is now at position 1, old node 3 at position 2
        let payloads: Vec<_> = graph.nodes().iter().map(|n| *n.data()).collect();
        assert_eq!(payloads, vec![0, 2, 3]);
        assert!(graph.has_edge(NodeIndex::new(1), NodeIndex::new(2)));
    }

    #[test]
    fn test_remove_node_dead_handle() {
        let (mut graph, _) = chain(2);
        assert_eq!(graph.remove_node(NodeIndex::new(9)), None);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_index_invariant_under_mixed_operations() {
        let mut graph: Graph<u32, ()> = Graph::new();
        for round in 0..6u32 {
            let a = graph.add_node(round * 10);
            let b = graph.add_node(round * 10 + 1);
            graph.connect_nodes(a, b, ());
            graph.connect_nodes(b, NodeIndex::new(0), ());
            if round % 2 == 1 {
                graph.remove_node(NodeIndex::new(0));
            }
            assert_indices_consistent(&graph);
        }
        graph.remove_node_with(&41);
        assert_indices_consistent(&graph);
        assert!(graph.find_node(&41).is_none());
    }

    #[test]
    fn test_connect_rejects_dead_handles() {
        let (mut graph, n) = chain(2);
        assert!(!graph.connect_nodes(n[0], NodeIndex::new(5), ()));
        assert!(!graph.connect_nodes(NodeIndex::new(5), n[0], ()));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_find_and_remove_edge() {
        let (mut graph, n) = chain(3);
        assert!(graph.has_edge(n[0], n[1]));
        assert!(!graph.has_edge(n[1], n[0]));
        assert_eq!(graph.find_edge(n[1], n[2]).map(Edge::weight), Some(DEFAULT_WEIGHT));

        assert!(graph.remove_edge(n[0], n[1]));
        assert!(!graph.remove_edge(n[0], n[1]));
        graph.remove_edges_to(n[2]);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_reset_and_clear() {
        let (mut graph, n) = chain(3);
        if let Some(node) = graph.node_mut(n[1]) {
            node.set_status(ElementStatus::Visited);
        }
        graph.reset();
        assert!(graph
            .nodes()
            .iter()
            .all(|node| node.status() == ElementStatus::NotVisited));
        assert_eq!(graph.len(), 3);

        graph.clear();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_trace_visits_every_node() {
        let (graph, _) = chain(3);
        let mut seen = Vec::new();
        graph.trace(|node, edges| seen.push((*node.data(), edges.len())));
        assert_eq!(seen, vec![(0, 1), (1, 1), (2, 0)]);
    }

    #[test]
    fn test_path_weight() {
        let mut graph: Graph<(), ()> = Graph::from_nodes([(), (), ()]);
        let n: Vec<_> = (0..3).map(NodeIndex::new).collect();
        graph.connect_nodes_weighted(n[0], n[1], (), 4);
        graph.connect_nodes_weighted(n[0], n[1], (), 2);
        graph.connect_nodes_weighted(n[1], n[2], (), 3);
        assert_eq!(graph.path_weight(&n), Some(5));
        assert_eq!(graph.path_weight(&[n[2], n[0]]), None);
    }
}
