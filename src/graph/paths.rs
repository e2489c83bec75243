//! Depth-first enumeration of simple paths.

use std::iter::FusedIterator;

use super::{ElementStatus, Graph, Node, NodeIndex};

/// Hooks that steer [`Graph::all_paths`].
///
/// `should_visit` prunes a candidate node before it joins the current path.
/// `will_visit` and `did_visit` bracket the time a node spends on the current
/// path, which lets a visitor keep its own stack in sync with the search (the
/// router tracks the domains a path has crossed this way). The destination is
/// bracketed too, around the moment its path is yielded.
///
/// All hooks default to "accept everything, record nothing"; `()` is the
/// no-op visitor.
pub trait PathVisitor<N> {
    /// Returns false to keep `node` off the current path.
    fn should_visit(&mut self, node: &Node<N>) -> bool {
        let _ = node;
        true
    }

    /// Called right before `node` joins the current path.
    fn will_visit(&mut self, node: &Node<N>) {
        let _ = node;
    }

    /// Called right after `node` left the current path.
    fn did_visit(&mut self, node: &Node<N>) {
        let _ = node;
    }
}

impl<N> PathVisitor<N> for () {}

#[derive(Debug)]
struct Frame {
    node: NodeIndex,
    /// Adjacency slot of the parent's edge this node was entered through.
    via: Option<usize>,
    /// Next adjacency slot to try when descending.
    cursor: usize,
    destination_checked: bool,
}

impl Frame {
    fn new(node: NodeIndex, via: Option<usize>) -> Self {
        Self {
            node,
            via,
            cursor: 0,
            destination_checked: false,
        }
    }
}

/// Iterator over every simple path between two nodes.
///
/// Created by [`Graph::all_paths`]. At each node the direct edges are first
/// checked for the destination, then the other neighbours are descended in
/// adjacency order, so shorter detours surface before longer ones along any
/// branch.
///
/// While alive the iterator marks the origin `Visited` and the nodes and edges
/// on the current path `InProgress`; all of them are restored to `NotVisited`
/// when it is exhausted or dropped.
pub struct AllPaths<'g, N, E, V> {
    graph: &'g mut Graph<N, E>,
    destination: NodeIndex,
    visitor: V,
    stack: Vec<Frame>,
    path: Vec<NodeIndex>,
}

impl<N, E> Graph<N, E> {
    /// Lazily enumerates every simple path from `source` to `destination`.
    ///
    /// Yields nothing if either handle is dead or if `source == destination`.
    pub fn all_paths<V: PathVisitor<N>>(
        &mut self,
        source: NodeIndex,
        destination: NodeIndex,
        visitor: V,
    ) -> AllPaths<'_, N, E, V> {
        let mut stack = Vec::new();
        let mut path = Vec::new();
        if source.0 < self.len() && destination.0 < self.len() {
            self.nodes[source.0].status = ElementStatus::Visited;
            stack.push(Frame::new(source, None));
            path.push(source);
        }
        AllPaths {
            graph: self,
            destination,
            visitor,
            stack,
            path,
        }
    }
}

impl<N, E, V: PathVisitor<N>> AllPaths<'_, N, E, V> {
    /// Returns the visitor, e.g. to read state it accumulated.
    pub fn visitor(&self) -> &V {
        &self.visitor
    }

    /// True if `target` may join the current path. Meeting a node that is
    /// already on it means the graph has a cycle.
    fn is_open(&mut self, target: NodeIndex) -> bool {
        if self.graph.nodes[target.0].status == ElementStatus::NotVisited {
            return true;
        }
        self.graph.mark_cyclic();
        false
    }

    fn reach_destination(&mut self, node: NodeIndex) -> Option<Vec<NodeIndex>> {
        let destination = self.destination;
        let reachable = self.graph.adjacency[node.0]
            .iter()
            .any(|edge| edge.target == destination);
        if !reachable || !self.is_open(destination) {
            return None;
        }
        let candidate = &self.graph.nodes[destination.0];
        if !self.visitor.should_visit(candidate) {
            return None;
        }
        self.visitor.will_visit(candidate);
        let mut found = self.path.clone();
        found.push(destination);
        self.visitor.did_visit(candidate);
        Some(found)
    }

    fn next_branch(&mut self, node: NodeIndex, from: usize) -> Option<(usize, NodeIndex)> {
        for slot in from..self.graph.adjacency[node.0].len() {
            let target = self.graph.adjacency[node.0][slot].target;
            if target == self.destination || !self.is_open(target) {
                continue;
            }
            if self.visitor.should_visit(&self.graph.nodes[target.0]) {
                return Some((slot, target));
            }
        }
        None
    }

    fn enter(&mut self, from: NodeIndex, slot: usize, next: NodeIndex) {
        self.graph.adjacency[from.0][slot].status = ElementStatus::InProgress;
        let node = &mut self.graph.nodes[next.0];
        self.visitor.will_visit(node);
        node.status = ElementStatus::InProgress;
        self.path.push(next);
        self.stack.push(Frame::new(next, Some(slot)));
    }

    /// Marks `frame`'s node and the edge leading to it as off the path.
    fn release(&mut self, frame: &Frame) {
        self.graph.nodes[frame.node.0].status = ElementStatus::NotVisited;
        if let (Some(slot), Some(parent)) = (frame.via, self.stack.last()) {
            self.graph.adjacency[parent.node.0][slot].status = ElementStatus::NotVisited;
        }
    }

    fn backtrack(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        self.path.pop();
        self.release(&frame);
        if !self.stack.is_empty() {
            self.visitor.did_visit(&self.graph.nodes[frame.node.0]);
        }
    }
}

impl<N, E, V: PathVisitor<N>> Iterator for AllPaths<'_, N, E, V> {
    type Item = Vec<NodeIndex>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let node = frame.node;

            if !frame.destination_checked {
                frame.destination_checked = true;
                if let Some(found) = self.reach_destination(node) {
                    return Some(found);
                }
                continue;
            }

            let cursor = frame.cursor;
            match self.next_branch(node, cursor) {
                Some((slot, next)) => {
                    if let Some(frame) = self.stack.last_mut() {
                        frame.cursor = slot + 1;
                    }
                    self.enter(node, slot, next);
                }
                None => self.backtrack(),
            }
        }
    }
}

impl<N, E, V: PathVisitor<N>> FusedIterator for AllPaths<'_, N, E, V> {}

impl<N, E, V> Drop for AllPaths<'_, N, E, V> {
    fn drop(&mut self) {
        while let Some(frame) = self.stack.pop() {
            self.graph.nodes[frame.node.0].status = ElementStatus::NotVisited;
            if let (Some(slot), Some(parent)) = (frame.via, self.stack.last()) {
                self.graph.adjacency[parent.node.0][slot].status = ElementStatus::NotVisited;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layered() -> (Graph<char, ()>, Vec<NodeIndex>) {
        // a -> b -> d, a -> c -> d, a -> d, b -> c
        let mut graph = Graph::from_nodes(['a', 'b', 'c', 'd']);
        let n: Vec<_> = (0..4).map(NodeIndex::new).collect();
        graph.connect_nodes(n[0], n[1], ());
        graph.connect_nodes(n[0], n[2], ());
        graph.connect_nodes(n[0], n[3], ());
        graph.connect_nodes(n[1], n[3], ());
        graph.connect_nodes(n[1], n[2], ());
        graph.connect_nodes(n[2], n[3], ());
        (graph, n)
    }

    fn labels(graph: &Graph<char, ()>, path: &[NodeIndex]) -> String {
        path.iter()
            .filter_map(|&i| graph.node(i).map(|n| *n.data()))
            .collect()
    }

    #[test]
    fn test_all_paths_order() {
        let (mut graph, n) = layered();
        let paths: Vec<_> = graph.all_paths(n[0], n[3], ()).collect();
        let names: Vec<_> = paths.iter().map(|p| labels(&graph, p)).collect();
        assert_eq!(names, vec!["ad", "abd", "abcd", "acd"]);
    }

    #[test]
    fn test_all_paths_restores_status() {
        let (mut graph, n) = layered();
        {
            let mut paths = graph.all_paths(n[0], n[3], ());
            assert!(paths.next().is_some());
            assert!(paths.next().is_some());
        }
        assert!(graph
            .nodes()
            .iter()
            .all(|node| node.status() == ElementStatus::NotVisited));

        let _ = graph.all_paths(n[0], n[3], ()).count();
        assert!(graph
            .nodes()
            .iter()
            .all(|node| node.status() == ElementStatus::NotVisited));
    }

    #[test]
    fn test_all_paths_marks_edges_on_current_path() {
        let (mut graph, n) = layered();
        {
            let mut paths = graph.all_paths(n[0], n[3], ());
            assert_eq!(paths.next(), Some(vec![n[0], n[3]]));
            // "abd" is yielded from inside the a -> b branch
            assert_eq!(paths.next(), Some(vec![n[0], n[1], n[3]]));
            let a_to_b = &paths.graph.adjacency[0][0];
            assert_eq!(a_to_b.status(), ElementStatus::InProgress);
            let a_to_c = &paths.graph.adjacency[0][1];
            assert_eq!(a_to_c.status(), ElementStatus::NotVisited);
        }
        assert!(graph
            .nodes()
            .iter()
            .all(|node| graph.edges(node.index()).iter().all(|e| e.status() == ElementStatus::NotVisited)));
    }

    #[test]
    fn test_reset_clears_edge_status() {
        let (mut graph, n) = layered();
        let mut paths = graph.all_paths(n[0], n[3], ());
        paths.next();
        paths.next();
        // leak the marks the way an aborted traversal would
        std::mem::forget(paths);
        assert_eq!(graph.edges(n[0])[0].status(), ElementStatus::InProgress);

        graph.reset();
        assert!(graph
            .nodes()
            .iter()
            .all(|node| node.status() == ElementStatus::NotVisited));
        assert_eq!(graph.edges(n[0])[0].status(), ElementStatus::NotVisited);
    }

    #[test]
    fn test_all_paths_dead_handles_and_self() {
        let (mut graph, n) = layered();
        assert_eq!(graph.all_paths(n[0], NodeIndex::new(9), ()).count(), 0);
        assert_eq!(graph.all_paths(n[0], n[0], ()).count(), 0);
    }

    #[test]
    fn test_all_paths_detects_cycle() {
        let mut graph: Graph<u8, ()> = Graph::from_nodes([0, 1, 2]);
        let n: Vec<_> = (0..3).map(NodeIndex::new).collect();
        graph.connect_nodes(n[0], n[1], ());
        graph.connect_nodes(n[1], n[0], ());
        graph.connect_nodes(n[1], n[2], ());
        assert!(!graph.has_cycles());
        assert_eq!(graph.all_paths(n[0], n[2], ()).count(), 1);
        assert!(graph.has_cycles());
    }

    struct SkipAndRecord {
        skip: char,
        depth: i32,
        max_depth: i32,
    }

    impl PathVisitor<char> for SkipAndRecord {
        fn should_visit(&mut self, node: &Node<char>) -> bool {
            *node.data() != self.skip
        }

        fn will_visit(&mut self, _node: &Node<char>) {
            self.depth += 1;
            self.max_depth = self.max_depth.max(self.depth);
        }

        fn did_visit(&mut self, _node: &Node<char>) {
            self.depth -= 1;
        }
    }

    #[test]
    fn test_visitor_prunes_and_brackets() {
        let (mut graph, n) = layered();
        let visitor = SkipAndRecord {
            skip: 'b',
            depth: 0,
            max_depth: 0,
        };
        let mut paths = graph.all_paths(n[0], n[3], visitor);
        let found: Vec<_> = paths.by_ref().collect();
        assert_eq!(paths.visitor().depth, 0);
        assert_eq!(paths.visitor().max_depth, 2);
        drop(paths);
        let names: Vec<_> = found.iter().map(|p| labels(&graph, p)).collect();
        assert_eq!(names, vec!["ad", "acd"]);
    }
}
