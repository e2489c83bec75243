//! Dijkstra shortest paths.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::{Graph, Node, NodeIndex};

/// Where a node sits on a path reported to a shortest-path visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPosition {
    /// The origin of the path.
    Start,
    /// Any node strictly between origin and target.
    Middle,
    /// The target of the path.
    End,
}

/// Result of one Dijkstra run: best known predecessor of every node.
struct ShortestPathTree {
    source: NodeIndex,
    previous: Vec<Option<NodeIndex>>,
}

impl ShortestPathTree {
    fn path_to(&self, target: NodeIndex) -> Option<Vec<NodeIndex>> {
        if target == self.source {
            return None;
        }
        let mut current = target;
        let mut path = vec![target];
        while let Some(previous) = self.previous.get(current.0).copied().flatten() {
            path.push(previous);
            current = previous;
        }
        if current != self.source {
            return None;
        }
        path.reverse();
        Some(path)
    }
}

impl<N, E> Graph<N, E> {
    fn dijkstra(&self, source: NodeIndex) -> Option<ShortestPathTree> {
        if source.0 >= self.len() {
            return None;
        }

        let mut distance: Vec<Option<u32>> = vec![None; self.len()];
        let mut previous = vec![None; self.len()];
        // (distance, insertion sequence, node): equal distances pop in push order
        let mut queue = BinaryHeap::new();
        let mut sequence: u64 = 0;

        distance[source.0] = Some(0);
        queue.push(Reverse((0u32, sequence, source)));

        while let Some(Reverse((dist, _, node))) = queue.pop() {
            if distance[node.0].is_some_and(|best| dist > best) {
                continue;
            }
            for edge in self.edges(node) {
                let candidate = dist.saturating_add(u32::from(edge.weight));
                let target = edge.target.0;
                if distance[target].map_or(true, |best| candidate < best) {
                    distance[target] = Some(candidate);
                    previous[target] = Some(node);
                    sequence += 1;
                    queue.push(Reverse((candidate, sequence, edge.target)));
                }
            }
        }

        Some(ShortestPathTree { source, previous })
    }

    /// Cheapest path from `source` to `target`, both included.
    ///
    /// Returns `None` if `target` is unreachable, equals `source`, or either
    /// handle is dead.
    #[must_use]
    pub fn shortest_path(&self, source: NodeIndex, target: NodeIndex) -> Option<Vec<NodeIndex>> {
        self.dijkstra(source)?.path_to(target)
    }

    /// Cheapest paths from `source` to each of `targets`, from a single
    /// Dijkstra run. Unreachable targets are omitted, so the result may be
    /// shorter than `targets`.
    #[must_use]
    pub fn shortest_paths(&self, source: NodeIndex, targets: &[NodeIndex]) -> Vec<Vec<NodeIndex>> {
        let Some(tree) = self.dijkstra(source) else {
            return Vec::new();
        };
        targets
            .iter()
            .filter_map(|&target| tree.path_to(target))
            .collect()
    }

    /// Like [`shortest_paths`](Self::shortest_paths), but walks each found
    /// path front to back through `visit` instead of collecting it.
    pub fn shortest_paths_with(
        &self,
        source: NodeIndex,
        targets: &[NodeIndex],
        mut visit: impl FnMut(PathPosition, &Node<N>),
    ) {
        for path in self.shortest_paths(source, targets) {
            let last = path.len() - 1;
            for (step, index) in path.iter().enumerate() {
                let position = match step {
                    0 => PathPosition::Start,
                    s if s == last => PathPosition::End,
                    _ => PathPosition::Middle,
                };
                if let Some(node) = self.node(*index) {
                    visit(position, node);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> (Graph<char, ()>, Vec<NodeIndex>) {
        //   a -1-> b -1-> d
        //   a -1-> c -3-> d
        let mut graph = Graph::from_nodes(['a', 'b', 'c', 'd', 'e']);
        let n: Vec<_> = (0..5).map(NodeIndex::new).collect();
        graph.connect_nodes(n[0], n[1], ());
        graph.connect_nodes(n[0], n[2], ());
        graph.connect_nodes(n[1], n[3], ());
        graph.connect_nodes_weighted(n[2], n[3], (), 3);
        (graph, n)
    }

    #[test]
    fn test_shortest_path_prefers_lower_weight() {
        let (graph, n) = diamond();
        assert_eq!(graph.shortest_path(n[0], n[3]), Some(vec![n[0], n[1], n[3]]));
    }

    #[test]
    fn test_shortest_path_unreachable_and_self() {
        let (graph, n) = diamond();
        assert_eq!(graph.shortest_path(n[0], n[4]), None);
        assert_eq!(graph.shortest_path(n[0], n[0]), None);
        assert_eq!(graph.shortest_path(n[3], n[0]), None);
        assert_eq!(graph.shortest_path(NodeIndex::new(42), n[0]), None);
    }

    #[test]
    fn test_shortest_paths_omits_unreachable() {
        let (graph, n) = diamond();
        let paths = graph.shortest_paths(n[0], &[n[4], n[2], n[3]]);
        assert_eq!(paths, vec![vec![n[0], n[2]], vec![n[0], n[1], n[3]]]);
    }

    #[test]
    fn test_equal_weights_keep_insertion_order() {
        // two equally cheap routes a->b->d and a->c->d; b was queued first
        let mut graph = Graph::from_nodes(['a', 'b', 'c', 'd']);
        let n: Vec<_> = (0..4).map(NodeIndex::new).collect();
        graph.connect_nodes(n[0], n[1], ());
        graph.connect_nodes(n[0], n[2], ());
        graph.connect_nodes(n[2], n[3], ());
        graph.connect_nodes(n[1], n[3], ());
        assert_eq!(graph.shortest_path(n[0], n[3]), Some(vec![n[0], n[1], n[3]]));
    }

    #[test]
    fn test_shortest_paths_with_positions() {
        let (graph, n) = diamond();
        let mut visited = Vec::new();
        graph.shortest_paths_with(n[0], &[n[3]], |position, node| {
            visited.push((position, *node.data()));
        });
        assert_eq!(
            visited,
            vec![
                (PathPosition::Start, 'a'),
                (PathPosition::Middle, 'b'),
                (PathPosition::End, 'd'),
            ]
        );
    }
}
