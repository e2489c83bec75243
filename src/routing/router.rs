//! The domain-aware router.

use std::fmt;
use std::sync::Arc;

use crate::graph::{Node, NodeIndex, PathVisitor};
use crate::routing::format::should_go_in_domain;
use crate::routing::load::{self, DomainIndex};
use crate::routing::negotiate::{negotiate_formats, route_skeleton};
use crate::routing::{ConnectionFormatChoice, KeepOrder, Route, RoutingGraph, RoutingNode};
use crate::topology::{DomainId, SinkId, SourceId, TopologySource};
use crate::{EventCallback, RouterBuilder, RouterConfig, RouterEvent, RoutingError};

/// Position at which a path of `len` nodes goes into `paths` so the list
/// stays ordered by length.
///
/// The path lands in front of the first strictly longer one, so paths of
/// equal length keep the order they were found in.
#[must_use]
pub fn insert_position<T>(paths: &[Vec<T>], len: usize) -> usize {
    paths
        .iter()
        .position(|path| path.len() > len)
        .unwrap_or(paths.len())
}

/// Keeps a path search inside the domain revisit limit and, in `only_free`
/// mode, away from gateways and converters that are already connected.
/// Paths are cut at `max_len` nodes; `truncated` records whether any were.
struct DomainBound<'a> {
    visited: Vec<DomainId>,
    max_cycles: u32,
    only_free: bool,
    max_len: usize,
    truncated: bool,
    topology: &'a dyn TopologySource,
}

struct SearchBounds {
    source_domain: DomainId,
    max_cycles: u32,
    only_free: bool,
    max_path_count: usize,
}

impl DomainBound<'_> {
    fn in_use(&self, node: &RoutingNode) -> bool {
        match node {
            RoutingNode::Gateway(gateway) => self.topology.is_gateway_connected(gateway),
            RoutingNode::Converter(converter) => self.topology.is_converter_connected(converter),
            RoutingNode::Source(_) | RoutingNode::Sink(_) => false,
        }
    }
}

impl PathVisitor<RoutingNode> for DomainBound<'_> {
    fn should_visit(&mut self, node: &Node<RoutingNode>) -> bool {
        if self.visited.len() >= self.max_len {
            self.truncated = true;
            return false;
        }
        let data = node.data();
        if !should_go_in_domain(&self.visited, data.domain_id(), self.max_cycles) {
            return false;
        }
        !(self.only_free && self.in_use(data))
    }

    fn will_visit(&mut self, node: &Node<RoutingNode>) {
        self.visited.push(node.data().domain_id());
    }

    fn did_visit(&mut self, _node: &Node<RoutingNode>) {
        self.visited.pop();
    }
}

/// Computes concrete routes between sources and sinks.
///
/// The router owns a [`RoutingGraph`] rebuilt from its [`TopologySource`] on
/// [`load()`](Self::load). Route queries search that graph for the shortest
/// structural paths, then negotiate a connection format for every hop.
///
/// # Lifecycle
///
/// A router starts unloaded. [`get_route()`](Self::get_route) loads it on
/// demand; the `*_from_loaded_nodes` and node-handle variants never reload.
/// Call [`invalidate()`](Self::invalidate) whenever the topology changes.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use audio_router::{ConnectionFormat, DomainId, InMemoryTopology, Router};
/// use audio_router::{Sink, SinkId, Source, SourceId};
///
/// let topology = Arc::new(InMemoryTopology::new());
/// let domain = DomainId::new(1);
/// topology.add_source(Source::new(SourceId::new(1), domain, [ConnectionFormat::STEREO]));
/// topology.add_sink(Sink::new(SinkId::new(2), domain, [ConnectionFormat::STEREO]));
///
/// let mut router = Router::new(topology);
/// let routes = router.get_route(false, SourceId::new(1), SinkId::new(2)).unwrap();
/// assert_eq!(routes.len(), 1);
/// assert_eq!(routes[0].elements[0].connection_format, ConnectionFormat::STEREO);
/// ```
pub struct Router {
    topology: Arc<dyn TopologySource>,
    format_choice: Arc<dyn ConnectionFormatChoice>,
    config: RouterConfig,
    graph: RoutingGraph,
    index: DomainIndex,
    needs_reload: bool,
    event_callback: Option<EventCallback>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("config", &self.config)
            .field("nodes", &self.graph.len())
            .field("edges", &self.graph.edge_count())
            .field("needs_reload", &self.needs_reload)
            .finish_non_exhaustive()
    }
}

impl Router {
    /// Creates a router with default configuration and [`KeepOrder`] format choice.
    pub fn new(topology: Arc<dyn TopologySource>) -> Self {
        Self::from_parts(topology, Arc::new(KeepOrder), RouterConfig::default(), None)
    }

    /// Starts configuring a router.
    pub fn builder(topology: Arc<dyn TopologySource>) -> RouterBuilder {
        RouterBuilder::new(topology)
    }

    pub(crate) fn from_parts(
        topology: Arc<dyn TopologySource>,
        format_choice: Arc<dyn ConnectionFormatChoice>,
        config: RouterConfig,
        event_callback: Option<EventCallback>,
    ) -> Self {
        Self {
            topology,
            format_choice,
            config,
            graph: RoutingGraph::new(),
            index: DomainIndex::default(),
            needs_reload: true,
            event_callback,
        }
    }

    fn emit_event(&self, event: RouterEvent) {
        if let Some(callback) = &self.event_callback {
            callback(event);
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> RouterConfig {
        self.config
    }

    /// How often a path may come back into a domain it left.
    #[must_use]
    pub fn max_allowed_cycles(&self) -> u32 {
        self.config.max_allowed_cycles
    }

    /// Sets the domain revisit limit used by [`get_route`](Self::get_route).
    pub fn set_max_allowed_cycles(&mut self, cycles: u32) {
        self.config.max_allowed_cycles = cycles;
    }

    /// Maximum number of routes a query returns.
    #[must_use]
    pub fn max_path_count(&self) -> usize {
        self.config.max_path_count
    }

    /// Sets the result limit used by [`get_route`](Self::get_route).
    pub fn set_max_path_count(&mut self, count: usize) {
        self.config.max_path_count = count;
    }

    /// The current routing graph. Empty until the first load.
    #[must_use]
    pub fn graph(&self) -> &RoutingGraph {
        &self.graph
    }

    /// True if the graph reflects the topology as of the last load.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        !self.needs_reload
    }

    /// True if the graph must be rebuilt before it reflects the topology.
    #[must_use]
    pub fn needs_reload(&self) -> bool {
        self.needs_reload
    }

    /// Marks the graph stale. The next [`get_route`](Self::get_route) reloads.
    pub fn invalidate(&mut self) {
        self.needs_reload = true;
    }

    /// Rebuilds the graph from the topology source.
    ///
    /// On error the router is left cleared, never half-built.
    pub fn load(&mut self) -> Result<(), RoutingError> {
        self.clear();
        let (graph, index) = load::build(self.topology.as_ref()).map_err(|err| {
            tracing::warn!(%err, "failed to load routing graph");
            err
        })?;
        self.graph = graph;
        self.index = index;
        self.needs_reload = false;

        let (nodes, edges) = (self.graph.len(), self.graph.edge_count());
        tracing::debug!(nodes, edges, "routing graph loaded");
        if tracing::enabled!(tracing::Level::TRACE) {
            self.graph.trace(|node, edges| {
                let targets: Vec<_> = edges.iter().map(|edge| edge.target().get()).collect();
                tracing::trace!(index = node.index().get(), node = %node.data(), ?targets, "graph node");
            });
        }
        self.emit_event(RouterEvent::GraphLoaded { nodes, edges });
        Ok(())
    }

    /// Drops the graph and all domain indices.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.index = DomainIndex::default();
        self.needs_reload = true;
    }

    /// Node of the source `id`, optionally only searching `domain`.
    #[must_use]
    pub fn source_node_with_id(&self, id: SourceId, domain: Option<DomainId>) -> Option<NodeIndex> {
        self.index.source_node(&self.graph, id, domain)
    }

    /// Node of the sink `id`, optionally only searching `domain`.
    #[must_use]
    pub fn sink_node_with_id(&self, id: SinkId, domain: Option<DomainId>) -> Option<NodeIndex> {
        self.index.sink_node(&self.graph, id, domain)
    }

    /// Node of the gateway whose sink side is `sink_id`.
    #[must_use]
    pub fn gateway_node_with_sink_id(&self, sink_id: SinkId) -> Option<NodeIndex> {
        self.index.gateway_node_with_sink(&self.graph, sink_id)
    }

    /// Node of the converter whose sink side is `sink_id`.
    #[must_use]
    pub fn converter_node_with_sink_id(
        &self,
        sink_id: SinkId,
        domain: Option<DomainId>,
    ) -> Option<NodeIndex> {
        self.index.converter_node_with_sink(&self.graph, sink_id, domain)
    }

    fn resolve_source(&self, id: SourceId) -> Result<NodeIndex, RoutingError> {
        let domain = self.topology.source_domain(id);
        domain
            .and_then(|domain| self.source_node_with_id(id, Some(domain)))
            .or_else(|| self.source_node_with_id(id, None))
            .ok_or_else(|| RoutingError::no_source(id))
    }

    fn resolve_sink(&self, id: SinkId) -> Result<NodeIndex, RoutingError> {
        let domain = self.topology.sink_domain(id);
        domain
            .and_then(|domain| self.sink_node_with_id(id, Some(domain)))
            .or_else(|| self.sink_node_with_id(id, None))
            .ok_or_else(|| RoutingError::no_sink(id))
    }

    /// Routes from `source_id` to `sink_id`, best first, reloading the graph
    /// first if it is stale.
    ///
    /// `only_free` keeps routes away from gateways and converters that an
    /// existing connection already uses.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::NonExistent`] if either id is unknown
    /// - [`RoutingError::NotPossible`] if paths exist but none can agree on formats
    /// - [`RoutingError::Unknown`] if the topology cannot be read
    ///
    /// No path at all is not an error: the result is empty.
    pub fn get_route(
        &mut self,
        only_free: bool,
        source_id: SourceId,
        sink_id: SinkId,
    ) -> Result<Vec<Route>, RoutingError> {
        if self.needs_reload {
            self.load()?;
        }
        self.get_route_from_loaded_nodes(only_free, source_id, sink_id)
    }

    /// Like [`get_route`](Self::get_route), but uses the graph as it is.
    pub fn get_route_from_loaded_nodes(
        &mut self,
        only_free: bool,
        source_id: SourceId,
        sink_id: SinkId,
    ) -> Result<Vec<Route>, RoutingError> {
        let source = self.resolve_source(source_id)?;
        let sink = self.resolve_sink(sink_id)?;
        let RouterConfig {
            max_allowed_cycles,
            max_path_count,
        } = self.config;
        self.get_first_n_shortest_paths(only_free, max_allowed_cycles, max_path_count, source, sink)
    }

    /// Node paths from `source` to `sink`, shortest first, at most
    /// `max_path_count` of them.
    ///
    /// Searches depth first with a node limit that grows by one per round.
    /// Each round keeps only the paths exactly at the limit, so paths come out
    /// ordered by length with equal lengths in discovery order. The search
    /// stops as soon as enough paths are collected or a round cut nothing off.
    fn shortest_node_paths(
        &mut self,
        bounds: &SearchBounds,
        source: NodeIndex,
        sink: NodeIndex,
    ) -> Vec<Vec<NodeIndex>> {
        let mut paths: Vec<Vec<NodeIndex>> = Vec::new();
        let mut max_len = 2;
        while paths.len() < bounds.max_path_count && max_len <= self.graph.len() {
            let bound = DomainBound {
                visited: vec![bounds.source_domain],
                max_cycles: bounds.max_cycles,
                only_free: bounds.only_free,
                max_len,
                truncated: false,
                topology: self.topology.as_ref(),
            };
            let mut search = self.graph.all_paths(source, sink, bound);
            while paths.len() < bounds.max_path_count {
                let Some(path) = search.next() else {
                    break;
                };
                // shorter ones were collected in earlier rounds
                if path.len() == max_len {
                    let position = insert_position(&paths, path.len());
                    paths.insert(position, path);
                }
            }
            if !search.visitor().truncated {
                break;
            }
            max_len += 1;
        }
        paths
    }

    /// Up to `max_path_count` routes between two graph nodes, fewest hops first.
    ///
    /// Simple paths that respect `max_cycles` (and `only_free`) are collected
    /// shortest first, equal lengths in discovery order; the search stops once
    /// `max_path_count` paths are collected or the search space is exhausted.
    /// Each path then contributes one route per valid format assignment, and
    /// the combined list is cut to `max_path_count`.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::Unknown`] if `source` is not a source node or `sink`
    ///   is not a sink node
    /// - [`RoutingError::NotPossible`] if every path failed negotiation
    pub fn get_first_n_shortest_paths(
        &mut self,
        only_free: bool,
        max_cycles: u32,
        max_path_count: usize,
        source: NodeIndex,
        sink: NodeIndex,
    ) -> Result<Vec<Route>, RoutingError> {
        let Some(RoutingNode::Source(origin)) = self.graph.node(source).map(Node::data) else {
            return Err(RoutingError::unknown(format!("{source} is not a source node")));
        };
        let (source_id, source_domain) = (origin.id, origin.domain_id);
        let Some(RoutingNode::Sink(target)) = self.graph.node(sink).map(Node::data) else {
            return Err(RoutingError::unknown(format!("{sink} is not a sink node")));
        };
        let sink_id = target.id;

        let paths = self.shortest_node_paths(
            &SearchBounds {
                source_domain,
                max_cycles,
                only_free,
                max_path_count,
            },
            source,
            sink,
        );
        tracing::debug!(%source_id, %sink_id, paths = paths.len(), only_free, "candidate paths");

        let mut routes = Vec::new();
        let mut failure = None;
        for path in &paths {
            let budget = max_path_count.saturating_sub(routes.len());
            if budget == 0 {
                break;
            }
            match negotiate_formats(&self.graph, path, self.format_choice.as_ref(), budget) {
                Ok(found) => routes.extend(found),
                Err(err) => {
                    tracing::trace!(%source_id, %sink_id, hops = path.len(), %err, "path rejected");
                    self.emit_event(RouterEvent::PathRejected {
                        source_id,
                        sink_id,
                        hops: path.len() / 3 + 1,
                        reason: err.to_string(),
                    });
                    // the first hard error wins over any NotPossible
                    let replace = match &failure {
                        None => true,
                        Some(RoutingError::NotPossible { .. }) => {
                            !matches!(err, RoutingError::NotPossible { .. })
                        }
                        Some(_) => false,
                    };
                    if replace {
                        failure = Some(err);
                    }
                }
            }
        }

        if routes.is_empty() {
            if let Some(err) = failure {
                tracing::warn!(%source_id, %sink_id, %err, "no usable route");
                return Err(err);
            }
        }
        routes.truncate(max_path_count);
        self.emit_event(RouterEvent::RoutesResolved {
            source_id,
            sink_id,
            paths: paths.len(),
            routes: routes.len(),
        });
        Ok(routes)
    }

    /// Cheapest structural route between two graph nodes, ignoring cycle
    /// limits and connection state. Every hop's format is
    /// [`ConnectionFormat::UNKNOWN`](crate::ConnectionFormat::UNKNOWN).
    ///
    /// Returns `Ok(None)` if the sink is unreachable.
    pub fn get_shortest_path(
        &self,
        source: NodeIndex,
        sink: NodeIndex,
    ) -> Result<Option<Route>, RoutingError> {
        match self.graph.shortest_path(source, sink) {
            Some(path) => route_skeleton(&self.graph, &path).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_position_orders_by_length() {
        let mut paths: Vec<Vec<u8>> = Vec::new();
        assert_eq!(insert_position(&paths, 3), 0);

        paths.push(vec![0; 2]);
        paths.push(vec![0; 5]);
        assert_eq!(insert_position(&paths, 1), 0);
        assert_eq!(insert_position(&paths, 2), 1);
        assert_eq!(insert_position(&paths, 4), 1);
        assert_eq!(insert_position(&paths, 5), 2);
        assert_eq!(insert_position(&paths, 8), 2);
    }
}
