//! Building the routing graph from a topology snapshot.

use std::collections::BTreeMap;

use crate::graph::{Node, NodeIndex};
use crate::routing::format::{allowed_formats_from_matrix, possible_connection_formats};
use crate::routing::{RoutingGraph, RoutingNode};
use crate::topology::{ConnectionFormat, DomainId, SinkId, SourceId, TopologySource};
use crate::RoutingError;

type DomainMap = BTreeMap<DomainId, Vec<NodeIndex>>;

/// Graph nodes grouped by domain, in insertion order within a domain.
///
/// Gateways are grouped by their control domain.
#[derive(Debug, Default)]
pub(crate) struct DomainIndex {
    sources: DomainMap,
    sinks: DomainMap,
    gateways: DomainMap,
    converters: DomainMap,
}

fn find_in(
    map: &DomainMap,
    domain: Option<DomainId>,
    graph: &RoutingGraph,
    matches: impl Fn(&RoutingNode) -> bool,
) -> Option<NodeIndex> {
    let hit = |index: &&NodeIndex| graph.node(**index).map(Node::data).is_some_and(&matches);
    match domain {
        Some(domain) => map.get(&domain)?.iter().find(hit).copied(),
        None => map.values().flatten().find(hit).copied(),
    }
}

impl DomainIndex {
    pub(crate) fn source_node(
        &self,
        graph: &RoutingGraph,
        id: SourceId,
        domain: Option<DomainId>,
    ) -> Option<NodeIndex> {
        find_in(&self.sources, domain, graph, |node| {
            node.as_source().is_some_and(|source| source.id == id)
        })
    }

    pub(crate) fn sink_node(
        &self,
        graph: &RoutingGraph,
        id: SinkId,
        domain: Option<DomainId>,
    ) -> Option<NodeIndex> {
        find_in(&self.sinks, domain, graph, |node| {
            node.as_sink().is_some_and(|sink| sink.id == id)
        })
    }

    pub(crate) fn gateway_node_with_sink(
        &self,
        graph: &RoutingGraph,
        sink_id: SinkId,
    ) -> Option<NodeIndex> {
        find_in(&self.gateways, None, graph, |node| {
            node.as_gateway().is_some_and(|gateway| gateway.sink_id == sink_id)
        })
    }

    pub(crate) fn converter_node_with_sink(
        &self,
        graph: &RoutingGraph,
        sink_id: SinkId,
        domain: Option<DomainId>,
    ) -> Option<NodeIndex> {
        find_in(&self.converters, domain, graph, |node| {
            node.as_converter()
                .is_some_and(|converter| converter.sink_id == sink_id)
        })
    }
}

/// Reads the whole topology and builds a fresh graph plus its domain index.
///
/// Every entity list is fetched before the first node is added, so an
/// unreadable topology produces an error and no graph at all.
pub(crate) fn build(
    topology: &dyn TopologySource,
) -> Result<(RoutingGraph, DomainIndex), RoutingError> {
    let sources = topology.sources()?;
    let sinks = topology.sinks()?;
    let gateways = topology.gateways()?;
    let converters = topology.converters()?;

    let mut graph = RoutingGraph::new();
    let mut index = DomainIndex::default();

    for source in sources {
        let domain = source.domain_id;
        let node = graph.add_node(RoutingNode::Source(source));
        index.sources.entry(domain).or_default().push(node);
    }
    for sink in sinks {
        let domain = sink.domain_id;
        let node = graph.add_node(RoutingNode::Sink(sink));
        index.sinks.entry(domain).or_default().push(node);
    }
    for gateway in gateways {
        let domain = gateway.control_domain_id;
        let node = graph.add_node(RoutingNode::Gateway(gateway));
        index.gateways.entry(domain).or_default().push(node);
    }
    for converter in converters {
        let domain = converter.domain_id;
        let node = graph.add_node(RoutingNode::Converter(converter));
        index.converters.entry(domain).or_default().push(node);
    }

    let mut edges = converter_edges(&graph, &index);
    edges.extend(gateway_edges(&graph, &index));
    edges.extend(source_sink_edges(&graph, &index));
    for (from, to, domain) in edges {
        graph.connect_nodes(from, to, domain);
    }

    Ok((graph, index))
}

type PendingEdge = (NodeIndex, NodeIndex, DomainId);

/// True if the element can pass audio in at least one format combination.
fn passes_audio(
    node: &RoutingNode,
    matrix: &[bool],
    source_formats: &[ConnectionFormat],
    sink_formats: &[ConnectionFormat],
) -> bool {
    match allowed_formats_from_matrix(matrix, source_formats, sink_formats) {
        Ok(conversions) => !conversions.is_empty(),
        Err(err) => {
            tracing::warn!(%node, %err, "skipping element with unusable conversion matrix");
            false
        }
    }
}

/// converter sink side -> converter -> converter source side
fn converter_edges(graph: &RoutingGraph, index: &DomainIndex) -> Vec<PendingEdge> {
    let mut edges = Vec::new();
    for &node in index.converters.values().flatten() {
        let Some(data) = graph.node(node).map(Node::data) else {
            continue;
        };
        let Some(converter) = data.as_converter() else {
            continue;
        };
        if !passes_audio(
            data,
            &converter.conversion_matrix,
            &converter.source_formats,
            &converter.sink_formats,
        ) {
            continue;
        }
        let domain = converter.domain_id;
        let sink = index.sink_node(graph, converter.sink_id, Some(domain));
        let source = index.source_node(graph, converter.source_id, Some(domain));
        if let (Some(sink), Some(source)) = (sink, source) {
            edges.push((sink, node, domain));
            edges.push((node, source, domain));
        } else {
            tracing::trace!(%data, "converter endpoints not registered");
        }
    }
    edges
}

/// gateway sink side -> gateway -> gateway source side, across domains
fn gateway_edges(graph: &RoutingGraph, index: &DomainIndex) -> Vec<PendingEdge> {
    let mut edges = Vec::new();
    for &node in index.gateways.values().flatten() {
        let Some(data) = graph.node(node).map(Node::data) else {
            continue;
        };
        let Some(gateway) = data.as_gateway() else {
            continue;
        };
        if !passes_audio(
            data,
            &gateway.conversion_matrix,
            &gateway.source_formats,
            &gateway.sink_formats,
        ) {
            continue;
        }
        let sink = index.sink_node(graph, gateway.sink_id, Some(gateway.sink_domain_id));
        let source = index.source_node(graph, gateway.source_id, Some(gateway.source_domain_id));
        if let (Some(sink), Some(source)) = (sink, source) {
            edges.push((sink, node, gateway.sink_domain_id));
            edges.push((node, source, gateway.source_domain_id));
        } else {
            tracing::trace!(%data, "gateway endpoints not registered");
        }
    }
    edges
}

/// source -> sink inside one domain, when they share a format
fn source_sink_edges(graph: &RoutingGraph, index: &DomainIndex) -> Vec<PendingEdge> {
    let mut edges = Vec::new();
    for (&domain, sources) in &index.sources {
        let Some(sinks) = index.sinks.get(&domain) else {
            continue;
        };
        for &source_node in sources {
            let Some(source) = graph.node(source_node).and_then(|n| n.data().as_source()) else {
                continue;
            };
            for &sink_node in sinks {
                let Some(sink) = graph.node(sink_node).and_then(|n| n.data().as_sink()) else {
                    continue;
                };
                if !possible_connection_formats(&source.connection_formats, &sink.connection_formats)
                    .is_empty()
                {
                    edges.push((source_node, sink_node, domain));
                }
            }
        }
    }
    edges
}
