//! Connection format negotiation along one path.
//!
//! A path through the routing graph always reads
//! `Source, Sink, (Gateway | Converter, Source, Sink)*`. Every source/sink
//! pair becomes one hop of the route. Hop 0 may use any format both ends
//! support. A later hop is further limited to what the gateway or converter
//! in front of it can produce from the format chosen for the previous hop.
//!
//! Formats are chosen depth first: a choice on hop `i` is kept only if some
//! choice on every later hop is compatible with it, otherwise the next
//! candidate on hop `i` is tried.

use crate::graph::{Node, NodeIndex};
use crate::routing::format::{possible_connection_formats, restricted_output_formats};
use crate::routing::{ConnectionFormatChoice, Route, RoutingElement, RoutingGraph, RoutingNode};
use crate::topology::{ConnectionFormat, Sink, SinkId, Source, SourceId};
use crate::RoutingError;

/// The gateway or converter feeding a hop.
struct Passage<'a> {
    matrix: &'a [bool],
    source_formats: &'a [ConnectionFormat],
    sink_formats: &'a [ConnectionFormat],
}

impl<'a> Passage<'a> {
    fn of(node: &'a RoutingNode) -> Result<Self, RoutingError> {
        match node {
            RoutingNode::Gateway(gateway) => Ok(Self {
                matrix: &gateway.conversion_matrix,
                source_formats: &gateway.source_formats,
                sink_formats: &gateway.sink_formats,
            }),
            RoutingNode::Converter(converter) => Ok(Self {
                matrix: &converter.conversion_matrix,
                source_formats: &converter.source_formats,
                sink_formats: &converter.sink_formats,
            }),
            other => Err(RoutingError::unknown(format!(
                "expected a gateway or converter on the path, found {other}"
            ))),
        }
    }
}

struct Hop<'a> {
    source: &'a Source,
    sink: &'a Sink,
    via: Option<Passage<'a>>,
}

fn split_hops<'g>(graph: &'g RoutingGraph, path: &[NodeIndex]) -> Result<Vec<Hop<'g>>, RoutingError> {
    let nodes = path
        .iter()
        .map(|&index| {
            graph
                .node(index)
                .map(Node::data)
                .ok_or_else(|| RoutingError::unknown(format!("path refers to missing node {index}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut hops = Vec::new();
    let mut rest = nodes.as_slice();
    let mut via = None;
    loop {
        let [RoutingNode::Source(source), RoutingNode::Sink(sink), tail @ ..] = rest else {
            return Err(RoutingError::unknown(
                "path does not alternate source and sink nodes",
            ));
        };
        hops.push(Hop {
            source,
            sink,
            via: via.take(),
        });
        match tail {
            [] => return Ok(hops),
            [passage, tail @ ..] => {
                via = Some(Passage::of(*passage)?);
                rest = tail;
            }
        }
    }
}

fn skeleton(hops: &[Hop<'_>], source_id: SourceId, sink_id: SinkId) -> Route {
    let mut route = Route::new(source_id, sink_id);
    route.elements = hops
        .iter()
        .map(|hop| RoutingElement {
            source_id: hop.source.id,
            sink_id: hop.sink.id,
            domain_id: hop.sink.domain_id,
            connection_format: ConnectionFormat::UNKNOWN,
        })
        .collect();
    route
}

/// Builds the route for `path` with every hop's format left unknown.
pub(crate) fn route_skeleton(graph: &RoutingGraph, path: &[NodeIndex]) -> Result<Route, RoutingError> {
    let hops = split_hops(graph, path)?;
    let (Some(first), Some(last)) = (hops.first(), hops.last()) else {
        return Err(RoutingError::unknown("empty path"));
    };
    Ok(skeleton(&hops, first.source.id, last.sink.id))
}

struct Negotiation<'a> {
    hops: Vec<Hop<'a>>,
    choice: &'a dyn ConnectionFormatChoice,
    limit: usize,
}

impl Negotiation<'_> {
    fn candidates(&self, hop: usize, route: &Route) -> Result<Vec<ConnectionFormat>, RoutingError> {
        let current = &self.hops[hop];
        let mut formats = possible_connection_formats(
            &current.source.connection_formats,
            &current.sink.connection_formats,
        );
        if let (Some(passage), Some(previous)) = (&current.via, hop.checked_sub(1)) {
            let incoming = route.elements[previous].connection_format;
            let reachable = restricted_output_formats(
                passage.matrix,
                passage.source_formats,
                passage.sink_formats,
                incoming,
            )?;
            formats.retain(|format| reachable.contains(format));
        }
        Ok(formats)
    }

    fn run(&self, hop: usize, route: &mut Route, found: &mut Vec<Route>) -> Result<(), RoutingError> {
        let candidates = self.candidates(hop, route)?;
        let element = route.elements[hop];
        let mut ranked = self.choice.choose(
            element.source_id,
            element.sink_id,
            route,
            candidates.clone(),
        )?;
        ranked.retain(|format| candidates.contains(format));
        tracing::trace!(hop, ?ranked, "format candidates");

        let last = hop + 1 == self.hops.len();
        for format in ranked {
            if found.len() >= self.limit {
                break;
            }
            route.elements[hop].connection_format = format;
            if last {
                found.push(route.clone());
            } else {
                self.run(hop + 1, route, found)?;
            }
        }
        Ok(())
    }
}

/// Every format assignment that is valid on all hops of `path`, at most
/// `limit` of them.
///
/// # Errors
///
/// - [`RoutingError::NotPossible`] if no assignment works
/// - [`RoutingError::Unknown`] if the path or a conversion matrix is malformed
/// - whatever error `choice` returns
pub(crate) fn negotiate_formats(
    graph: &RoutingGraph,
    path: &[NodeIndex],
    choice: &dyn ConnectionFormatChoice,
    limit: usize,
) -> Result<Vec<Route>, RoutingError> {
    let hops = split_hops(graph, path)?;
    let (Some(first), Some(last)) = (hops.first(), hops.last()) else {
        return Err(RoutingError::unknown("empty path"));
    };
    let (source_id, sink_id) = (first.source.id, last.sink.id);

    let mut route = skeleton(&hops, source_id, sink_id);
    let negotiation = Negotiation { hops, choice, limit };
    let mut found = Vec::new();
    negotiation.run(0, &mut route, &mut found)?;

    if found.is_empty() {
        return Err(RoutingError::NotPossible { source_id, sink_id });
    }
    Ok(found)
}
