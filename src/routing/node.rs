//! Node payload of the routing graph.

use std::fmt;

use crate::graph::Graph;
use crate::topology::{Converter, DomainId, EntityKind, Gateway, Sink, Source};

/// The graph the router builds: entity nodes, edges labelled with the domain
/// the hop happens in.
pub type RoutingGraph = Graph<RoutingNode, DomainId>;

/// One entity placed in the routing graph.
///
/// Two nodes are equal when they have the same kind and the same entity id;
/// the rest of the snapshot is ignored.
#[derive(Debug, Clone)]
pub enum RoutingNode {
    /// An audio source.
    Source(Source),
    /// An audio sink.
    Sink(Sink),
    /// A cross-domain gateway.
    Gateway(Gateway),
    /// An intra-domain converter.
    Converter(Converter),
}

impl RoutingNode {
    /// Which kind of entity this node holds.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Source(_) => EntityKind::Source,
            Self::Sink(_) => EntityKind::Sink,
            Self::Gateway(_) => EntityKind::Gateway,
            Self::Converter(_) => EntityKind::Converter,
        }
    }

    /// Domain the node belongs to. A gateway belongs to its control domain.
    #[must_use]
    pub fn domain_id(&self) -> DomainId {
        match self {
            Self::Source(source) => source.domain_id,
            Self::Sink(sink) => sink.domain_id,
            Self::Gateway(gateway) => gateway.control_domain_id,
            Self::Converter(converter) => converter.domain_id,
        }
    }

    /// Raw id of the wrapped entity.
    #[must_use]
    pub fn raw_id(&self) -> u16 {
        match self {
            Self::Source(source) => source.id.get(),
            Self::Sink(sink) => sink.id.get(),
            Self::Gateway(gateway) => gateway.id.get(),
            Self::Converter(converter) => converter.id.get(),
        }
    }

    /// True for gateways and converters.
    #[must_use]
    pub fn is_conversion(&self) -> bool {
        matches!(self, Self::Gateway(_) | Self::Converter(_))
    }

    /// The source, if this is a source node.
    #[must_use]
    pub fn as_source(&self) -> Option<&Source> {
        match self {
            Self::Source(source) => Some(source),
            _ => None,
        }
    }

    /// The sink, if this is a sink node.
    #[must_use]
    pub fn as_sink(&self) -> Option<&Sink> {
        match self {
            Self::Sink(sink) => Some(sink),
            _ => None,
        }
    }

    /// The gateway, if this is a gateway node.
    #[must_use]
    pub fn as_gateway(&self) -> Option<&Gateway> {
        match self {
            Self::Gateway(gateway) => Some(gateway),
            _ => None,
        }
    }

    /// The converter, if this is a converter node.
    #[must_use]
    pub fn as_converter(&self) -> Option<&Converter> {
        match self {
            Self::Converter(converter) => Some(converter),
            _ => None,
        }
    }
}

impl PartialEq for RoutingNode {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.raw_id() == other.raw_id()
    }
}

impl Eq for RoutingNode {}

impl fmt::Display for RoutingNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (domain {})",
            self.kind(),
            self.raw_id(),
            self.domain_id()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{ConnectionFormat, GatewayId, SinkId, SourceId};

    #[test]
    fn test_equality_ignores_snapshot_details() {
        let a = RoutingNode::Source(Source::new(
            SourceId::new(3),
            DomainId::new(1),
            [ConnectionFormat::MONO],
        ));
        let b = RoutingNode::Source(Source::new(
            SourceId::new(3),
            DomainId::new(2),
            [ConnectionFormat::STEREO],
        ));
        let c = RoutingNode::Sink(Sink::new(SinkId::new(3), DomainId::new(1), Vec::new()));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_gateway_domain_is_control_domain() {
        let node = RoutingNode::Gateway(Gateway {
            id: GatewayId::new(8),
            sink_domain_id: DomainId::new(1),
            source_domain_id: DomainId::new(2),
            control_domain_id: DomainId::new(3),
            ..Default::default()
        });
        assert_eq!(node.domain_id(), DomainId::new(3));
        assert!(node.is_conversion());
        assert_eq!(node.to_string(), "gateway 8 (domain 3)");
    }
}
