//! Concrete routes returned to the caller.

use std::fmt;

use crate::topology::{ConnectionFormat, DomainId, SinkId, SourceId};

/// One hop of a route: a source feeding a sink inside one domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoutingElement {
    /// Source side of the hop.
    pub source_id: SourceId,
    /// Sink side of the hop.
    pub sink_id: SinkId,
    /// Domain the hop executes in.
    pub domain_id: DomainId,
    /// Format chosen for the hop.
    pub connection_format: ConnectionFormat,
}

/// A fully resolved path from a source to a sink.
///
/// Routes are plain values and stay valid after the router reloads its graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    /// Source the route starts at.
    pub source_id: SourceId,
    /// Sink the route ends at.
    pub sink_id: SinkId,
    /// Hops, from the source to the sink.
    pub elements: Vec<RoutingElement>,
}

impl Route {
    /// Creates a route with no hops.
    #[must_use]
    pub fn new(source_id: SourceId, sink_id: SinkId) -> Self {
        Self {
            source_id,
            sink_id,
            elements: Vec::new(),
        }
    }

    /// Number of hops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if the route has no hops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Domains the route passes through, one entry per hop.
    pub fn domains(&self) -> impl Iterator<Item = DomainId> + '_ {
        self.elements.iter().map(|element| element.domain_id)
    }

    /// Formats chosen for each hop.
    pub fn formats(&self) -> impl Iterator<Item = ConnectionFormat> + '_ {
        self.elements.iter().map(|element| element.connection_format)
    }
}

impl fmt::Display for RoutingElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}->{} @{} ({})",
            self.source_id, self.sink_id, self.domain_id, self.connection_format
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source {} to sink {}:", self.source_id, self.sink_id)?;
        for element in &self.elements {
            write!(f, " [{element}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_display() {
        let mut route = Route::new(SourceId::new(1), SinkId::new(4));
        route.elements.push(RoutingElement {
            source_id: SourceId::new(1),
            sink_id: SinkId::new(2),
            domain_id: DomainId::new(1),
            connection_format: ConnectionFormat::STEREO,
        });
        assert_eq!(route.len(), 1);
        assert_eq!(
            route.to_string(),
            "source 1 to sink 4: [1->2 @1 (stereo)]"
        );
    }
}
