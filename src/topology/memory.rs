//! Vector-backed topology source.

use parking_lot::RwLock;

use super::{
    Connection, ConnectionId, Converter, DomainId, Gateway, Sink, SinkId, Source, SourceId,
    TopologySource,
};
use crate::TopologyError;

#[derive(Debug, Default)]
struct Entities {
    sources: Vec<Source>,
    sinks: Vec<Sink>,
    gateways: Vec<Gateway>,
    converters: Vec<Converter>,
    connections: Vec<Connection>,
}

/// A [`TopologySource`] that keeps everything in memory.
///
/// All mutators take `&self`, so the topology can be shared with a router
/// through an `Arc` and still be changed by its owner between queries.
/// Call [`Router::invalidate()`](crate::Router::invalidate) after a change
/// so the next [`get_route`](crate::Router::get_route) rebuilds the graph.
///
/// Entities are reported in insertion order. Adding an entity whose id is
/// already present replaces the old one in place.
///
/// # Example
///
/// ```
/// use audio_router::{ConnectionFormat, DomainId, InMemoryTopology, Sink, SinkId};
/// use audio_router::{Source, SourceId, TopologySource};
///
/// let topology = InMemoryTopology::new();
/// let domain = DomainId::new(1);
/// topology.add_source(Source::new(SourceId::new(1), domain, [ConnectionFormat::STEREO]));
/// topology.add_sink(Sink::new(SinkId::new(2), domain, [ConnectionFormat::STEREO]));
///
/// assert_eq!(topology.sources().unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryTopology {
    entities: RwLock<Entities>,
}

fn upsert<T>(list: &mut Vec<T>, item: T, same: impl Fn(&T) -> bool) {
    match list.iter_mut().find(|existing| same(existing)) {
        Some(existing) => *existing = item,
        None => list.push(item),
    }
}

impl InMemoryTopology {
    /// Creates an empty topology.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a source.
    pub fn add_source(&self, source: Source) {
        let id = source.id;
        upsert(&mut self.entities.write().sources, source, |s| s.id == id);
    }

    /// Adds or replaces a sink.
    pub fn add_sink(&self, sink: Sink) {
        let id = sink.id;
        upsert(&mut self.entities.write().sinks, sink, |s| s.id == id);
    }

    /// Adds or replaces a gateway.
    pub fn add_gateway(&self, gateway: Gateway) {
        let id = gateway.id;
        upsert(&mut self.entities.write().gateways, gateway, |g| g.id == id);
    }

    /// Adds or replaces a converter.
    pub fn add_converter(&self, converter: Converter) {
        let id = converter.id;
        upsert(&mut self.entities.write().converters, converter, |c| {
            c.id == id
        });
    }

    /// Records an established connection.
    pub fn add_connection(&self, connection: Connection) {
        let id = connection.id;
        upsert(&mut self.entities.write().connections, connection, |c| {
            c.id == id
        });
    }

    /// Removes a connection. Returns false if it was not present.
    pub fn remove_connection(&self, id: ConnectionId) -> bool {
        let mut entities = self.entities.write();
        let before = entities.connections.len();
        entities.connections.retain(|c| c.id != id);
        entities.connections.len() != before
    }

    /// Removes a source. Returns false if it was not present.
    pub fn remove_source(&self, id: SourceId) -> bool {
        let mut entities = self.entities.write();
        let before = entities.sources.len();
        entities.sources.retain(|s| s.id != id);
        entities.sources.len() != before
    }

    /// Removes a sink. Returns false if it was not present.
    pub fn remove_sink(&self, id: SinkId) -> bool {
        let mut entities = self.entities.write();
        let before = entities.sinks.len();
        entities.sinks.retain(|s| s.id != id);
        entities.sinks.len() != before
    }

    /// Snapshot of the established connections.
    #[must_use]
    pub fn connections(&self) -> Vec<Connection> {
        self.entities.read().connections.clone()
    }

    fn is_occupied(&self, source_id: SourceId, sink_id: SinkId) -> bool {
        self.entities
            .read()
            .connections
            .iter()
            .any(|c| c.occupies(source_id, sink_id))
    }
}

impl TopologySource for InMemoryTopology {
    fn sources(&self) -> Result<Vec<Source>, TopologyError> {
        Ok(self.entities.read().sources.clone())
    }

    fn sinks(&self) -> Result<Vec<Sink>, TopologyError> {
        Ok(self.entities.read().sinks.clone())
    }

    fn gateways(&self) -> Result<Vec<Gateway>, TopologyError> {
        Ok(self.entities.read().gateways.clone())
    }

    fn converters(&self) -> Result<Vec<Converter>, TopologyError> {
        Ok(self.entities.read().converters.clone())
    }

    fn is_gateway_connected(&self, gateway: &Gateway) -> bool {
        self.is_occupied(gateway.source_id, gateway.sink_id)
    }

    fn is_converter_connected(&self, converter: &Converter) -> bool {
        self.is_occupied(converter.source_id, converter.sink_id)
    }

    fn source_domain(&self, id: SourceId) -> Option<DomainId> {
        self.entities
            .read()
            .sources
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.domain_id)
    }

    fn sink_domain(&self, id: SinkId) -> Option<DomainId> {
        self.entities
            .read()
            .sinks
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.domain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConnectionFormat;

    fn gateway() -> Gateway {
        Gateway {
            sink_id: SinkId::new(5),
            source_id: SourceId::new(6),
            ..Default::default()
        }
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let topology = InMemoryTopology::new();
        topology.add_source(Source::new(SourceId::new(1), DomainId::new(1), [ConnectionFormat::MONO]));
        topology.add_source(Source::new(SourceId::new(1), DomainId::new(2), [ConnectionFormat::MONO]));
        topology.add_source(Source::new(SourceId::new(3), DomainId::new(2), [ConnectionFormat::MONO]));

        let sources = topology.sources().unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(topology.source_domain(SourceId::new(1)), Some(DomainId::new(2)));
        assert_eq!(topology.source_domain(SourceId::new(9)), None);
    }

    #[test]
    fn test_gateway_connected_through_either_side() {
        let topology = InMemoryTopology::new();
        let gw = gateway();
        assert!(!topology.is_gateway_connected(&gw));

        topology.add_connection(Connection {
            id: ConnectionId::new(1),
            source_id: SourceId::new(99),
            sink_id: SinkId::new(5),
            ..Default::default()
        });
        assert!(topology.is_gateway_connected(&gw));

        assert!(topology.remove_connection(ConnectionId::new(1)));
        assert!(!topology.remove_connection(ConnectionId::new(1)));
        topology.add_connection(Connection {
            id: ConnectionId::new(2),
            source_id: SourceId::new(6),
            sink_id: SinkId::new(77),
            ..Default::default()
        });
        assert!(topology.is_gateway_connected(&gw));
    }

    #[test]
    fn test_remove_sink() {
        let topology = InMemoryTopology::new();
        topology.add_sink(Sink::new(SinkId::new(4), DomainId::new(1), [ConnectionFormat::STEREO]));
        assert_eq!(topology.sink_domain(SinkId::new(4)), Some(DomainId::new(1)));
        assert!(topology.remove_sink(SinkId::new(4)));
        assert_eq!(topology.sink_domain(SinkId::new(4)), None);
    }
}
