//! Topology entities and the interface the router reads them through.
//!
//! The router never stores entities itself. On every
//! [`load()`](crate::Router::load) it pulls fresh snapshots from a
//! [`TopologySource`], and during `only_free` searches it asks the same source
//! whether a gateway or converter is currently in use.
//!
//! [`InMemoryTopology`] is a complete implementation backed by plain vectors,
//! usable for tests, demos and small embedded systems.

mod entity;
mod ids;
mod memory;

pub use entity::{Connection, Converter, EntityKind, Gateway, Sink, Source};
pub use ids::{
    ConnectionFormat, ConnectionId, ConverterId, DomainId, GatewayId, SinkId, SourceId,
};
pub use memory::InMemoryTopology;

use crate::TopologyError;

/// Read access to the current audio topology.
///
/// Implementations must answer synchronously and must not block on the
/// router: all calls happen on the router's thread, during
/// [`load()`](crate::Router::load) or while a route query runs.
///
/// # Example
///
/// ```
/// use audio_router::{ConnectionFormat, Converter, Gateway, Sink, Source};
/// use audio_router::{SinkId, SourceId, DomainId, TopologySource, TopologyError};
///
/// struct OneSource;
///
/// impl TopologySource for OneSource {
///     fn sources(&self) -> Result<Vec<Source>, TopologyError> {
///         Ok(vec![Source::new(SourceId::new(1), DomainId::new(1), [ConnectionFormat::STEREO])])
///     }
///     fn sinks(&self) -> Result<Vec<Sink>, TopologyError> {
///         Ok(Vec::new())
///     }
///     fn gateways(&self) -> Result<Vec<Gateway>, TopologyError> {
///         Ok(Vec::new())
///     }
///     fn converters(&self) -> Result<Vec<Converter>, TopologyError> {
///         Ok(Vec::new())
///     }
///     fn is_gateway_connected(&self, _gateway: &Gateway) -> bool {
///         false
///     }
///     fn is_converter_connected(&self, _converter: &Converter) -> bool {
///         false
///     }
///     fn source_domain(&self, id: SourceId) -> Option<DomainId> {
///         (id == SourceId::new(1)).then(|| DomainId::new(1))
///     }
///     fn sink_domain(&self, _id: SinkId) -> Option<DomainId> {
///         None
///     }
/// }
/// ```
pub trait TopologySource: Send + Sync {
    /// All registered sources.
    fn sources(&self) -> Result<Vec<Source>, TopologyError>;

    /// All registered sinks.
    fn sinks(&self) -> Result<Vec<Sink>, TopologyError>;

    /// All registered gateways.
    fn gateways(&self) -> Result<Vec<Gateway>, TopologyError>;

    /// All registered converters.
    fn converters(&self) -> Result<Vec<Converter>, TopologyError>;

    /// True if an existing connection uses the gateway's sink or source side.
    fn is_gateway_connected(&self, gateway: &Gateway) -> bool;

    /// True if an existing connection uses the converter's sink or source side.
    fn is_converter_connected(&self, converter: &Converter) -> bool;

    /// Domain that owns the source, if the source exists.
    fn source_domain(&self, id: SourceId) -> Option<DomainId>;

    /// Domain that owns the sink, if the sink exists.
    fn sink_domain(&self, id: SinkId) -> Option<DomainId>;
}
