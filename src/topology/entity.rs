//! Snapshots of the entities a topology source reports.

use std::fmt;

use super::{
    ConnectionFormat, ConnectionId, ConverterId, DomainId, GatewayId, SinkId, SourceId,
};

/// Kinds of entity the router places in its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// An audio source.
    Source,
    /// An audio sink.
    Sink,
    /// A cross-domain bridge.
    Gateway,
    /// An intra-domain format adapter.
    Converter,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Source => "source",
            Self::Sink => "sink",
            Self::Gateway => "gateway",
            Self::Converter => "converter",
        })
    }
}

/// An audio source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Source {
    /// Unique id.
    pub id: SourceId,
    /// Domain the source lives in.
    pub domain_id: DomainId,
    /// Human-readable name.
    pub name: String,
    /// Formats the source can emit.
    pub connection_formats: Vec<ConnectionFormat>,
}

impl Source {
    /// Creates an unnamed source.
    pub fn new(
        id: SourceId,
        domain_id: DomainId,
        connection_formats: impl Into<Vec<ConnectionFormat>>,
    ) -> Self {
        Self {
            id,
            domain_id,
            name: String::new(),
            connection_formats: connection_formats.into(),
        }
    }

    /// Sets the name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// An audio sink.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sink {
    /// Unique id.
    pub id: SinkId,
    /// Domain the sink lives in.
    pub domain_id: DomainId,
    /// Human-readable name.
    pub name: String,
    /// Formats the sink can accept.
    pub connection_formats: Vec<ConnectionFormat>,
}

impl Sink {
    /// Creates an unnamed sink.
    pub fn new(
        id: SinkId,
        domain_id: DomainId,
        connection_formats: impl Into<Vec<ConnectionFormat>>,
    ) -> Self {
        Self {
            id,
            domain_id,
            name: String::new(),
            connection_formats: connection_formats.into(),
        }
    }

    /// Sets the name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// A bridge between two domains.
///
/// Audio enters through the gateway's sink (`sink_id`, living in
/// `sink_domain_id`) and leaves through its source (`source_id`, living in
/// `source_domain_id`). `conversion_matrix` has one entry per
/// (source format, sink format) pair, laid out row by source format:
/// entry `s * sink_formats.len() + k` is true when input in `sink_formats[k]`
/// can leave as `source_formats[s]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Gateway {
    /// Unique id.
    pub id: GatewayId,
    /// Human-readable name.
    pub name: String,
    /// Sink side of the gateway.
    pub sink_id: SinkId,
    /// Source side of the gateway.
    pub source_id: SourceId,
    /// Domain of the sink side.
    pub sink_domain_id: DomainId,
    /// Domain of the source side.
    pub source_domain_id: DomainId,
    /// Domain that controls the gateway.
    pub control_domain_id: DomainId,
    /// Formats available on the source side.
    pub source_formats: Vec<ConnectionFormat>,
    /// Formats available on the sink side.
    pub sink_formats: Vec<ConnectionFormat>,
    /// Which input formats convert to which output formats.
    pub conversion_matrix: Vec<bool>,
}

/// A format adapter inside one domain.
///
/// Same sink-in, source-out shape and matrix layout as [`Gateway`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Converter {
    /// Unique id.
    pub id: ConverterId,
    /// Human-readable name.
    pub name: String,
    /// Sink side of the converter.
    pub sink_id: SinkId,
    /// Source side of the converter.
    pub source_id: SourceId,
    /// Domain the converter lives in.
    pub domain_id: DomainId,
    /// Formats available on the source side.
    pub source_formats: Vec<ConnectionFormat>,
    /// Formats available on the sink side.
    pub sink_formats: Vec<ConnectionFormat>,
    /// Which input formats convert to which output formats.
    pub conversion_matrix: Vec<bool>,
}

/// An established (reserved) connection between a source and a sink.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Connection {
    /// Unique id.
    pub id: ConnectionId,
    /// Connected source.
    pub source_id: SourceId,
    /// Connected sink.
    pub sink_id: SinkId,
    /// Format in use.
    pub connection_format: ConnectionFormat,
}

impl Connection {
    /// Returns true if this connection occupies either `source_id` or `sink_id`.
    #[must_use]
    pub fn occupies(&self, source_id: SourceId, sink_id: SinkId) -> bool {
        self.source_id == source_id || self.sink_id == sink_id
    }
}
