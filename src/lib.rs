//! # audio-router
//!
//! **Note:** This crate is under active development. The API may change before 1.0.
//!
//! Routing core for multi-domain audio systems.
//!
//! An automotive audio system is split into *domains* (an amplifier, a head
//! unit, a DSP), each with its own sources and sinks. *Gateways* carry audio
//! across domains and *converters* change its format inside one. Given a
//! source and a sink, `audio-router` finds which chains of elements connect
//! them and which connection format every hop should use.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use audio_router::{ConnectionFormat, DomainId, Gateway, GatewayId, InMemoryTopology};
//! use audio_router::{Router, Sink, SinkId, Source, SourceId};
//!
//! let (radio, amp) = (DomainId::new(1), DomainId::new(2));
//! let stereo = ConnectionFormat::STEREO;
//!
//! let topology = Arc::new(InMemoryTopology::new());
//! topology.add_source(Source::new(SourceId::new(1), radio, [stereo]).named("tuner"));
//! topology.add_sink(Sink::new(SinkId::new(2), radio, [stereo]));
//! topology.add_source(Source::new(SourceId::new(3), amp, [stereo]));
//! topology.add_sink(Sink::new(SinkId::new(4), amp, [stereo]).named("speakers"));
//! topology.add_gateway(Gateway {
//!     id: GatewayId::new(1),
//!     sink_id: SinkId::new(2),
//!     source_id: SourceId::new(3),
//!     sink_domain_id: radio,
//!     source_domain_id: amp,
//!     control_domain_id: radio,
//!     source_formats: vec![stereo],
//!     sink_formats: vec![stereo],
//!     conversion_matrix: vec![true],
//!     ..Default::default()
//! });
//!
//! let mut router = Router::builder(topology)
//!     .on_event(|e| tracing::debug!(?e, "router event"))
//!     .build()?;
//!
//! let routes = router.get_route(false, SourceId::new(1), SinkId::new(4))?;
//! assert_eq!(routes.len(), 1);
//! assert_eq!(routes[0].elements.len(), 2);
//! # Ok::<(), audio_router::RoutingError>(())
//! ```
//!
//! ## Architecture
//!
//! The crate is layered:
//!
//! - **[`graph`]**: a generic directed graph with shortest-path and
//!   all-paths search, knowing nothing about audio
//! - **[`topology`]**: entity types and the [`TopologySource`] trait the
//!   router reads them through
//! - **[`routing`]**: the [`Router`], which builds a graph from the topology,
//!   searches it under domain-revisit limits and negotiates formats
//!
//! The router is synchronous and single-threaded. Wrap it in a mutex if
//! several threads need to query it.

#![warn(missing_docs)]
// Entity ids are u16 and graph sizes usize; conversions between them are bounded
#![allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
// unwrap/expect allowed in tests only
#![allow(clippy::unwrap_used)]
// These doc lints are too strict for internal implementation details
#![allow(clippy::missing_panics_doc, clippy::missing_errors_doc)]

mod builder;
mod config;
mod error;
mod event;
pub mod graph;
pub mod routing;
pub mod topology;

pub use builder::RouterBuilder;
pub use config::{RouterConfig, UNLIMITED_CYCLES};
pub use error::{RoutingError, TopologyError};
pub use event::{event_callback, EventCallback, RouterEvent};
pub use routing::{
    ConnectionFormatChoice, KeepOrder, PreferFormats, Route, Router, RoutingElement,
    RoutingGraph, RoutingNode,
};
pub use topology::{
    Connection, ConnectionFormat, ConnectionId, Converter, ConverterId, DomainId, EntityKind,
    Gateway, GatewayId, InMemoryTopology, Sink, SinkId, Source, SourceId, TopologySource,
};
