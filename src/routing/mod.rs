//! Domain-aware routing on top of [`Graph`](crate::graph::Graph).
//!
//! The [`Router`] turns a topology snapshot into a [`RoutingGraph`]:
//!
//! - a source feeds every sink of its own domain that shares a format with it
//! - a sink feeds the gateway or converter whose input it is
//! - a gateway or converter feeds the source on its output side
//!
//! A route query enumerates the paths from the requested source node to the
//! requested sink node, keeps the shortest ones and negotiates a
//! [`ConnectionFormat`](crate::ConnectionFormat) for each source/sink hop.
//! The result is a list of [`Route`]s, best first.

mod choice;
pub mod format;
mod load;
mod negotiate;
mod node;
mod route;
mod router;

pub use choice::{ConnectionFormatChoice, KeepOrder, PreferFormats};
pub use node::{RoutingGraph, RoutingNode};
pub use route::{Route, RoutingElement};
pub use router::{insert_position, Router};
