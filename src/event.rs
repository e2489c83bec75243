//! Router events for monitoring graph rebuilds and route resolution.
//!
//! Events are non-fatal notifications. They're for logging/metrics, not
//! error handling: the outcome of a request is always its return value.

use std::sync::Arc;

use crate::topology::{SinkId, SourceId};

/// Events emitted by a [`Router`](crate::Router).
///
/// # Example
///
/// ```
/// use audio_router::RouterEvent;
///
/// fn handle_event(event: RouterEvent) {
///     match event {
///         RouterEvent::GraphLoaded { nodes, edges } => {
///             eprintln!("graph rebuilt: {} nodes, {} edges", nodes, edges);
///         }
///         RouterEvent::PathRejected { source_id, sink_id, hops, reason } => {
///             eprintln!("{} -> {} ({} hops) rejected: {}", source_id, sink_id, hops, reason);
///         }
///         RouterEvent::RoutesResolved { source_id, sink_id, paths, routes } => {
///             eprintln!("{} -> {}: {} routes from {} paths", source_id, sink_id, routes, paths);
///         }
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterEvent {
    /// The routing graph was rebuilt from the topology source.
    GraphLoaded {
        /// Number of nodes in the new graph.
        nodes: usize,
        /// Number of edges in the new graph.
        edges: usize,
    },

    /// A structural path was found but no connection format combination
    /// is valid along it. The path contributes no routes.
    PathRejected {
        /// Requested source.
        source_id: SourceId,
        /// Requested sink.
        sink_id: SinkId,
        /// Number of source/sink hops on the rejected path.
        hops: usize,
        /// Why negotiation failed.
        reason: String,
    },

    /// A route query finished successfully.
    RoutesResolved {
        /// Requested source.
        source_id: SourceId,
        /// Requested sink.
        sink_id: SinkId,
        /// Structural paths considered.
        paths: usize,
        /// Concrete routes returned.
        routes: usize,
    },
}

/// Callback type for receiving router events.
///
/// Register one via [`RouterBuilder::on_event()`].
///
/// [`RouterBuilder::on_event()`]: crate::RouterBuilder::on_event
pub type EventCallback = Arc<dyn Fn(RouterEvent) + Send + Sync>;

/// Creates an [`EventCallback`] from a closure.
///
/// # Example
///
/// ```
/// use audio_router::{event_callback, RouterEvent};
///
/// let callback = event_callback(|event| {
///     println!("Got event: {:?}", event);
/// });
/// callback(RouterEvent::GraphLoaded { nodes: 0, edges: 0 });
/// ```
pub fn event_callback<F>(f: F) -> EventCallback
where
    F: Fn(RouterEvent) + Send + Sync + 'static,
{
    Arc::new(f)
}
