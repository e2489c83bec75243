//! Error types for audio-router.
//!
//! Errors are split into two categories:
//! - **Request outcomes** ([`RoutingError`]): returned by route queries and
//!   [`Router::load()`](crate::Router::load)
//! - **Collaborator failures** ([`TopologyError`]): raised by a
//!   [`TopologySource`](crate::TopologySource) implementation and folded into
//!   [`RoutingError::Unknown`] at the router boundary
//!
//! "No route exists" is not an error: queries return `Ok` with an empty list.

use crate::topology::{EntityKind, SinkId, SourceId};

/// Errors returned by the router for a single request.
///
/// A failed request never leaves the routing graph half-built or with stale
/// traversal state, so the router stays usable for the next request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutingError {
    /// The requested source or sink is not present in the topology.
    #[error("{kind} {id} does not exist")]
    NonExistent {
        /// Which kind of entity was looked up.
        kind: EntityKind,
        /// Raw id of the entity that wasn't found.
        id: u16,
    },

    /// Candidate paths exist, but no connection format combination is valid
    /// on every hop of any of them.
    #[error("no connection format combination from source {source_id} to sink {sink_id}")]
    NotPossible {
        /// Requested source.
        source_id: SourceId,
        /// Requested sink.
        sink_id: SinkId,
    },

    /// Internal inconsistency, e.g. a malformed conversion matrix or a
    /// topology source that could not be read.
    #[error("routing failed: {reason}")]
    Unknown {
        /// Description of what went wrong.
        reason: String,
    },

    /// The router was built with an unusable configuration.
    #[error("invalid router configuration: {reason}")]
    InvalidConfig {
        /// Which setting is invalid and why.
        reason: String,
    },
}

impl RoutingError {
    /// Creates an [`Unknown`](Self::Unknown) error with the given reason.
    pub fn unknown(reason: impl Into<String>) -> Self {
        Self::Unknown {
            reason: reason.into(),
        }
    }

    /// Creates a [`NonExistent`](Self::NonExistent) error for a source id.
    pub fn no_source(id: SourceId) -> Self {
        Self::NonExistent {
            kind: EntityKind::Source,
            id: id.get(),
        }
    }

    /// Creates a [`NonExistent`](Self::NonExistent) error for a sink id.
    pub fn no_sink(id: SinkId) -> Self {
        Self::NonExistent {
            kind: EntityKind::Sink,
            id: id.get(),
        }
    }
}

impl From<TopologyError> for RoutingError {
    fn from(err: TopologyError) -> Self {
        Self::unknown(err.to_string())
    }
}

/// Errors that can occur within a [`TopologySource`](crate::TopologySource)
/// implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// The backing store could not be read.
    #[error("topology unavailable: {reason}")]
    Unavailable {
        /// Why the store is unavailable.
        reason: String,
    },

    /// Custom error for user-implemented topology sources.
    #[error("{0}")]
    Custom(String),
}

impl TopologyError {
    /// Creates a custom topology error with the given message.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Creates an unavailable error with the given reason.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_existent_display() {
        let err = RoutingError::no_sink(SinkId::new(7));
        assert_eq!(err.to_string(), "sink 7 does not exist");
    }

    #[test]
    fn test_not_possible_display() {
        let err = RoutingError::NotPossible {
            source_id: SourceId::new(1),
            sink_id: SinkId::new(2),
        };
        assert_eq!(
            err.to_string(),
            "no connection format combination from source 1 to sink 2"
        );
    }

    #[test]
    fn test_topology_error_becomes_unknown() {
        let err: RoutingError = TopologyError::unavailable("database closed").into();
        assert_eq!(
            err,
            RoutingError::unknown("topology unavailable: database closed")
        );
    }

    #[test]
    fn test_topology_error_custom() {
        let err = TopologyError::custom("something went wrong");
        assert_eq!(err.to_string(), "something went wrong");
    }
}
