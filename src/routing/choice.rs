//! Strategies that rank candidate connection formats.

use crate::routing::Route;
use crate::topology::{ConnectionFormat, SinkId, SourceId};
use crate::RoutingError;

/// Ranks the formats a hop could use.
///
/// The router calls this once per hop while negotiating a path, with the
/// hop's source and sink, the route built so far (earlier hops already carry
/// their chosen format) and the candidates in ascending format order. The
/// returned list is tried front to back; formats left out are not tried.
/// A strategy can only reorder or drop candidates: any returned format that
/// was not among them is ignored.
///
/// Closures with the same signature implement the trait.
///
/// # Example
///
/// ```
/// use audio_router::{ConnectionFormat, ConnectionFormatChoice, Route, RoutingError};
/// use audio_router::{SinkId, SourceId};
///
/// // never negotiate analog
/// let digital_only = |_: SourceId, _: SinkId, _: &Route, candidates: Vec<ConnectionFormat>| {
///     Ok::<_, RoutingError>(
///         candidates
///             .into_iter()
///             .filter(|f| *f != ConnectionFormat::ANALOG)
///             .collect::<Vec<_>>(),
///     )
/// };
///
/// let route = Route::new(SourceId::new(1), SinkId::new(2));
/// let ranked = digital_only
///     .choose(
///         SourceId::new(1),
///         SinkId::new(2),
///         &route,
///         vec![ConnectionFormat::STEREO, ConnectionFormat::ANALOG],
///     )
///     .unwrap();
/// assert_eq!(ranked, vec![ConnectionFormat::STEREO]);
/// ```
pub trait ConnectionFormatChoice: Send + Sync {
    /// Returns the candidates to try, best first.
    ///
    /// An error aborts negotiation of the current path.
    fn choose(
        &self,
        source_id: SourceId,
        sink_id: SinkId,
        partial: &Route,
        candidates: Vec<ConnectionFormat>,
    ) -> Result<Vec<ConnectionFormat>, RoutingError>;
}

impl<F> ConnectionFormatChoice for F
where
    F: Fn(SourceId, SinkId, &Route, Vec<ConnectionFormat>) -> Result<Vec<ConnectionFormat>, RoutingError>
        + Send
        + Sync,
{
    fn choose(
        &self,
        source_id: SourceId,
        sink_id: SinkId,
        partial: &Route,
        candidates: Vec<ConnectionFormat>,
    ) -> Result<Vec<ConnectionFormat>, RoutingError> {
        self(source_id, sink_id, partial, candidates)
    }
}

/// Tries candidates in ascending format order. The default strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepOrder;

impl ConnectionFormatChoice for KeepOrder {
    fn choose(
        &self,
        _source_id: SourceId,
        _sink_id: SinkId,
        _partial: &Route,
        candidates: Vec<ConnectionFormat>,
    ) -> Result<Vec<ConnectionFormat>, RoutingError> {
        Ok(candidates)
    }
}

/// Moves preferred formats to the front, in preference order.
///
/// Candidates that are not listed keep their relative order behind them.
#[derive(Debug, Clone, Default)]
pub struct PreferFormats {
    preferred: Vec<ConnectionFormat>,
}

impl PreferFormats {
    /// Creates a strategy preferring `preferred`, most wanted first.
    pub fn new(preferred: impl Into<Vec<ConnectionFormat>>) -> Self {
        Self {
            preferred: preferred.into(),
        }
    }

    fn rank(&self, format: ConnectionFormat) -> usize {
        self.preferred
            .iter()
            .position(|preferred| *preferred == format)
            .unwrap_or(self.preferred.len())
    }
}

impl ConnectionFormatChoice for PreferFormats {
    fn choose(
        &self,
        _source_id: SourceId,
        _sink_id: SinkId,
        _partial: &Route,
        mut candidates: Vec<ConnectionFormat>,
    ) -> Result<Vec<ConnectionFormat>, RoutingError> {
        // stable sort keeps the ascending order among unlisted formats
        candidates.sort_by_key(|format| self.rank(*format));
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choose(strategy: &dyn ConnectionFormatChoice, candidates: &[ConnectionFormat]) -> Vec<ConnectionFormat> {
        let route = Route::new(SourceId::new(1), SinkId::new(2));
        strategy
            .choose(SourceId::new(1), SinkId::new(2), &route, candidates.to_vec())
            .unwrap()
    }

    #[test]
    fn test_keep_order() {
        let candidates = [ConnectionFormat::MONO, ConnectionFormat::STEREO];
        assert_eq!(choose(&KeepOrder, &candidates), candidates.to_vec());
    }

    #[test]
    fn test_prefer_formats() {
        let strategy = PreferFormats::new([ConnectionFormat::ANALOG, ConnectionFormat::STEREO]);
        let ranked = choose(
            &strategy,
            &[
                ConnectionFormat::MONO,
                ConnectionFormat::STEREO,
                ConnectionFormat::ANALOG,
                ConnectionFormat::AUTO,
            ],
        );
        assert_eq!(
            ranked,
            vec![
                ConnectionFormat::ANALOG,
                ConnectionFormat::STEREO,
                ConnectionFormat::MONO,
                ConnectionFormat::AUTO,
            ]
        );
    }
}
