//! Builder pattern for `Router`.

use std::sync::Arc;

use crate::routing::{ConnectionFormatChoice, KeepOrder, Router};
use crate::topology::TopologySource;
use crate::{event_callback, EventCallback, RouterConfig, RouterEvent, RoutingError};

/// Builder for configuring a [`Router`].
///
/// Use [`Router::builder()`] to create a new builder.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use audio_router::{ConnectionFormat, InMemoryTopology, PreferFormats, Router};
///
/// let topology = Arc::new(InMemoryTopology::new());
///
/// let router = Router::builder(topology)
///     .max_path_count(3)
///     .max_allowed_cycles(0)
///     .format_choice(PreferFormats::new([ConnectionFormat::STEREO]))
///     .on_event(|e| tracing::debug!(?e, "router event"))
///     .build()
///     .unwrap();
/// assert_eq!(router.max_path_count(), 3);
/// ```
#[must_use]
pub struct RouterBuilder {
    /// Where the graph is loaded from.
    topology: Arc<dyn TopologySource>,
    /// Format ranking strategy.
    format_choice: Arc<dyn ConnectionFormatChoice>,
    /// Search limits.
    config: RouterConfig,
    /// Event callback.
    event_callback: Option<EventCallback>,
}

impl RouterBuilder {
    /// Creates a builder with default settings.
    pub fn new(topology: Arc<dyn TopologySource>) -> Self {
        Self {
            topology,
            format_choice: Arc::new(KeepOrder),
            config: RouterConfig::default(),
            event_callback: None,
        }
    }

    /// Set custom router configuration.
    pub fn with_config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    /// Set how often a path may re-enter a domain.
    ///
    /// Default: 1
    pub fn max_allowed_cycles(mut self, cycles: u32) -> Self {
        self.config.max_allowed_cycles = cycles;
        self
    }

    /// Set the maximum number of routes per query.
    ///
    /// Default: 5
    pub fn max_path_count(mut self, count: usize) -> Self {
        self.config.max_path_count = count;
        self
    }

    /// Set the strategy ranking candidate formats on each hop.
    ///
    /// Default: [`KeepOrder`]
    pub fn format_choice<C: ConnectionFormatChoice + 'static>(mut self, choice: C) -> Self {
        self.format_choice = Arc::new(choice);
        self
    }

    /// Set a callback to receive router events.
    ///
    /// Events include graph rebuilds, rejected paths and resolved queries.
    pub fn on_event<F>(mut self, callback: F) -> Self
    where
        F: Fn(RouterEvent) + Send + Sync + 'static,
    {
        self.event_callback = Some(event_callback(callback));
        self
    }

    /// Validates the builder configuration.
    fn validate(&self) -> Result<(), RoutingError> {
        if self.config.max_path_count == 0 {
            return Err(RoutingError::InvalidConfig {
                reason: "max_path_count must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Creates the router. The graph is not loaded until the first query or
    /// an explicit [`Router::load()`].
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::InvalidConfig`] if `max_path_count` is 0.
    pub fn build(self) -> Result<Router, RoutingError> {
        self.validate()?;
        tracing::debug!(config = ?self.config, "router configured");
        Ok(Router::from_parts(
            self.topology,
            self.format_choice,
            self.config,
            self.event_callback,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryTopology;

    fn builder() -> RouterBuilder {
        RouterBuilder::new(Arc::new(InMemoryTopology::new()))
    }

    #[test]
    fn test_builder_defaults() {
        let router = builder().build().unwrap();
        assert_eq!(router.config(), RouterConfig::default());
        assert!(router.needs_reload());
        assert!(router.graph().is_empty());
    }

    #[test]
    fn test_builder_overrides() {
        let router = builder()
            .with_config(RouterConfig::unlimited_cycles())
            .max_path_count(2)
            .build()
            .unwrap();
        assert!(router.config().cycles_unlimited());
        assert_eq!(router.max_path_count(), 2);
    }

    #[test]
    fn test_builder_rejects_zero_path_count() {
        let err = builder().max_path_count(0).build().unwrap_err();
        assert!(matches!(err, RoutingError::InvalidConfig { .. }));
    }
}
