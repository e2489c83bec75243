//! Configuration types for the router.

/// Cycle limit that disables the domain revisit check entirely.
pub const UNLIMITED_CYCLES: u32 = u32::MAX;

/// Configuration for route searches.
///
/// Use [`RouterConfig::default()`] for sensible defaults, or customize as needed.
///
/// # Example
///
/// ```
/// use audio_router::RouterConfig;
///
/// let config = RouterConfig {
///     max_path_count: 10,
///     ..Default::default()
/// };
/// assert_eq!(config.max_allowed_cycles, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterConfig {
    /// How many times a path may leave a domain and come back into it.
    ///
    /// `0` forbids re-entering any domain once left. Use [`UNLIMITED_CYCLES`]
    /// to allow unrestricted domain reuse.
    /// Default: 1
    pub max_allowed_cycles: u32,

    /// Maximum number of routes returned by a single query.
    ///
    /// Also bounds how many raw paths are kept before format negotiation.
    /// Must be at least 1.
    /// Default: 5
    pub max_path_count: usize,
}

impl RouterConfig {
    /// Configuration that only bounds the number of results, not domain reuse.
    #[must_use]
    pub fn unlimited_cycles() -> Self {
        Self {
            max_allowed_cycles: UNLIMITED_CYCLES,
            ..Self::default()
        }
    }

    /// Returns true if the domain revisit check is disabled.
    #[must_use]
    pub fn cycles_unlimited(&self) -> bool {
        self.max_allowed_cycles == UNLIMITED_CYCLES
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_allowed_cycles: 1,
            max_path_count: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_config_defaults() {
        let config = RouterConfig::default();
        assert_eq!(config.max_allowed_cycles, 1);
        assert_eq!(config.max_path_count, 5);
        assert!(!config.cycles_unlimited());
    }

    #[test]
    fn test_router_config_unlimited() {
        let config = RouterConfig::unlimited_cycles();
        assert!(config.cycles_unlimited());
        assert_eq!(config.max_path_count, 5);
    }
}
