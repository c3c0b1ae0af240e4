//! Plan configuration.
//!
//! [`PlanConfig`] holds the knobs of the resolution/improvement pipeline.

/// Configuration for building and re-resolving a [`Plan`](crate::plan::Plan).
///
/// # Defaults
///
/// ```
/// use classplan::plan::PlanConfig;
///
/// let config = PlanConfig::default();
/// assert_eq!(config.max_tries, 10);
/// assert_eq!(config.max_resolve_attempts, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use classplan::plan::PlanConfig;
///
/// let config = PlanConfig::default()
///     .with_max_tries(4)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanConfig {
    /// Maximum improvement passes over the roster.
    ///
    /// Each pass revisits every student without a satisfied preference.
    /// Improvement is best-effort; it stops early once every student has
    /// one, or after this many passes regardless.
    pub max_tries: usize,

    /// Maximum random dna vectors tried when resolution hits a dead end.
    ///
    /// Only applies when the dna is drawn internally; a caller-pinned dna
    /// gets exactly one attempt.
    pub max_resolve_attempts: usize,

    /// Let a student join an already-committed preferred partner before
    /// falling back to its dna class.
    ///
    /// Changes resolution outcomes; off by default to keep the dna the
    /// dominant signal.
    pub prioritize_preferences: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            max_tries: 10,
            max_resolve_attempts: 100,
            prioritize_preferences: false,
            seed: None,
        }
    }
}

impl PlanConfig {
    /// Sets the maximum improvement passes.
    pub fn with_max_tries(mut self, n: usize) -> Self {
        self.max_tries = n;
        self
    }

    /// Sets the maximum resolution attempts for internally drawn dna.
    pub fn with_max_resolve_attempts(mut self, n: usize) -> Self {
        self.max_resolve_attempts = n;
        self
    }

    /// Enables or disables preference-priority resolution.
    pub fn with_prioritize_preferences(mut self, on: bool) -> Self {
        self.prioritize_preferences = on;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_resolve_attempts == 0 {
            return Err("max_resolve_attempts must be at least 1".into());
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlanConfig::default();
        assert_eq!(config.max_tries, 10);
        assert_eq!(config.max_resolve_attempts, 100);
        assert!(!config.prioritize_preferences);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = PlanConfig::default()
            .with_max_tries(3)
            .with_max_resolve_attempts(7)
            .with_prioritize_preferences(true)
            .with_seed(9);
        assert_eq!(config.max_tries, 3);
        assert_eq!(config.max_resolve_attempts, 7);
        assert!(config.prioritize_preferences);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let config = PlanConfig::default().with_max_resolve_attempts(0);
        assert!(config.validate().is_err());
    }
}
