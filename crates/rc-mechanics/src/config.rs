//! Engine configuration.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::compare::TIE_THRESHOLD;

/// Settings shared by every check a session resolves.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// RNG seed for reproducible rolls. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Largest net difference at which two same-band rolls still tie.
    pub tie_threshold: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tie_threshold: TIE_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the tie threshold (negative values clamp to 0).
    pub fn with_tie_threshold(mut self, threshold: i32) -> Self {
        self.tie_threshold = threshold.max(0);
        self
    }

    /// Build the entropy source this configuration describes.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn default_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.tie_threshold, 5);
    }

    #[test]
    fn builder_methods() {
        let cfg = EngineConfig::default().with_seed(123).with_tie_threshold(8);
        assert_eq!(cfg.seed, Some(123));
        assert_eq!(cfg.tie_threshold, 8);
    }

    #[test]
    fn threshold_clamped() {
        let cfg = EngineConfig::default().with_tie_threshold(-3);
        assert_eq!(cfg.tie_threshold, 0);
    }

    #[test]
    fn seeded_rng_replays() {
        let cfg = EngineConfig::default().with_seed(9);
        let a: u32 = cfg.rng().random_range(1..=100);
        let b: u32 = cfg.rng().random_range(1..=100);
        assert_eq!(a, b);
    }
}
