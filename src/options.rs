/// Upper bound on the number of levels a list may have. Enough for 2^32
/// elements at the default probability.
pub const MAX_LEVEL: usize = 32;

/// Probability that a node is promoted one more level.
pub const DEFAULT_UPGRADE_PROBABILITY: f64 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Number of levels the list allocates sentinels for, `1..=MAX_LEVEL`.
    pub max_height: usize,
    pub upgrade_probability: f64,
    /// Seed for the height generator. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_height: MAX_LEVEL,
            upgrade_probability: DEFAULT_UPGRADE_PROBABILITY,
            seed: None,
        }
    }
}

impl Options {
    pub fn with_seed(seed: u64) -> Self {
        Options {
            seed: Some(seed),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = Options::default();
        assert_eq!(options.max_height, 32);
        assert_eq!(options.upgrade_probability, 0.25);
        assert!(options.seed.is_none());
    }

    #[test]
    fn seeded() {
        let options = Options::with_seed(7);
        assert_eq!(options.seed, Some(7));
        assert_eq!(options.max_height, MAX_LEVEL);
    }
}
