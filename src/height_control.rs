use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::options::{Options, MAX_LEVEL};

/// Source of node heights. A height is the number of levels a node is linked
/// into, so every value returned by `get_height` lies in `1..=max_height()`.
pub trait HeightControl {
    fn max_height(&self) -> usize;
    fn get_height(&mut self) -> usize;
}

pub struct GeometricalGenerator<R> {
    upgrade_probability_: f64,
    max_height_: usize,
    rng_: R,
}

impl<R: Rng> GeometricalGenerator<R> {
    pub fn new(max_height: usize, upgrade_probability: f64, rng: R) -> GeometricalGenerator<R> {
        assert!(max_height > 0 && max_height <= MAX_LEVEL);
        assert!(upgrade_probability > 0.0);
        assert!(upgrade_probability < 1.0);

        GeometricalGenerator {
            upgrade_probability_: upgrade_probability,
            max_height_: max_height,
            rng_: rng,
        }
    }

    pub fn upgrade_probability(&self) -> f64 {
        self.upgrade_probability_
    }
}

impl GeometricalGenerator<StdRng> {
    pub fn from_options(options: &Options) -> GeometricalGenerator<StdRng> {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        GeometricalGenerator::new(options.max_height, options.upgrade_probability, rng)
    }
}

impl<R: Rng> HeightControl for GeometricalGenerator<R> {
    #[inline(always)]
    fn max_height(&self) -> usize {
        self.max_height_
    }

    fn get_height(&mut self) -> usize {
        // Every node lives at level 0. Each further level is a coin toss that
        // succeeds with `upgrade_probability_`, so heights follow a geometric
        // distribution with the tail folded into `max_height_`.
        let mut h = 1;

        while h < self.max_height_ && self.rng_.gen::<f64>() < self.upgrade_probability_ {
            h += 1;
        }

        h
    }
}

// 'SequenceGenerator' replays a fixed list of heights in a loop. Useful to
// build lists of a known shape.
pub struct SequenceGenerator {
    max_height_: usize,
    heights_: Vec<usize>,
    next_: usize,
}

impl SequenceGenerator {
    pub fn new(max_height: usize, heights: Vec<usize>) -> SequenceGenerator {
        assert!(max_height > 0 && max_height <= MAX_LEVEL);
        assert!(!heights.is_empty());

        SequenceGenerator {
            max_height_: max_height,
            heights_: heights,
            next_: 0,
        }
    }
}

impl HeightControl for SequenceGenerator {
    #[inline(always)]
    fn max_height(&self) -> usize {
        self.max_height_
    }

    fn get_height(&mut self) -> usize {
        let height = self.heights_[self.next_];
        self.next_ = (self.next_ + 1) % self.heights_.len();
        height.clamp(1, self.max_height_)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometric_within_bounds() {
        let mut generator = GeometricalGenerator::new(4, 0.9, StdRng::seed_from_u64(1));
        for _ in 0..10_000 {
            let height = generator.get_height();
            assert!((1..=4).contains(&height));
        }
    }

    #[test]
    fn geometric_is_deterministic_under_seed() {
        let mut first = GeometricalGenerator::from_options(&Options::with_seed(42));
        let mut second = GeometricalGenerator::from_options(&Options::with_seed(42));
        let a: Vec<usize> = (0..256).map(|_| first.get_height()).collect();
        let b: Vec<usize> = (0..256).map(|_| second.get_height()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn from_options_carries_settings() {
        let generator = GeometricalGenerator::from_options(&Options::default());
        assert_eq!(generator.upgrade_probability(), 0.25);
        assert_eq!(generator.max_height(), MAX_LEVEL);

        let options = Options {
            max_height: 4,
            upgrade_probability: 0.5,
            seed: Some(1),
        };
        let generator = GeometricalGenerator::from_options(&options);
        assert_eq!(generator.upgrade_probability(), 0.5);
        assert_eq!(generator.max_height(), 4);
    }

    #[test]
    fn geometric_distribution_shape() {
        let mut generator = GeometricalGenerator::from_options(&Options::with_seed(3));
        let samples = 100_000;
        let ones = (0..samples).filter(|_| generator.get_height() == 1).count();
        // P(height = 1) = 1 - p = 0.75
        let ratio = ones as f64 / samples as f64;
        assert!((ratio - 0.75).abs() < 0.01, "ratio {}", ratio);
    }

    #[test]
    fn geometric_single_level() {
        let mut generator = GeometricalGenerator::new(1, 0.99, StdRng::seed_from_u64(9));
        for _ in 0..100 {
            assert_eq!(generator.get_height(), 1);
        }
    }

    #[test]
    #[should_panic]
    fn geometric_rejects_certain_promotion() {
        GeometricalGenerator::new(8, 1.0, StdRng::seed_from_u64(0));
    }

    #[test]
    #[should_panic]
    fn geometric_rejects_oversized_height() {
        GeometricalGenerator::new(MAX_LEVEL + 1, 0.5, StdRng::seed_from_u64(0));
    }

    #[test]
    fn sequence_cycles_and_clamps() {
        let mut generator = SequenceGenerator::new(3, vec![1, 5, 0, 2]);
        let heights: Vec<usize> = (0..6).map(|_| generator.get_height()).collect();
        assert_eq!(heights, vec![1, 3, 1, 2, 1, 3]);
    }
}
