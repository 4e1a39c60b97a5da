use super::{FeedError, PriceSource};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Random-walk price generator with Gaussian increments
///
/// Each draw adds `Normal(mean, stddev)` to the last price. There is no
/// floor, so a long enough walk can go to zero or below.
#[derive(Debug, Clone)]
pub struct PriceGenerator {
    rng: StdRng,
    distribution: Normal<f64>,
    last_price: f64,
}

impl PriceGenerator {
    /// Create a generator seeded from OS entropy (runs are not reproducible)
    pub fn new(mean: f64, stddev: f64, initial_price: f64) -> Result<Self, FeedError> {
        Self::with_rng(StdRng::from_entropy(), mean, stddev, initial_price)
    }

    /// Create a generator with a fixed seed for reproducibility
    pub fn with_seed(
        seed: u64,
        mean: f64,
        stddev: f64,
        initial_price: f64,
    ) -> Result<Self, FeedError> {
        Self::with_rng(StdRng::seed_from_u64(seed), mean, stddev, initial_price)
    }

    fn with_rng(
        rng: StdRng,
        mean: f64,
        stddev: f64,
        initial_price: f64,
    ) -> Result<Self, FeedError> {
        if !mean.is_finite() || !stddev.is_finite() || stddev < 0.0 {
            return Err(FeedError::InvalidDistribution { mean, stddev });
        }

        let distribution =
            Normal::new(mean, stddev).map_err(|_| FeedError::InvalidDistribution { mean, stddev })?;

        Ok(Self {
            rng,
            distribution,
            last_price: initial_price,
        })
    }

    /// Most recent price (the initial price before the first draw)
    pub fn last_price(&self) -> f64 {
        self.last_price
    }
}

impl PriceSource for PriceGenerator {
    fn next_price(&mut self) -> f64 {
        self.last_price += self.distribution.sample(&mut self.rng);
        self.last_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_generators_are_deterministic() {
        let mut a = PriceGenerator::with_seed(42, 0.0, 1.0, 100.0).unwrap();
        let mut b = PriceGenerator::with_seed(42, 0.0, 1.0, 100.0).unwrap();

        let prices_a: Vec<f64> = (0..50).map(|_| a.next_price()).collect();
        let prices_b: Vec<f64> = (0..50).map(|_| b.next_price()).collect();

        assert_eq!(prices_a, prices_b);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = PriceGenerator::with_seed(1, 0.0, 1.0, 100.0).unwrap();
        let mut b = PriceGenerator::with_seed(2, 0.0, 1.0, 100.0).unwrap();

        let prices_a: Vec<f64> = (0..10).map(|_| a.next_price()).collect();
        let prices_b: Vec<f64> = (0..10).map(|_| b.next_price()).collect();

        assert_ne!(prices_a, prices_b);
    }

    #[test]
    fn test_zero_stddev_walks_by_mean() {
        let mut generator = PriceGenerator::with_seed(7, 0.5, 0.0, 100.0).unwrap();

        assert_eq!(generator.next_price(), 100.5);
        assert_eq!(generator.next_price(), 101.0);
        assert_eq!(generator.last_price(), 101.0);
    }

    #[test]
    fn test_price_is_running_sum_of_increments() {
        let mut generator = PriceGenerator::with_seed(9, 0.0, 1.0, 100.0).unwrap();
        let mut previous = generator.last_price();

        for _ in 0..100 {
            let price = generator.next_price();
            // Increments of a unit normal are essentially never this large
            assert!((price - previous).abs() < 10.0);
            previous = price;
        }
    }

    #[test]
    fn test_rejects_invalid_distribution() {
        assert!(PriceGenerator::new(0.0, -1.0, 100.0).is_err());
        assert!(PriceGenerator::new(f64::NAN, 1.0, 100.0).is_err());
        assert_eq!(
            PriceGenerator::with_seed(1, 0.0, f64::INFINITY, 100.0).unwrap_err(),
            FeedError::InvalidDistribution {
                mean: 0.0,
                stddev: f64::INFINITY
            }
        );
    }

    #[test]
    fn test_entropy_seeded_generator_starts_from_initial_price() {
        let generator = PriceGenerator::new(0.0, 1.0, 100.0).unwrap();
        assert_eq!(generator.last_price(), 100.0);
    }
}
