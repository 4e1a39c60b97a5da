// Price sources for the simulator
pub mod generator;
pub mod scripted;

pub use generator::PriceGenerator;
pub use scripted::ScriptedFeed;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedError {
    #[error("invalid price distribution (mean: {mean}, stddev: {stddev})")]
    InvalidDistribution { mean: f64, stddev: f64 },

    #[error("scripted feed exhausted after {0} prices")]
    Exhausted(usize),
}

/// Pull-based price feed consumed by the simulator, one price per tick
pub trait PriceSource {
    fn next_price(&mut self) -> f64;
}

impl<S: PriceSource + ?Sized> PriceSource for &mut S {
    fn next_price(&mut self) -> f64 {
        (**self).next_price()
    }
}
