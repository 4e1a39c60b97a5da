use super::{FeedError, PriceSource};
use std::collections::VecDeque;

/// Replays a fixed sequence of prices
///
/// Used for deterministic scenarios. Once the script runs out,
/// `try_next_price` reports `Exhausted` while `next_price` keeps
/// repeating the last price so the feed stays total.
#[derive(Debug, Clone)]
pub struct ScriptedFeed {
    prices: VecDeque<f64>,
    served: usize,
    last_price: Option<f64>,
}

impl ScriptedFeed {
    pub fn new(prices: impl IntoIterator<Item = f64>) -> Self {
        Self {
            prices: prices.into_iter().collect(),
            served: 0,
            last_price: None,
        }
    }

    pub fn try_next_price(&mut self) -> Result<f64, FeedError> {
        let price = self.prices.pop_front().ok_or(FeedError::Exhausted(self.served))?;
        self.served += 1;
        self.last_price = Some(price);
        Ok(price)
    }

    /// Prices left in the script
    pub fn remaining(&self) -> usize {
        self.prices.len()
    }
}

impl PriceSource for ScriptedFeed {
    fn next_price(&mut self) -> f64 {
        match self.try_next_price() {
            Ok(price) => price,
            Err(e) => {
                tracing::warn!("{}, repeating last price", e);
                self.last_price.unwrap_or(0.0)
            }
        }
    }
}
