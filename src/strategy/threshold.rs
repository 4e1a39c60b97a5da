use super::{MarketContext, Strategy};
use crate::models::Signal;

/// Moving-average band strategy
///
/// Buys when the price falls below `buy_factor * moving_average` and there is
/// cash for at least one share; sells everything when the price rises above
/// `sell_factor * moving_average`. Buy is checked first.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdStrategy {
    pub buy_factor: f64,
    pub sell_factor: f64,
}

impl Default for ThresholdStrategy {
    fn default() -> Self {
        Self {
            buy_factor: 0.9,  // 10% below the average
            sell_factor: 1.1, // 10% above the average
        }
    }
}

impl Strategy for ThresholdStrategy {
    fn generate_signal(&self, ctx: &MarketContext) -> Signal {
        let price = ctx.price;

        if price < ctx.moving_average * self.buy_factor && ctx.account.funds >= price {
            Signal::Buy
        } else if price > ctx.moving_average * self.sell_factor && ctx.account.shares_owned > 0 {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }

    fn name(&self) -> &str {
        "MA Threshold"
    }
}
