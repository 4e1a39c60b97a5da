// Trading strategy module
pub mod threshold;

pub use threshold::ThresholdStrategy;

use crate::models::{AccountStatus, Signal};

/// Everything a strategy sees on a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketContext {
    pub price: f64,
    /// 0.0 while the price window is still filling
    pub moving_average: f64,
    pub account: AccountStatus,
}

/// Base trait for trading strategies
pub trait Strategy {
    /// Decide what to do on this tick
    fn generate_signal(&self, ctx: &MarketContext) -> Signal;

    /// Get strategy name
    fn name(&self) -> &str;
}
