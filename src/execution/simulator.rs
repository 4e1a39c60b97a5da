use super::{Account, PriceWindow};
use crate::market::PriceSource;
use crate::models::{AccountStatus, PositionState, Signal, TradeEvent};
use crate::strategy::{MarketContext, Strategy, ThresholdStrategy};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("tick {tick}: price {price} is not a positive finite number")]
    InvalidPrice { tick: usize, price: f64 },

    #[error("window size must be at least 1")]
    InvalidWindowSize,
}

/// Single-instrument moving-average trading simulator
///
/// Pulls one price per tick from its source, keeps the last `window_size`
/// prices and lets the strategy decide whether to buy, sell or hold.
pub struct TradingSimulator<S, St = ThresholdStrategy> {
    source: S,
    strategy: St,
    window: PriceWindow,
    account: Account,
    strict_prices: bool,
    ticks: usize,
    last_price: Option<f64>,
}

impl<S: PriceSource> TradingSimulator<S> {
    /// Create a simulator with the default 10% band strategy
    pub fn new(window_size: usize, source: S, initial_funds: f64) -> Result<Self, SimulationError> {
        Self::with_strategy(window_size, source, initial_funds, ThresholdStrategy::default())
    }
}

impl<S: PriceSource, St: Strategy> TradingSimulator<S, St> {
    pub fn with_strategy(
        window_size: usize,
        source: S,
        initial_funds: f64,
        strategy: St,
    ) -> Result<Self, SimulationError> {
        if window_size == 0 {
            return Err(SimulationError::InvalidWindowSize);
        }

        Ok(Self {
            source,
            strategy,
            window: PriceWindow::new(window_size),
            account: Account::new(initial_funds),
            strict_prices: false,
            ticks: 0,
            last_price: None,
        })
    }

    /// Reject non-positive or non-finite prices instead of trading on them
    pub fn strict_prices(mut self, strict: bool) -> Self {
        self.strict_prices = strict;
        self
    }

    /// Run one tick: pull a price, update the window, maybe trade
    ///
    /// In strict mode a bad price returns `InvalidPrice` and leaves the
    /// window and account untouched.
    pub fn tick(&mut self) -> Result<Option<TradeEvent>, SimulationError> {
        let tick = self.ticks + 1;
        let current_price = self.source.next_price();

        if !(current_price > 0.0 && current_price.is_finite()) {
            if self.strict_prices {
                return Err(SimulationError::InvalidPrice {
                    tick,
                    price: current_price,
                });
            }
            tracing::warn!(tick, price = current_price, "Trading on non-positive price");
        }

        self.ticks = tick;
        self.last_price = Some(current_price);
        self.window.push(current_price);

        let ctx = MarketContext {
            price: current_price,
            moving_average: self.moving_average(),
            account: self.account.status(),
        };

        let event = match self.strategy.generate_signal(&ctx) {
            Signal::Buy => {
                let quantity = self.account.buy_max(current_price);
                Some(TradeEvent::Buy {
                    quantity,
                    price: current_price,
                })
            }
            Signal::Sell => {
                let quantity = self.account.liquidate(current_price);
                Some(TradeEvent::Sell {
                    quantity,
                    price: current_price,
                })
            }
            Signal::Hold => None,
        };

        if let Some(event) = &event {
            tracing::debug!(
                tick,
                side = ?event.side(),
                quantity = event.quantity(),
                price = current_price,
                moving_average = ctx.moving_average,
                "Executed trade"
            );
        }

        Ok(event)
    }

    pub fn status(&self) -> AccountStatus {
        self.account.status()
    }

    /// Mean of the window, or 0.0 while the window is still filling
    pub fn moving_average(&self) -> f64 {
        self.window.moving_average().unwrap_or(0.0)
    }

    pub fn window(&self) -> &PriceWindow {
        &self.window
    }

    pub fn position_state(&self) -> PositionState {
        self.account.status().position_state()
    }

    /// Price seen on the most recent successful tick
    pub fn last_price(&self) -> Option<f64> {
        self.last_price
    }

    /// Number of ticks that completed
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn strategy(&self) -> &St {
        &self.strategy
    }
}
