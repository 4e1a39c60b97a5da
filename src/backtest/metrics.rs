use crate::models::{AccountStatus, TradeEvent, TradeRecord, TradeSide};
use serde::{Deserialize, Serialize};

/// Trades executed during a run, in tick order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TradeLog {
    trades: Vec<TradeRecord>,
}

impl TradeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, tick: usize, event: TradeEvent) {
        self.trades.push(TradeRecord { tick, event });
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn count(&self, side: TradeSide) -> usize {
        self.trades
            .iter()
            .filter(|t| t.event.side() == side)
            .count()
    }
}

/// Observed price range over a run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn observe(range: Option<Self>, price: f64) -> Self {
        match range {
            Some(r) => Self {
                min: r.min.min(price),
                max: r.max.max(price),
            },
            None => Self {
                min: price,
                max: price,
            },
        }
    }
}

/// Outcome of one simulation run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub ticks_run: usize,
    pub total_trades: usize,
    pub buys: usize,
    pub sells: usize,

    pub initial_equity: f64,
    pub final_funds: f64,
    pub final_shares: i64,
    pub final_price: Option<f64>,
    /// Cash plus shares marked at the final price
    pub final_equity: f64,
    pub total_return_pct: f64,

    pub price_range: Option<PriceRange>,

    /// Set when the run stopped early on a rejected price
    pub halted: Option<String>,

    pub trades: TradeLog,
}

impl RunSummary {
    pub fn new(
        ticks_run: usize,
        initial_equity: f64,
        status: AccountStatus,
        final_price: Option<f64>,
        price_range: Option<PriceRange>,
        trades: TradeLog,
    ) -> Self {
        let final_equity = status.equity(final_price.unwrap_or(0.0));
        let total_return_pct = if initial_equity != 0.0 {
            (final_equity - initial_equity) / initial_equity * 100.0
        } else {
            0.0
        };

        Self {
            ticks_run,
            total_trades: trades.len(),
            buys: trades.count(TradeSide::Buy),
            sells: trades.count(TradeSide::Sell),
            initial_equity,
            final_funds: status.funds,
            final_shares: status.shares_owned,
            final_price,
            final_equity,
            total_return_pct,
            price_range,
            halted: None,
            trades,
        }
    }

    pub fn pnl(&self) -> f64 {
        self.final_equity - self.initial_equity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_log_counts() {
        let mut log = TradeLog::new();
        log.record(4, TradeEvent::Buy { quantity: 14, price: 70.0 });
        log.record(5, TradeEvent::Sell { quantity: 14, price: 130.0 });
        log.record(9, TradeEvent::Buy { quantity: 2, price: 80.0 });

        assert_eq!(log.len(), 3);
        assert_eq!(log.count(TradeSide::Buy), 2);
        assert_eq!(log.count(TradeSide::Sell), 1);
        assert_eq!(log.trades()[1].tick, 5);
    }

    #[test]
    fn test_price_range() {
        let range = [100.0, 95.0, 103.0, 99.0]
            .into_iter()
            .fold(None, |r, p| Some(PriceRange::observe(r, p)));

        assert_eq!(range, Some(PriceRange { min: 95.0, max: 103.0 }));
    }

    #[test]
    fn test_summary_marks_to_market() {
        let mut log = TradeLog::new();
        log.record(4, TradeEvent::Buy { quantity: 14, price: 70.0 });

        let summary = RunSummary::new(
            10,
            1000.0,
            AccountStatus {
                funds: 20.0,
                shares_owned: 14,
            },
            Some(80.0),
            None,
            log,
        );

        assert_eq!(summary.final_equity, 1140.0);
        assert!((summary.total_return_pct - 14.0).abs() < 1e-9);
        assert!((summary.pnl() - 140.0).abs() < 1e-9);
        assert_eq!(summary.buys, 1);
        assert_eq!(summary.sells, 0);
    }

    #[test]
    fn test_summary_with_no_trades() {
        let summary = RunSummary::new(
            5,
            1000.0,
            AccountStatus {
                funds: 1000.0,
                shares_owned: 0,
            },
            Some(101.0),
            None,
            TradeLog::new(),
        );

        assert_eq!(summary.total_trades, 0);
        assert_eq!(summary.total_return_pct, 0.0);
    }
}
