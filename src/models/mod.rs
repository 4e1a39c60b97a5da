use serde::{Deserialize, Serialize};

/// Trading signal produced by a strategy for one tick
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum TradeSide {
    Buy,
    Sell,
}

/// A trade executed by the simulator during a tick
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "side", rename_all = "lowercase")]
pub enum TradeEvent {
    Buy { quantity: i64, price: f64 },
    Sell { quantity: i64, price: f64 },
}

impl TradeEvent {
    pub fn side(&self) -> TradeSide {
        match self {
            TradeEvent::Buy { .. } => TradeSide::Buy,
            TradeEvent::Sell { .. } => TradeSide::Sell,
        }
    }

    pub fn quantity(&self) -> i64 {
        match *self {
            TradeEvent::Buy { quantity, .. } | TradeEvent::Sell { quantity, .. } => quantity,
        }
    }

    pub fn price(&self) -> f64 {
        match *self {
            TradeEvent::Buy { price, .. } | TradeEvent::Sell { price, .. } => price,
        }
    }

    /// Cash value of the trade (quantity * price)
    pub fn notional(&self) -> f64 {
        self.quantity() as f64 * self.price()
    }
}

/// A trade tagged with the tick it happened on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TradeRecord {
    pub tick: usize,
    #[serde(flatten)]
    pub event: TradeEvent,
}

/// Snapshot of the cash account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AccountStatus {
    pub funds: f64,
    pub shares_owned: i64,
}

/// Position state: Flat can only buy, Holding can only sell or hold
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Holding,
}

impl AccountStatus {
    pub fn position_state(&self) -> PositionState {
        if self.shares_owned > 0 {
            PositionState::Holding
        } else {
            PositionState::Flat
        }
    }

    /// Mark-to-market value of cash plus shares at `price`
    pub fn equity(&self, price: f64) -> f64 {
        self.funds + self.shares_owned as f64 * price
    }
}
