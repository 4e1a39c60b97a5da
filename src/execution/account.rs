use crate::models::AccountStatus;

/// Cash plus a single share position
///
/// Buys spend as much cash as whole shares allow; sells always liquidate the
/// full position.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    funds: f64,
    shares_owned: i64,
}

impl Account {
    pub fn new(initial_funds: f64) -> Self {
        Self {
            funds: initial_funds,
            shares_owned: 0,
        }
    }

    pub fn status(&self) -> AccountStatus {
        AccountStatus {
            funds: self.funds,
            shares_owned: self.shares_owned,
        }
    }

    /// Buy `trunc(funds / price)` shares and return how many were bought
    ///
    /// The share count truncates toward zero, so for positive prices the
    /// cost never exceeds the available funds. The position saturates at the
    /// `i64` range; a buy that would pass it only fills up to the limit.
    pub fn buy_max(&mut self, price: f64) -> i64 {
        let wanted = (self.funds / price) as i64;
        let shares = self.shares_owned.saturating_add(wanted) - self.shares_owned;
        self.shares_owned += shares;
        self.funds -= shares as f64 * price;
        shares
    }

    /// Sell every share at `price` and return how many were sold
    pub fn liquidate(&mut self, price: f64) -> i64 {
        let shares = self.shares_owned;
        self.funds += shares as f64 * price;
        self.shares_owned = 0;
        shares
    }
}
