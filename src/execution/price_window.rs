use crate::indicators::calculate_sma;
use std::collections::VecDeque;

/// Rolling window of the most recent prices
///
/// Holds at most `capacity` prices; pushing onto a full window evicts the
/// oldest one.
#[derive(Debug, Clone)]
pub struct PriceWindow {
    prices: VecDeque<f64>,
    capacity: usize,
}

impl PriceWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            prices: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Add a price, returning the evicted price if the window was full
    pub fn push(&mut self, price: f64) -> Option<f64> {
        self.prices.push_back(price);

        if self.prices.len() > self.capacity {
            self.prices.pop_front()
        } else {
            None
        }
    }

    /// Mean of the window, `None` until the window is full
    pub fn moving_average(&self) -> Option<f64> {
        calculate_sma(&self.prices, self.capacity)
    }

    pub fn is_full(&self) -> bool {
        self.prices.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Prices in insertion order, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.prices.iter()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.prices.iter().copied().collect()
    }
}
