/// Calculate Simple Moving Average (SMA) over the last `period` prices
///
/// Returns `None` until at least `period` prices are available.
pub fn calculate_sma<'a, I>(prices: I, period: usize) -> Option<f64>
where
    I: IntoIterator<Item = &'a f64>,
    I::IntoIter: ExactSizeIterator,
{
    let prices = prices.into_iter();
    let len = prices.len();
    if period == 0 || len < period {
        return None;
    }

    let sum: f64 = prices.skip(len - period).sum();
    Some(sum / period as f64)
}
