// Line-oriented tick output
use crate::models::{AccountStatus, TradeEvent};
use std::io::{self, Write};

/// Significant digits used when printing prices and funds
const SIGNIFICANT_DIGITS: i32 = 6;

/// Format a float in general notation with six significant digits
///
/// Trailing zeros are dropped, and values below 1e-4 or at/above 1e6 switch
/// to scientific notation with a signed two-digit exponent (`1.5e+06`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Round to the target precision first; rounding can bump the exponent
    let scientific = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value.to_string();
    };

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// `Buying 14 shares at 70` / `Selling 14 shares at 130`
pub fn trade_line(event: &TradeEvent) -> String {
    match event {
        TradeEvent::Buy { quantity, price } => {
            format!("Buying {} shares at {}", quantity, format_number(*price))
        }
        TradeEvent::Sell { quantity, price } => {
            format!("Selling {} shares at {}", quantity, format_number(*price))
        }
    }
}

/// `Funds: $1000, Shares Owned: 0`
pub fn status_line(status: &AccountStatus) -> String {
    format!(
        "Funds: ${}, Shares Owned: {}",
        format_number(status.funds),
        status.shares_owned
    )
}

/// Write the output for one tick: the trade line, if any, then the status line
pub fn write_tick<W: Write>(
    out: &mut W,
    event: Option<&TradeEvent>,
    status: &AccountStatus,
) -> io::Result<()> {
    if let Some(event) = event {
        writeln!(out, "{}", trade_line(event))?;
    }
    writeln!(out, "{}", status_line(status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_integers() {
        assert_eq!(format_number(1000.0), "1000");
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-3.0), "-3");
    }

    #[test]
    fn test_format_six_significant_digits() {
        assert_eq!(format_number(100.523456), "100.523");
        assert_eq!(format_number(99.99999), "100");
        assert_eq!(format_number(1.25), "1.25");
        assert_eq!(format_number(20.000000001), "20");
        assert_eq!(format_number(123456.4), "123456");
    }

    #[test]
    fn test_format_small_values() {
        assert_eq!(format_number(0.0001), "0.0001");
        assert_eq!(format_number(0.00001234), "1.234e-05");
    }

    #[test]
    fn test_format_large_values() {
        assert_eq!(format_number(1_000_000.0), "1e+06");
        assert_eq!(format_number(1_234_567.0), "1.23457e+06");
        assert_eq!(format_number(999_999.7), "1e+06");
    }

    #[test]
    fn test_format_non_finite() {
        assert_eq!(format_number(f64::NAN), "nan");
        assert_eq!(format_number(f64::INFINITY), "inf");
        assert_eq!(format_number(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_trade_lines() {
        let buy = TradeEvent::Buy {
            quantity: 14,
            price: 70.0,
        };
        let sell = TradeEvent::Sell {
            quantity: 14,
            price: 130.25,
        };

        assert_eq!(trade_line(&buy), "Buying 14 shares at 70");
        assert_eq!(trade_line(&sell), "Selling 14 shares at 130.25");
    }

    #[test]
    fn test_write_tick() {
        let status = AccountStatus {
            funds: 20.0,
            shares_owned: 14,
        };
        let event = TradeEvent::Buy {
            quantity: 14,
            price: 70.0,
        };

        let mut out = Vec::new();
        write_tick(&mut out, Some(&event), &status).unwrap();
        write_tick(&mut out, None, &status).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Buying 14 shares at 70\n\
             Funds: $20, Shares Owned: 14\n\
             Funds: $20, Shares Owned: 14\n"
        );
    }
}
