//! Money helpers using rust_decimal for precision
//!
//! Amounts travel and are stored as `f64`; every sum is computed with
//! `Decimal` and rounded to 2 decimal places on the way back.

use rust_decimal::prelude::*;
use std::str::FromStr;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Smallest amount a line item may carry
pub const MIN_LINE_AMOUNT: Decimal = Decimal::ONE;

/// Largest amount a line item may carry (one billion)
pub const MAX_LINE_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Currencies offered by the request form
pub const CURRENCIES: &[&str] = &["USD", "EUR", "GBP"];

/// Default currency for new requests
pub const DEFAULT_CURRENCY: &str = "USD";

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Parse a user-entered amount.
///
/// Returns `None` for empty or non-numeric input. Surrounding whitespace is
/// ignored, anything else (`"12abc"`, `"1,000"`) is rejected.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Lenient amount: empty or non-numeric input counts as zero.
#[inline]
pub fn amount_or_zero(input: &str) -> Decimal {
    parse_amount(input).unwrap_or(Decimal::ZERO)
}

/// Add without panicking; an overflowing sum clamps to the Decimal range
fn accumulate(total: Decimal, value: Decimal) -> Decimal {
    total.checked_add(value).unwrap_or_else(|| {
        tracing::warn!(total = %total, value = %value, "Monetary sum overflowed, clamping");
        total.saturating_add(value)
    })
}

/// Sum user-entered amounts, treating unparsable entries as zero
pub fn sum_amounts<'a, I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = &'a str>,
{
    amounts
        .into_iter()
        .map(amount_or_zero)
        .fold(Decimal::ZERO, accumulate)
}

/// Sum stored amounts with Decimal precision
pub fn sum_f64<I>(amounts: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    to_f64(amounts.into_iter().map(to_decimal).fold(Decimal::ZERO, accumulate))
}

/// Compare two stored amounts within [`MONEY_TOLERANCE`]
pub fn money_eq(a: f64, b: f64) -> bool {
    to_decimal(a).saturating_sub(to_decimal(b)).abs() < MONEY_TOLERANCE
}

/// Format a Decimal with exactly two decimals, e.g. `229.00`
pub fn format_decimal(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Format an amount with its currency code, e.g. `229.00 USD`
pub fn format_money(value: f64, currency: &str) -> String {
    format!("{} {}", format_decimal(to_decimal(value)), currency)
}

/// Format an amount with thousands separators, e.g. `$12,500.50`
pub fn format_grouped(value: f64) -> String {
    let formatted = format_decimal(to_decimal(value.abs()));
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_precision() {
        let sum_f64 = 0.1_f64 + 0.2_f64;
        assert_ne!(sum_f64, 0.3);

        let sum_dec = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("229"), Some(Decimal::from(229)));
        assert_eq!(parse_amount(" 12.50 "), Some(Decimal::new(1250, 2)));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
        assert_eq!(parse_amount("bad"), None);
        assert_eq!(parse_amount("12abc"), None);
        assert_eq!(parse_amount("-5"), Some(Decimal::from(-5)));
    }

    #[test]
    fn test_sum_amounts_treats_invalid_as_zero() {
        assert_eq!(sum_amounts(["100", "bad"]), Decimal::from(100));
        assert_eq!(sum_amounts(["", "0.5", "0.25"]), Decimal::new(75, 2));
        assert_eq!(sum_amounts(Vec::<&str>::new()), Decimal::ZERO);
    }

    #[test]
    fn test_sums_clamp_instead_of_overflowing() {
        let max = "79228162514264337593543950335";
        assert_eq!(sum_amounts([max, max]), Decimal::MAX);
        assert_eq!(sum_amounts([max, "-5", max]), Decimal::MAX);
        assert_eq!(sum_amounts(["-79228162514264337593543950335", "-1"]), Decimal::MIN);

        let huge = 7.0e28_f64;
        assert!(sum_f64([huge, huge, huge]) > 7.0e28);
        assert!(!money_eq(huge, -huge));
    }

    #[test]
    fn test_money_eq_and_sum() {
        assert!(money_eq(sum_f64([1000.0, 1500.0]), 2500.0));
        assert!(money_eq(0.1 + 0.2, 0.3));
        assert!(!money_eq(10.0, 10.02));
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_decimal(Decimal::from(229)), "229.00");
        assert_eq!(format_money(2500.0, "USD"), "2500.00 USD");
        assert_eq!(format_grouped(12500.5), "$12,500.50");
        assert_eq!(format_grouped(999.0), "$999.00");
        assert_eq!(format_grouped(1234567.0), "$1,234,567.00");
    }
}
