//! Numeric and currency text normalization.
//!
//! Parsing here is deliberately permissive: bad quantity or price text
//! resolves to a default rather than failing the row.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::CurrencyContext;

/// Single-character symbols recognized as a price prefix, in priority order.
pub const CURRENCY_SYMBOLS: [&str; 4] = ["£", "€", "$", "¥"];

/// Three-letter codes recognized (case-insensitively) as a price prefix.
pub const CURRENCY_CODES: [&str; 6] = ["GBP", "EUR", "USD", "AUD", "CAD", "JPY"];

/// Largest expected quantity accepted from source text.
pub const MAX_QUANTITY: i64 = 1_000_000_000;

/// Leading integer of `raw`; anything unparseable, below 1 or above
/// [`MAX_QUANTITY`] yields 1.
pub fn parse_quantity(raw: &str) -> i64 {
    leading_integer(raw.trim())
        .filter(|qty| (1..=MAX_QUANTITY).contains(qty))
        .unwrap_or(1)
}

fn leading_integer(s: &str) -> Option<i64> {
    let (negative, unsigned) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = unsigned[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Strip everything but digits, `.` and `-`, then read the leading decimal.
/// Failure yields zero.
pub fn parse_price(raw: &str) -> Decimal {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    leading_decimal(&cleaned).unwrap_or(Decimal::ZERO)
}

/// `-?digits(.digits)?` prefix; trailing junk (a second dot, a stray minus) is ignored.
fn leading_decimal(s: &str) -> Option<Decimal> {
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let int_part = &rest[..int_len];

    let frac_part = match rest[int_len..].strip_prefix('.') {
        Some(after_dot) => {
            let frac_len = after_dot
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after_dot.len());
            &after_dot[..frac_len]
        }
        None => "",
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut text = String::with_capacity(int_part.len() + frac_part.len() + 3);
    if negative {
        text.push('-');
    }
    text.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        text.push('.');
        text.push_str(frac_part);
    }
    Decimal::from_str(&text).ok()
}

/// Currency symbol or code prefixing a raw price, or empty.
///
/// Order: known symbols, then known three-letter codes, then any single
/// leading character that is not a digit, `.` or `-`.
pub fn detect_currency_symbol(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Some(symbol) = CURRENCY_SYMBOLS.iter().find(|s| trimmed.starts_with(**s)) {
        return (*symbol).to_string();
    }

    let upper = trimmed.to_uppercase();
    if let Some(code) = CURRENCY_CODES.iter().find(|c| upper.starts_with(**c)) {
        return (*code).to_string();
    }

    match trimmed.chars().next() {
        Some(c) if !c.is_ascii_digit() && c != '.' && c != '-' => c.to_string(),
        _ => String::new(),
    }
}

/// Two decimal places, prefixed with the load's symbol when `as_currency` is set.
pub fn format_value(amount: Decimal, as_currency: bool, currency: &CurrencyContext) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    let formatted = format!("{rounded:.2}");
    if as_currency && !currency.is_empty() {
        format!("{}{formatted}", currency.symbol())
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn quantity_defaults_to_one() {
        assert_eq!(parse_quantity("5"), 5);
        assert_eq!(parse_quantity(" 12 units"), 12);
        assert_eq!(parse_quantity("3.7"), 3);
        assert_eq!(parse_quantity(""), 1);
        assert_eq!(parse_quantity("abc"), 1);
        assert_eq!(parse_quantity("0"), 1);
        assert_eq!(parse_quantity("-4"), 1);
        assert_eq!(parse_quantity("99999999999999999999999"), 1);
    }

    #[test]
    fn quantity_range_is_bounded() {
        assert_eq!(parse_quantity("1000000000"), MAX_QUANTITY);
        assert_eq!(parse_quantity("1000000001"), 1);
        assert_eq!(parse_quantity("9223372036854775807"), 1);
    }

    #[test]
    fn price_is_permissive() {
        assert_eq!(parse_price("£1,200.50"), dec!(1200.50));
        assert_eq!(parse_price("EUR 150"), dec!(150));
        assert_eq!(parse_price("2.50 each"), dec!(2.50));
        assert_eq!(parse_price(".75"), dec!(0.75));
        assert_eq!(parse_price("1.2.3"), dec!(1.2));
        assert_eq!(parse_price("-3.00"), dec!(-3.00));
        assert_eq!(parse_price("n/a"), Decimal::ZERO);
        assert_eq!(parse_price("-"), Decimal::ZERO);
        assert_eq!(parse_price(""), Decimal::ZERO);
    }

    #[test]
    fn currency_detection_order() {
        assert_eq!(detect_currency_symbol("£10.00"), "£");
        assert_eq!(detect_currency_symbol(" €5"), "€");
        assert_eq!(detect_currency_symbol("$1"), "$");
        assert_eq!(detect_currency_symbol("usd 12.00"), "USD");
        assert_eq!(detect_currency_symbol("GBP12"), "GBP");
        assert_eq!(detect_currency_symbol("R250"), "R");
        assert_eq!(detect_currency_symbol("20.00"), "");
        assert_eq!(detect_currency_symbol("-20.00"), "");
        assert_eq!(detect_currency_symbol(""), "");
    }

    #[test]
    fn format_two_decimals() {
        let gbp = CurrencyContext::new("£");
        let none = CurrencyContext::none();
        assert_eq!(format_value(dec!(16), true, &gbp), "£16.00");
        assert_eq!(format_value(dec!(16), false, &gbp), "16.00");
        assert_eq!(format_value(dec!(2.005), true, &none), "2.01");
        assert_eq!(format_value(dec!(-6), true, &gbp), "£-6.00");
        assert_eq!(format_value(dec!(-0.001), false, &none), "0.00");
    }
}
