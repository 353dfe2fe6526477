//! Conversion of externally supplied amounts into minor currency units.
//!
//! Receipt totals arrive as decimal strings ("24.50") or plain numbers. The
//! strict parser reports malformed input as a typed error so a zero payout is
//! never confused with a deliberately free tier; the lenient form keeps the
//! historical degrade-to-zero behavior for callers that must never fail.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("empty amount")]
    Empty,
    #[error("'{0}' is not a decimal amount")]
    Unparsable(String),
    #[error("amount '{0}' overflows the cent range")]
    Overflow(String),
}

/// Parse a decimal string into cents, rounding half away from zero at the
/// cent ("19.995" → 2000, "-0.005" → -1).
pub fn parse_cents(raw: &str) -> Result<i64, MoneyError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MoneyError::Empty);
    }

    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(MoneyError::Unparsable(raw.to_string()));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MoneyError::Unparsable(raw.to_string()));
    }

    let whole_units: i64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| MoneyError::Overflow(raw.to_string()))?
    };

    let mut fraction_digits = fraction.bytes().map(|b| i64::from(b - b'0'));
    let tenths = fraction_digits.next().unwrap_or(0);
    let hundredths = fraction_digits.next().unwrap_or(0);
    // Round half away from zero on the remainder past the hundredths place:
    // the thousandths digit alone decides which cent is nearest.
    let round_up = matches!(fraction_digits.next(), Some(digit) if digit >= 5);

    let magnitude = whole_units
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(tenths * 10 + hundredths))
        .and_then(|cents| cents.checked_add(i64::from(round_up)))
        .ok_or_else(|| MoneyError::Overflow(raw.to_string()))?;

    Ok(if negative { -magnitude } else { magnitude })
}

/// Total-function form of [`parse_cents`]: invalid input degrades to 0.
pub fn parse_cents_lenient(raw: &str) -> i64 {
    parse_cents(raw).unwrap_or(0)
}

/// Convert a numeric amount of major units to cents, rounding half away from
/// zero. Non-finite input maps to 0.
pub fn number_to_cents(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    // f64::round already rounds half away from zero.
    (value * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_fractional_amounts() {
        assert_eq!(parse_cents("5"), Ok(500));
        assert_eq!(parse_cents("24.50"), Ok(2450));
        assert_eq!(parse_cents("0.99"), Ok(99));
        assert_eq!(parse_cents(".75"), Ok(75));
        assert_eq!(parse_cents("19."), Ok(1900));
    }

    #[test]
    fn rounds_half_away_from_zero_at_the_cent() {
        assert_eq!(parse_cents("19.995"), Ok(2000));
        assert_eq!(parse_cents("19.994"), Ok(1999));
        assert_eq!(parse_cents("0.005"), Ok(1));
        assert_eq!(parse_cents("-0.005"), Ok(-1));
        assert_eq!(parse_cents("2.0049"), Ok(200));
    }

    #[test]
    fn rejects_garbage_with_typed_errors() {
        assert_eq!(parse_cents(""), Err(MoneyError::Empty));
        assert_eq!(
            parse_cents("abc"),
            Err(MoneyError::Unparsable("abc".to_string()))
        );
        assert_eq!(
            parse_cents("12.3x"),
            Err(MoneyError::Unparsable("12.3x".to_string()))
        );
        assert_eq!(
            parse_cents("."),
            Err(MoneyError::Unparsable(".".to_string()))
        );
        assert!(matches!(
            parse_cents("99999999999999999999"),
            Err(MoneyError::Overflow(_))
        ));
    }

    #[test]
    fn lenient_form_degrades_to_zero() {
        assert_eq!(parse_cents_lenient("abc"), 0);
        assert_eq!(parse_cents_lenient(""), 0);
        assert_eq!(parse_cents_lenient("19.995"), 2000);
    }

    #[test]
    fn numeric_conversion_matches_string_behavior() {
        assert_eq!(number_to_cents(5.0), 500);
        assert_eq!(number_to_cents(0.125), 13);
        assert_eq!(number_to_cents(-0.125), -13);
        assert_eq!(number_to_cents(f64::NAN), 0);
        assert_eq!(number_to_cents(f64::INFINITY), 0);
    }
}
