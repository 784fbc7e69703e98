//! Price and percentage parsing

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::iso::{Currency, EUR, GBP, USD};

use crate::fixtures::FixtureError;

/// Parse a price string (e.g. "12.99 USD") into an exact amount and its currency.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if the amount is not
/// a non-negative decimal, or if the currency code is not recognised.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((amount, currency))
}

/// Parse a percentage string ("10%" or "0.10") into a `Percentage`.
///
/// # Errors
///
/// Returns an error if the string cannot be parsed or lies outside 0% to 100%.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let fraction = if let Some(percent_str) = trimmed.strip_suffix('%') {
        percent_str
            .trim()
            .parse::<Decimal>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?
            / Decimal::ONE_HUNDRED
    } else {
        trimmed
            .parse::<Decimal>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?
    };

    if fraction < Decimal::ZERO || fraction > Decimal::ONE {
        return Err(FixtureError::InvalidPercentage(s.to_string()));
    }

    Ok(Percentage::from(fraction))
}
