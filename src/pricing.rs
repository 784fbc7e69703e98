//! Pricing
//!
//! Amounts are carried as unrounded [`Decimal`]s and only rounded to two places when they are
//! turned into [`Money`] for display.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors that can occur while preparing amounts for display.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The amount does not fit in minor units.
    #[error("amount {0} cannot be represented in minor units")]
    AmountOutOfRange(Decimal),
}

/// Flat delivery fee charged on any non-empty order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryFeePolicy {
    flat_fee: Decimal,
}

impl DeliveryFeePolicy {
    /// Charge `flat_fee` whenever the subtotal is above zero.
    pub fn flat(flat_fee: Decimal) -> Self {
        Self { flat_fee }
    }

    /// The configured flat fee
    pub fn flat_fee(&self) -> Decimal {
        self.flat_fee
    }

    /// Fee for an order with the given subtotal: the flat fee above zero, nothing otherwise.
    pub fn fee_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal > Decimal::ZERO {
            self.flat_fee
        } else {
            Decimal::ZERO
        }
    }
}

impl Default for DeliveryFeePolicy {
    fn default() -> Self {
        Self::flat(Decimal::new(5_00, 2))
    }
}

/// Subtotal, discount, delivery fee and total for one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    subtotal: Decimal,
    discount: Decimal,
    delivery_fee: Decimal,
    total: Decimal,
}

impl OrderTotals {
    /// Work out the totals: `subtotal - discount + delivery fee`.
    ///
    /// The total is not clamped; a frozen discount larger than a shrunken subtotal shows up as a
    /// lower total rather than being silently capped.
    pub fn compute(subtotal: Decimal, discount: Decimal, policy: &DeliveryFeePolicy) -> Self {
        let delivery_fee = policy.fee_for(subtotal);

        Self {
            subtotal,
            discount,
            delivery_fee,
            total: subtotal - discount + delivery_fee,
        }
    }

    /// Sum of all line totals
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// Promotion discount
    pub fn discount(&self) -> Decimal {
        self.discount
    }

    /// Delivery fee
    pub fn delivery_fee(&self) -> Decimal {
        self.delivery_fee
    }

    /// Amount to pay
    pub fn total(&self) -> Decimal {
        self.total
    }
}

/// Round an amount to two decimal places, halves away from zero.
pub fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert an unrounded amount into [`Money`], rounding to whole minor units.
///
/// # Errors
///
/// Returns [`PricingError::AmountOutOfRange`] if the amount overflows `i64` minor units.
pub fn to_money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let minor = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .ok_or(PricingError::AmountOutOfRange(amount))?;

    Ok(Money::from_minor(minor, currency))
}

/// Format an amount as a currency string with two fraction digits, e.g. `$19.39`.
///
/// # Errors
///
/// Returns [`PricingError::AmountOutOfRange`] if the amount overflows `i64` minor units.
pub fn format_amount(amount: Decimal, currency: &'static Currency) -> Result<String, PricingError> {
    Ok(format!("{}", to_money(amount, currency)?))
}
