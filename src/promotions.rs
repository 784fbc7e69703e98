//! Promotions
//!
//! Promo codes map to a percentage off the cart subtotal. The discount is worked out once, when
//! the code is applied, and the resulting [`AppliedPromotion`] keeps that amount. Changing the
//! cart afterwards does not change the discount; callers re-apply the code when they want it to
//! follow the new subtotal.

use std::collections::hash_map::Entry;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Code accepted by the default rule table.
pub const SAVE10: &str = "SAVE10";

/// Reasons a promo code can be refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PromoRejection {
    /// The code is not in the rule table.
    #[error("Invalid promo code: {0:?}")]
    InvalidCode(String),
}

/// A rule table listed the same code twice.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Duplicate promo code: {0}")]
pub struct DuplicatePromoCode(pub String);

/// A promo code that was accepted, with its discount frozen at apply time.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedPromotion {
    code: String,
    rate: Percentage,
    subtotal_at_apply: Decimal,
    discount: Decimal,
}

impl AppliedPromotion {
    /// Normalised code, e.g. `SAVE10`
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Fraction of the subtotal taken off
    pub fn rate(&self) -> Percentage {
        self.rate
    }

    /// Subtotal the discount was computed from
    pub fn subtotal_at_apply(&self) -> Decimal {
        self.subtotal_at_apply
    }

    /// Discount amount, unrounded
    pub fn discount(&self) -> Decimal {
        self.discount
    }

    /// Whether the cart subtotal has moved since the code was applied.
    pub fn is_stale(&self, current_subtotal: Decimal) -> bool {
        current_subtotal != self.subtotal_at_apply
    }
}

/// Promo code rule table.
#[derive(Debug, Clone)]
pub struct PromoEngine {
    rules: FxHashMap<String, Percentage>,
}

impl PromoEngine {
    /// Create an engine with the given `(code, rate)` rules.
    ///
    /// Codes are compared case-insensitively; a later rule replaces an earlier one with the same
    /// normalised code. Use [`PromoEngine::try_with_rules`] to refuse such tables instead.
    pub fn with_rules<S: AsRef<str>>(rules: impl IntoIterator<Item = (S, Percentage)>) -> Self {
        Self {
            rules: rules
                .into_iter()
                .map(|(code, rate)| (normalise(code.as_ref()), rate))
                .collect(),
        }
    }

    /// Create an engine from `(code, rate)` rules, refusing codes that only differ by case or
    /// surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicatePromoCode`] naming the first normalised code listed twice.
    pub fn try_with_rules<S: AsRef<str>>(
        rules: impl IntoIterator<Item = (S, Percentage)>,
    ) -> Result<Self, DuplicatePromoCode> {
        let mut table = FxHashMap::default();

        for (code, rate) in rules {
            match table.entry(normalise(code.as_ref())) {
                Entry::Occupied(entry) => return Err(DuplicatePromoCode(entry.key().clone())),
                Entry::Vacant(entry) => {
                    entry.insert(rate);
                }
            }
        }

        Ok(Self { rules: table })
    }

    /// Rate for a code, if the code is known.
    pub fn rate(&self, code: &str) -> Option<Percentage> {
        self.rules.get(&normalise(code)).copied()
    }

    /// Number of codes in the rule table.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no code is accepted.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate `code` against `subtotal`.
    ///
    /// A known code always succeeds, including against a zero subtotal, which yields a zero
    /// discount.
    ///
    /// # Errors
    ///
    /// Returns [`PromoRejection::InvalidCode`] if the code is not in the rule table.
    pub fn apply(
        &self,
        code: &str,
        subtotal: Decimal,
    ) -> Result<AppliedPromotion, PromoRejection> {
        let normalised = normalise(code);

        let rate = self
            .rules
            .get(&normalised)
            .copied()
            .ok_or_else(|| PromoRejection::InvalidCode(code.to_string()))?;

        Ok(AppliedPromotion {
            code: normalised,
            rate,
            subtotal_at_apply: subtotal,
            discount: rate * subtotal,
        })
    }
}

impl Default for PromoEngine {
    fn default() -> Self {
        Self::with_rules([(SAVE10, Percentage::from(Decimal::new(10, 2)))])
    }
}

fn normalise(code: &str) -> String {
    code.trim().to_uppercase()
}
