//! Payment

use std::{fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

use crate::validation::{ValidationErrors, has_min_chars, is_card_number, is_cvv, is_expiry};

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    /// Credit or debit card; requires valid [`CardDetails`].
    #[default]
    #[value(name = "credit-card")]
    CreditCard,

    /// Cash handed to the rider on delivery.
    #[serde(rename = "cod")]
    #[value(name = "cod")]
    CashOnDelivery,

    /// `PayPal`
    #[serde(rename = "paypal")]
    #[value(name = "paypal")]
    PayPal,
}

impl PaymentMethod {
    /// Whether placing an order with this method needs card details.
    pub fn requires_card(self) -> bool {
        matches!(self, PaymentMethod::CreditCard)
    }

    /// Stable identifier, as used in forms and fixtures.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit-card",
            PaymentMethod::CashOnDelivery => "cod",
            PaymentMethod::PayPal => "paypal",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit/Debit Card",
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
            PaymentMethod::PayPal => "PayPal",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An unrecognised payment method identifier.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "credit-card" => Ok(PaymentMethod::CreditCard),
            "cod" => Ok(PaymentMethod::CashOnDelivery),
            "paypal" => Ok(PaymentMethod::PayPal),
            _ => Err(UnknownPaymentMethod(s.to_string())),
        }
    }
}

/// Raw card form input.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CardForm {
    /// Name printed on the card
    pub holder_name: String,

    /// Card number, digits only
    pub card_number: String,

    /// Expiry as `MM/YY`
    pub expiry: String,

    /// Security code
    pub cvv: String,
}

impl fmt::Debug for CardForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardForm")
            .field("holder_name", &self.holder_name)
            .field("card_number", &mask(&self.card_number))
            .field("expiry", &self.expiry)
            .field("cvv", &"***")
            .finish()
    }
}

impl CardForm {
    /// Validate every field and build card details.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] naming each field that failed.
    pub fn validate(&self) -> Result<CardDetails, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.check(
            has_min_chars(&self.holder_name, 2),
            "holder_name",
            "Cardholder name is required.",
        );
        errors.check(
            is_card_number(&self.card_number),
            "card_number",
            "Card number must be 16 digits.",
        );
        errors.check(
            is_expiry(&self.expiry),
            "expiry",
            "Expiry date must be MM/YY format.",
        );
        errors.check(is_cvv(&self.cvv), "cvv", "CVV must be 3 or 4 digits.");

        errors.into_result(CardDetails {
            holder_name: self.holder_name.trim().to_string(),
            card_number: self.card_number.clone(),
            expiry: self.expiry.clone(),
            cvv: self.cvv.clone(),
        })
    }
}

/// Card details that passed every format check.
#[derive(Clone, PartialEq, Eq)]
pub struct CardDetails {
    holder_name: String,
    card_number: String,
    expiry: String,
    cvv: String,
}

impl CardDetails {
    /// Returns the cardholder name
    pub fn holder_name(&self) -> &str {
        &self.holder_name
    }

    /// Returns the expiry as `MM/YY`
    pub fn expiry(&self) -> &str {
        &self.expiry
    }

    /// Returns the security code
    pub fn cvv(&self) -> &str {
        &self.cvv
    }

    /// Last four digits of the card number
    pub fn last_four(&self) -> &str {
        let start = self.card_number.len().saturating_sub(4);

        self.card_number.get(start..).unwrap_or_default()
    }

    /// Card number with all but the last four digits masked
    pub fn masked_number(&self) -> String {
        mask(&self.card_number)
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("holder_name", &self.holder_name)
            .field("card_number", &self.masked_number())
            .field("expiry", &self.expiry)
            .field("cvv", &"***")
            .finish()
    }
}

fn mask(number: &str) -> String {
    let count = number.chars().count();

    number
        .chars()
        .enumerate()
        .map(|(i, c)| if i + 4 < count { '•' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn valid_form() -> CardForm {
        CardForm {
            holder_name: "John Doe".to_string(),
            card_number: "4242424242424242".to_string(),
            expiry: "08/29".to_string(),
            cvv: "123".to_string(),
        }
    }

    #[test]
    fn only_credit_card_requires_card() {
        assert!(PaymentMethod::CreditCard.requires_card());
        assert!(!PaymentMethod::CashOnDelivery.requires_card());
        assert!(!PaymentMethod::PayPal.requires_card());
    }

    #[test]
    fn default_method_is_credit_card() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::CreditCard);
    }

    #[test]
    fn from_str_round_trips_identifiers() -> TestResult {
        for method in [
            PaymentMethod::CreditCard,
            PaymentMethod::CashOnDelivery,
            PaymentMethod::PayPal,
        ] {
            assert_eq!(method.as_str().parse::<PaymentMethod>()?, method);
        }

        assert_eq!(" PayPal ".parse::<PaymentMethod>()?, PaymentMethod::PayPal);

        Ok(())
    }

    #[test]
    fn from_str_rejects_unknown() {
        assert_eq!(
            "bitcoin".parse::<PaymentMethod>(),
            Err(UnknownPaymentMethod("bitcoin".to_string()))
        );
    }

    #[test]
    fn deserializes_from_wire_names() -> TestResult {
        let methods: Vec<PaymentMethod> = serde_norway::from_str("[credit-card, cod, paypal]")?;

        assert_eq!(
            methods,
            [
                PaymentMethod::CreditCard,
                PaymentMethod::CashOnDelivery,
                PaymentMethod::PayPal
            ]
        );

        Ok(())
    }

    #[test]
    fn valid_form_produces_details() -> TestResult {
        let details = valid_form().validate()?;

        assert_eq!(details.holder_name(), "John Doe");
        assert_eq!(details.expiry(), "08/29");
        assert_eq!(details.last_four(), "4242");
        assert_eq!(details.masked_number(), "••••••••••••4242");

        Ok(())
    }

    #[test]
    fn short_card_number_is_rejected() {
        let form = CardForm {
            card_number: "1234".to_string(),
            ..valid_form()
        };

        let Err(errors) = form.validate() else {
            panic!("expected card number to be rejected");
        };

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.message_for("card_number"),
            Some("Card number must be 16 digits.")
        );
    }

    #[test]
    fn every_field_is_checked() {
        let form = CardForm {
            holder_name: "J".to_string(),
            card_number: "4242-4242-4242-42".to_string(),
            expiry: "13/29".to_string(),
            cvv: "12345".to_string(),
        };

        let Err(errors) = form.validate() else {
            panic!("expected every field to be rejected");
        };

        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn debug_output_masks_sensitive_fields() -> TestResult {
        let form = valid_form();
        let details = form.validate()?;

        let form_debug = format!("{form:?}");
        let details_debug = format!("{details:?}");

        assert!(!form_debug.contains("4242424242424242"));
        assert!(!form_debug.contains("123"));
        assert!(!details_debug.contains("4242424242424242"));

        Ok(())
    }
}
