//! Form validation
//!
//! Shared field-level error reporting and the format patterns used when raw form input is
//! turned into typed values.

use std::sync::LazyLock;

use regex::Regex;
use smallvec::SmallVec;
use thiserror::Error;

/// A single field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the offending form field
    pub field: &'static str,

    /// Message to show next to the field
    pub message: &'static str,
}

/// Every field error collected while validating one form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} invalid field(s): {}", .errors.len(), summary(&.errors))]
pub struct ValidationErrors {
    errors: SmallVec<[FieldError; 4]>,
}

impl ValidationErrors {
    /// Create an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`.
    pub fn push(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    /// Record a failure for `field` unless `valid` holds.
    pub fn check(&mut self, valid: bool, field: &'static str, message: &'static str) {
        if !valid {
            self.push(field, message);
        }
    }

    /// Message for the first failure on `field`, if any.
    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }

    /// Whether `field` failed validation.
    pub fn has(&self, field: &str) -> bool {
        self.message_for(field).is_some()
    }

    /// Iterate over the collected errors.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Number of failed fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when nothing failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns `Ok(value)` when no errors were collected.
    ///
    /// # Errors
    ///
    /// Returns `self` if any field failed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| format!("{}: {}", error.field, error.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[expect(clippy::expect_used, reason = "patterns are constant and covered by tests")]
static ZIP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}(-[0-9]{4})?$").expect("valid zip pattern"));

#[expect(clippy::expect_used, reason = "patterns are constant and covered by tests")]
static EXPIRY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/[0-9]{2}$").expect("valid expiry pattern"));

#[expect(clippy::expect_used, reason = "patterns are constant and covered by tests")]
static CARD_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{16}$").expect("valid card number pattern"));

#[expect(clippy::expect_used, reason = "patterns are constant and covered by tests")]
static CVV_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3,4}$").expect("valid cvv pattern"));

/// Five digit ZIP, optionally followed by a dash and four digits.
pub fn is_zip(value: &str) -> bool {
    ZIP_PATTERN.is_match(value)
}

/// `MM/YY` with a month between 01 and 12.
pub fn is_expiry(value: &str) -> bool {
    EXPIRY_PATTERN.is_match(value)
}

/// Exactly sixteen ASCII digits.
pub fn is_card_number(value: &str) -> bool {
    CARD_NUMBER_PATTERN.is_match(value)
}

/// Three or four ASCII digits.
pub fn is_cvv(value: &str) -> bool {
    CVV_PATTERN.is_match(value)
}

/// At least `min` characters once surrounding whitespace is removed.
pub fn has_min_chars(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}
