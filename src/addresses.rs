//! Addresses
//!
//! Delivery addresses are only ever created from a validated [`AddressForm`]. Once stored in an
//! [`AddressBook`] they are never edited in place; replace them by removing and adding again.

use thiserror::Error;

use crate::validation::{ValidationErrors, has_min_chars, is_zip};

/// A saved delivery address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    id: String,
    label: Option<String>,
    line1: String,
    line2: Option<String>,
    city: String,
    state: String,
    zip: String,
    country: Option<String>,
    is_default: bool,
}

impl Address {
    /// Returns the address id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the label, such as "Home" or "Work"
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the first street line
    pub fn line1(&self) -> &str {
        &self.line1
    }

    /// Returns the second street line
    pub fn line2(&self) -> Option<&str> {
        self.line2.as_deref()
    }

    /// Returns the city
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Returns the state
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the ZIP code
    pub fn zip(&self) -> &str {
        &self.zip
    }

    /// Returns the country
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Whether this is the conventional default address
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// Single line rendering, e.g. `123 Main St, Anytown, CA 90210`.
    pub fn one_line(&self) -> String {
        let mut out = self.line1.clone();

        if let Some(line2) = &self.line2 {
            out.push_str(", ");
            out.push_str(line2);
        }

        out.push_str(&format!(", {}, {} {}", self.city, self.state, self.zip));

        out
    }
}

/// Raw address form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressForm {
    /// Optional label
    pub label: String,

    /// Street address
    pub line1: String,

    /// Apartment, suite, etc.
    pub line2: String,

    /// City
    pub city: String,

    /// State
    pub state: String,

    /// ZIP code
    pub zip: String,

    /// Country
    pub country: String,

    /// Mark as the default address
    pub is_default: bool,
}

impl AddressForm {
    /// Validate every field and build an address with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] naming each field that failed.
    pub fn validate(&self, id: impl Into<String>) -> Result<Address, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.check(
            has_min_chars(&self.line1, 3),
            "line1",
            "Street address must be at least 3 characters.",
        );
        errors.check(
            has_min_chars(&self.city, 2),
            "city",
            "City must be at least 2 characters.",
        );
        errors.check(
            has_min_chars(&self.state, 2),
            "state",
            "State must be at least 2 characters.",
        );
        errors.check(is_zip(self.zip.trim()), "zip", "Invalid ZIP code format.");

        errors.into_result(Address {
            id: id.into(),
            label: optional(&self.label),
            line1: self.line1.trim().to_string(),
            line2: optional(&self.line2),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip: self.zip.trim().to_string(),
            country: optional(&self.country),
            is_default: self.is_default,
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();

    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// An address id that is already in the book.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Duplicate address id: {0}")]
pub struct DuplicateAddressId(pub String);

/// The saved addresses of one checkout session.
#[derive(Debug, Clone, Default)]
pub struct AddressBook {
    addresses: Vec<Address>,
    next_id: u64,
}

impl AddressBook {
    /// Create an empty address book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an address book from already validated addresses, in order.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateAddressId`] if two addresses share an id.
    pub fn with_addresses(
        addresses: impl IntoIterator<Item = Address>,
    ) -> Result<Self, DuplicateAddressId> {
        let mut book = Self::new();

        for address in addresses {
            book.insert(address)?;
        }

        Ok(book)
    }

    /// Store an already validated address under its own id.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateAddressId`] if the id is taken; the book is unchanged.
    pub fn insert(&mut self, address: Address) -> Result<(), DuplicateAddressId> {
        if self.contains(&address.id) {
            return Err(DuplicateAddressId(address.id));
        }

        self.addresses.push(address);
        self.next_id = self.next_id.saturating_add(1);

        Ok(())
    }

    /// Validate a form and store the resulting address under a fresh id, returning that id.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] if the form is invalid; nothing is stored.
    pub fn add(&mut self, form: &AddressForm) -> Result<String, ValidationErrors> {
        let id = self.fresh_id();
        let address = form.validate(id.clone())?;

        self.addresses.push(address);
        self.next_id = self.next_id.saturating_add(1);

        Ok(id)
    }

    /// Remove an address. Returns the removed address, if it existed.
    pub fn remove(&mut self, id: &str) -> Option<Address> {
        let index = self.addresses.iter().position(|address| address.id == id)?;

        Some(self.addresses.remove(index))
    }

    /// Look up an address by id.
    pub fn get(&self, id: &str) -> Option<&Address> {
        self.addresses.iter().find(|address| address.id == id)
    }

    /// Whether an address with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// The first address flagged as default.
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|address| address.is_default)
    }

    /// The address to pre-select: the default one, otherwise the first saved one.
    pub fn preferred(&self) -> Option<&Address> {
        self.default_address().or_else(|| self.addresses.first())
    }

    /// Iterate over saved addresses in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.addresses.iter()
    }

    /// Number of saved addresses.
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// True when no address is saved.
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    fn fresh_id(&self) -> String {
        let mut n = self.next_id.saturating_add(1);

        loop {
            let id = format!("addr{n}");

            if !self.contains(&id) {
                return id;
            }

            n = n.saturating_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn home_form() -> AddressForm {
        AddressForm {
            label: "Home".to_string(),
            line1: "123 Main St".to_string(),
            city: "Anytown".to_string(),
            state: "CA".to_string(),
            zip: "90210".to_string(),
            is_default: true,
            ..AddressForm::default()
        }
    }

    #[test]
    fn validate_builds_address_and_drops_blank_optionals() -> TestResult {
        let address = home_form().validate("addr1")?;

        assert_eq!(address.id(), "addr1");
        assert_eq!(address.label(), Some("Home"));
        assert_eq!(address.line2(), None);
        assert_eq!(address.country(), None);
        assert!(address.is_default());
        assert_eq!(address.one_line(), "123 Main St, Anytown, CA 90210");

        Ok(())
    }

    #[test]
    fn validate_reports_every_bad_field() {
        let form = AddressForm {
            line1: "12".to_string(),
            city: "A".to_string(),
            state: " ".to_string(),
            zip: "9021".to_string(),
            ..AddressForm::default()
        };

        let Err(errors) = form.validate("addr1") else {
            panic!("expected validation errors");
        };

        assert_eq!(errors.len(), 4);
        assert!(errors.has("line1"));
        assert!(errors.has("city"));
        assert!(errors.has("state"));
        assert_eq!(errors.message_for("zip"), Some("Invalid ZIP code format."));
    }

    #[test]
    fn validate_accepts_zip_plus_four() -> TestResult {
        let form = AddressForm {
            zip: "10001-0001".to_string(),
            line2: "Suite 100".to_string(),
            ..home_form()
        };

        let address = form.validate("addr2")?;

        assert_eq!(address.zip(), "10001-0001");
        assert_eq!(address.line2(), Some("Suite 100"));
        assert_eq!(
            address.one_line(),
            "123 Main St, Suite 100, Anytown, CA 10001-0001"
        );

        Ok(())
    }

    #[test]
    fn add_assigns_unique_ids() -> TestResult {
        let mut book = AddressBook::new();

        let first = book.add(&home_form())?;
        let second = book.add(&home_form())?;

        assert_ne!(first, second);
        assert_eq!(book.len(), 2);

        Ok(())
    }

    #[test]
    fn add_invalid_form_stores_nothing() {
        let mut book = AddressBook::new();
        let form = AddressForm::default();

        assert!(book.add(&form).is_err());
        assert!(book.is_empty());
    }

    #[test]
    fn add_skips_ids_already_in_use() -> TestResult {
        let existing = home_form().validate("addr1")?;
        let mut book = AddressBook::with_addresses(vec![existing])?;

        let added = book.add(&home_form())?;

        assert_eq!(added, "addr2");

        Ok(())
    }

    #[test]
    fn preferred_is_default_then_first() -> TestResult {
        let work = AddressForm {
            is_default: false,
            ..home_form()
        };

        let book = AddressBook::with_addresses(vec![
            work.validate("work")?,
            home_form().validate("home")?,
        ])?;

        assert_eq!(book.preferred().map(Address::id), Some("home"));

        let no_default = AddressBook::with_addresses(vec![work.validate("work")?])?;

        assert_eq!(no_default.preferred().map(Address::id), Some("work"));
        assert!(AddressBook::new().preferred().is_none());

        Ok(())
    }

    #[test]
    fn remove_existing_and_missing() -> TestResult {
        let mut book = AddressBook::with_addresses(vec![home_form().validate("home")?])?;

        let removed = book.remove("home");

        assert_eq!(removed.as_ref().map(Address::id), Some("home"));
        assert!(book.remove("home").is_none());
        assert!(book.is_empty());

        Ok(())
    }

    #[test]
    fn repeated_ids_are_refused() -> TestResult {
        let result = AddressBook::with_addresses(vec![
            home_form().validate("home")?,
            home_form().validate("home")?,
        ]);

        assert_eq!(result.err(), Some(DuplicateAddressId("home".to_string())));

        let mut book = AddressBook::with_addresses(vec![home_form().validate("home")?])?;

        assert!(book.insert(home_form().validate("home")?).is_err());
        assert_eq!(book.len(), 1);
        assert!(book.insert(home_form().validate("cabin")?).is_ok());
        assert_eq!(book.iter().map(Address::id).collect::<Vec<_>>(), ["home", "cabin"]);

        Ok(())
    }
}
