//! Address Fixtures

use serde::Deserialize;

use crate::{
    addresses::{Address, AddressForm},
    fixtures::FixtureError,
};

/// Wrapper for addresses in YAML
#[derive(Debug, Deserialize)]
pub struct AddressesFixture {
    /// Saved addresses, in order
    pub addresses: Vec<AddressFixture>,
}

/// Address fixture, validated like form input on load
#[derive(Debug, Deserialize)]
pub struct AddressFixture {
    /// Address id
    pub id: String,

    /// Label, e.g. "Home"
    #[serde(default)]
    pub label: String,

    /// Street address
    pub line1: String,

    /// Apartment, suite, etc.
    #[serde(default)]
    pub line2: String,

    /// City
    pub city: String,

    /// State
    pub state: String,

    /// ZIP code
    pub zip: String,

    /// Country
    #[serde(default)]
    pub country: String,

    /// Default address flag
    #[serde(default)]
    pub default: bool,
}

impl TryFrom<AddressFixture> for Address {
    type Error = FixtureError;

    fn try_from(fixture: AddressFixture) -> Result<Self, Self::Error> {
        let form = AddressForm {
            label: fixture.label,
            line1: fixture.line1,
            line2: fixture.line2,
            city: fixture.city,
            state: fixture.state,
            zip: fixture.zip,
            country: fixture.country,
            is_default: fixture.default,
        };

        form.validate(fixture.id.clone())
            .map_err(|source| FixtureError::InvalidAddress {
                id: fixture.id,
                source,
            })
    }
}
