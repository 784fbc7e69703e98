//! Fixtures
//!
//! Sample data sets stored as YAML under `<base>/<category>/<set>.yml`, one file per category:
//! `restaurants`, `addresses`, `carts`, `orders` and `promotions`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rusty_money::iso::Currency;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{
    addresses::{Address, AddressBook, DuplicateAddressId},
    cart::{Cart, CartError, LineItem},
    catalog::{CatalogError, InMemoryDirectory, Restaurant},
    fixtures::{
        addresses::AddressesFixture, carts::CartFixture, orders::OrdersFixture,
        promotions::PromotionsFixture, restaurants::RestaurantsFixture,
    },
    orders::TrackedOrder,
    promotions::{DuplicatePromoCode, PromoEngine},
    validation::ValidationErrors,
};

pub mod addresses;
pub mod carts;
pub mod orders;
pub mod prices;
pub mod promotions;
pub mod restaurants;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,

        /// Underlying error
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between prices
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No prices loaded yet
    #[error("No prices loaded yet; currency unknown")]
    NoCurrency,

    /// An address failed validation
    #[error("Invalid address {id}: {source}")]
    InvalidAddress {
        /// Address id from the fixture
        id: String,

        /// Field errors
        source: ValidationErrors,
    },

    /// Two addresses share an id
    #[error(transparent)]
    DuplicateAddress(#[from] DuplicateAddressId),

    /// Two promo codes are the same once case and whitespace are ignored
    #[error(transparent)]
    DuplicatePromoCode(#[from] DuplicatePromoCode),

    /// A cart line was rejected
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The restaurants could not be indexed
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// A loaded fixture set.
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    restaurants: Vec<Restaurant>,
    addresses: AddressBook,
    cart_lines: Vec<LineItem>,
    orders: Vec<TrackedOrder>,
    promo_engine: Option<PromoEngine>,

    /// Currency shared by every price in the set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            restaurants: Vec::new(),
            addresses: AddressBook::new(),
            cart_lines: Vec::new(),
            orders: Vec::new(),
            promo_engine: None,
            currency: None,
        }
    }

    /// Load restaurants and their menus
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a menu price is invalid.
    pub fn load_restaurants(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: RestaurantsFixture = self.read("restaurants", name)?;

        for restaurant in fixture.restaurants {
            let restaurant = restaurant.try_into_restaurant(&mut self.currency)?;

            self.restaurants.push(restaurant);
        }

        Ok(self)
    }

    /// Load saved addresses
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, an address is invalid, or an id is
    /// already taken.
    pub fn load_addresses(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: AddressesFixture = self.read("addresses", name)?;

        for address in fixture.addresses {
            self.addresses.insert(Address::try_from(address)?)?;
        }

        Ok(self)
    }

    /// Load the initial cart lines
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a price is invalid.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: CartFixture = self.read("carts", name)?;

        for line in fixture.items {
            let (price, currency) = prices::parse_price(&line.price)?;

            track_currency(&mut self.currency, currency)?;

            let mut item = LineItem::new(line.id, line.name, price, line.quantity)?;

            if let Some(image) = line.image {
                item = item.with_image_ref(image);
            }

            self.cart_lines.push(item);
        }

        Ok(self)
    }

    /// Load the order history
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a total is invalid.
    pub fn load_orders(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: OrdersFixture = self.read("orders", name)?;

        for order in fixture.orders {
            let (total, currency) = prices::parse_price(&order.total)?;

            track_currency(&mut self.currency, currency)?;

            let mut tracked = TrackedOrder::new(
                order.number,
                order.restaurant,
                order.status,
                order.item_count,
                total,
            );

            if let Some(agent) = order.agent {
                tracked = tracked.with_agent(agent);
            }

            if let Some(placed_on) = order.placed_on {
                tracked = tracked.with_placed_on(placed_on);
            }

            if let Some(estimate) = order.estimated_delivery {
                tracked = tracked.with_estimated_delivery(estimate);
            }

            self.orders.push(tracked);
        }

        Ok(self)
    }

    /// Load the promo code rule table
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a rate is invalid, or two codes
    /// only differ by case.
    pub fn load_promotions(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: PromotionsFixture = self.read("promotions", name)?;

        self.promo_engine = Some(PromoEngine::try_from(fixture)?);

        Ok(self)
    }

    /// Load a complete fixture set (every category with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in("./fixtures", name)
    }

    /// Load a complete fixture set from a custom base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture
            .load_restaurants(name)?
            .load_addresses(name)?
            .load_cart(name)?
            .load_orders(name)?
            .load_promotions(name)?;

        Ok(fixture)
    }

    /// Restaurants as a directory
    ///
    /// # Errors
    ///
    /// Returns an error if two restaurants share a slug.
    pub fn directory(&self) -> Result<InMemoryDirectory, FixtureError> {
        Ok(InMemoryDirectory::with_restaurants(
            self.restaurants.iter().cloned(),
        )?)
    }

    /// Saved addresses as an address book
    pub fn address_book(&self) -> AddressBook {
        self.addresses.clone()
    }

    /// A cart holding the loaded lines
    ///
    /// # Errors
    ///
    /// Returns an error if no prices were loaded, so the currency is unknown.
    pub fn cart(&self) -> Result<Cart, FixtureError> {
        Ok(Cart::with_items(self.cart_lines.iter().cloned(), self.currency()?))
    }

    /// Loaded order history
    pub fn orders(&self) -> &[TrackedOrder] {
        &self.orders
    }

    /// The promo rule table, or the default table when none was loaded
    pub fn promo_engine(&self) -> PromoEngine {
        self.promo_engine.clone().unwrap_or_default()
    }

    /// Get the currency shared by the fixture set
    ///
    /// # Errors
    ///
    /// Returns an error if no prices were loaded.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    fn read<T: DeserializeOwned>(&self, category: &str, name: &str) -> Result<T, FixtureError> {
        let file_path = self.base_path.join(category).join(format!("{name}.yml"));

        let contents = read_file(&file_path)?;

        Ok(serde_norway::from_str(&contents)?)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

fn read_file(path: &Path) -> Result<String, FixtureError> {
    fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Record the currency of a price, failing if it differs from one seen earlier.
pub(crate) fn track_currency(
    current: &mut Option<&'static Currency>,
    currency: &'static Currency,
) -> Result<(), FixtureError> {
    if let Some(existing) = *current {
        if existing != currency {
            return Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            ));
        }
    } else {
        *current = Some(currency);
    }

    Ok(())
}
