//! Storefront configuration

use std::path::PathBuf;

use clap::{Args, Parser};
use thiserror::Error;

use crate::payment::{CardForm, PaymentMethod};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Card details supplied on the command line.
#[derive(Debug, Args)]
pub struct CardConfig {
    /// Name printed on the card
    #[arg(long, env = "STOREFRONT_CARD_HOLDER")]
    pub card_holder: Option<String>,

    /// Card number
    #[arg(long, env = "STOREFRONT_CARD_NUMBER", hide_env_values = true)]
    pub card_number: Option<String>,

    /// Expiry as MM/YY
    #[arg(long, env = "STOREFRONT_CARD_EXPIRY")]
    pub card_expiry: Option<String>,

    /// Security code
    #[arg(long, env = "STOREFRONT_CARD_CVV", hide_env_values = true)]
    pub card_cvv: Option<String>,
}

impl CardConfig {
    /// Card form built from whatever was supplied, or `None` if nothing was.
    pub fn to_form(&self) -> Option<CardForm> {
        if self.card_holder.is_none()
            && self.card_number.is_none()
            && self.card_expiry.is_none()
            && self.card_cvv.is_none()
        {
            return None;
        }

        Some(CardForm {
            holder_name: self.card_holder.clone().unwrap_or_default(),
            card_number: self.card_number.clone().unwrap_or_default(),
            expiry: self.card_expiry.clone().unwrap_or_default(),
            cvv: self.card_cvv.clone().unwrap_or_default(),
        })
    }
}

/// Storefront checkout configuration
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Food delivery storefront checkout", long_about = None)]
pub struct StorefrontConfig {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Directory holding the fixture sets
    #[arg(long, env = "STOREFRONT_FIXTURES_DIR", default_value = "fixtures")]
    pub fixtures_dir: PathBuf,

    /// Fixture set to load
    #[arg(short = 's', long = "set", env = "STOREFRONT_FIXTURE_SET", default_value = "sample")]
    pub fixture_set: String,

    /// Restaurant to order menu items from
    #[arg(short, long)]
    pub restaurant: Option<String>,

    /// Menu item ids to add to the cart, `ID` or `ID=QTY`
    #[arg(short = 'a', long = "add", requires = "restaurant", value_parser = parse_item_arg)]
    pub add_items: Vec<ItemSelection>,

    /// Cuisines to filter the restaurant listing by
    #[arg(long = "cuisine")]
    pub cuisines: Vec<String>,

    /// Search term for the restaurant listing
    #[arg(long)]
    pub search: Option<String>,

    /// Promo code to apply
    #[arg(long = "promo", env = "STOREFRONT_PROMO_CODE")]
    pub promo_code: Option<String>,

    /// Delivery address id; defaults to the default or first saved address
    #[arg(long)]
    pub address: Option<String>,

    /// Payment method
    #[arg(long, value_enum, default_value_t = PaymentMethod::CreditCard)]
    pub payment: PaymentMethod,

    /// Card details.
    #[command(flatten)]
    pub card: CardConfig,

    /// Show the order history with tracking details
    #[arg(long)]
    pub orders: bool,

    /// Place the order after printing the receipt
    #[arg(long)]
    pub place: bool,
}

impl StorefrontConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Whether a restaurant listing was requested.
    pub fn wants_listing(&self) -> bool {
        !self.cuisines.is_empty() || self.search.is_some()
    }
}

/// A menu item requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSelection {
    /// Menu item id
    pub id: String,

    /// Quantity to add, at least one
    pub quantity: u32,
}

/// Reasons an `--add` argument is refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemArgError {
    /// Nothing before the `=`.
    #[error("menu item id is empty")]
    EmptyId,

    /// The quantity is not a whole number of at least one.
    #[error("quantity must be a whole number of at least 1, got {0:?}")]
    InvalidQuantity(String),
}

/// Parse an `ID` or `ID=QTY` argument. A missing quantity means one.
///
/// # Errors
///
/// Returns [`ItemArgError`] for an empty id or a quantity that is not a positive integer.
pub fn parse_item_arg(arg: &str) -> Result<ItemSelection, ItemArgError> {
    let (id, quantity) = match arg.split_once('=') {
        Some((id, quantity)) => {
            let quantity = quantity.trim();
            let parsed = quantity
                .parse::<u32>()
                .ok()
                .filter(|&parsed| parsed >= 1)
                .ok_or_else(|| ItemArgError::InvalidQuantity(quantity.to_string()))?;

            (id.trim(), parsed)
        }
        None => (arg.trim(), 1),
    };

    if id.is_empty() {
        return Err(ItemArgError::EmptyId);
    }

    Ok(ItemSelection {
        id: id.to_string(),
        quantity,
    })
}
