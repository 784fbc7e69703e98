//! Cart Fixtures

use serde::Deserialize;

/// Wrapper for cart lines in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Lines in insertion order
    pub items: Vec<CartLineFixture>,
}

/// Cart line fixture
#[derive(Debug, Deserialize)]
pub struct CartLineFixture {
    /// Line id
    pub id: String,

    /// Item name
    pub name: String,

    /// Unit price (e.g., "12.99 USD")
    pub price: String,

    /// Quantity, clamped to at least one
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Image reference
    #[serde(default)]
    pub image: Option<String>,
}

fn default_quantity() -> u32 {
    1
}
