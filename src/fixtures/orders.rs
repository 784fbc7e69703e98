//! Order History Fixtures

use serde::Deserialize;

use crate::orders::{DeliveryAgent, OrderStatus};

/// Wrapper for past orders in YAML
#[derive(Debug, Deserialize)]
pub struct OrdersFixture {
    /// Orders, newest first
    pub orders: Vec<OrderFixture>,
}

/// Past order fixture
#[derive(Debug, Deserialize)]
pub struct OrderFixture {
    /// Order number
    pub number: String,

    /// Restaurant name
    pub restaurant: String,

    /// Status identifier, e.g. `out-for-delivery`
    pub status: OrderStatus,

    /// Number of items
    #[serde(default)]
    pub item_count: u32,

    /// Order total (e.g., "45.99 USD")
    pub total: String,

    /// Date placed, e.g. `2024-07-20`
    #[serde(default)]
    pub placed_on: Option<String>,

    /// Estimated delivery time
    #[serde(default)]
    pub estimated_delivery: Option<String>,

    /// Assigned rider
    #[serde(default)]
    pub agent: Option<DeliveryAgent>,
}
