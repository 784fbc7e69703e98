//! Orders
//!
//! Placed order snapshots and the read-only projection of an order's status onto what the
//! tracking view shows: progress, badge tone, who is currently handling the order and whether
//! the route and reorder actions are available.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    addresses::Address, cart::LineItem, payment::PaymentMethod, pricing::OrderTotals,
    promotions::AppliedPromotion,
};

/// Lifecycle of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    /// Received, not yet accepted by the kitchen
    Processing,

    /// Being cooked
    Preparing,

    /// Ready, waiting for a rider to collect it
    AwaitingRider,

    /// Collected and on its way
    OutForDelivery,

    /// Handed to the customer
    Delivered,

    /// Will not be delivered
    Cancelled,
}

/// Who is currently responsible for moving the order along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveParty {
    /// No rider has been assigned yet.
    SearchingForRider,

    /// A rider is assigned but has not picked the order up.
    AgentAssignedNoPickup,

    /// The assigned rider is carrying the order.
    AgentEnRoute,
}

impl ActiveParty {
    /// Short description for the tracking view.
    pub fn describe(self) -> &'static str {
        match self {
            ActiveParty::SearchingForRider => "Searching for a rider",
            ActiveParty::AgentAssignedNoPickup => "Rider assigned, heading to the restaurant",
            ActiveParty::AgentEnRoute => "Rider is on the way to you",
        }
    }
}

/// Colour family of the status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    /// Not yet on the road
    Pending,

    /// On the road
    InTransit,

    /// Delivered
    Complete,

    /// Cancelled
    Failed,
}

impl OrderStatus {
    /// Every status, in lifecycle order with `Cancelled` last.
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Processing,
        OrderStatus::Preparing,
        OrderStatus::AwaitingRider,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Display label, e.g. `Out for Delivery`.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Processing => "Processing",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::AwaitingRider => "Awaiting Rider",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Stable identifier, as used in fixtures.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Processing => "processing",
            OrderStatus::Preparing => "preparing",
            OrderStatus::AwaitingRider => "awaiting-rider",
            OrderStatus::OutForDelivery => "out-for-delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Progress bar position, 0 to 100.
    ///
    /// Strictly increasing along the delivery path. `Cancelled` sits outside that path at 0.
    pub fn progress_percent(self) -> u8 {
        match self {
            OrderStatus::Processing => 10,
            OrderStatus::Preparing => 30,
            OrderStatus::AwaitingRider => 50,
            OrderStatus::OutForDelivery => 75,
            OrderStatus::Delivered => 100,
            OrderStatus::Cancelled => 0,
        }
    }

    /// No further transitions happen from this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Who is handling the order, given whether a rider has been assigned.
    pub fn active_party(self, agent_assigned: bool) -> Option<ActiveParty> {
        match (self, agent_assigned) {
            (OrderStatus::Delivered | OrderStatus::Cancelled, _)
            | (OrderStatus::OutForDelivery, false) => None,
            (OrderStatus::Processing | OrderStatus::Preparing | OrderStatus::AwaitingRider, false) => {
                Some(ActiveParty::SearchingForRider)
            }
            (OrderStatus::Processing | OrderStatus::Preparing | OrderStatus::AwaitingRider, true) => {
                Some(ActiveParty::AgentAssignedNoPickup)
            }
            (OrderStatus::OutForDelivery, true) => Some(ActiveParty::AgentEnRoute),
        }
    }

    /// Badge colour family.
    pub fn tone(self) -> StatusTone {
        match self {
            OrderStatus::Processing | OrderStatus::Preparing | OrderStatus::AwaitingRider => {
                StatusTone::Pending
            }
            OrderStatus::OutForDelivery => StatusTone::InTransit,
            OrderStatus::Delivered => StatusTone::Complete,
            OrderStatus::Cancelled => StatusTone::Failed,
        }
    }

    /// Whether the delivery route map is shown.
    pub fn shows_route(self) -> bool {
        matches!(
            self,
            OrderStatus::AwaitingRider | OrderStatus::OutForDelivery | OrderStatus::Delivered
        )
    }

    /// Whether the order can be placed again from the tracking view.
    pub fn can_reorder(self) -> bool {
        self == OrderStatus::Delivered
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An unrecognised order status.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    /// Accepts either the identifier (`out-for-delivery`) or the label (`Out for Delivery`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();

        OrderStatus::ALL
            .into_iter()
            .find(|status| {
                status.as_str().eq_ignore_ascii_case(wanted)
                    || status.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| UnknownOrderStatus(s.to_string()))
    }
}

/// Rider assigned to an order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeliveryAgent {
    /// Rider name
    pub name: String,

    /// Contact number
    #[serde(default)]
    pub phone: Option<String>,

    /// Vehicle description, e.g. "Scooter"
    #[serde(default)]
    pub vehicle: Option<String>,
}

/// Snapshot of an order taken at placement time.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    number: String,
    lines: Vec<LineItem>,
    currency: &'static Currency,
    address: Address,
    payment_method: PaymentMethod,
    promotion: Option<AppliedPromotion>,
    totals: OrderTotals,
    status: OrderStatus,
}

impl PlacedOrder {
    pub(crate) fn new(
        sequence: u64,
        lines: Vec<LineItem>,
        currency: &'static Currency,
        address: Address,
        payment_method: PaymentMethod,
        promotion: Option<AppliedPromotion>,
        totals: OrderTotals,
    ) -> Self {
        Self {
            number: order_number(sequence),
            lines,
            currency,
            address,
            payment_method,
            promotion,
            totals,
            status: OrderStatus::Processing,
        }
    }

    /// Order number, e.g. `FD000001`
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Lines as they were in the cart
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Currency the order was priced in
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Delivery address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Payment method
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Promotion applied at checkout, if any
    pub fn promotion(&self) -> Option<&AppliedPromotion> {
        self.promotion.as_ref()
    }

    /// Totals at placement
    pub fn totals(&self) -> &OrderTotals {
        &self.totals
    }

    /// Current status
    pub fn status(&self) -> OrderStatus {
        self.status
    }
}

/// Format a session order sequence as an order number.
pub fn order_number(sequence: u64) -> String {
    format!("FD{sequence:06}")
}

/// An order as it appears in the order history and on the tracking page.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedOrder {
    number: String,
    restaurant: String,
    status: OrderStatus,
    agent: Option<DeliveryAgent>,
    item_count: u32,
    total: Decimal,
    placed_on: Option<String>,
    estimated_delivery: Option<String>,
}

impl TrackedOrder {
    /// Create a tracked order.
    pub fn new(
        number: impl Into<String>,
        restaurant: impl Into<String>,
        status: OrderStatus,
        item_count: u32,
        total: Decimal,
    ) -> Self {
        Self {
            number: number.into(),
            restaurant: restaurant.into(),
            status,
            agent: None,
            item_count,
            total,
            placed_on: None,
            estimated_delivery: None,
        }
    }

    /// Assign a rider.
    #[must_use]
    pub fn with_agent(mut self, agent: DeliveryAgent) -> Self {
        self.agent = Some(agent);
        self
    }

    /// Set the date the order was placed, e.g. `2024-07-20`.
    #[must_use]
    pub fn with_placed_on(mut self, date: impl Into<String>) -> Self {
        self.placed_on = Some(date.into());
        self
    }

    /// Set the estimated delivery time, free text such as "12:45".
    #[must_use]
    pub fn with_estimated_delivery(mut self, estimate: impl Into<String>) -> Self {
        self.estimated_delivery = Some(estimate.into());
        self
    }

    /// Returns the order number
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Returns the restaurant name
    pub fn restaurant(&self) -> &str {
        &self.restaurant
    }

    /// Returns the status
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the assigned rider
    pub fn agent(&self) -> Option<&DeliveryAgent> {
        self.agent.as_ref()
    }

    /// Returns the number of items ordered
    pub fn item_count(&self) -> u32 {
        self.item_count
    }

    /// Returns the order total
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Returns the date the order was placed
    pub fn placed_on(&self) -> Option<&str> {
        self.placed_on.as_deref()
    }

    /// Returns the estimated delivery time
    pub fn estimated_delivery(&self) -> Option<&str> {
        self.estimated_delivery.as_deref()
    }

    /// Who is handling the order right now.
    pub fn active_party(&self) -> Option<ActiveParty> {
        self.status.active_party(self.agent.is_some())
    }
}
