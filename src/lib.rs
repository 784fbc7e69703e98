//! Storefront
//!
//! Checkout core of a food-delivery storefront: cart, promo codes, delivery fee and totals, the
//! address and payment gate in front of order placement, and the order status projection used
//! by tracking.

pub mod addresses;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod fixtures;
pub mod observability;
pub mod orders;
pub mod payment;
pub mod prelude;
pub mod pricing;
pub mod promotions;
pub mod receipt;
pub mod validation;
