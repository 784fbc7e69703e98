//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    addresses::{Address, AddressBook, AddressForm, DuplicateAddressId},
    cart::{Cart, CartError, LineItem},
    catalog::{
        CatalogError, CuisineSelection, InMemoryDirectory, MenuItem, Restaurant,
        RestaurantDirectory, filter_restaurants,
    },
    checkout::{CheckoutSession, GateRejection, SessionError, can_place_order},
    fixtures::{Fixture, FixtureError},
    orders::{ActiveParty, OrderStatus, PlacedOrder, StatusTone, TrackedOrder},
    payment::{CardDetails, CardForm, PaymentMethod},
    pricing::{DeliveryFeePolicy, OrderTotals, PricingError, format_amount},
    promotions::{AppliedPromotion, DuplicatePromoCode, PromoEngine, PromoRejection},
    receipt::{Receipt, ReceiptError},
    validation::{FieldError, ValidationErrors},
};
