//! Checkout
//!
//! The checkout gate decides whether an order may be placed from the current cart, address
//! selection and payment details. [`CheckoutSession`] owns that state for one customer and is
//! the only place an order is actually placed.

use thiserror::Error;
use tracing::{Span, debug, info, warn};

use crate::{
    addresses::{Address, AddressBook, AddressForm},
    cart::{Cart, CartError},
    orders::PlacedOrder,
    payment::{CardForm, PaymentMethod},
    pricing::{DeliveryFeePolicy, OrderTotals},
    promotions::{AppliedPromotion, PromoEngine, PromoRejection},
    validation::ValidationErrors,
};

/// Reasons the gate refuses to place an order, in the order they are checked.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    /// The cart has no lines.
    #[error("Your cart is empty.")]
    EmptyCart,

    /// No delivery address is selected.
    #[error("Please select a delivery address.")]
    NoAddressSelected,

    /// Paying by card without valid card details.
    #[error("Please correct the errors in your payment details.")]
    InvalidCardDetails,
}

/// Errors raised by [`CheckoutSession`] operations.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    /// The address id is not in the address book.
    #[error("Unknown address: {0}")]
    UnknownAddress(String),

    /// A form failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// A promo code was refused.
    #[error(transparent)]
    Promo(#[from] PromoRejection),

    /// The checkout gate refused the order.
    #[error(transparent)]
    Gate(#[from] GateRejection),

    /// The cart refused an item.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Decide whether an order may be placed.
///
/// Checks run in a fixed order: an empty cart is reported first regardless of anything else,
/// then a missing address, then card details when paying by card.
///
/// # Errors
///
/// Returns the first [`GateRejection`] that applies.
pub fn can_place_order(
    cart: &Cart,
    selected_address: Option<&str>,
    payment_method: PaymentMethod,
    card: Option<&CardForm>,
) -> Result<(), GateRejection> {
    if cart.is_empty() {
        return Err(GateRejection::EmptyCart);
    }

    if selected_address.is_none() {
        return Err(GateRejection::NoAddressSelected);
    }

    if payment_method.requires_card() && !card.is_some_and(|form| form.validate().is_ok()) {
        return Err(GateRejection::InvalidCardDetails);
    }

    Ok(())
}

/// Checkout state for one customer.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    cart: Cart,
    addresses: AddressBook,
    selected_address: Option<String>,
    payment_method: PaymentMethod,
    card_form: Option<CardForm>,
    promotion: Option<AppliedPromotion>,
    promo_engine: PromoEngine,
    delivery_fee: DeliveryFeePolicy,
    orders_placed: u64,
}

impl CheckoutSession {
    /// Start a session, pre-selecting the default address or else the first one.
    pub fn new(cart: Cart, addresses: AddressBook) -> Self {
        let selected_address = addresses.preferred().map(|address| address.id().to_string());

        Self {
            cart,
            addresses,
            selected_address,
            payment_method: PaymentMethod::default(),
            card_form: None,
            promotion: None,
            promo_engine: PromoEngine::default(),
            delivery_fee: DeliveryFeePolicy::default(),
            orders_placed: 0,
        }
    }

    /// Use a different promo rule table.
    #[must_use]
    pub fn with_promo_engine(mut self, promo_engine: PromoEngine) -> Self {
        self.promo_engine = promo_engine;
        self
    }

    /// Use a different delivery fee policy.
    #[must_use]
    pub fn with_delivery_fee(mut self, delivery_fee: DeliveryFeePolicy) -> Self {
        self.delivery_fee = delivery_fee;
        self
    }

    /// Returns the cart
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Mutable access to the cart. An applied promotion keeps its discount.
    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Returns the address book
    pub fn addresses(&self) -> &AddressBook {
        &self.addresses
    }

    /// Returns the selected address id
    pub fn selected_address_id(&self) -> Option<&str> {
        self.selected_address.as_deref()
    }

    /// Returns the selected address
    pub fn selected_address(&self) -> Option<&Address> {
        self.selected_address
            .as_deref()
            .and_then(|id| self.addresses.get(id))
    }

    /// Returns the payment method
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Returns the card form, if one was entered
    pub fn card_form(&self) -> Option<&CardForm> {
        self.card_form.as_ref()
    }

    /// Returns the applied promotion
    pub fn promotion(&self) -> Option<&AppliedPromotion> {
        self.promotion.as_ref()
    }

    /// Number of orders placed in this session.
    pub fn orders_placed(&self) -> u64 {
        self.orders_placed
    }

    /// Select a saved address.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownAddress`] if no address has this id; the selection is
    /// left unchanged.
    pub fn select_address(&mut self, id: &str) -> Result<(), SessionError> {
        if !self.addresses.contains(id) {
            return Err(SessionError::UnknownAddress(id.to_string()));
        }

        self.selected_address = Some(id.to_string());

        Ok(())
    }

    /// Validate and save a new address, then select it. Returns the new id.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] if the form is invalid; nothing changes.
    pub fn add_address(&mut self, form: &AddressForm) -> Result<String, ValidationErrors> {
        let id = self.addresses.add(form).inspect_err(|errors| {
            debug!(error_count = errors.len(), "rejected address form");
        })?;

        info!(address_id = %id, "added address");

        self.selected_address = Some(id.clone());

        Ok(id)
    }

    /// Remove a saved address. If it was selected, the selection falls back to the default
    /// address or else the first one.
    pub fn remove_address(&mut self, id: &str) -> Option<Address> {
        let removed = self.addresses.remove(id)?;

        if self.selected_address.as_deref() == Some(id) {
            self.selected_address = self
                .addresses
                .preferred()
                .map(|address| address.id().to_string());
        }

        Some(removed)
    }

    /// Choose how to pay.
    pub fn set_payment_method(&mut self, payment_method: PaymentMethod) {
        self.payment_method = payment_method;
    }

    /// Store the card form as entered. It is validated by the gate.
    pub fn set_card_form(&mut self, form: CardForm) {
        self.card_form = Some(form);
    }

    /// Forget any entered card details.
    pub fn clear_card_form(&mut self) {
        self.card_form = None;
    }

    /// Apply a promo code against the current subtotal.
    ///
    /// On success the discount is frozen until the code is applied again or cleared. A refused
    /// code also removes any promotion applied earlier.
    ///
    /// # Errors
    ///
    /// Returns [`PromoRejection::InvalidCode`] for unknown codes.
    pub fn apply_promo(&mut self, code: &str) -> Result<&AppliedPromotion, PromoRejection> {
        match self.promo_engine.apply(code, self.cart.subtotal()) {
            Ok(applied) => {
                info!(
                    code = applied.code(),
                    discount = %applied.discount(),
                    "applied promo code"
                );

                Ok(self.promotion.insert(applied))
            }
            Err(rejection) => {
                warn!(code, "rejected promo code");

                self.promotion = None;

                Err(rejection)
            }
        }
    }

    /// Remove the applied promotion.
    pub fn clear_promo(&mut self) {
        self.promotion = None;
    }

    /// Whether the cart changed since the promotion was applied.
    pub fn promotion_is_stale(&self) -> bool {
        self.promotion
            .as_ref()
            .is_some_and(|promotion| promotion.is_stale(self.cart.subtotal()))
    }

    /// Totals from the current subtotal and the frozen discount.
    pub fn totals(&self) -> OrderTotals {
        let discount = self
            .promotion
            .as_ref()
            .map(AppliedPromotion::discount)
            .unwrap_or_default();

        OrderTotals::compute(self.cart.subtotal(), discount, &self.delivery_fee)
    }

    /// Run the checkout gate over the current state.
    ///
    /// # Errors
    ///
    /// Returns the first [`GateRejection`] that applies.
    pub fn check(&self) -> Result<(), GateRejection> {
        can_place_order(
            &self.cart,
            self.selected_address.as_deref(),
            self.payment_method,
            self.card_form.as_ref(),
        )
    }

    /// Place the order.
    ///
    /// Runs the gate, snapshots the order, then clears the cart and the applied promotion.
    /// Calling again without refilling the cart is refused with [`GateRejection::EmptyCart`].
    ///
    /// # Errors
    ///
    /// Returns the first [`GateRejection`] that applies; nothing changes.
    #[tracing::instrument(
        name = "checkout.session.place_order",
        skip(self),
        fields(
            payment_method = %self.payment_method,
            line_count = self.cart.len(),
            order_number = tracing::field::Empty
        ),
        err
    )]
    pub fn place_order(&mut self) -> Result<PlacedOrder, GateRejection> {
        self.check()?;

        let address = self
            .selected_address()
            .cloned()
            .ok_or(GateRejection::NoAddressSelected)?;

        let totals = self.totals();

        self.orders_placed = self.orders_placed.saturating_add(1);

        let order = PlacedOrder::new(
            self.orders_placed,
            self.cart.iter().cloned().collect(),
            self.cart.currency(),
            address,
            self.payment_method,
            self.promotion.take(),
            totals,
        );

        self.cart.clear();

        Span::current().record("order_number", order.number());

        info!(
            order_number = order.number(),
            total = %totals.total(),
            "placed order"
        );

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{cart::LineItem, orders::OrderStatus};

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

    fn work_form() -> AddressForm {
        AddressForm {
            label: "Work".to_string(),
            line1: "456 Office Ave".to_string(),
            line2: "Suite 100".to_string(),
            city: "Busytown".to_string(),
            state: "NY".to_string(),
            zip: "10001".to_string(),
            ..AddressForm::default()
        }
    }

    fn valid_card() -> CardForm {
        CardForm {
            holder_name: "John Doe".to_string(),
            card_number: "4242424242424242".to_string(),
            expiry: "08/29".to_string(),
            cvv: "123".to_string(),
        }
    }

    fn cart_with(cents: i64) -> Result<Cart, CartError> {
        Ok(Cart::with_items(
            [LineItem::new("1", "Thing", Decimal::new(cents, 2), 1)?],
            USD,
        ))
    }

    fn book() -> TestResult<AddressBook> {
        Ok(AddressBook::with_addresses(vec![
            home_form().validate("addr1")?,
            work_form().validate("addr2")?,
        ])?)
    }

    fn ready_session() -> TestResult<CheckoutSession> {
        let mut session = CheckoutSession::new(cart_with(15_99)?, book()?);

        session.set_card_form(valid_card());

        Ok(session)
    }

    #[test]
    fn gate_reports_empty_cart_first() {
        for method in [
            PaymentMethod::CreditCard,
            PaymentMethod::CashOnDelivery,
            PaymentMethod::PayPal,
        ] {
            for address in [None, Some("addr1")] {
                assert_eq!(
                    can_place_order(&Cart::new(USD), address, method, None),
                    Err(GateRejection::EmptyCart)
                );
            }
        }
    }

    #[test]
    fn gate_requires_address() -> TestResult {
        let cart = cart_with(100)?;

        assert_eq!(
            can_place_order(&cart, None, PaymentMethod::CashOnDelivery, None),
            Err(GateRejection::NoAddressSelected)
        );

        Ok(())
    }

    #[test]
    fn gate_checks_card_only_for_credit_card() -> TestResult {
        let cart = cart_with(100)?;
        let bad_card = CardForm {
            card_number: "1234".to_string(),
            ..valid_card()
        };

        assert_eq!(
            can_place_order(&cart, Some("addr1"), PaymentMethod::CreditCard, None),
            Err(GateRejection::InvalidCardDetails)
        );
        assert_eq!(
            can_place_order(&cart, Some("addr1"), PaymentMethod::CreditCard, Some(&bad_card)),
            Err(GateRejection::InvalidCardDetails)
        );
        assert_eq!(
            can_place_order(&cart, Some("addr1"), PaymentMethod::CreditCard, Some(&valid_card())),
            Ok(())
        );

        for method in [PaymentMethod::CashOnDelivery, PaymentMethod::PayPal] {
            assert_eq!(can_place_order(&cart, Some("addr1"), method, None), Ok(()));
            assert_eq!(
                can_place_order(&cart, Some("addr1"), method, Some(&bad_card)),
                Ok(())
            );
        }

        Ok(())
    }

    #[test]
    fn gate_rejections_have_distinct_messages() {
        let messages = [
            GateRejection::EmptyCart.to_string(),
            GateRejection::NoAddressSelected.to_string(),
            GateRejection::InvalidCardDetails.to_string(),
        ];

        assert_ne!(messages[0], messages[1]);
        assert_ne!(messages[1], messages[2]);
        assert_ne!(messages[0], messages[2]);
    }

    #[test]
    fn new_session_selects_default_then_first() -> TestResult {
        let session = CheckoutSession::new(Cart::new(USD), book()?);

        assert_eq!(session.selected_address_id(), Some("addr1"));

        let no_default = AddressBook::with_addresses(vec![work_form().validate("addr2")?])?;
        let session = CheckoutSession::new(Cart::new(USD), no_default);

        assert_eq!(session.selected_address_id(), Some("addr2"));

        let session = CheckoutSession::new(Cart::new(USD), AddressBook::new());

        assert_eq!(session.selected_address_id(), None);

        Ok(())
    }

    #[test]
    fn select_unknown_address_is_an_error() -> TestResult {
        let mut session = ready_session()?;

        assert_eq!(
            session.select_address("addr9"),
            Err(SessionError::UnknownAddress("addr9".to_string()))
        );
        assert_eq!(session.selected_address_id(), Some("addr1"));

        session.select_address("addr2")?;

        assert_eq!(session.selected_address_id(), Some("addr2"));

        Ok(())
    }

    #[test]
    fn add_address_selects_it() -> TestResult {
        let mut session = ready_session()?;
        let form = AddressForm {
            line1: "789 Side Rd".to_string(),
            is_default: false,
            ..home_form()
        };

        let id = session.add_address(&form)?;

        assert_eq!(session.selected_address_id(), Some(id.as_str()));
        assert_eq!(session.addresses().len(), 3);

        Ok(())
    }

    #[test]
    fn add_invalid_address_keeps_selection() -> TestResult {
        let mut session = ready_session()?;

        assert!(session.add_address(&AddressForm::default()).is_err());
        assert_eq!(session.selected_address_id(), Some("addr1"));
        assert_eq!(session.addresses().len(), 2);

        Ok(())
    }

    #[test]
    fn removing_selected_address_falls_back() -> TestResult {
        let mut session = ready_session()?;

        session.select_address("addr2")?;
        session.remove_address("addr2");

        assert_eq!(session.selected_address_id(), Some("addr1"));

        session.remove_address("addr1");

        assert_eq!(session.selected_address_id(), None);
        assert_eq!(session.check(), Err(GateRejection::NoAddressSelected));

        Ok(())
    }

    #[test]
    fn rejected_promo_clears_previous_one() -> TestResult {
        let mut session = ready_session()?;

        session.apply_promo("save10")?;

        assert!(session.promotion().is_some());
        assert_eq!(
            session.apply_promo("FREEFOOD"),
            Err(PromoRejection::InvalidCode("FREEFOOD".to_string()))
        );
        assert!(session.promotion().is_none());
        assert_eq!(session.totals().discount(), Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn discount_stays_frozen_when_cart_changes() -> TestResult {
        let mut session = ready_session()?;

        session.apply_promo("SAVE10")?;
        session.cart_mut().set_quantity("1", 3);

        assert!(session.promotion_is_stale());
        assert_eq!(session.totals().discount(), Decimal::new(1_599, 3));

        session.apply_promo("SAVE10")?;

        assert!(!session.promotion_is_stale());
        assert_eq!(session.totals().discount(), Decimal::new(4_797, 3));

        Ok(())
    }

    #[test]
    fn totals_with_save10() -> TestResult {
        let mut session = ready_session()?;

        session.apply_promo("SAVE10")?;

        let totals = session.totals();

        assert_eq!(totals.subtotal(), Decimal::new(15_99, 2));
        assert_eq!(totals.discount(), Decimal::new(1_599, 3));
        assert_eq!(totals.delivery_fee(), Decimal::new(5_00, 2));
        assert_eq!(totals.total(), Decimal::new(19_391, 3));

        Ok(())
    }

    #[test]
    fn place_order_snapshots_and_clears() -> TestResult {
        let mut session = ready_session()?;

        session.apply_promo("SAVE10")?;

        let order = session.place_order()?;

        assert_eq!(order.number(), "FD000001");
        assert_eq!(order.status(), OrderStatus::Processing);
        assert_eq!(order.lines().len(), 1);
        assert_eq!(order.address().id(), "addr1");
        assert_eq!(order.payment_method(), PaymentMethod::CreditCard);
        assert_eq!(order.promotion().map(AppliedPromotion::code), Some("SAVE10"));
        assert_eq!(order.totals().total(), Decimal::new(19_391, 3));

        assert!(session.cart().is_empty());
        assert!(session.promotion().is_none());
        assert_eq!(session.orders_placed(), 1);

        Ok(())
    }

    #[test]
    fn second_placement_is_rejected() -> TestResult {
        let mut session = ready_session()?;

        session.place_order()?;

        assert_eq!(session.place_order(), Err(GateRejection::EmptyCart));
        assert_eq!(session.orders_placed(), 1);

        Ok(())
    }

    #[test]
    fn refused_placement_changes_nothing() -> TestResult {
        let mut session = ready_session()?;

        session.set_card_form(CardForm {
            card_number: "1234".to_string(),
            ..valid_card()
        });
        session.apply_promo("SAVE10")?;

        assert_eq!(session.place_order(), Err(GateRejection::InvalidCardDetails));
        assert_eq!(session.cart().len(), 1);
        assert!(session.promotion().is_some());
        assert_eq!(session.orders_placed(), 0);

        session.set_payment_method(PaymentMethod::CashOnDelivery);

        assert_eq!(session.place_order()?.number(), "FD000001");

        Ok(())
    }

    #[test]
    fn order_numbers_increase_per_session() -> TestResult {
        let mut session = ready_session()?;

        session.place_order()?;
        session.cart_mut().add_or_update(LineItem::new("2", "More", Decimal::ONE, 1)?);

        assert_eq!(session.place_order()?.number(), "FD000002");

        Ok(())
    }
}
