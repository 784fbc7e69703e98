//! Cart

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::catalog::MenuItem;

/// Smallest quantity a line item can hold.
pub const MIN_QUANTITY: u32 = 1;

/// Errors related to cart construction.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A line item was given a negative unit price (item id, price).
    #[error("Item {0} has a negative unit price of {1}")]
    NegativePrice(String, Decimal),
}

/// A single product entry in the cart.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem {
    id: String,
    name: String,
    unit_price: Decimal,
    quantity: u32,
    image_ref: Option<String>,
}

impl LineItem {
    /// Creates a new line item. The quantity is clamped to at least one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NegativePrice`] if `unit_price` is below zero.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
    ) -> Result<Self, CartError> {
        let id = id.into();

        if unit_price < Decimal::ZERO {
            return Err(CartError::NegativePrice(id, unit_price));
        }

        Ok(Self {
            id,
            name: name.into(),
            unit_price,
            quantity: quantity.max(MIN_QUANTITY),
            image_ref: None,
        })
    }

    /// Attach an image reference to the line item.
    #[must_use]
    pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    /// Returns the id of the line item
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name of the line item
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the price of a single unit
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Returns the quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the image reference, if any
    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }

    /// Unit price multiplied by quantity, unrounded.
    pub fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(MIN_QUANTITY);
    }
}

/// An ordered collection of line items with unique ids.
#[derive(Clone, Debug)]
pub struct Cart {
    items: Vec<LineItem>,
    currency: &'static Currency,
}

impl Cart {
    /// Create a new, empty cart.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
        }
    }

    /// Create a cart from the given line items, in order.
    ///
    /// Line items sharing an id are merged: the later entry's quantity wins.
    pub fn with_items(
        items: impl IntoIterator<Item = LineItem>,
        currency: &'static Currency,
    ) -> Self {
        let mut cart = Self::new(currency);

        for item in items {
            cart.add_or_update(item);
        }

        cart
    }

    /// Add a line item, or overwrite the quantity of the existing item with the same id.
    pub fn add_or_update(&mut self, item: LineItem) {
        if let Some(existing) = self.items.iter_mut().find(|line| line.id == item.id) {
            existing.set_quantity(item.quantity);
        } else {
            self.items.push(item);
        }
    }

    /// Add `quantity` of a menu item to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NegativePrice`] if the menu item carries a negative price.
    pub fn add_menu_item(
        &mut self,
        menu_item: &MenuItem,
        quantity: u32,
    ) -> Result<(), CartError> {
        let mut item = LineItem::new(
            menu_item.id(),
            menu_item.name(),
            menu_item.price(),
            quantity,
        )?;

        if let Some(image_ref) = menu_item.image_ref() {
            item = item.with_image_ref(image_ref);
        }

        self.add_or_update(item);

        Ok(())
    }

    /// Set the quantity of an item, clamped to at least one. Unknown ids are ignored.
    pub fn set_quantity(&mut self, id: &str, quantity: u32) {
        if let Some(item) = self.get_mut(id) {
            item.set_quantity(quantity);
        }
    }

    /// Increase the quantity of an item by one.
    pub fn increment(&mut self, id: &str) {
        if let Some(item) = self.get_mut(id) {
            item.set_quantity(item.quantity.saturating_add(1));
        }
    }

    /// Decrease the quantity of an item by one, never below one.
    pub fn decrement(&mut self, id: &str) {
        if let Some(item) = self.get_mut(id) {
            item.set_quantity(item.quantity.saturating_sub(1));
        }
    }

    /// Remove an item from the cart. Returns `true` if an item was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();

        self.items.retain(|item| item.id != id);

        self.items.len() != before
    }

    /// Remove every item from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of unit price times quantity over every line, at full precision.
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(LineItem::total).sum()
    }

    /// Line total for a single item.
    pub fn line_total(&self, id: &str) -> Option<Decimal> {
        self.get(id).map(LineItem::total)
    }

    /// Get an item from the cart.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Iterate over the items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    /// Get the number of line items in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    fn line(id: &str, cents: i64, quantity: u32) -> Result<LineItem, CartError> {
        LineItem::new(id, format!("Item {id}"), Decimal::new(cents, 2), quantity)
    }

    fn test_cart() -> Result<Cart, CartError> {
        Ok(Cart::with_items(
            [line("1", 12_99, 1)?, line("2", 1_50, 2)?, line("3", 4_50, 1)?],
            USD,
        ))
    }

    #[test]
    fn new_with_currency() {
        let cart = Cart::new(USD);

        assert_eq!(cart.currency(), USD);
        assert!(cart.is_empty());
    }

    #[test]
    fn line_item_rejects_negative_price() {
        let result = LineItem::new("x", "Broken", Decimal::new(-1, 2), 1);

        assert_eq!(
            result,
            Err(CartError::NegativePrice("x".to_string(), Decimal::new(-1, 2)))
        );
    }

    #[test]
    fn line_item_accepts_zero_price() -> TestResult {
        let item = LineItem::new("free", "Napkins", Decimal::ZERO, 3)?;

        assert_eq!(item.total(), Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn line_item_clamps_zero_quantity() -> TestResult {
        let item = line("1", 100, 0)?;

        assert_eq!(item.quantity(), 1);

        Ok(())
    }

    #[test]
    fn add_or_update_appends_new_ids_in_order() -> TestResult {
        let cart = test_cart()?;
        let ids: Vec<&str> = cart.iter().map(LineItem::id).collect();

        assert_eq!(ids, ["1", "2", "3"]);

        Ok(())
    }

    #[test]
    fn add_or_update_overwrites_existing_quantity() -> TestResult {
        let mut cart = test_cart()?;

        cart.add_or_update(line("2", 1_50, 5)?);

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.get("2").map(LineItem::quantity), Some(5));

        cart.add_or_update(line("2", 1_50, 1)?);

        assert_eq!(cart.get("2").map(LineItem::quantity), Some(1));

        Ok(())
    }

    #[test]
    fn set_quantity_stores_max_of_one_and_requested() -> TestResult {
        let mut cart = test_cart()?;

        for requested in 0..=50 {
            cart.set_quantity("1", requested);

            assert_eq!(
                cart.get("1").map(LineItem::quantity),
                Some(requested.max(1)),
                "quantity {requested} should clamp to at least one"
            );
        }

        Ok(())
    }

    #[test]
    fn set_quantity_unknown_id_is_noop() -> TestResult {
        let mut cart = test_cart()?;
        let before = cart.subtotal();

        cart.set_quantity("missing", 9);

        assert_eq!(cart.subtotal(), before);
        assert_eq!(cart.len(), 3);

        Ok(())
    }

    #[test]
    fn increment_and_decrement_clamp_at_one() -> TestResult {
        let mut cart = test_cart()?;

        cart.increment("1");
        assert_eq!(cart.get("1").map(LineItem::quantity), Some(2));

        cart.decrement("1");
        cart.decrement("1");
        cart.decrement("1");
        assert_eq!(cart.get("1").map(LineItem::quantity), Some(1));

        Ok(())
    }

    #[test]
    fn remove_existing_and_missing() -> TestResult {
        let mut cart = test_cart()?;

        assert!(cart.remove("2"));
        assert!(!cart.remove("2"));
        assert_eq!(cart.len(), 2);
        assert!(cart.get("2").is_none());

        Ok(())
    }

    #[test]
    fn subtotal_is_exact_sum() -> TestResult {
        let cart = test_cart()?;

        assert_eq!(cart.subtotal(), Decimal::new(20_49, 2));
        assert_eq!(cart.line_total("2"), Some(Decimal::new(3_00, 2)));

        Ok(())
    }

    #[test]
    fn subtotal_accumulates_without_rounding() -> TestResult {
        let cart = Cart::with_items(
            [
                LineItem::new("a", "Third", Decimal::new(3_333, 3), 3)?,
                LineItem::new("b", "Half cent", Decimal::new(5, 3), 1)?,
            ],
            USD,
        );

        assert_eq!(cart.subtotal(), Decimal::new(10_004, 3));

        Ok(())
    }

    #[test]
    fn subtotal_with_no_items() {
        let cart = Cart::new(USD);

        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn clear_empties_the_cart() -> TestResult {
        let mut cart = test_cart()?;

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn with_items_merges_duplicate_ids() -> TestResult {
        let cart = Cart::with_items([line("1", 100, 1)?, line("1", 100, 4)?], USD);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("1").map(LineItem::quantity), Some(4));

        Ok(())
    }
}
