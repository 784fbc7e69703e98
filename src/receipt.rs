//! Receipt

use std::io;

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, LineItem},
    checkout::CheckoutSession,
    orders::PlacedOrder,
    pricing::{OrderTotals, PricingError, format_amount},
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// An amount could not be formatted.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// One row of the receipt table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine {
    /// Item name
    pub name: String,

    /// Quantity ordered
    pub quantity: u32,

    /// Price of one unit
    pub unit_price: Decimal,

    /// Unit price times quantity
    pub line_total: Decimal,
}

impl From<&LineItem> for ReceiptLine {
    fn from(item: &LineItem) -> Self {
        Self {
            name: item.name().to_string(),
            quantity: item.quantity(),
            unit_price: item.unit_price(),
            line_total: item.total(),
        }
    }
}

/// Summary of a cart or placed order, ready to print.
#[derive(Debug, Clone)]
pub struct Receipt {
    order_number: Option<String>,
    lines: SmallVec<[ReceiptLine; 8]>,
    promo_code: Option<String>,
    totals: OrderTotals,
    currency: &'static Currency,
}

impl Receipt {
    /// Capture the current state of a checkout session.
    pub fn from_session(session: &CheckoutSession) -> Self {
        let cart: &Cart = session.cart();

        Self {
            order_number: None,
            lines: cart.iter().map(ReceiptLine::from).collect(),
            promo_code: session.promotion().map(|promo| promo.code().to_string()),
            totals: session.totals(),
            currency: cart.currency(),
        }
    }

    /// Capture a placed order.
    pub fn from_order(order: &PlacedOrder) -> Self {
        Self {
            order_number: Some(order.number().to_string()),
            lines: order.lines().iter().map(ReceiptLine::from).collect(),
            promo_code: order.promotion().map(|promo| promo.code().to_string()),
            totals: *order.totals(),
            currency: order.currency(),
        }
    }

    /// Order number, when the receipt is for a placed order
    pub fn order_number(&self) -> Option<&str> {
        self.order_number.as_deref()
    }

    /// Table rows
    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    /// Totals, unrounded
    pub fn totals(&self) -> &OrderTotals {
        &self.totals
    }

    /// Writes the receipt as a table followed by the summary lines.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount cannot be formatted or the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if let Some(number) = &self.order_number {
            writeln!(out, "Order #{number}").map_err(|_err| ReceiptError::IO)?;
        }

        let mut builder = Builder::default();

        builder.push_record(["Item", "Qty", "Unit Price", "Line Total"]);

        for line in &self.lines {
            builder.push_record([
                line.name.clone(),
                line.quantity.to_string(),
                format_amount(line.unit_price, self.currency)?,
                format_amount(line.line_total, self.currency)?,
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(1..4), Alignment::right());
        table.modify(Rows::first(), Alignment::center());

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let mut rows: SmallVec<[(String, String); 4]> = SmallVec::new();

        rows.push((
            "Subtotal:".to_string(),
            format_amount(self.totals.subtotal(), self.currency)?,
        ));

        if !self.totals.discount().is_zero() {
            let label = match &self.promo_code {
                Some(code) => format!("Discount ({code}):"),
                None => "Discount:".to_string(),
            };

            rows.push((
                label,
                format!("-{}", format_amount(self.totals.discount(), self.currency)?),
            ));
        }

        rows.push((
            "Delivery Fee:".to_string(),
            format_amount(self.totals.delivery_fee(), self.currency)?,
        ));
        rows.push((
            "Total:".to_string(),
            format_amount(self.totals.total(), self.currency)?,
        ));

        let label_width = rows
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or_default();
        let value_width = rows
            .iter()
            .map(|(_, value)| value.chars().count())
            .max()
            .unwrap_or_default();

        for (label, value) in &rows {
            writeln!(out, " {label:>label_width$}  {value:>value_width$}")
                .map_err(|_err| ReceiptError::IO)?;
        }

        writeln!(out).map_err(|_err| ReceiptError::IO)
    }
}
