//! Storefront checkout command line.
//!
//! Loads a fixture set, optionally lists restaurants and past orders, builds a checkout session
//! from the sample cart plus any requested menu items, prints the receipt and places the order.

use std::io::{self, Write};

use anyhow::{Context, Result};
use rusty_money::iso::Currency;
use storefront::{
    catalog::{CuisineSelection, RestaurantDirectory, filter_restaurants},
    checkout::CheckoutSession,
    config::StorefrontConfig,
    fixtures::Fixture,
    observability::init_logging,
    orders::TrackedOrder,
    pricing::format_amount,
    receipt::Receipt,
};
use tracing::info;

fn main() -> Result<()> {
    let config = StorefrontConfig::load().unwrap_or_else(|error| error.exit());

    init_logging(&config.logging)?;

    let fixture = Fixture::from_set_in(&config.fixtures_dir, &config.fixture_set)
        .with_context(|| format!("loading fixture set {:?}", config.fixture_set))?;

    let directory = fixture.directory()?;
    let currency = fixture.currency()?;

    info!(
        set = %config.fixture_set,
        restaurants = directory.len(),
        "loaded fixtures"
    );

    let mut out = io::stdout().lock();

    if config.wants_listing() {
        let mut selection = CuisineSelection::all();

        for cuisine in &config.cuisines {
            selection.toggle(cuisine);
        }

        let search = config.search.as_deref().unwrap_or_default();

        for restaurant in filter_restaurants(&directory, &selection, search) {
            writeln!(
                out,
                "{:<20} {:<26} {:.1}  {:<10} {}",
                restaurant.slug,
                restaurant.name,
                restaurant.rating,
                restaurant.delivery_time,
                restaurant.cuisines.join(", ")
            )?;
        }

        writeln!(out)?;
    }

    if config.orders {
        for order in fixture.orders() {
            write_tracked_order(&mut out, order, currency)?;
        }

        writeln!(out)?;
    }

    let mut session = CheckoutSession::new(fixture.cart()?, fixture.address_book())
        .with_promo_engine(fixture.promo_engine());

    if let Some(slug) = &config.restaurant {
        let restaurant = directory.lookup_restaurant(slug)?;

        for item in &config.add_items {
            session
                .cart_mut()
                .add_menu_item(restaurant.menu_item(&item.id)?, item.quantity)?;
        }
    }

    if let Some(address) = &config.address {
        session.select_address(address)?;
    }

    session.set_payment_method(config.payment);

    if let Some(form) = config.card.to_form() {
        session.set_card_form(form);
    }

    if let Some(code) = &config.promo_code
        && let Err(rejection) = session.apply_promo(code)
    {
        writeln!(out, "{rejection}")?;
    }

    if let Some(address) = session.selected_address() {
        writeln!(out, "Deliver to: {}", address.one_line())?;
    }

    writeln!(out, "Payment: {}", session.payment_method())?;

    Receipt::from_session(&session).write_to(&mut out)?;

    if config.place {
        match session.place_order() {
            Ok(order) => {
                Receipt::from_order(&order).write_to(&mut out)?;

                writeln!(
                    out,
                    "Status: {} ({}%)",
                    order.status(),
                    order.status().progress_percent()
                )?;
            }
            Err(rejection) => writeln!(out, "Cannot place order: {rejection}")?,
        }
    }

    Ok(())
}

fn write_tracked_order(
    out: &mut impl Write,
    order: &TrackedOrder,
    currency: &'static Currency,
) -> Result<()> {
    let status = order.status();

    write!(
        out,
        "#{:<10} {:<24} {:<17} {:>3}%  {}",
        order.number(),
        order.restaurant(),
        status.label(),
        status.progress_percent(),
        format_amount(order.total(), currency)?
    )?;

    if let Some(party) = order.active_party() {
        write!(out, "  {}", party.describe())?;
    }

    if status.can_reorder() {
        write!(out, "  [reorder]")?;
    }

    writeln!(out)?;

    Ok(())
}
