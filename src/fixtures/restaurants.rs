//! Restaurant Fixtures

use rusty_money::iso::Currency;
use serde::Deserialize;

use crate::{
    catalog::{MenuCategory, MenuItem, Restaurant, Review},
    fixtures::{FixtureError, prices::parse_price, track_currency},
};

/// Wrapper for restaurants in YAML
#[derive(Debug, Deserialize)]
pub struct RestaurantsFixture {
    /// Restaurants in listing order
    pub restaurants: Vec<RestaurantFixture>,
}

/// Restaurant fixture
#[derive(Debug, Deserialize)]
pub struct RestaurantFixture {
    /// URL-safe identifier
    pub slug: String,

    /// Display name
    pub name: String,

    /// Average rating
    pub rating: f64,

    /// Number of reviews
    #[serde(default)]
    pub review_count: u32,

    /// Delivery estimate, e.g. "25-35 min"
    pub delivery_time: String,

    /// Street address
    #[serde(default)]
    pub address: String,

    /// Cuisines served
    pub cuisines: Vec<String>,

    /// Badge text
    #[serde(default)]
    pub promotional_tag: Option<String>,

    /// Menu categories
    #[serde(default)]
    pub menu: Vec<MenuCategoryFixture>,

    /// Reviews
    #[serde(default)]
    pub reviews: Vec<ReviewFixture>,
}

/// Menu category fixture
#[derive(Debug, Deserialize)]
pub struct MenuCategoryFixture {
    /// Category name
    pub name: String,

    /// Items in the category
    pub items: Vec<MenuItemFixture>,
}

/// Menu item fixture
#[derive(Debug, Deserialize)]
pub struct MenuItemFixture {
    /// Item id, unique within the restaurant
    pub id: String,

    /// Item name
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Price (e.g., "12.99 USD")
    pub price: String,

    /// Image reference
    #[serde(default)]
    pub image: Option<String>,
}

/// Review fixture
#[derive(Debug, Deserialize)]
pub struct ReviewFixture {
    /// Review id
    pub id: String,

    /// Reviewer display name
    pub author: String,

    /// Stars, 1 to 5
    pub rating: u8,

    /// Review text
    pub comment: String,

    /// Free text date
    pub date: String,
}

impl RestaurantFixture {
    /// Convert to a [`Restaurant`]. Every menu price must be in the fixture set's currency.
    ///
    /// # Errors
    ///
    /// Returns an error if a menu price cannot be parsed or uses a different currency.
    pub fn try_into_restaurant(
        self,
        currency: &mut Option<&'static Currency>,
    ) -> Result<Restaurant, FixtureError> {
        let mut menu = Vec::with_capacity(self.menu.len());

        for category in self.menu {
            let mut items = Vec::with_capacity(category.items.len());

            for item in category.items {
                let (price, price_currency) = parse_price(&item.price)?;

                track_currency(currency, price_currency)?;

                let mut menu_item =
                    MenuItem::new(item.id, item.name, price).with_description(item.description);

                if let Some(image) = item.image {
                    menu_item = menu_item.with_image_ref(image);
                }

                items.push(menu_item);
            }

            menu.push(MenuCategory {
                name: category.name,
                items,
            });
        }

        Ok(Restaurant {
            slug: self.slug,
            name: self.name,
            rating: self.rating,
            review_count: self.review_count,
            delivery_time: self.delivery_time,
            address: self.address,
            cuisines: self.cuisines,
            promotional_tag: self.promotional_tag,
            menu,
            reviews: self.reviews.into_iter().map(Review::from).collect(),
        })
    }
}

impl From<ReviewFixture> for Review {
    fn from(fixture: ReviewFixture) -> Self {
        Review {
            id: fixture.id,
            author: fixture.author,
            rating: fixture.rating,
            comment: fixture.comment,
            date: fixture.date,
        }
    }
}
