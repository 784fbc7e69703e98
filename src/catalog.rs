//! Catalog
//!
//! Restaurants, their menus and reviews, served through the read-only [`RestaurantDirectory`]
//! capability, plus the cuisine filter and free-text search used on the home page.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Name of the pseudo-cuisine that matches every restaurant.
pub const ALL_CUISINES: &str = "All";

/// Errors related to catalog lookups.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No restaurant has this slug.
    #[error("Restaurant with slug \"{0}\" not found.")]
    NotFound(String),

    /// The restaurant has no menu item with this id (restaurant slug, item id).
    #[error("Menu item \"{1}\" not found at \"{0}\".")]
    MenuItemNotFound(String, String),

    /// Two restaurants share a slug.
    #[error("Duplicate restaurant slug \"{0}\".")]
    DuplicateSlug(String),
}

/// A dish on a menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    id: String,
    name: String,
    description: String,
    price: Decimal,
    image_ref: Option<String>,
}

impl MenuItem {
    /// Create a menu item without a description or image.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            image_ref: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the image reference.
    #[must_use]
    pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    /// Returns the menu item id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the menu item name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the price
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Returns the image reference
    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }
}

/// A named group of menu items.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuCategory {
    /// Category name, e.g. "Appetizers"
    pub name: String,

    /// Items in display order
    pub items: Vec<MenuItem>,
}

/// A customer review.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    /// Review id
    pub id: String,

    /// Display name of the reviewer
    pub author: String,

    /// Stars, 1 to 5
    pub rating: u8,

    /// Review text
    pub comment: String,

    /// Free text date, e.g. "2 days ago"
    pub date: String,
}

/// A restaurant with its menu.
#[derive(Debug, Clone, PartialEq)]
pub struct Restaurant {
    /// URL-safe identifier
    pub slug: String,

    /// Display name
    pub name: String,

    /// Average rating
    pub rating: f64,

    /// Number of reviews the rating is based on
    pub review_count: u32,

    /// Free text delivery estimate, e.g. "25-35 min"
    pub delivery_time: String,

    /// Street address
    pub address: String,

    /// Cuisines served
    pub cuisines: Vec<String>,

    /// Badge text such as "20% OFF"
    pub promotional_tag: Option<String>,

    /// Menu categories in display order
    pub menu: Vec<MenuCategory>,

    /// Reviews, newest first
    pub reviews: Vec<Review>,
}

impl Restaurant {
    /// Find a menu item by id in any category.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MenuItemNotFound`] if no category holds the item.
    pub fn menu_item(&self, id: &str) -> Result<&MenuItem, CatalogError> {
        self.menu_items()
            .find(|item| item.id == id)
            .ok_or_else(|| CatalogError::MenuItemNotFound(self.slug.clone(), id.to_string()))
    }

    /// Every menu item, category by category.
    pub fn menu_items(&self) -> impl Iterator<Item = &MenuItem> {
        self.menu.iter().flat_map(|category| category.items.iter())
    }

    /// Whether any of the restaurant's cuisines is selected.
    pub fn matches_cuisine(&self, selection: &CuisineSelection) -> bool {
        selection.is_all() || self.cuisines.iter().any(|cuisine| selection.contains(cuisine))
    }

    /// Case-insensitive substring match on the name or any cuisine. An empty term matches.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();

        self.name.to_lowercase().contains(&term)
            || self
                .cuisines
                .iter()
                .any(|cuisine| cuisine.to_lowercase().contains(&term))
    }
}

/// Read-only source of restaurants.
pub trait RestaurantDirectory {
    /// Look a restaurant up by slug.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for unknown slugs.
    fn lookup_restaurant(&self, slug: &str) -> Result<&Restaurant, CatalogError>;

    /// Every restaurant in listing order.
    fn restaurants(&self) -> Vec<&Restaurant>;
}

/// Directory backed by restaurants held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    restaurants: Vec<Restaurant>,
    by_slug: FxHashMap<String, usize>,
}

impl InMemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from restaurants, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateSlug`] if two restaurants share a slug.
    pub fn with_restaurants(
        restaurants: impl IntoIterator<Item = Restaurant>,
    ) -> Result<Self, CatalogError> {
        let mut directory = Self::new();

        for restaurant in restaurants {
            directory.insert(restaurant)?;
        }

        Ok(directory)
    }

    /// Add a restaurant at the end of the listing.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateSlug`] if the slug is already taken.
    pub fn insert(&mut self, restaurant: Restaurant) -> Result<(), CatalogError> {
        if self.by_slug.contains_key(&restaurant.slug) {
            return Err(CatalogError::DuplicateSlug(restaurant.slug));
        }

        self.by_slug
            .insert(restaurant.slug.clone(), self.restaurants.len());
        self.restaurants.push(restaurant);

        Ok(())
    }

    /// Number of restaurants.
    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    /// True when the directory holds no restaurants.
    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }
}

impl RestaurantDirectory for InMemoryDirectory {
    fn lookup_restaurant(&self, slug: &str) -> Result<&Restaurant, CatalogError> {
        self.by_slug
            .get(slug)
            .and_then(|index| self.restaurants.get(*index))
            .ok_or_else(|| CatalogError::NotFound(slug.to_string()))
    }

    fn restaurants(&self) -> Vec<&Restaurant> {
        self.restaurants.iter().collect()
    }
}

/// Cuisine chips selected on the home page.
///
/// An empty selection means "All".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CuisineSelection {
    selected: Vec<String>,
}

impl CuisineSelection {
    /// Start with "All" selected.
    pub fn all() -> Self {
        Self::default()
    }

    /// Toggle a chip.
    ///
    /// Toggling "All" resets the selection. Toggling a cuisine adds or removes it; removing the
    /// last one goes back to "All".
    pub fn toggle(&mut self, cuisine: &str) {
        if cuisine == ALL_CUISINES {
            self.selected.clear();
        } else if let Some(index) = self.selected.iter().position(|c| c == cuisine) {
            self.selected.remove(index);
        } else {
            self.selected.push(cuisine.to_string());
        }
    }

    /// Whether every cuisine matches.
    pub fn is_all(&self) -> bool {
        self.selected.is_empty()
    }

    /// Whether a chip is shown as selected.
    pub fn contains(&self, cuisine: &str) -> bool {
        if cuisine == ALL_CUISINES {
            return self.is_all();
        }

        self.selected.iter().any(|c| c == cuisine)
    }

    /// Selected cuisines in the order they were picked.
    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }
}

/// Restaurants matching both the cuisine selection and the search term, in listing order.
pub fn filter_restaurants<'a, D>(
    directory: &'a D,
    selection: &CuisineSelection,
    search: &str,
) -> Vec<&'a Restaurant>
where
    D: RestaurantDirectory + ?Sized,
{
    directory
        .restaurants()
        .into_iter()
        .filter(|restaurant| restaurant.matches_cuisine(selection))
        .filter(|restaurant| restaurant.matches_search(search))
        .collect()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn restaurant(slug: &str, name: &str, cuisines: &[&str]) -> Restaurant {
        Restaurant {
            slug: slug.to_string(),
            name: name.to_string(),
            rating: 4.5,
            review_count: 10,
            delivery_time: "25-35 min".to_string(),
            address: "1 High St".to_string(),
            cuisines: cuisines.iter().map(ToString::to_string).collect(),
            promotional_tag: None,
            menu: vec![MenuCategory {
                name: "Mains".to_string(),
                items: vec![MenuItem::new(
                    format!("{slug}-1"),
                    "House Special",
                    Decimal::new(12_99, 2),
                )],
            }],
            reviews: Vec::new(),
        }
    }

    fn directory() -> Result<InMemoryDirectory, CatalogError> {
        InMemoryDirectory::with_restaurants([
            restaurant("marios-pizzeria", "Mario's Pizzeria", &["Pizza", "Italian"]),
            restaurant("burger-bliss", "Burger Bliss", &["Burgers", "Fast Food"]),
            restaurant("sushi-central", "Sushi Central", &["Sushi", "Japanese"]),
        ])
    }

    fn slugs(restaurants: &[&Restaurant]) -> Vec<String> {
        restaurants.iter().map(|r| r.slug.clone()).collect()
    }

    #[test]
    fn lookup_by_slug() -> TestResult {
        let directory = directory()?;

        assert_eq!(directory.lookup_restaurant("burger-bliss")?.name, "Burger Bliss");
        assert_eq!(
            directory.lookup_restaurant("nope"),
            Err(CatalogError::NotFound("nope".to_string()))
        );

        Ok(())
    }

    #[test]
    fn duplicate_slugs_are_rejected() {
        let result = InMemoryDirectory::with_restaurants([
            restaurant("a", "A", &[]),
            restaurant("a", "Also A", &[]),
        ]);

        assert_eq!(result.err(), Some(CatalogError::DuplicateSlug("a".to_string())));
    }

    #[test]
    fn menu_item_lookup() -> TestResult {
        let directory = directory()?;
        let restaurant = directory.lookup_restaurant("sushi-central")?;

        assert_eq!(restaurant.menu_item("sushi-central-1")?.price(), Decimal::new(12_99, 2));
        assert_eq!(
            restaurant.menu_item("missing"),
            Err(CatalogError::MenuItemNotFound(
                "sushi-central".to_string(),
                "missing".to_string()
            ))
        );

        Ok(())
    }

    #[test]
    fn toggling_cuisines() {
        let mut selection = CuisineSelection::all();

        assert!(selection.contains(ALL_CUISINES));

        selection.toggle("Pizza");
        selection.toggle("Sushi");

        assert!(!selection.contains(ALL_CUISINES));
        assert_eq!(selection.selected().collect::<Vec<_>>(), ["Pizza", "Sushi"]);

        selection.toggle("Pizza");
        selection.toggle("Sushi");

        assert!(selection.is_all());

        selection.toggle("Burgers");
        selection.toggle(ALL_CUISINES);

        assert!(selection.is_all());
    }

    #[test]
    fn filter_by_cuisine_and_search() -> TestResult {
        let directory = directory()?;
        let mut selection = CuisineSelection::all();

        assert_eq!(filter_restaurants(&directory, &selection, "").len(), 3);

        selection.toggle("Pizza");
        selection.toggle("Japanese");

        assert_eq!(
            slugs(&filter_restaurants(&directory, &selection, "")),
            ["marios-pizzeria", "sushi-central"]
        );
        assert_eq!(
            slugs(&filter_restaurants(&directory, &selection, "SUSHI")),
            ["sushi-central"]
        );
        assert!(filter_restaurants(&directory, &selection, "burger").is_empty());

        Ok(())
    }

    #[test]
    fn search_matches_cuisines_case_insensitively() -> TestResult {
        let directory = directory()?;
        let found = filter_restaurants(&directory, &CuisineSelection::all(), "fast f");

        assert_eq!(slugs(&found), ["burger-bliss"]);

        Ok(())
    }
}
