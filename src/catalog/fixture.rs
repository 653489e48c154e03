//! Menu fixture format

use std::time::Duration;

use serde::Deserialize;

use crate::{
    cart::ProductId,
    catalog::{CatalogError, MenuItem},
    prices::Price,
    tags::DietaryTags,
};

/// Top-level menu fixture document.
#[derive(Debug, Deserialize)]
pub(crate) struct MenuFixture {
    /// ISO currency code all prices are expressed in
    pub currency: String,

    /// Menu categories, in display order
    pub categories: Vec<NamedFixture>,

    /// Dietary filters offered on the menu screen
    #[serde(default)]
    pub dietary: Vec<NamedFixture>,

    /// Menu items, in display order
    pub items: Vec<MenuItemFixture>,
}

/// An `id` with a display `name`.
#[derive(Debug, Deserialize)]
pub(crate) struct NamedFixture {
    pub id: String,
    pub name: String,
}

/// A single menu item as written in the fixture file.
#[derive(Debug, Deserialize)]
pub(crate) struct MenuItemFixture {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: u64,
    #[serde(default)]
    pub image: String,
    pub category: String,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub prep_minutes: u64,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub dietary: DietaryTags,
}

impl TryFrom<MenuItemFixture> for MenuItem {
    type Error = CatalogError;

    fn try_from(fixture: MenuItemFixture) -> Result<Self, Self::Error> {
        if !(0.0..=5.0).contains(&fixture.rating) {
            return Err(CatalogError::InvalidRating {
                item: fixture.id,
                rating: fixture.rating,
            });
        }

        Ok(MenuItem {
            id: ProductId::new(fixture.id),
            name: fixture.name,
            description: fixture.description,
            price: Price::new(fixture.price),
            image: fixture.image,
            category: fixture.category,
            rating: fixture.rating,
            prep_time: Duration::from_secs(fixture.prep_minutes.saturating_mul(60)),
            ingredients: fixture.ingredients,
            dietary: fixture.dietary,
        })
    }
}
