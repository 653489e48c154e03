//! Catalog
//!
//! The read-only menu: items, categories and dietary filters, loaded from YAML
//! fixtures. Nothing in here mutates once loaded; screens hand
//! [`MenuItem::cart_product`] records to the cart.

use std::{fs, path::PathBuf, time::Duration};

use humanize_duration::{Truncate, prelude::DurationExt};
use rustc_hash::FxHashMap;
use rusty_money::iso::{self, Currency};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::{
    cart::{CartProduct, ProductId},
    catalog::fixture::MenuFixture,
    prices::Price,
    tags::{self, DietaryTags},
};

mod fixture;
pub mod query;

pub use query::MenuQuery;

const BUILTIN_MENU_YAML: &str = include_str!("../../fixtures/menu/default.yml");

new_key_type! {
    /// Menu Item Key
    pub struct MenuItemKey;
}

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading a fixture file
    #[error("Failed to read menu fixture: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Prices are whole amounts, so the currency must not have minor units.
    #[error("Currency {0} has fractional minor units; menu prices must be whole amounts")]
    FractionalCurrency(&'static str),

    /// Two items share an id
    #[error("Duplicate menu item id: {0}")]
    DuplicateItem(String),

    /// Two categories share an id, or a category reuses the catch-all id
    #[error("Duplicate category id: {0}")]
    DuplicateCategory(String),

    /// An item points at a category that was not declared
    #[error("Menu item {item} references unknown category {category}")]
    UnknownCategory {
        /// Item id
        item: String,

        /// Category id referenced by the item
        category: String,
    },

    /// Ratings are on a zero to five scale
    #[error("Menu item {item} has rating {rating} outside 0-5")]
    InvalidRating {
        /// Item id
        item: String,

        /// Rating found in the fixture
        rating: f32,
    },
}

/// A dish or drink on the menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    /// Product id, also used as the cart line id
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Long description shown on the menu card
    pub description: String,

    /// Unit price
    pub price: Price,

    /// Display asset reference
    pub image: String,

    /// Category id
    pub category: String,

    /// Average customer rating, 0 to 5
    pub rating: f32,

    /// Typical preparation time
    pub prep_time: Duration,

    /// Ingredient names
    pub ingredients: Vec<String>,

    /// Dietary tags
    pub dietary: DietaryTags,
}

impl MenuItem {
    /// The record passed to [`crate::cart::Cart::add_item`].
    pub fn cart_product(&self) -> CartProduct {
        CartProduct {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
        }
    }

    /// Preparation time rounded to whole minutes for display.
    pub fn prep_time_label(&self) -> String {
        format!("{}", self.prep_time.human(Truncate::Minute))
    }
}

/// A menu category with the number of items in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Category id, [`tags::ALL`] for the catch-all entry
    pub id: String,

    /// Display name
    pub name: String,

    /// Number of menu items in the category
    pub count: usize,
}

/// A dietary filter offered on the menu screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DietaryFilter {
    /// Tag id, matched against [`MenuItem::dietary`]
    pub id: String,

    /// Display name
    pub name: String,
}

/// The restaurant menu.
#[derive(Debug)]
pub struct Catalog {
    items: SlotMap<MenuItemKey, MenuItem>,
    order: Vec<MenuItemKey>,
    keys: FxHashMap<ProductId, MenuItemKey>,
    categories: Vec<Category>,
    dietary: Vec<DietaryFilter>,
    currency: &'static Currency,
}

impl Catalog {
    /// The sample menu bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the bundled fixture fails to parse.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml(BUILTIN_MENU_YAML)
    }

    /// Load the menu fixture `<base_path>/menu/<name>.yml`.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file cannot be read or is not a valid menu.
    pub fn from_fixture(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, CatalogError> {
        let file_path = base_path.into().join("menu").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        Self::from_yaml(&contents)
    }

    /// Parse a menu from YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the YAML is malformed, the currency is unknown or
    /// has minor units, ids are duplicated, or an item references an unknown category.
    pub fn from_yaml(contents: &str) -> Result<Self, CatalogError> {
        let fixture: MenuFixture = serde_norway::from_str(contents)?;

        let currency = iso::find(&fixture.currency)
            .ok_or_else(|| CatalogError::UnknownCurrency(fixture.currency.clone()))?;

        if currency.exponent != 0 {
            return Err(CatalogError::FractionalCurrency(currency.iso_alpha_code));
        }

        let mut categories = Vec::with_capacity(fixture.categories.len() + 1);
        categories.push(Category {
            id: tags::ALL.to_string(),
            name: "Todos".to_string(),
            count: fixture.items.len(),
        });

        for category in fixture.categories {
            if categories.iter().any(|existing| existing.id == category.id) {
                return Err(CatalogError::DuplicateCategory(category.id));
            }

            categories.push(Category {
                id: category.id,
                name: category.name,
                count: 0,
            });
        }

        let mut items = SlotMap::with_key();
        let mut order = Vec::with_capacity(fixture.items.len());
        let mut keys = FxHashMap::default();

        for item_fixture in fixture.items {
            let item = MenuItem::try_from(item_fixture)?;

            let category = categories
                .iter_mut()
                .skip(1)
                .find(|category| category.id == item.category)
                .ok_or_else(|| CatalogError::UnknownCategory {
                    item: item.id.to_string(),
                    category: item.category.clone(),
                })?;

            if keys.contains_key(&item.id) {
                return Err(CatalogError::DuplicateItem(item.id.to_string()));
            }

            category.count += 1;

            let id = item.id.clone();
            let key = items.insert(item);

            keys.insert(id, key);
            order.push(key);
        }

        let dietary = fixture
            .dietary
            .into_iter()
            .map(|filter| DietaryFilter {
                id: filter.id,
                name: filter.name,
            })
            .collect();

        Ok(Catalog {
            items,
            order,
            keys,
            categories,
            dietary,
            currency,
        })
    }

    /// Look up a menu item by product id.
    pub fn get(&self, id: &ProductId) -> Option<&MenuItem> {
        self.keys.get(id).and_then(|key| self.items.get(*key))
    }

    /// Menu items in display order.
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.order.iter().filter_map(|key| self.items.get(*key))
    }

    /// Categories in display order, starting with the catch-all entry.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by id.
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Dietary filters in display order.
    pub fn dietary_filters(&self) -> &[DietaryFilter] {
        &self.dietary
    }

    /// Items matching the query, in display order.
    pub fn search<'c>(&'c self, query: &'c MenuQuery) -> impl Iterator<Item = &'c MenuItem> + 'c {
        self.items().filter(move |item| query.matches(item))
    }

    /// Number of menu items
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the menu has no items.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Currency all menu prices are expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
