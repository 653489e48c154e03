//! Cart
//!
//! The cart is the single active order of a session. It is the only place
//! order lines are created, changed or dropped, and every screen reads its
//! lines, total and item count from here.
//!
//! Every operation is total: nothing here returns an error. Unknown ids are
//! no-ops and a line whose quantity reaches zero is removed.

use std::fmt;

use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::{Deserialize, Serialize};

use crate::prices::Price;

/// Stable identifier of a product, unique within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new product id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The product record handed to [`Cart::add_item`].
///
/// The cart trusts the caller: nothing is checked against a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartProduct {
    /// Product id
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Unit price
    pub price: Price,

    /// Opaque display asset reference
    pub image: String,
}

impl CartProduct {
    /// Creates a new cart product.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: impl Into<Price>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: price.into(),
            image: image.into(),
        }
    }
}

/// One distinct product in the cart along with how many were ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    id: ProductId,
    name: String,
    price: Price,
    image: String,
    quantity: u32,
}

impl CartLine {
    fn from_product(product: CartProduct) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            image: product.image,
            quantity: 1,
        }
    }

    /// Product id
    pub fn id(&self) -> &ProductId {
        &self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price
    pub fn price(&self) -> Price {
        self.price
    }

    /// Display asset reference
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Quantity, always at least one.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price multiplied by quantity.
    pub fn subtotal(&self) -> Price {
        self.price.times(self.quantity)
    }

    /// The product this line was created from.
    pub fn product(&self) -> CartProduct {
        CartProduct {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
        }
    }
}

/// Whether the cart has anything in it. Screens branch their rendering on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartState {
    /// No lines
    Empty,

    /// At least one line
    NonEmpty,
}

/// Outcome of [`Cart::update_quantity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The line now has the requested quantity.
    Updated {
        /// Quantity before the update
        previous: u32,

        /// Quantity after the update
        quantity: u32,
    },

    /// A quantity of zero was requested, so the line was dropped.
    Removed(CartLine),

    /// No line with this id exists; nothing changed.
    Missing,
}

/// The active order.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency: &'static Currency,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(iso::CLP)
    }
}

impl Cart {
    /// Create a new, empty cart priced in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Adds one unit of the product.
    ///
    /// An existing line with the same id has its quantity bumped by one,
    /// otherwise a new line with quantity one is appended.
    pub fn add_item(&mut self, product: CartProduct) {
        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine::from_product(product));
        }
    }

    /// Adds `quantity` units of the product at once.
    ///
    /// Equivalent to calling [`Cart::add_item`] `quantity` times; zero is a no-op.
    pub fn add_units(&mut self, product: CartProduct, quantity: u32) {
        if quantity == 0 {
            return;
        }

        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            let mut line = CartLine::from_product(product);
            line.quantity = quantity;
            self.lines.push(line);
        }
    }

    /// Sets the quantity of a line.
    ///
    /// A quantity of zero removes the line, so no line ever holds zero units.
    /// Unknown ids leave the cart unchanged.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: u32) -> QuantityUpdate {
        if quantity == 0 {
            return match self.take_line(id) {
                Some(line) => QuantityUpdate::Removed(line),
                None => QuantityUpdate::Missing,
            };
        }

        match self.line_mut(id) {
            Some(line) => {
                let previous = line.quantity;
                line.quantity = quantity;

                QuantityUpdate::Updated { previous, quantity }
            }
            None => QuantityUpdate::Missing,
        }
    }

    /// Removes the line with this id, returning it if it was present.
    pub fn remove_item(&mut self, id: &ProductId) -> Option<CartLine> {
        self.take_line(id)
    }

    /// Sum of unit price times quantity over all lines.
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// The total as money in the cart currency.
    pub fn total_money(&self) -> Money<'static, Currency> {
        self.total().money(self.currency)
    }

    /// Sum of quantities over all lines, used for badges.
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in the order they were first added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up a single line.
    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.id == id)
    }

    /// Get the number of distinct lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Empty or non-empty.
    pub fn state(&self) -> CartState {
        if self.is_empty() {
            CartState::Empty
        } else {
            CartState::NonEmpty
        }
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| &line.id == id)
    }

    fn take_line(&mut self, id: &ProductId) -> Option<CartLine> {
        let position = self.lines.iter().position(|line| &line.id == id)?;

        Some(self.lines.remove(position))
    }
}
