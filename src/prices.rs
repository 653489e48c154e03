//! Prices
//!
//! Menu prices are whole amounts in a currency without fractional subunits
//! (Chilean pesos, yen). Arithmetic stays in `u64` and only becomes
//! [`Money`] at the presentation edge, where the currency decides formatting.

use std::ops::Deref;

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Represents a whole-unit price, e.g. `3500` pesos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price {
    value: u64,
}

impl Price {
    /// A price of nothing.
    pub const ZERO: Price = Price { value: 0 };

    /// Creates a new Price
    pub const fn new(value: u64) -> Self {
        Price { value }
    }

    /// Multiplies the price by a quantity, saturating at `u64::MAX`.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Price::new(self.value.saturating_mul(u64::from(quantity)))
    }

    /// Adds two prices, saturating at `u64::MAX`.
    #[must_use]
    pub fn saturating_add(self, other: Price) -> Self {
        Price::new(self.value.saturating_add(other.value))
    }

    /// Converts the price into money of the given currency.
    ///
    /// The currency is expected to have no minor units, so the value is used as-is.
    pub fn money(self, currency: &'static Currency) -> Money<'static, Currency> {
        Money::from_minor(i64::try_from(self.value).unwrap_or(i64::MAX), currency)
    }
}

impl Deref for Price {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl From<u64> for Price {
    fn from(value: u64) -> Self {
        Price::new(value)
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Self {
        iter.fold(Price::ZERO, Price::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;

    use super::*;

    #[test]
    fn new_price() {
        let price = Price::new(1000);

        assert_eq!(price.value, 1000);
    }

    #[test]
    fn price_derefs_to_u64() {
        let price = Price { value: 100 };

        assert_eq!(*price, 100);
    }

    #[test]
    fn times_multiplies_by_quantity() {
        assert_eq!(Price::new(3500).times(3), Price::new(10_500));
        assert_eq!(Price::new(3500).times(0), Price::ZERO);
    }

    #[test]
    fn times_saturates_instead_of_overflowing() {
        assert_eq!(Price::new(u64::MAX).times(2), Price::new(u64::MAX));
    }

    #[test]
    fn sum_of_prices() {
        let total: Price = [Price::new(3500), Price::new(8500)].into_iter().sum();

        assert_eq!(total, Price::new(12_000));
    }

    #[test]
    fn money_keeps_whole_units() {
        assert_eq!(
            Price::new(7200).money(iso::CLP),
            Money::from_minor(7200, iso::CLP)
        );
    }

    #[test]
    fn money_formats_pesos_with_dot_separators() {
        assert_eq!(Price::ZERO.money(iso::CLP).to_string(), "$0");
        assert_eq!(Price::new(950).money(iso::CLP).to_string(), "$950");
        assert_eq!(Price::new(3500).money(iso::CLP).to_string(), "$3.500");
        assert_eq!(Price::new(1_234_567).money(iso::CLP).to_string(), "$1.234.567");
    }

    #[test]
    fn money_follows_the_given_currency() {
        assert_eq!(Price::new(1200).money(iso::JPY).to_string(), "¥1,200");
    }
}
