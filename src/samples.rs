//! Samples
//!
//! The data a fresh install shows before anything has been ordered: a diner
//! profile and a short order history built from the builtin menu.

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    cart::{Cart, ProductId},
    catalog::Catalog,
    orders::{Order, OrderError, OrderHistory, OrderId, OrderStatus},
    profile::{ProfileError, UserProfile},
    tags::DietaryTags,
};

/// Errors building sample data against a catalog.
#[derive(Debug, Error)]
pub enum SampleError {
    /// A sample order uses a dish the catalog does not have.
    #[error("sample order uses unknown menu item {0}")]
    UnknownMenuItem(ProductId),

    /// Sample timestamp did not parse
    #[error(transparent)]
    Time(#[from] jiff::Error),

    /// Seeding the history failed
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Sample profile failed validation
    #[error(transparent)]
    Profile(#[from] ProfileError),
}

struct SampleOrder {
    id: u32,
    lines: &'static [(&'static str, u32)],
    table: &'static str,
    placed_at: &'static str,
    status: OrderStatus,
    instructions: Option<&'static str>,
    rating: Option<u8>,
}

const SAMPLE_ORDERS: [SampleOrder; 3] = [
    SampleOrder {
        id: 1,
        lines: &[("1", 2), ("3", 1)],
        table: "5",
        placed_at: "2024-01-16T14:30:00Z",
        status: OrderStatus::Preparing,
        instructions: Some("Sin cebolla en las empanadas"),
        rating: None,
    },
    SampleOrder {
        id: 2,
        lines: &[("2", 1), ("4", 2)],
        table: "3",
        placed_at: "2024-01-15T13:00:00Z",
        status: OrderStatus::Completed,
        instructions: None,
        rating: Some(5),
    },
    SampleOrder {
        id: 3,
        lines: &[("5", 1), ("6", 1)],
        table: "7",
        placed_at: "2024-01-12T20:15:00Z",
        status: OrderStatus::Completed,
        instructions: None,
        rating: Some(4),
    },
];

/// The sample diner.
///
/// # Errors
///
/// Returns [`SampleError::Profile`] if the sample fields fail validation.
pub fn profile() -> Result<UserProfile, SampleError> {
    let profile = UserProfile::new("María González", "maria.gonzalez@email.com", "+56 9 8765 4321")?
        .with_preferences(DietaryTags::from_strs(&["sin-lactosa", "vegetariano"]));

    Ok(profile)
}

/// One order in the kitchen and two rated past orders, `ORD001` to `ORD003`.
///
/// # Errors
///
/// Returns a [`SampleError`] if the catalog lacks one of the sample dishes.
pub fn history(catalog: &Catalog) -> Result<OrderHistory, SampleError> {
    let mut orders = Vec::with_capacity(SAMPLE_ORDERS.len());

    for sample in &SAMPLE_ORDERS {
        let mut cart = Cart::new(catalog.currency());

        for &(id, quantity) in sample.lines {
            let id = ProductId::from(id);
            let item = catalog
                .get(&id)
                .ok_or_else(|| SampleError::UnknownMenuItem(id.clone()))?;

            cart.add_units(item.cart_product(), quantity);
        }

        let mut order = Order::new(
            OrderId::new(sample.id),
            cart.lines().to_vec(),
            cart.currency(),
            sample.placed_at.parse::<Timestamp>()?,
        )
        .with_status(sample.status)
        .with_table(sample.table);

        if let Some(instructions) = sample.instructions {
            order = order.with_instructions(instructions);
        }

        orders.push(order);
    }

    let mut history = OrderHistory::with_orders(orders)?;

    for sample in &SAMPLE_ORDERS {
        if let Some(stars) = sample.rating {
            history.rate(OrderId::new(sample.id), stars)?;
        }
    }

    Ok(history)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{prices::Price, profile::ProfileStats};

    use super::*;

    #[test]
    fn sample_history_matches_menu_prices() -> TestResult {
        let catalog = Catalog::builtin()?;
        let history = history(&catalog)?;

        let totals: Vec<(String, Price)> = history
            .orders()
            .iter()
            .map(|order| (order.id().to_string(), order.total()))
            .collect();

        assert_eq!(
            totals,
            [
                ("ORD001".to_string(), Price::new(14_200)),
                ("ORD002".to_string(), Price::new(16_900)),
                ("ORD003".to_string(), Price::new(9600)),
            ]
        );
        assert_eq!(history.current().count(), 1);
        assert_eq!(history.past().count(), 2);
        assert_eq!(history.average_rating(), Some(4.5));

        Ok(())
    }

    #[test]
    fn sample_profile_stats() -> TestResult {
        let catalog = Catalog::builtin()?;
        let history = history(&catalog)?;

        let stats = ProfileStats::from_history(&history, &catalog);

        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.total_spent, Price::new(40_700));
        assert_eq!(stats.favorite_category.as_deref(), Some("Entradas"));
        assert_eq!(profile()?.preferences().len(), 2);

        Ok(())
    }

    #[test]
    fn missing_dish_is_reported() -> TestResult {
        let catalog = Catalog::from_yaml(
            "currency: CLP\ncategories: [{ id: bebidas, name: Bebidas }]\nitems: []\n",
        )?;

        let result = history(&catalog);

        assert!(
            matches!(result, Err(SampleError::UnknownMenuItem(ref id)) if id.as_str() == "1"),
            "expected missing item 1, got {result:?}"
        );

        Ok(())
    }
}
