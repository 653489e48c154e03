//! Profile

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    catalog::{Catalog, Category},
    orders::OrderHistory,
    prices::Price,
    tags::DietaryTags,
};

/// Profile validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    /// Name is empty or whitespace
    #[error("name cannot be empty")]
    NameEmpty,

    /// Email does not look like an address
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

/// The diner using the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    name: String,
    email: String,
    phone: String,
    preferences: DietaryTags,
}

impl UserProfile {
    /// Creates a profile.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] if the name is blank or the email has no `@`.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<Self, ProfileError> {
        let name = validate_name(&name.into())?;
        let email = validate_email(email.into())?;

        Ok(Self {
            name,
            email,
            phone: phone.into().trim().to_string(),
            preferences: DietaryTags::default(),
        })
    }

    /// Set dietary preferences.
    #[must_use]
    pub fn with_preferences(mut self, preferences: DietaryTags) -> Self {
        self.preferences = preferences;
        self
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Email address
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Phone number, as entered
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Dietary preferences
    pub fn preferences(&self) -> &DietaryTags {
        &self.preferences
    }

    /// Add or remove a dietary preference. Returns whether it is now set.
    pub fn toggle_preference(&mut self, tag: &str) -> bool {
        self.preferences.toggle(tag)
    }

    /// Apply edits from the profile form. Either every field applies or none does.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] if the new name is blank or the new email has no `@`.
    pub fn apply(&mut self, update: ProfileUpdate) -> Result<(), ProfileError> {
        let name = update.name.as_deref().map(validate_name).transpose()?;
        let email = update.email.map(validate_email).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }

        if let Some(email) = email {
            self.email = email;
        }

        if let Some(phone) = update.phone {
            self.phone = phone.trim().to_string();
        }

        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String, ProfileError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        Err(ProfileError::NameEmpty)
    } else {
        Ok(trimmed.to_string())
    }
}

fn validate_email(email: String) -> Result<String, ProfileError> {
    let trimmed = email.trim();
    let valid = trimmed
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());

    if valid {
        Ok(trimmed.to_string())
    } else {
        Err(ProfileError::InvalidEmail(email))
    }
}

/// Edits submitted from the profile form. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// New name
    pub name: Option<String>,

    /// New email
    pub email: Option<String>,

    /// New phone number
    pub phone: Option<String>,
}

/// Figures shown on the profile screen, derived from the order history.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileStats {
    /// Number of orders placed or paid
    pub total_orders: usize,

    /// Sum of order totals
    pub total_spent: Price,

    /// Mean star rating over rated orders
    pub average_rating: Option<f32>,

    /// Display name of the category with the most units ordered
    pub favorite_category: Option<String>,
}

impl ProfileStats {
    /// Derive the statistics. Categories come from the catalog; lines whose
    /// product is no longer on the menu do not count towards a category.
    pub fn from_history(history: &OrderHistory, catalog: &Catalog) -> Self {
        let mut units_by_category: FxHashMap<&str, u64> = FxHashMap::default();

        for line in history.orders().iter().flat_map(|order| order.lines()) {
            if let Some(item) = catalog.get(line.id()) {
                *units_by_category.entry(item.category.as_str()).or_default() +=
                    u64::from(line.quantity());
            }
        }

        // Ties go to whichever category the menu lists first.
        let favorite_category = catalog
            .categories()
            .iter()
            .filter_map(|category| {
                units_by_category
                    .get(category.id.as_str())
                    .map(|units| (category, *units))
            })
            .fold(None, |best: Option<(&Category, u64)>, candidate| {
                match best {
                    Some((_, best_units)) if best_units >= candidate.1 => best,
                    _ => Some(candidate),
                }
            })
            .map(|(category, _)| category.name.clone());

        Self {
            total_orders: history.len(),
            total_spent: history.total_spent(),
            average_rating: history.average_rating(),
            favorite_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::{
        cart::{Cart, ProductId},
        orders::{OrderRequest, place_order},
    };

    use super::*;

    fn maria() -> Result<UserProfile, ProfileError> {
        Ok(
            UserProfile::new("María González", "maria.gonzalez@email.com", "+56 9 8765 4321")?
                .with_preferences(DietaryTags::from_strs(&["sin-lactosa", "vegetariano"])),
        )
    }

    #[test]
    fn new_profile_trims_fields() -> TestResult {
        let profile = UserProfile::new("  Ana  ", " ana@example.cl ", " +56 2 1234 ")?;

        assert_eq!(profile.name(), "Ana");
        assert_eq!(profile.email(), "ana@example.cl");
        assert_eq!(profile.phone(), "+56 2 1234");
        assert!(profile.preferences().is_empty());

        Ok(())
    }

    #[test]
    fn new_profile_rejects_blank_name() {
        assert_eq!(
            UserProfile::new(" ", "a@b.cl", ""),
            Err(ProfileError::NameEmpty)
        );
    }

    #[test]
    fn new_profile_rejects_bad_email() {
        assert_eq!(
            UserProfile::new("Ana", "ana.example.cl", ""),
            Err(ProfileError::InvalidEmail("ana.example.cl".to_string()))
        );
        assert!(UserProfile::new("Ana", "@example.cl", "").is_err());
        assert!(UserProfile::new("Ana", "ana@", "").is_err());
    }

    #[test]
    fn apply_updates_given_fields_only() -> TestResult {
        let mut profile = maria()?;

        profile.apply(ProfileUpdate {
            phone: Some("+56 9 1111 2222".to_string()),
            ..ProfileUpdate::default()
        })?;

        assert_eq!(profile.name(), "María González");
        assert_eq!(profile.phone(), "+56 9 1111 2222");

        Ok(())
    }

    #[test]
    fn apply_is_all_or_nothing() -> TestResult {
        let mut profile = maria()?;
        let before = profile.clone();

        let result = profile.apply(ProfileUpdate {
            name: Some("Mari".to_string()),
            email: Some("broken".to_string()),
            phone: None,
        });

        assert_eq!(result, Err(ProfileError::InvalidEmail("broken".to_string())));
        assert_eq!(profile, before);

        Ok(())
    }

    #[test]
    fn toggle_preference() -> TestResult {
        let mut profile = maria()?;

        assert!(profile.toggle_preference("vegano"));
        assert!(!profile.toggle_preference("vegetariano"));
        assert_eq!(
            profile.preferences().iter().collect::<Vec<_>>(),
            ["sin-lactosa", "vegano"]
        );

        Ok(())
    }

    #[test]
    fn stats_from_empty_history() -> TestResult {
        let catalog = Catalog::builtin()?;

        let stats = ProfileStats::from_history(&OrderHistory::new(), &catalog);

        assert_eq!(stats.total_orders, 0);
        assert_eq!(stats.total_spent, Price::ZERO);
        assert_eq!(stats.average_rating, None);
        assert_eq!(stats.favorite_category, None);

        Ok(())
    }

    #[test]
    fn stats_pick_category_with_most_units() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut history = OrderHistory::new();
        let mut cart = Cart::default();

        for id in ["1", "1", "6", "2"] {
            let item = catalog.get(&ProductId::from(id)).ok_or("missing item")?;
            cart.add_item(item.cart_product());
        }

        let order = place_order(
            &mut cart,
            &mut history,
            OrderRequest::new("4"),
            Timestamp::UNIX_EPOCH,
        )?
        .id();
        history.advance(order)?;
        history.advance(order)?;
        history.rate(order, 5)?;

        let stats = ProfileStats::from_history(&history, &catalog);

        assert_eq!(stats.total_orders, 1);
        assert_eq!(stats.total_spent, Price::new(3500 * 2 + 2800 + 8500));
        assert_eq!(stats.average_rating, Some(5.0));
        assert_eq!(stats.favorite_category.as_deref(), Some("Entradas"));

        Ok(())
    }

    #[test]
    fn stats_break_ties_by_menu_order() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut history = OrderHistory::new();
        let mut cart = Cart::default();

        for id in ["2", "4"] {
            let item = catalog.get(&ProductId::from(id)).ok_or("missing item")?;
            cart.add_item(item.cart_product());
        }

        place_order(
            &mut cart,
            &mut history,
            OrderRequest::new("4"),
            Timestamp::UNIX_EPOCH,
        )?;

        let stats = ProfileStats::from_history(&history, &catalog);

        assert_eq!(stats.favorite_category.as_deref(), Some("Entradas"));

        Ok(())
    }
}
