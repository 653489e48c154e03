//! Menu search and filtering

use crate::{catalog::MenuItem, tags};

/// Search term plus category and dietary filters from the menu screen.
///
/// All three conditions must hold for an item to match. A missing filter, or
/// one set to [`tags::ALL`], matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuQuery {
    term: Option<String>,
    category: Option<String>,
    dietary: Option<String>,
}

impl MenuQuery {
    /// A query that matches every item.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match items whose name or description contains `term`, ignoring case.
    #[must_use]
    pub fn term(mut self, term: impl Into<String>) -> Self {
        let term = term.into().trim().to_lowercase();
        self.term = (!term.is_empty()).then_some(term);
        self
    }

    /// Match items in the given category.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into()).filter(|category| category != tags::ALL);
        self
    }

    /// Match items carrying the given dietary tag.
    #[must_use]
    pub fn dietary(mut self, tag: impl Into<String>) -> Self {
        self.dietary = Some(tag.into()).filter(|tag| tag != tags::ALL);
        self
    }

    /// Check whether an item satisfies every condition.
    pub fn matches(&self, item: &MenuItem) -> bool {
        let matches_term = self.term.as_deref().is_none_or(|term| {
            item.name.to_lowercase().contains(term) || item.description.to_lowercase().contains(term)
        });

        let matches_category = self
            .category
            .as_deref()
            .is_none_or(|category| item.category == category);

        let matches_dietary = self
            .dietary
            .as_deref()
            .is_none_or(|tag| item.dietary.contains(tag));

        matches_term && matches_category && matches_dietary
    }
}
