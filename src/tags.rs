//! Dietary Tags
//!
//! A small sorted set of dietary labels (`vegano`, `sin-gluten`, ...) shared by
//! menu items, menu filters and profile preferences.

use std::{cmp::Ordering, string::ToString};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Tag id that matches every item when used as a filter.
pub const ALL: &str = "todos";

/// A sorted, de-duplicated collection of dietary tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct DietaryTags {
    tags: SmallVec<[String; 4]>,
}

impl DietaryTags {
    /// Create a new tag collection from owned strings.
    #[must_use]
    pub fn new(tags: SmallVec<[String; 4]>) -> Self {
        let mut collection = Self { tags };

        collection.tags.sort();
        collection.tags.dedup();

        collection
    }

    /// Create a new tag collection from string slices.
    pub fn from_strs(tags: &[&str]) -> Self {
        Self::new(
            tags.iter()
                .map(ToString::to_string)
                .collect::<SmallVec<[String; 4]>>(),
        )
    }

    /// Check whether the tag is present.
    pub fn contains(&self, tag: &str) -> bool {
        self.tags
            .binary_search_by(|existing| existing.as_str().cmp(tag))
            .is_ok()
    }

    /// Check whether both collections share at least one tag.
    pub fn intersects(&self, other: &Self) -> bool {
        let mut left = self.tags.iter();
        let mut right = other.tags.iter();
        let mut left_tag = left.next();
        let mut right_tag = right.next();

        while let (Some(left_tag_ref), Some(right_tag_ref)) = (left_tag, right_tag) {
            match left_tag_ref.cmp(right_tag_ref) {
                Ordering::Equal => return true,
                Ordering::Less => left_tag = left.next(),
                Ordering::Greater => right_tag = right.next(),
            }
        }

        false
    }

    /// Adds a tag, keeping the collection sorted. Returns `false` if it was already present.
    pub fn insert(&mut self, tag: &str) -> bool {
        match self.tags.binary_search_by(|existing| existing.as_str().cmp(tag)) {
            Ok(_) => false,
            Err(pos) => {
                self.tags.insert(pos, tag.to_string());
                true
            }
        }
    }

    /// Removes a tag. Returns `false` if it was not present.
    pub fn remove(&mut self, tag: &str) -> bool {
        match self.tags.binary_search_by(|existing| existing.as_str().cmp(tag)) {
            Ok(pos) => {
                self.tags.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Adds the tag if missing, removes it otherwise. Returns whether it is now present.
    pub fn toggle(&mut self, tag: &str) -> bool {
        if self.remove(tag) {
            false
        } else {
            self.insert(tag)
        }
    }

    /// Iterate over the tags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Number of tags
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check if there are no tags.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl From<Vec<String>> for DietaryTags {
    fn from(tags: Vec<String>) -> Self {
        Self::new(SmallVec::from_vec(tags))
    }
}

impl From<DietaryTags> for Vec<String> {
    fn from(tags: DietaryTags) -> Self {
        tags.tags.into_vec()
    }
}
