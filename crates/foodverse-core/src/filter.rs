//! Client-side filter/sort pipeline over an already-fetched listing set.
//!
//! [`filter_and_sort`] runs five narrowing stages in a fixed order (text,
//! distance, discount, category, availability) and then a stable sort. It is
//! a pure function of its inputs; [`FilterState`] holds the mutable criteria
//! a front end edits between runs.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::listing::{Availability, Listing};
use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Nearest first.
    #[default]
    Distance,
    /// Biggest discount first.
    Discount,
    /// Best rated first.
    Rating,
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::Distance => write!(f, "distance"),
            SortKey::Discount => write!(f, "discount"),
            SortKey::Rating => write!(f, "rating"),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "distance" => Ok(SortKey::Distance),
            "discount" => Ok(SortKey::Discount),
            "rating" => Ok(SortKey::Rating),
            _ => Err(CoreError::InvalidSortKey(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Free text; empty means no text filter.
    pub query: String,
    pub max_distance_km: f64,
    pub min_discount_percent: u8,
    /// Selected category ids; empty means all categories.
    pub categories: BTreeSet<String>,
    /// Selected availability values; empty means all.
    pub availability: BTreeSet<Availability>,
    pub sort_key: SortKey,
}

impl Default for FilterCriteria {
    /// Fully permissive criteria: every listing passes, sorted by distance.
    fn default() -> Self {
        Self {
            query: String::new(),
            max_distance_km: f64::INFINITY,
            min_discount_percent: 0,
            categories: BTreeSet::new(),
            availability: BTreeSet::new(),
            sort_key: SortKey::Distance,
        }
    }
}

impl FilterCriteria {
    pub const EXPLORE_MAX_DISTANCE_KM: f64 = 5.0;
    pub const EXPLORE_MIN_DISCOUNT_PERCENT: u8 = 50;

    /// The Explore page starting point: within 5 km and at least 50% off.
    #[must_use]
    pub fn explore() -> Self {
        Self {
            max_distance_km: Self::EXPLORE_MAX_DISTANCE_KM,
            min_discount_percent: Self::EXPLORE_MIN_DISCOUNT_PERCENT,
            ..Self::default()
        }
    }

    fn matches_query(listing: &Listing, needle: &str) -> bool {
        listing.name.to_lowercase().contains(needle)
            || listing.description.to_lowercase().contains(needle)
            || listing.address.to_lowercase().contains(needle)
            || listing
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle))
    }

    fn within_distance(&self, listing: &Listing) -> bool {
        // Listings without a distance have not been located yet and are never
        // excluded on distance.
        listing
            .distance_km
            .map_or(true, |d| d <= self.max_distance_km)
    }

    fn meets_discount(&self, listing: &Listing) -> bool {
        listing
            .discount_percent
            .map_or(true, |d| d >= self.min_discount_percent)
    }

    fn matches_category(&self, listing: &Listing) -> bool {
        if self.categories.is_empty() {
            return true;
        }
        let category = listing.category.to_lowercase();
        let tags: Vec<String> = listing.tags.iter().map(|t| t.to_lowercase()).collect();
        self.categories.iter().any(|selected| {
            let selected = selected.to_lowercase();
            category == selected || tags.iter().any(|t| *t == selected)
        })
    }

    fn matches_availability(&self, listing: &Listing) -> bool {
        if self.availability.is_empty() {
            return true;
        }
        listing
            .availability
            .is_some_and(|a| self.availability.contains(&a))
    }

    fn compare(&self, a: &Listing, b: &Listing) -> Ordering {
        match self.sort_key {
            SortKey::Distance => none_last(a.distance_km, b.distance_km, |x, y| x.total_cmp(&y)),
            SortKey::Discount => {
                none_last(a.discount_percent, b.discount_percent, |x, y| y.cmp(&x))
            }
            SortKey::Rating => b.rating.total_cmp(&a.rating),
        }
    }
}

/// Orders present values with `cmp` and pushes absent values to the end.
fn none_last<T, F>(a: Option<T>, b: Option<T>, cmp: F) -> Ordering
where
    F: FnOnce(T, T) -> Ordering,
{
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filters `listings` by `criteria` and returns the survivors in sort order.
///
/// The sort is stable: listings that compare equal keep their fetch order.
#[must_use]
pub fn filter_and_sort(listings: &[Listing], criteria: &FilterCriteria) -> Vec<Listing> {
    let needle = criteria.query.to_lowercase();

    let mut results: Vec<Listing> = listings
        .iter()
        .filter(|l| needle.is_empty() || FilterCriteria::matches_query(l, &needle))
        .filter(|l| criteria.within_distance(l))
        .filter(|l| criteria.meets_discount(l))
        .filter(|l| criteria.matches_category(l))
        .filter(|l| criteria.matches_availability(l))
        .cloned()
        .collect();

    results.sort_by(|a, b| criteria.compare(a, b));
    results
}

/// Adds `value` to `set` if absent, removes it if present.
pub fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if set.contains(&value) {
        set.remove(&value);
    } else {
        set.insert(value);
    }
}

/// Editable criteria plus the baseline that [`FilterState::reset`] restores.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    criteria: FilterCriteria,
    baseline: FilterCriteria,
}

impl FilterState {
    #[must_use]
    pub fn new(baseline: FilterCriteria) -> Self {
        Self {
            criteria: baseline.clone(),
            baseline,
        }
    }

    #[must_use]
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn criteria_mut(&mut self) -> &mut FilterCriteria {
        &mut self.criteria
    }

    pub fn toggle_category(&mut self, category: &str) {
        toggle(&mut self.criteria.categories, category.to_string());
    }

    pub fn toggle_availability(&mut self, availability: Availability) {
        toggle(&mut self.criteria.availability, availability);
    }

    /// Restores every field of the criteria to the baseline in one assignment.
    pub fn reset(&mut self) {
        self.criteria = self.baseline.clone();
    }

    /// Returns `true` if any criterion differs from the baseline.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.criteria != self.baseline
    }

    #[must_use]
    pub fn apply(&self, listings: &[Listing]) -> Vec<Listing> {
        filter_and_sort(listings, &self.criteria)
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(FilterCriteria::default())
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
