//! Nearby search: stores and food bags fetched together, with superseded
//! searches discarded.
//!
//! A [`DiscoverySession`] is shared by everything that can trigger a search
//! (location changes, category changes, a typed query). Each call to
//! [`DiscoverySession::search`] takes a new generation number; when the two
//! requests resolve, the result is kept only if no newer search has started
//! in the meantime. The two halves fail independently so that a broken
//! food-bag search still shows stores.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, TimeZone};

use foodverse_core::{Coordinate, Listing};

use crate::client::FoodverseClient;
use crate::error::ClientError;
use crate::normalize::{food_bag_listing, store_listing};
use crate::types::{FoodBag, FoodBagSearchRequest, Store, StoreSearchRequest};

/// Category id the UI uses for "no category filter".
pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub location: Coordinate,
    pub radius_km: Option<f64>,
    pub category: Option<String>,
    pub query: Option<String>,
    pub max_price: Option<f64>,
    pub min_price: Option<f64>,
}

impl NearbyQuery {
    #[must_use]
    pub fn new(location: Coordinate, radius_km: f64) -> Self {
        Self {
            location,
            radius_km: Some(radius_km),
            category: None,
            query: None,
            max_price: None,
            min_price: None,
        }
    }

    /// Sets the server-side category; blank or `"All"` clears it.
    #[must_use]
    pub fn with_category(mut self, category: &str) -> Self {
        let category = category.trim();
        self.category = (!category.is_empty() && !category.eq_ignore_ascii_case(ALL_CATEGORIES))
            .then(|| category.to_string());
        self
    }

    /// Sets the server-side store text query; blank clears it.
    #[must_use]
    pub fn with_query(mut self, query: &str) -> Self {
        let query = query.trim();
        self.query = (!query.is_empty()).then(|| query.to_string());
        self
    }

    fn store_request(&self) -> StoreSearchRequest {
        StoreSearchRequest {
            latitude: self.location.latitude,
            longitude: self.location.longitude,
            radius: self.radius_km,
            category: self.category.clone(),
            query: self.query.clone(),
        }
    }

    fn food_bag_request(&self) -> FoodBagSearchRequest {
        FoodBagSearchRequest {
            latitude: self.location.latitude,
            longitude: self.location.longitude,
            radius: self.radius_km,
            category: self.category.clone(),
            max_price: self.max_price,
            min_price: self.min_price,
        }
    }
}

/// Which half of a nearby search failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResource {
    Stores,
    FoodBags,
}

impl std::fmt::Display for SearchResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchResource::Stores => write!(f, "stores"),
            SearchResource::FoodBags => write!(f, "food bags"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFailure {
    pub resource: SearchResource,
    pub message: String,
}

/// One completed nearby search. A failed half is empty and listed in
/// `failures`.
#[derive(Debug, Clone, Default)]
pub struct Nearby {
    pub origin: Option<Coordinate>,
    pub stores: Vec<Store>,
    pub food_bags: Vec<FoodBag>,
    pub failures: Vec<SearchFailure>,
}

impl Nearby {
    /// Flattens both halves into listings, food bags first, each half in the
    /// order the server returned it. Pickup days are judged in the time zone
    /// of `now`.
    #[must_use]
    pub fn listings<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<Listing> {
        self.food_bags
            .iter()
            .map(|bag| food_bag_listing(bag, self.origin, now))
            .chain(self.stores.iter().map(|store| store_listing(store, self.origin)))
            .collect()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug)]
pub enum SearchOutcome {
    /// A newer search started before this one resolved; drop the result.
    Stale,
    Fresh(Nearby),
}

#[derive(Debug, Default)]
pub struct DiscoverySession {
    generation: AtomicU64,
}

impl DiscoverySession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation, superseding every search in flight.
    pub fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Runs the store and food-bag searches concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] if either half was rejected for
    /// credentials. Every other failure is recorded in [`Nearby::failures`].
    pub async fn search(
        &self,
        client: &FoodverseClient,
        query: &NearbyQuery,
    ) -> Result<SearchOutcome, ClientError> {
        let generation = self.begin();
        let store_request = query.store_request();
        let food_bag_request = query.food_bag_request();

        tracing::debug!(
            generation,
            location = %query.location,
            radius_km = ?query.radius_km,
            category = ?query.category,
            "nearby search started"
        );

        let (stores, food_bags) = tokio::join!(
            client.search_stores(&store_request),
            client.search_food_bags(&food_bag_request),
        );

        if !self.is_current(generation) {
            tracing::debug!(generation, "discarding superseded nearby search");
            return Ok(SearchOutcome::Stale);
        }

        let mut nearby = Nearby {
            origin: Some(query.location),
            ..Nearby::default()
        };
        nearby.stores = absorb(stores, SearchResource::Stores, &mut nearby.failures)?;
        nearby.food_bags = absorb(food_bags, SearchResource::FoodBags, &mut nearby.failures)?;

        tracing::info!(
            generation,
            stores = nearby.stores.len(),
            food_bags = nearby.food_bags.len(),
            failures = nearby.failures.len(),
            "nearby search complete"
        );
        Ok(SearchOutcome::Fresh(nearby))
    }
}

fn absorb<T>(
    result: Result<Vec<T>, ClientError>,
    resource: SearchResource,
    failures: &mut Vec<SearchFailure>,
) -> Result<Vec<T>, ClientError> {
    match result {
        Ok(items) => Ok(items),
        Err(ClientError::Unauthorized) => Err(ClientError::Unauthorized),
        Err(e) => {
            tracing::warn!(%resource, error = %e, "nearby search half failed");
            failures.push(SearchFailure {
                resource,
                message: e.to_string(),
            });
            Ok(Vec::new())
        }
    }
}
