//! The unified record the discovery pipeline filters and sorts.
//!
//! Stores and food bags arrive from two different search endpoints; both are
//! flattened into [`Listing`] so one pipeline can handle either.

use chrono::{DateTime, Days, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    Store,
    FoodBag,
}

/// When a food bag can be picked up, relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Now,
    Today,
    Tomorrow,
}

impl Availability {
    /// Classifies a pickup window against `now`.
    ///
    /// Returns `None` for windows that already closed or open later than
    /// tomorrow. "Today" and "tomorrow" are calendar days in the time zone of
    /// `now`.
    #[must_use]
    pub fn classify<Tz: TimeZone>(
        pickup_start: DateTime<Utc>,
        pickup_end: DateTime<Utc>,
        now: &DateTime<Tz>,
    ) -> Option<Self> {
        let instant = now.with_timezone(&Utc);
        if instant > pickup_end {
            return None;
        }
        if pickup_start <= instant {
            return Some(Availability::Now);
        }

        let today = now.date_naive();
        let start_day = pickup_start.with_timezone(&now.timezone()).date_naive();
        if start_day == today {
            Some(Availability::Today)
        } else if today.checked_add_days(Days::new(1)) == Some(start_day) {
            Some(Availability::Tomorrow)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Availability::Now => write!(f, "now"),
            Availability::Today => write!(f, "today"),
            Availability::Tomorrow => write!(f, "tomorrow"),
        }
    }
}

impl std::str::FromStr for Availability {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "now" => Ok(Availability::Now),
            "today" => Ok(Availability::Today),
            "tomorrow" => Ok(Availability::Tomorrow),
            _ => Err(CoreError::InvalidAvailability(s.to_string())),
        }
    }
}

/// A store or food bag as shown in search results.
///
/// Optional metrics are `None` when the backend did not supply them (no
/// location-bearing search yet, or not applicable to the listing kind).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    pub kind: ListingKind,
    pub name: String,
    pub description: String,
    pub address: String,
    pub category: String,
    pub tags: Vec<String>,
    pub distance_km: Option<f64>,
    pub discount_percent: Option<u8>,
    pub rating: f64,
    pub availability: Option<Availability>,
    /// `Some(0)` means sold out.
    pub quantity_left: Option<u32>,
    /// Parent store of a food bag.
    pub store_id: Option<i64>,
    /// Discounted price of a food bag.
    pub price: Option<f64>,
}

impl Listing {
    /// Returns `true` if this is a food bag with nothing left to order.
    #[must_use]
    pub fn is_sold_out(&self) -> bool {
        self.quantity_left == Some(0)
    }
}

/// Percentage saved relative to `original`, rounded and clamped to `[0, 100]`.
///
/// A non-positive or non-finite `original` yields 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn discount_percent(original: f64, discounted: f64) -> u8 {
    if !original.is_finite() || !discounted.is_finite() || original <= 0.0 {
        return 0;
    }
    let pct = ((original - discounted) / original * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}
