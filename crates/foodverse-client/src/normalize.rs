//! Conversion of API types into the domain types the discovery pipeline and
//! dashboards work with.

use chrono::{DateTime, TimeZone};

use foodverse_core::stats::OrderLine;
use foodverse_core::{discount_percent, haversine_km, Availability, Coordinate, Listing, ListingKind};

use crate::types::{FoodBag, Order, Store};

/// A distance is usable only when finite and non-negative.
fn usable_distance(distance: Option<f64>) -> Option<f64> {
    distance.filter(|d| d.is_finite() && *d >= 0.0)
}

fn store_coordinate(store: &Store) -> Option<Coordinate> {
    let c = Coordinate::new(store.latitude, store.longitude);
    // (0, 0) is what the backend sends for a store without coordinates.
    (c.is_valid() && (c.latitude != 0.0 || c.longitude != 0.0)).then_some(c)
}

/// The server's distance, or a haversine estimate from `origin` to the store.
fn resolve_distance(store: Option<&Store>, origin: Option<Coordinate>) -> Option<f64> {
    let store = store?;
    usable_distance(store.distance).or_else(|| {
        let origin = origin?;
        store_coordinate(store).map(|c| haversine_km(origin, c))
    })
}

fn push_tag(tags: &mut Vec<String>, tag: &str) {
    let tag = tag.trim();
    if tag.is_empty() || tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
        return;
    }
    tags.push(tag.to_string());
}

fn clamp_rating(rating: f64) -> f64 {
    if rating.is_finite() {
        rating.clamp(0.0, 5.0)
    } else {
        0.0
    }
}

/// Converts a store search result into a [`Listing`].
#[must_use]
pub fn store_listing(store: &Store, origin: Option<Coordinate>) -> Listing {
    let mut tags = Vec::new();
    push_tag(&mut tags, &store.category);

    Listing {
        id: store.id,
        kind: ListingKind::Store,
        name: store.name.clone(),
        description: store.description.clone(),
        address: store.address.clone(),
        category: store.category.clone(),
        tags,
        distance_km: resolve_distance(Some(store), origin),
        discount_percent: None,
        rating: clamp_rating(store.rating),
        availability: None,
        quantity_left: None,
        store_id: None,
        price: None,
    }
}

/// Converts a food-bag search result into a [`Listing`], classifying its
/// pickup window against `now` in the caller's time zone.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn food_bag_listing<Tz: TimeZone>(
    bag: &FoodBag,
    origin: Option<Coordinate>,
    now: &DateTime<Tz>,
) -> Listing {
    let store = bag.store.as_ref();

    let mut tags = Vec::new();
    push_tag(&mut tags, &bag.category);
    if let Some(store) = store {
        push_tag(&mut tags, &store.category);
        push_tag(&mut tags, &store.name);
    }

    let discount = if bag.original_price > 0.0 {
        discount_percent(bag.original_price, bag.discounted_price)
    } else {
        bag.discount_percent.unwrap_or(0).clamp(0, 100) as u8
    };

    Listing {
        id: bag.id,
        kind: ListingKind::FoodBag,
        name: bag.title.clone(),
        description: bag.description.clone(),
        address: store.map(|s| s.address.clone()).unwrap_or_default(),
        category: bag.category.clone(),
        tags,
        distance_km: resolve_distance(store, origin),
        discount_percent: Some(discount),
        rating: store.map_or(0.0, |s| clamp_rating(s.rating)),
        availability: Availability::classify(bag.pickup_time_start, bag.pickup_time_end, now),
        quantity_left: Some(u32::try_from(bag.quantity_left.max(0)).unwrap_or(u32::MAX)),
        store_id: bag.parent_store_id(),
        price: Some(bag.discounted_price),
    }
}

/// Converts an order into the line the seller dashboard aggregates.
#[must_use]
pub fn order_line(order: &Order) -> OrderLine {
    OrderLine {
        user_id: order.user_id.unwrap_or_default(),
        status: order.status,
        quantity: order.quantity,
        total_price: order.total_price,
        item: order
            .food_bag
            .as_ref()
            .map(|bag| bag.title.clone())
            .filter(|title| !title.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use foodverse_core::OrderStatus;

    use super::*;

    fn store() -> Store {
        Store {
            id: 3,
            name: "Kopi Kita".to_string(),
            description: "Neighbourhood coffee".to_string(),
            address: "Jl. Sabang 12".to_string(),
            latitude: -6.1862,
            longitude: 106.8233,
            phone: String::new(),
            email: String::new(),
            category: "cafe".to_string(),
            image_url: String::new(),
            rating: 4.6,
            distance: Some(2.4),
            created_at: None,
            updated_at: None,
        }
    }

    fn bag(now: DateTime<Utc>) -> FoodBag {
        FoodBag {
            id: 9,
            store_id: None,
            title: "Pastry Surprise".to_string(),
            description: "Croissants and buns".to_string(),
            original_price: 60_000.0,
            discounted_price: 25_000.0,
            discount_percent: Some(10),
            quantity_left: 4,
            pickup_time_start: now - chrono::Duration::hours(1),
            pickup_time_end: now + chrono::Duration::hours(1),
            image_url: String::new(),
            category: "Bakery".to_string(),
            store: Some(store()),
            created_at: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 5, 10, 0, 0).unwrap()
    }

    #[test]
    fn store_listing_carries_server_distance() {
        let listing = store_listing(&store(), None);
        assert_eq!(listing.kind, ListingKind::Store);
        assert_eq!(listing.distance_km, Some(2.4));
        assert_eq!(listing.discount_percent, None);
        assert_eq!(listing.tags, vec!["cafe".to_string()]);
    }

    #[test]
    fn store_listing_estimates_missing_distance_from_origin() {
        let mut s = store();
        s.distance = None;
        let listing = store_listing(&s, Some(Coordinate::JAKARTA));
        let d = listing.distance_km.unwrap();
        assert!((2.0..4.0).contains(&d), "unexpected distance {d}");

        assert_eq!(store_listing(&s, None).distance_km, None);
    }

    #[test]
    fn store_listing_ignores_negative_distance_and_null_island() {
        let mut s = store();
        s.distance = Some(-1.0);
        s.latitude = 0.0;
        s.longitude = 0.0;
        assert_eq!(store_listing(&s, Some(Coordinate::JAKARTA)).distance_km, None);
    }

    #[test]
    fn food_bag_listing_derives_discount_from_prices() {
        let listing = food_bag_listing(&bag(now()), None, &now());
        assert_eq!(listing.discount_percent, Some(58));
        assert_eq!(listing.price, Some(25_000.0));
    }

    #[test]
    fn food_bag_listing_falls_back_to_server_discount() {
        let mut b = bag(now());
        b.original_price = 0.0;
        b.discount_percent = Some(130);
        assert_eq!(food_bag_listing(&b, None, &now()).discount_percent, Some(100));
    }

    #[test]
    fn food_bag_listing_inherits_store_fields() {
        let listing = food_bag_listing(&bag(now()), None, &now());
        assert_eq!(listing.store_id, Some(3));
        assert_eq!(listing.address, "Jl. Sabang 12");
        assert!((listing.rating - 4.6).abs() < f64::EPSILON);
        assert_eq!(listing.distance_km, Some(2.4));
        assert_eq!(
            listing.tags,
            vec!["Bakery".to_string(), "cafe".to_string(), "Kopi Kita".to_string()]
        );
        assert_eq!(listing.availability, Some(Availability::Now));
        assert_eq!(listing.quantity_left, Some(4));
    }

    #[test]
    fn food_bag_listing_classifies_in_local_time() {
        let mut b = bag(now());
        b.pickup_time_start = Utc.with_ymd_and_hms(2026, 3, 5, 11, 0, 0).unwrap();
        b.pickup_time_end = Utc.with_ymd_and_hms(2026, 3, 5, 13, 0, 0).unwrap();
        let jakarta_dawn = chrono::FixedOffset::east_opt(7 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 3, 5, 5, 0, 0)
            .unwrap();

        let listing = food_bag_listing(&b, None, &jakarta_dawn);
        assert_eq!(listing.availability, Some(Availability::Today));
    }

    #[test]
    fn food_bag_listing_clamps_negative_quantity() {
        let mut b = bag(now());
        b.quantity_left = -2;
        let listing = food_bag_listing(&b, None, &now());
        assert_eq!(listing.quantity_left, Some(0));
        assert!(listing.is_sold_out());
    }

    #[test]
    fn order_line_uses_embedded_bag_title() {
        let order = Order {
            id: 1,
            user_id: Some(7),
            food_bag_id: Some(9),
            store_id: Some(3),
            quantity: 2,
            total_price: 50_000.0,
            status: OrderStatus::Completed,
            notes: String::new(),
            pickup_code: "A1B2C3".to_string(),
            food_bag: Some(bag(now())),
            store: None,
            created_at: None,
            picked_up_at: None,
        };
        let line = order_line(&order);
        assert_eq!(line.user_id, 7);
        assert_eq!(line.item.as_deref(), Some("Pastry Surprise"));
    }
}
