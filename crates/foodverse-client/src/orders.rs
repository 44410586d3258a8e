//! Order placement against a listed food bag.

use foodverse_core::{clamp_quantity, total_price, Listing, ListingKind};

use crate::client::FoodverseClient;
use crate::error::ClientError;
use crate::types::{FoodBag, Order, OrderInput};

/// The bag being ordered and the stock the caller last saw for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTarget {
    pub food_bag_id: i64,
    pub quantity_left: u32,
    pub unit_price: f64,
}

impl OrderTarget {
    /// Builds a target from a food-bag listing; stores cannot be ordered.
    #[must_use]
    pub fn from_listing(listing: &Listing) -> Option<Self> {
        (listing.kind == ListingKind::FoodBag).then(|| Self {
            food_bag_id: listing.id,
            quantity_left: listing.quantity_left.unwrap_or(0),
            unit_price: listing.price.unwrap_or(0.0),
        })
    }

    /// Price the order will cost at `quantity`, after clamping.
    #[must_use]
    pub fn quote(&self, quantity: u32) -> Option<(u32, f64)> {
        clamp_quantity(quantity, self.quantity_left).map(|q| (q, total_price(self.unit_price, q)))
    }
}

impl From<&FoodBag> for OrderTarget {
    fn from(bag: &FoodBag) -> Self {
        Self {
            food_bag_id: bag.id,
            quantity_left: u32::try_from(bag.quantity_left.max(0)).unwrap_or(u32::MAX),
            unit_price: bag.discounted_price,
        }
    }
}

/// Places one order for `target`, clamping `requested` to `[1, quantity_left]`.
///
/// The request is sent once; callers refresh stock by searching again.
///
/// # Errors
///
/// - [`ClientError::InvalidInput`] if the bag is sold out. Nothing is sent.
/// - Any error from [`FoodverseClient::create_order`].
pub async fn place_order(
    client: &FoodverseClient,
    target: &OrderTarget,
    requested: u32,
    notes: Option<&str>,
) -> Result<Order, ClientError> {
    let Some(quantity) = clamp_quantity(requested, target.quantity_left) else {
        return Err(ClientError::InvalidInput(format!(
            "food bag {} is sold out",
            target.food_bag_id
        )));
    };
    if quantity != requested {
        tracing::info!(
            food_bag_id = target.food_bag_id,
            requested,
            quantity,
            "order quantity clamped to available stock"
        );
    }

    let input = OrderInput {
        food_bag_id: target.food_bag_id,
        quantity,
        notes: notes
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
    };
    let order = client.create_order(&input).await?;
    tracing::info!(
        order_id = order.id,
        food_bag_id = target.food_bag_id,
        quantity,
        "order placed"
    );
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_clamps_and_prices() {
        let target = OrderTarget {
            food_bag_id: 9,
            quantity_left: 3,
            unit_price: 25_000.0,
        };
        assert_eq!(target.quote(5), Some((3, 75_000.0)));
        assert_eq!(target.quote(0), Some((1, 25_000.0)));
    }

    #[test]
    fn quote_is_none_when_sold_out() {
        let target = OrderTarget {
            food_bag_id: 9,
            quantity_left: 0,
            unit_price: 25_000.0,
        };
        assert_eq!(target.quote(1), None);
    }

    #[test]
    fn stores_are_not_order_targets() {
        let listing = Listing {
            id: 3,
            kind: ListingKind::Store,
            name: "Kopi Kita".to_string(),
            description: String::new(),
            address: String::new(),
            category: "cafe".to_string(),
            tags: Vec::new(),
            distance_km: None,
            discount_percent: None,
            rating: 4.0,
            availability: None,
            quantity_left: None,
            store_id: None,
            price: None,
        };
        assert_eq!(OrderTarget::from_listing(&listing), None);
    }
}
