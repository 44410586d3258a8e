//! Seller dashboard figures computed from a store's order history.

use std::collections::{BTreeMap, HashSet};

use crate::order::OrderStatus;

const TOP_ITEMS: usize = 5;

/// The slice of an order the dashboard needs.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub user_id: i64,
    pub status: OrderStatus,
    pub quantity: u32,
    pub total_price: f64,
    /// Title of the ordered food bag, when the backend embedded it.
    pub item: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreStats {
    /// Sum of `total_price` over completed orders.
    pub total_revenue: f64,
    pub total_orders: usize,
    pub completed_orders: usize,
    /// Percentage of orders that completed, 0 when there are none.
    pub completion_rate: f64,
    pub avg_order_value: f64,
    pub unique_customers: usize,
    /// `(title, quantity sold)` highest first.
    pub top_items: Vec<(String, u32)>,
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn store_stats(orders: &[OrderLine]) -> StoreStats {
    let completed: Vec<&OrderLine> = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Completed)
        .collect();

    let total_revenue: f64 = completed.iter().map(|o| o.total_price).sum();
    let total_orders = orders.len();
    let completed_orders = completed.len();

    let completion_rate = if total_orders > 0 {
        completed_orders as f64 / total_orders as f64 * 100.0
    } else {
        0.0
    };
    let avg_order_value = if completed_orders > 0 {
        total_revenue / completed_orders as f64
    } else {
        0.0
    };

    let unique_customers = orders.iter().map(|o| o.user_id).collect::<HashSet<_>>().len();

    let mut sales: BTreeMap<&str, u32> = BTreeMap::new();
    for order in orders {
        if let Some(item) = order.item.as_deref() {
            *sales.entry(item).or_default() += order.quantity;
        }
    }
    // BTreeMap iteration is title-ordered, so the stable sort breaks ties by title.
    let mut top_items: Vec<(String, u32)> = sales
        .into_iter()
        .map(|(title, qty)| (title.to_string(), qty))
        .collect();
    top_items.sort_by(|a, b| b.1.cmp(&a.1));
    top_items.truncate(TOP_ITEMS);

    StoreStats {
        total_revenue,
        total_orders,
        completed_orders,
        completion_rate,
        avg_order_value,
        unique_customers,
        top_items,
    }
}
