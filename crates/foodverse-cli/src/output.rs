//! Display helpers shared by the command handlers.

use chrono::{DateTime, Utc};
use foodverse_core::{Listing, ListingKind};

/// Placeholder for missing values in tables.
pub(crate) const NONE: &str = "-";

/// Formats a distance for display: metres under 1 km, otherwise one decimal
/// place of kilometres.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn format_distance(distance_km: Option<f64>) -> String {
    match distance_km {
        Some(km) if km.is_finite() && km >= 0.0 => {
            if km < 1.0 {
                format!("{} m", (km * 1000.0).round() as u64)
            } else {
                format!("{km:.1} km")
            }
        }
        _ => NONE.to_string(),
    }
}

/// Formats a rupiah amount with `.` thousands separators.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn format_price(amount: f64) -> String {
    if !amount.is_finite() {
        return NONE.to_string();
    }
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}Rp {grouped}")
}

pub(crate) fn format_time(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(|| NONE.to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

/// Cuts `text` to `max` characters, marking the cut with `...`.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

pub(crate) fn print_listings(listings: &[Listing]) {
    println!(
        "{:<6}{:<6}{:<32}{:<12}{:<10}{:<9}{:<8}{:<10}{}",
        "KIND", "ID", "NAME", "CATEGORY", "DISTANCE", "DISCOUNT", "RATING", "PICKUP", "PRICE"
    );
    for listing in listings {
        let kind = match listing.kind {
            ListingKind::Store => "store",
            ListingKind::FoodBag => "bag",
        };
        let discount = listing
            .discount_percent
            .map_or_else(|| NONE.to_string(), |d| format!("{d}%"));
        let pickup = if listing.is_sold_out() {
            "sold out".to_string()
        } else {
            listing
                .availability
                .map_or_else(|| NONE.to_string(), |a| a.to_string())
        };
        let price = listing.price.map_or_else(|| NONE.to_string(), format_price);
        println!(
            "{:<6}{:<6}{:<32}{:<12}{:<10}{:<9}{:<8.1}{:<10}{}",
            kind,
            listing.id,
            truncate(&listing.name, 30),
            truncate(&listing.category, 10),
            format_distance(listing.distance_km),
            discount,
            listing.rating,
            pickup,
            price
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_under_one_km_is_metres() {
        assert_eq!(format_distance(Some(0.85)), "850 m");
        assert_eq!(format_distance(Some(0.0)), "0 m");
    }

    #[test]
    fn distance_from_one_km_has_one_decimal() {
        assert_eq!(format_distance(Some(1.0)), "1.0 km");
        assert_eq!(format_distance(Some(12.345)), "12.3 km");
    }

    #[test]
    fn unknown_distance_is_placeholder() {
        assert_eq!(format_distance(None), "-");
        assert_eq!(format_distance(Some(f64::NAN)), "-");
        assert_eq!(format_distance(Some(-2.0)), "-");
    }

    #[test]
    fn price_groups_thousands() {
        assert_eq!(format_price(25_000.0), "Rp 25.000");
        assert_eq!(format_price(1_250_500.4), "Rp 1.250.500");
        assert_eq!(format_price(900.0), "Rp 900");
        assert_eq!(format_price(0.0), "Rp 0");
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("Pastry Surprise", 6), "Pastry...");
        assert_eq!(truncate("Kopi", 6), "Kopi");
    }
}
