//! Food-bag command handlers.

use chrono::{DateTime, Local, Utc};
use clap::Subcommand;
use foodverse_client::{food_bag_listing, FoodBag, FoodBagInput, FoodBagUpdate};

use crate::output::{format_price, print_listings};
use crate::Context;

/// Sub-commands available under `bag`.
#[derive(Debug, Subcommand)]
pub enum BagCommands {
    /// List every bag a store offers
    List { store_id: i64 },
    /// Show one bag
    Show { id: i64 },
    /// List a new bag
    Create {
        #[arg(long)]
        store_id: i64,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        original_price: f64,
        /// Discounted price customers pay
        #[arg(long)]
        price: f64,
        #[arg(long)]
        quantity: u32,
        /// RFC 3339 timestamp, e.g. 2026-03-05T17:00:00+07:00
        #[arg(long)]
        pickup_start: DateTime<Utc>,
        #[arg(long)]
        pickup_end: DateTime<Utc>,
        #[arg(long)]
        category: String,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Change a bag; only the given fields are sent
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        original_price: Option<f64>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        quantity: Option<u32>,
        #[arg(long)]
        pickup_start: Option<DateTime<Utc>>,
        #[arg(long)]
        pickup_end: Option<DateTime<Utc>>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Remove a bag
    Delete { id: i64 },
}

/// Rejects inputs the backend would accept but no customer could use.
fn validate_bag(
    original_price: f64,
    price: f64,
    pickup_start: DateTime<Utc>,
    pickup_end: DateTime<Utc>,
) -> anyhow::Result<()> {
    if !(price.is_finite() && original_price.is_finite()) || price < 0.0 || original_price <= 0.0 {
        anyhow::bail!("prices must be positive numbers");
    }
    if price > original_price {
        anyhow::bail!("discounted price {price} is above the original price {original_price}");
    }
    if pickup_end <= pickup_start {
        anyhow::bail!("pickup window must end after it starts");
    }
    Ok(())
}

pub(crate) async fn run(ctx: &Context, command: BagCommands) -> anyhow::Result<()> {
    match command {
        BagCommands::List { store_id } => {
            let bags = ctx.client.store_food_bags(store_id).await?;
            if bags.is_empty() {
                println!("store {store_id} has no food bags listed");
                return Ok(());
            }
            let now = Local::now();
            let listings: Vec<_> = bags.iter().map(|b| food_bag_listing(b, None, &now)).collect();
            print_listings(&listings);
            Ok(())
        }
        BagCommands::Show { id } => {
            let bag = ctx.client.get_food_bag(id).await?;
            print_bag(&bag);
            Ok(())
        }
        BagCommands::Create {
            store_id,
            title,
            description,
            original_price,
            price,
            quantity,
            pickup_start,
            pickup_end,
            category,
            image_url,
        } => {
            validate_bag(original_price, price, pickup_start, pickup_end)?;
            let input = FoodBagInput {
                store_id,
                title,
                description,
                original_price,
                discounted_price: price,
                quantity_total: quantity,
                pickup_time_start: pickup_start,
                pickup_time_end: pickup_end,
                image_url,
                category,
            };
            let bag = ctx.client.create_food_bag(&input).await?;
            println!("food bag {} created", bag.id);
            print_bag(&bag);
            Ok(())
        }
        BagCommands::Update {
            id,
            title,
            description,
            original_price,
            price,
            quantity,
            pickup_start,
            pickup_end,
            category,
        } => {
            let update = FoodBagUpdate {
                title,
                description,
                original_price,
                discounted_price: price,
                quantity_total: quantity,
                pickup_time_start: pickup_start,
                pickup_time_end: pickup_end,
                category,
            };
            let bag = ctx.client.update_food_bag(id, &update).await?;
            println!("food bag {} updated", bag.id);
            Ok(())
        }
        BagCommands::Delete { id } => {
            ctx.client.delete_food_bag(id).await?;
            println!("food bag {id} deleted");
            Ok(())
        }
    }
}

fn print_bag(bag: &FoodBag) {
    let listing = food_bag_listing(bag, None, &Local::now());
    println!("{} (#{})", bag.title, bag.id);
    if let Some(store) = &bag.store {
        println!("  from {} ({})", store.name, store.address);
    }
    if !bag.description.is_empty() {
        println!("  {}", bag.description);
    }
    println!(
        "  price:    {} (was {}, {}% off)",
        format_price(bag.discounted_price),
        format_price(bag.original_price),
        listing.discount_percent.unwrap_or(0)
    );
    println!("  left:     {}", listing.quantity_left.unwrap_or(0));
    println!(
        "  pickup:   {} to {}",
        bag.pickup_time_start.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        bag.pickup_time_end.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    );
    if let Some(availability) = listing.availability {
        println!("  window:   {availability}");
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 5, hour, 0, 0).unwrap()
    }

    #[test]
    fn validate_accepts_discounted_bag() {
        assert!(validate_bag(60_000.0, 25_000.0, at(10), at(12)).is_ok());
    }

    #[test]
    fn validate_rejects_price_above_original() {
        assert!(validate_bag(20_000.0, 25_000.0, at(10), at(12)).is_err());
    }

    #[test]
    fn validate_rejects_inverted_window() {
        assert!(validate_bag(60_000.0, 25_000.0, at(12), at(12)).is_err());
    }
}
