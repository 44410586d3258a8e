//! Store command handlers, including the seller dashboard summary.

use clap::Subcommand;
use foodverse_client::{order_line, Store, StoreInput, StoreUpdate};
use foodverse_core::stats::store_stats;

use crate::output::{format_distance, format_price, truncate};
use crate::Context;

/// Sub-commands available under `store`.
#[derive(Debug, Subcommand)]
pub enum StoreCommands {
    /// List the stores you own
    Mine,
    /// Show one store
    Show { id: i64 },
    /// Open a new store
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        address: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[arg(long)]
        category: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Change store details; only the given fields are sent
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Remove a store
    Delete { id: i64 },
    /// Revenue and order summary for a store
    Stats { id: i64 },
}

pub(crate) async fn run(ctx: &Context, command: StoreCommands) -> anyhow::Result<()> {
    match command {
        StoreCommands::Mine => {
            let stores = ctx.client.my_stores().await?;
            if stores.is_empty() {
                println!("you do not own any stores; create one with `foodverse store create`");
                return Ok(());
            }
            println!("{:<6}{:<32}{:<12}{:<8}ADDRESS", "ID", "NAME", "CATEGORY", "RATING");
            for store in &stores {
                println!(
                    "{:<6}{:<32}{:<12}{:<8.1}{}",
                    store.id,
                    truncate(&store.name, 30),
                    truncate(&store.category, 10),
                    store.rating,
                    store.address
                );
            }
            Ok(())
        }
        StoreCommands::Show { id } => {
            let store = ctx.client.get_store(id).await?;
            print_store(&store);
            Ok(())
        }
        StoreCommands::Create {
            name,
            description,
            address,
            lat,
            lng,
            category,
            phone,
            email,
            image_url,
        } => {
            let input = StoreInput {
                name,
                description,
                address,
                latitude: lat,
                longitude: lng,
                phone,
                email,
                category,
                image_url,
            };
            let store = ctx.client.create_store(&input).await?;
            println!("store {} created", store.id);
            print_store(&store);
            Ok(())
        }
        StoreCommands::Update {
            id,
            name,
            description,
            address,
            lat,
            lng,
            category,
            phone,
            email,
            image_url,
        } => {
            let update = StoreUpdate {
                name,
                description,
                address,
                latitude: lat,
                longitude: lng,
                phone,
                email,
                category,
                image_url,
            };
            let store = ctx.client.update_store(id, &update).await?;
            println!("store {} updated", store.id);
            Ok(())
        }
        StoreCommands::Delete { id } => {
            ctx.client.delete_store(id).await?;
            println!("store {id} deleted");
            Ok(())
        }
        StoreCommands::Stats { id } => run_stats(ctx, id).await,
    }
}

async fn run_stats(ctx: &Context, store_id: i64) -> anyhow::Result<()> {
    let orders = ctx.client.store_orders(store_id).await?;
    let lines: Vec<_> = orders.iter().map(order_line).collect();
    let stats = store_stats(&lines);

    println!("orders:           {}", stats.total_orders);
    println!("completed:        {}", stats.completed_orders);
    println!("revenue:          {}", format_price(stats.total_revenue));
    println!("completion rate:  {:.1}%", stats.completion_rate);
    println!("avg order value:  {}", format_price(stats.avg_order_value));
    println!("unique customers: {}", stats.unique_customers);
    if !stats.top_items.is_empty() {
        println!();
        println!("top items:");
        for (rank, (title, sold)) in stats.top_items.iter().enumerate() {
            println!("  {}. {title} ({sold} sold)", rank + 1);
        }
    }
    Ok(())
}

fn print_store(store: &Store) {
    println!("{} (#{})", store.name, store.id);
    println!("  {}", store.address);
    if !store.description.is_empty() {
        println!("  {}", store.description);
    }
    println!("  category: {}", store.category);
    println!("  rating:   {:.1}", store.rating);
    if store.distance.is_some() {
        println!("  distance: {}", format_distance(store.distance));
    }
    if !store.phone.is_empty() {
        println!("  phone:    {}", store.phone);
    }
    if !store.email.is_empty() {
        println!("  email:    {}", store.email);
    }
}
