//! Order command handlers.

use chrono::Local;
use clap::Subcommand;
use foodverse_client::{place_order, Order, OrderTarget};
use foodverse_core::{OrderStatus, PickupCode};

use crate::output::{format_price, format_time, truncate, NONE};
use crate::Context;

/// Sub-commands available under `order`.
#[derive(Debug, Subcommand)]
pub enum OrderCommands {
    /// Order a food bag
    Place {
        food_bag_id: i64,
        /// Bags to order; clamped to what is left
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List your orders
    List,
    /// Show one order
    Show { id: i64 },
    /// Move an order to a new status (sellers)
    Status { id: i64, status: OrderStatus },
    /// Complete the order matching a pickup code (sellers)
    Verify { code: PickupCode },
    /// List orders placed at one of your stores
    Store { store_id: i64 },
}

pub(crate) async fn run(ctx: &Context, command: OrderCommands) -> anyhow::Result<()> {
    match command {
        OrderCommands::Place {
            food_bag_id,
            quantity,
            notes,
        } => run_place(ctx, food_bag_id, quantity, notes.as_deref()).await,
        OrderCommands::List => {
            let orders = ctx.client.my_orders().await?;
            print_orders(&orders, "you have no orders yet");
            Ok(())
        }
        OrderCommands::Show { id } => {
            let order = ctx.client.get_order(id).await?;
            print_order(&order);
            Ok(())
        }
        OrderCommands::Status { id, status } => {
            let order = ctx.client.update_order_status(id, status).await?;
            println!("order {} is now {}", order.id, order.status);
            Ok(())
        }
        OrderCommands::Verify { code } => {
            let order = ctx.client.verify_pickup(&code).await?;
            println!("pickup verified: order {} is {}", order.id, order.status);
            print_order(&order);
            Ok(())
        }
        OrderCommands::Store { store_id } => {
            let orders = ctx.client.store_orders(store_id).await?;
            print_orders(&orders, &format!("no orders for store {store_id}"));
            Ok(())
        }
    }
}

async fn run_place(
    ctx: &Context,
    food_bag_id: i64,
    quantity: u32,
    notes: Option<&str>,
) -> anyhow::Result<()> {
    let bag = ctx.client.get_food_bag(food_bag_id).await?;
    let target = OrderTarget::from(&bag);
    let Some((clamped, total)) = target.quote(quantity) else {
        anyhow::bail!("'{}' is sold out", bag.title);
    };
    if clamped != quantity {
        println!("only {} left; ordering {clamped}", target.quantity_left);
    }
    println!(
        "ordering {clamped} x '{}' for {}",
        bag.title,
        format_price(total)
    );

    let order = place_order(&ctx.client, &target, quantity, notes).await?;
    println!("order {} placed ({})", order.id, order.status);
    println!("pickup code: {}", order.pickup_code);
    println!(
        "pickup window: {} to {}",
        bag.pickup_time_start.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        bag.pickup_time_end.with_timezone(&Local).format("%H:%M")
    );
    Ok(())
}

fn print_orders(orders: &[Order], empty: &str) {
    if orders.is_empty() {
        println!("{empty}");
        return;
    }
    println!(
        "{:<8}{:<12}{:<5}{:<14}{:<9}{:<18}ITEM",
        "ID", "STATUS", "QTY", "TOTAL", "CODE", "PLACED"
    );
    for order in orders {
        let item = order
            .food_bag
            .as_ref()
            .map_or(NONE, |bag| bag.title.as_str());
        println!(
            "{:<8}{:<12}{:<5}{:<14}{:<9}{:<18}{}",
            order.id,
            order.status,
            order.quantity,
            format_price(order.total_price),
            order.pickup_code,
            format_time(order.created_at),
            truncate(item, 40)
        );
    }
}

fn print_order(order: &Order) {
    println!("order:   {}", order.id);
    println!("status:  {}", order.status);
    if let Some(bag) = &order.food_bag {
        println!("item:    {}", bag.title);
    }
    if let Some(store) = &order.store {
        println!("store:   {} ({})", store.name, store.address);
    }
    println!("qty:     {}", order.quantity);
    println!("total:   {}", format_price(order.total_price));
    println!("code:    {}", order.pickup_code);
    println!("placed:  {}", format_time(order.created_at));
    if order.picked_up_at.is_some() {
        println!("pickup:  {}", format_time(order.picked_up_at));
    }
    if !order.notes.is_empty() {
        println!("notes:   {}", order.notes);
    }
    if !order.status.is_terminal() {
        println!("next:    {}", next_statuses(order.status));
    }
}

/// Statuses a seller can move an open order to.
fn next_statuses(status: OrderStatus) -> String {
    OrderStatus::ALL
        .into_iter()
        .filter(|s| *s != status && *s != OrderStatus::Pending)
        .map(OrderStatus::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
