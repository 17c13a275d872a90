//! Checkout and order tracking commands.

use bobr_client::api::types::Order;
use bobr_client::shop::Shop;
use bobr_core::{OrderId, OrderStatus};

use super::require_session;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

fn print_order(order: &Order) {
    println!("Order #{}  [{}]  {} ₽", order.id, order.status, order.total_amount);
    println!("  created: {}", order.created_at);
    for item in &order.items {
        println!(
            "  {}  {} ₽ x {} = {} ₽",
            item.product_name, item.price, item.quantity, item.total
        );
    }
}

/// Submit the cart as a new order and clear it.
pub async fn checkout(shop: &mut Shop) -> CommandResult {
    require_session(shop).await?;
    let order = shop.checkout().await?;
    println!("Order placed!");
    print_order(&order);
    Ok(())
}

/// List orders, most recent first.
pub async fn list(shop: &mut Shop) -> CommandResult {
    require_session(shop).await?;
    let orders = shop.orders().await?;
    if orders.is_empty() {
        println!("No orders yet");
        return Ok(());
    }
    for order in orders {
        println!(
            "#{}  [{}]  {} ₽  {} item(s)  {}",
            order.id, order.status, order.total_amount, order.items_count, order.created_at
        );
    }
    Ok(())
}

/// Show one order's item breakdown.
pub async fn show(shop: &mut Shop, id: OrderId) -> CommandResult {
    require_session(shop).await?;
    let order = shop.order_detail(id).await?;
    print_order(&order);
    Ok(())
}

/// Request a status transition for an order.
pub async fn set_status(shop: &mut Shop, id: OrderId, status: OrderStatus) -> CommandResult {
    require_session(shop).await?;
    let updated = shop.set_order_status(id, status).await?;
    println!("Order #{id} is now [{updated}]");
    Ok(())
}
