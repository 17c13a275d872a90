//! Local cart commands.
//!
//! The cart lives on this device until checkout; every edit is persisted
//! immediately.

use bobr_client::shop::Shop;
use bobr_core::ProductId;

use super::require_session;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Show the cart lines and the running total.
pub async fn show(shop: &mut Shop) -> CommandResult {
    require_session(shop).await?;

    let cart = shop.cart();
    if cart.is_empty() {
        println!("Cart is empty - add something with `bobr cart add <product-id>`");
        return Ok(());
    }
    for item in cart.items() {
        println!(
            "#{}  {}  {} ₽ x {} = {} ₽",
            item.product_id,
            item.name,
            item.price,
            item.qty,
            item.line_total()
        );
    }
    println!("Total: {} ₽", cart.total());
    Ok(())
}

/// Add units of a product, snapshotting its current name and price.
pub async fn add(shop: &mut Shop, product_id: ProductId, qty: u32) -> CommandResult {
    require_session(shop).await?;
    shop.cart_add(product_id, qty).await?;
    println!("Added; cart total is now {} ₽", shop.cart().total());
    Ok(())
}

/// Set a line's quantity; 0 (or less) removes the line.
pub async fn set_qty(shop: &mut Shop, product_id: ProductId, qty: i64) -> CommandResult {
    require_session(shop).await?;
    shop.cart_update_qty(product_id, qty)?;
    println!("Cart total is now {} ₽", shop.cart().total());
    Ok(())
}

/// Remove a line.
pub async fn remove(shop: &mut Shop, product_id: ProductId) -> CommandResult {
    require_session(shop).await?;
    shop.cart_remove(product_id)?;
    println!("Removed; cart total is now {} ₽", shop.cart().total());
    Ok(())
}

/// Empty the cart.
pub async fn clear(shop: &mut Shop) -> CommandResult {
    require_session(shop).await?;
    shop.cart_clear()?;
    println!("Cart cleared");
    Ok(())
}
