//! Catalog and own-product commands.

use bobr_client::api::types::ProductInput;
use bobr_client::shop::Shop;
use bobr_core::{Price, ProductId};

use super::require_session;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// List the catalog, or only the caller's products with `--mine`.
pub async fn list(shop: &mut Shop, mine: bool) -> CommandResult {
    require_session(shop).await?;

    if mine {
        let products = shop.my_products().await?;
        if products.is_empty() {
            println!("You have no products yet");
            return Ok(());
        }
        for product in products {
            println!("#{}  {}  {} ₽", product.id, product.name, product.price);
            if let Some(description) = product.description.filter(|d| !d.is_empty()) {
                println!("    {description}");
            }
        }
        return Ok(());
    }

    let entries = shop.catalog().await?;
    if entries.is_empty() {
        println!("The catalog is empty");
        return Ok(());
    }
    for entry in entries {
        let product = &entry.product;
        let marker = if entry.capabilities.can_edit { "  [yours]" } else { "" };
        println!("#{}  {}  {} ₽{marker}", product.id, product.name, product.price);
        if let Some(description) = product.description.as_ref().filter(|d| !d.is_empty()) {
            println!("    {description}");
        }
        if let Some(owner_email) = &product.owner_email {
            println!("    seller: {owner_email}");
        }
    }
    Ok(())
}

/// Create a product owned by the caller.
pub async fn create(
    shop: &mut Shop,
    name: String,
    price: Price,
    description: Option<String>,
) -> CommandResult {
    require_session(shop).await?;
    let product = shop
        .create_product(&ProductInput {
            name,
            price,
            description,
        })
        .await?;
    println!("Created product #{}: {} at {} ₽", product.id, product.name, product.price);
    Ok(())
}

/// Update an owned product. Unset fields keep their current values.
pub async fn update(
    shop: &mut Shop,
    id: ProductId,
    name: Option<String>,
    price: Option<Price>,
    description: Option<String>,
) -> CommandResult {
    require_session(shop).await?;

    // Merge overrides into the current state so the backend gets a full payload
    let current = shop
        .my_products()
        .await?
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| format!("product #{id} not found among your products"))?;

    let input = ProductInput {
        name: name.unwrap_or(current.name),
        price: price.unwrap_or(current.price),
        description: description.or(current.description),
    };
    shop.update_product(id, &input).await?;
    println!("Updated product #{id}");
    Ok(())
}

/// Delete an owned product.
pub async fn delete(shop: &mut Shop, id: ProductId) -> CommandResult {
    require_session(shop).await?;
    shop.delete_product(id).await?;
    println!("Deleted product #{id}");
    Ok(())
}
