//! Client-held shopping cart with immediate snapshot persistence.
//!
//! The cart is the one piece of state the backend never sees until
//! checkout. Items carry name/price snapshots captured when they were
//! added, not re-fetched later. Every mutation persists the full cart
//! atomically through the [`StateDir`], so rapid sequential edits apply
//! in call order and a crash never leaves a half-written cart behind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bobr_core::{Price, ProductId};

use crate::api::types::{NewOrderItem, Product};
use crate::error::Result;
use crate::store::{StateDir, keys};

/// One selected product in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// The product being bought.
    pub product_id: ProductId,
    /// Name snapshot from the moment the item was added.
    pub name: String,
    /// Unit price snapshot from the moment the item was added.
    pub price: Price,
    /// Units to buy; always >= 1 (dropping below 1 removes the item).
    pub qty: u32,
    /// When the item was first added.
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Line total (`price * qty`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.qty)
    }
}

/// The persisted, ordered list of cart selections.
pub struct CartStore {
    store: StateDir,
    items: Vec<CartItem>,
}

impl CartStore {
    /// Load the cart from its persisted snapshot, or start empty.
    ///
    /// # Errors
    ///
    /// Returns an error if a snapshot exists but cannot be read.
    pub fn load(store: StateDir) -> Result<Self> {
        let items = store.load::<Vec<CartItem>>(keys::CART)?.unwrap_or_default();
        Ok(Self { store, items })
    }

    /// The items, in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add `qty` units of a product.
    ///
    /// If the product is already in the cart its quantity increments;
    /// otherwise a new item is appended with name/price captured now.
    /// Adding zero units changes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be persisted.
    pub fn add(&mut self, product: &Product, qty: u32) -> Result<()> {
        if qty == 0 {
            return Ok(());
        }
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.id)
        {
            item.qty = item.qty.saturating_add(qty);
        } else {
            self.items.push(CartItem {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                qty,
                added_at: Utc::now(),
            });
        }
        self.persist()
    }

    /// Set the quantity of a product.
    ///
    /// A quantity below 1 is equivalent to [`remove`](Self::remove).
    /// Setting a quantity for a product not in the cart changes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be persisted.
    pub fn update_qty(&mut self, product_id: ProductId, qty: i64) -> Result<()> {
        if qty < 1 {
            return self.remove(product_id);
        }
        let qty = u32::try_from(qty).unwrap_or(u32::MAX);
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id)
        {
            item.qty = qty;
            self.persist()?;
        }
        Ok(())
    }

    /// Remove a product from the cart. No-op if it isn't there.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be persisted.
    pub fn remove(&mut self, product_id: ProductId) -> Result<()> {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        if self.items.len() != before {
            self.persist()?;
        }
        Ok(())
    }

    /// Sum of `price * qty` over all items. Pure.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Empty the cart and persist the empty snapshot. Called after a
    /// successful checkout and on logout.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be persisted.
    pub fn clear(&mut self) -> Result<()> {
        self.items.clear();
        self.persist()
    }

    /// The cart as order lines for checkout.
    #[must_use]
    pub fn order_items(&self) -> Vec<NewOrderItem> {
        self.items
            .iter()
            .map(|item| NewOrderItem {
                product_id: item.product_id,
                qty: item.qty,
            })
            .collect()
    }

    fn persist(&self) -> Result<()> {
        self.store.save(keys::CART, &self.items)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::temp_state_dir;

    use bobr_core::UserId;
    use rust_decimal::dec;

    fn product(id: i64, name: &str, price: rust_decimal::Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Price::new(price).expect("valid price"),
            description: None,
            created_by: UserId::new(99),
            owner_email: None,
            created_at: None,
        }
    }

    fn empty_cart(label: &str) -> CartStore {
        CartStore::load(temp_state_dir(label)).expect("load cart")
    }

    #[test]
    fn test_add_appends_and_increments() {
        let mut cart = empty_cart("add");
        cart.add(&product(1, "A", dec!(100)), 1).expect("add");
        cart.add(&product(2, "B", dec!(50)), 1).expect("add");
        cart.add(&product(1, "A", dec!(100)), 1).expect("add");

        assert_eq!(cart.len(), 2);
        let first = cart.items().first().expect("item");
        assert_eq!(first.qty, 2);
        assert_eq!(first.name, "A");
    }

    #[test]
    fn test_add_zero_is_a_noop() {
        let mut cart = empty_cart("add-zero");
        cart.add(&product(1, "A", dec!(100)), 0).expect("add");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_snapshot_price_survives_product_change() {
        let mut cart = empty_cart("snapshot");
        cart.add(&product(1, "A", dec!(100)), 1).expect("add");
        // The catalog price changing later must not affect the cart line.
        cart.add(&product(1, "A (renamed)", dec!(175)), 1).expect("add");

        let item = cart.items().first().expect("item");
        assert_eq!(item.price.amount(), dec!(100));
        assert_eq!(item.name, "A");
        assert_eq!(item.qty, 2);
    }

    #[test]
    fn test_total_matches_scenario() {
        // cart = [{A, 100, qty 2}, {B, 50, qty 1}] -> total 250
        let mut cart = empty_cart("total");
        cart.add(&product(1, "A", dec!(100)), 2).expect("add");
        cart.add(&product(2, "B", dec!(50)), 1).expect("add");
        assert_eq!(cart.total().amount(), dec!(250));
    }

    #[test]
    fn test_update_qty_replaces() {
        let mut cart = empty_cart("update");
        cart.add(&product(1, "A", dec!(100)), 1).expect("add");
        cart.update_qty(ProductId::new(1), 5).expect("update");
        assert_eq!(cart.items().first().expect("item").qty, 5);
        assert_eq!(cart.total().amount(), dec!(500));
    }

    #[test]
    fn test_update_qty_below_one_removes() {
        for bad_qty in [0, -5] {
            let mut cart = empty_cart("update-low");
            cart.add(&product(1, "A", dec!(100)), 2).expect("add");
            cart.update_qty(ProductId::new(1), bad_qty).expect("update");
            assert!(cart.is_empty(), "qty {bad_qty} should remove the item");
        }
    }

    #[test]
    fn test_update_qty_unknown_product_is_noop() {
        let mut cart = empty_cart("update-unknown");
        cart.add(&product(1, "A", dec!(100)), 1).expect("add");
        cart.update_qty(ProductId::new(42), 3).expect("update");
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items().first().expect("item").qty, 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = empty_cart("remove");
        cart.add(&product(1, "A", dec!(100)), 1).expect("add");
        cart.remove(ProductId::new(1)).expect("remove");
        cart.remove(ProductId::new(1)).expect("remove again");
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_no_item_ever_below_one() {
        let mut cart = empty_cart("invariant");
        cart.add(&product(1, "A", dec!(10)), 3).expect("add");
        cart.add(&product(2, "B", dec!(20)), 1).expect("add");
        cart.update_qty(ProductId::new(1), 2).expect("update");
        cart.update_qty(ProductId::new(2), 0).expect("update");
        cart.add(&product(3, "C", dec!(30)), 1).expect("add");

        assert!(cart.items().iter().all(|item| item.qty >= 1));
        let expected: Price = cart.items().iter().map(CartItem::line_total).sum();
        assert_eq!(cart.total(), expected);
    }

    #[test]
    fn test_mutations_persist_immediately() {
        let store = temp_state_dir("persist");
        {
            let mut cart = CartStore::load(store.clone()).expect("load");
            cart.add(&product(1, "A", dec!(100)), 2).expect("add");
            cart.add(&product(2, "B", dec!(50)), 1).expect("add");
            cart.remove(ProductId::new(2)).expect("remove");
        }
        // A fresh store over the same directory sees the final snapshot.
        let reloaded = CartStore::load(store).expect("reload");
        assert_eq!(reloaded.len(), 1);
        let item = reloaded.items().first().expect("item");
        assert_eq!(item.product_id, ProductId::new(1));
        assert_eq!(item.qty, 2);
    }

    #[test]
    fn test_clear_persists_empty_snapshot() {
        let store = temp_state_dir("clear");
        let mut cart = CartStore::load(store.clone()).expect("load");
        cart.add(&product(1, "A", dec!(100)), 1).expect("add");
        cart.clear().expect("clear");

        assert!(cart.is_empty());
        let reloaded = CartStore::load(store).expect("reload");
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_order_items_shape() {
        let mut cart = empty_cart("order-items");
        cart.add(&product(1, "A", dec!(100)), 2).expect("add");
        cart.add(&product(2, "B", dec!(50)), 1).expect("add");
        assert_eq!(
            cart.order_items(),
            vec![
                NewOrderItem {
                    product_id: ProductId::new(1),
                    qty: 2
                },
                NewOrderItem {
                    product_id: ProductId::new(2),
                    qty: 1
                },
            ]
        );
    }
}
