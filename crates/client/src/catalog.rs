//! Ownership-derived product capabilities.
//!
//! One predicate decides what a user may do with a product; the catalog
//! view and any future admin surface both consume it. This is a rendering
//! aid, not a security boundary - the backend re-checks ownership on every
//! mutation regardless of what the client shows.

use bobr_core::UserId;

use crate::api::types::{Product, User};

/// Whether `user` created `product`.
#[must_use]
pub fn is_owner(user_id: UserId, product: &Product) -> bool {
    product.created_by == user_id
}

/// What the current user may do with one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductCapabilities {
    /// Any authenticated user can buy any product, including their own.
    pub can_purchase: bool,
    /// Only the creator may edit.
    pub can_edit: bool,
    /// Only the creator may delete.
    pub can_delete: bool,
}

impl ProductCapabilities {
    /// Derive capabilities for an authenticated user. Pure; no network.
    #[must_use]
    pub fn for_user(user: &User, product: &Product) -> Self {
        let owner = is_owner(user.id, product);
        Self {
            can_purchase: true,
            can_edit: owner,
            can_delete: owner,
        }
    }
}

/// A catalog listing entry: the product plus what the user may do with it.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub product: Product,
    pub capabilities: ProductCapabilities,
}

/// Resolve capabilities across a product listing.
#[must_use]
pub fn catalog_view(user: &User, products: Vec<Product>) -> Vec<CatalogEntry> {
    products
        .into_iter()
        .map(|product| {
            let capabilities = ProductCapabilities::for_user(user, &product);
            CatalogEntry {
                product,
                capabilities,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use bobr_core::{Email, Price, ProductId};
    use rust_decimal::dec;

    fn user(id: i64) -> User {
        User {
            id: UserId::new(id),
            username: format!("user{id}"),
            email: Email::parse("user@example.com").expect("valid email"),
            first_name: String::new(),
            last_name: String::new(),
            created_at: None,
        }
    }

    fn product(id: i64, created_by: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: "P".to_string(),
            price: Price::new(dec!(10)).expect("valid price"),
            description: None,
            created_by: UserId::new(created_by),
            owner_email: None,
            created_at: None,
        }
    }

    #[test]
    fn test_owner_gets_full_capabilities() {
        let capabilities = ProductCapabilities::for_user(&user(1), &product(10, 1));
        assert!(capabilities.can_purchase);
        assert!(capabilities.can_edit);
        assert!(capabilities.can_delete);
    }

    #[test]
    fn test_non_owner_can_only_purchase() {
        let capabilities = ProductCapabilities::for_user(&user(2), &product(10, 1));
        assert!(capabilities.can_purchase);
        assert!(!capabilities.can_edit);
        assert!(!capabilities.can_delete);
    }

    #[test]
    fn test_catalog_view_resolves_per_product() {
        let entries = catalog_view(&user(1), vec![product(10, 1), product(11, 2)]);
        assert_eq!(entries.len(), 2);
        assert!(entries.first().expect("entry").capabilities.can_edit);
        assert!(!entries.get(1).expect("entry").capabilities.can_edit);
    }
}
