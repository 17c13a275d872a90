//! Wire types for the backend REST API.
//!
//! These mirror the JSON the backend actually sends and accepts. Timestamps
//! stay as the backend's strings (it mixes SQLite datetime and ISO 8601
//! formats); unknown fields are ignored so backend additions don't break
//! decoding.

use serde::{Deserialize, Serialize};

use bobr_core::{Email, OrderId, OrderStatus, Price, ProductId, UserId};

// =============================================================================
// Users & Auth
// =============================================================================

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Email address.
    pub email: Email,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Registration timestamp (absent in login responses).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Credentials for `POST /auth/login`. The backend accepts a username or
/// an email in the `login` field.
#[derive(Debug, Serialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

/// Payload for `POST /auth/register`.
#[derive(Debug, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: Email,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Response of login and register: a freshly issued token plus the user.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
}

/// Payload for `PUT /auth/me`. Only set fields are sent.
#[derive(Debug, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl ProfileUpdate {
    /// Whether the update would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none()
    }
}

// =============================================================================
// Products
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Owning user's ID.
    pub created_by: UserId,
    /// Owner's email (only present in the all-products listing).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<Email>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Payload for creating or updating a product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductInput {
    pub name: String,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// =============================================================================
// Orders
// =============================================================================

/// One line of a new order: what to buy and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub qty: u32,
}

/// Payload for `POST /orders`.
#[derive(Debug, Serialize)]
pub struct NewOrder {
    pub items: Vec<NewOrderItem>,
}

/// An order as it appears in the list endpoint (no item breakdown).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Order ID.
    pub id: OrderId,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Server-computed total.
    pub total_amount: Price,
    /// Creation timestamp.
    pub created_at: String,
    /// Number of lines in the order.
    #[serde(default)]
    pub items_count: u32,
}

/// A full order with its item breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Order ID.
    pub id: OrderId,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Server-computed total.
    pub total_amount: Price,
    /// Creation timestamp.
    pub created_at: String,
    /// Item breakdown.
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// The list-entry view of this order.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        OrderSummary {
            id: self.id,
            status: self.status,
            total_amount: self.total_amount,
            created_at: self.created_at.clone(),
            items_count: u32::try_from(self.items.len()).unwrap_or(u32::MAX),
        }
    }
}

/// One line of an order, with price snapshots from order time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product name as it was when the order was placed.
    pub product_name: String,
    /// Units ordered.
    pub quantity: u32,
    /// Unit price snapshot.
    pub price: Price,
    /// Line total (`price * quantity`, computed server-side).
    pub total: Price,
}

/// Payload for `PUT /orders/{id}`.
#[derive(Debug, Serialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_decode_user_ignores_extra_fields() {
        // /auth/me also sends theme and telegram flags; the client doesn't care
        let raw = r#"{
            "id": 1,
            "username": "bobr",
            "email": "bobr@example.com",
            "first_name": "Bo",
            "last_name": "Br",
            "theme": "dark",
            "telegram_linked": false,
            "created_at": "2025-11-02 10:30:00"
        }"#;
        let user: User = serde_json::from_str(raw).expect("decode user");
        assert_eq!(user.id, UserId::new(1));
        assert_eq!(user.email.as_str(), "bobr@example.com");
        assert_eq!(user.created_at.as_deref(), Some("2025-11-02 10:30:00"));
    }

    #[test]
    fn test_decode_product_listing() {
        let raw = r#"[{
            "id": 3,
            "name": "Wooden dam kit",
            "price": 249.5,
            "description": "",
            "created_by": 2,
            "owner_email": "seller@example.com",
            "created_at": "2025-11-01 09:00:00"
        }]"#;
        let products: Vec<Product> = serde_json::from_str(raw).expect("decode products");
        assert_eq!(products.len(), 1);
        let product = products.first().expect("one product");
        assert_eq!(product.price.amount(), dec!(249.5));
        assert_eq!(product.created_by, UserId::new(2));
        assert!(product.owner_email.is_some());
    }

    #[test]
    fn test_decode_order_with_items() {
        let raw = r#"{
            "id": 9,
            "total_amount": 250.0,
            "status": "new",
            "created_at": "2025-11-02T12:00:00",
            "items": [
                {"product_name": "A", "quantity": 2, "price": 100.0, "total": 200.0},
                {"product_name": "B", "quantity": 1, "price": 50.0, "total": 50.0}
            ]
        }"#;
        let order: Order = serde_json::from_str(raw).expect("decode order");
        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.total_amount.amount(), dec!(250));
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.summary().items_count, 2);
    }

    #[test]
    fn test_decode_summary_without_items_count() {
        // PUT /orders/{id} responds without items or items_count
        let raw = r#"{"id": 9, "total_amount": 250.0, "status": "in_progress", "created_at": "x"}"#;
        let summary: OrderSummary = serde_json::from_str(raw).expect("decode summary");
        assert_eq!(summary.status, OrderStatus::InProgress);
        assert_eq!(summary.items_count, 0);
    }

    #[test]
    fn test_new_order_wire_shape() {
        let order = NewOrder {
            items: vec![NewOrderItem {
                product_id: ProductId::new(5),
                qty: 2,
            }],
        };
        assert_eq!(
            serde_json::to_string(&order).expect("serialize"),
            r#"{"items":[{"product_id":5,"qty":2}]}"#
        );
    }

    #[test]
    fn test_profile_update_sends_only_set_fields() {
        let update = ProfileUpdate {
            first_name: Some("Bo".to_string()),
            ..ProfileUpdate::default()
        };
        assert_eq!(
            serde_json::to_string(&update).expect("serialize"),
            r#"{"first_name":"Bo"}"#
        );
        assert!(ProfileUpdate::default().is_empty());
    }
}
