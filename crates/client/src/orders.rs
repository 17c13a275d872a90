//! Order lifecycle: checkout, listing, detail, status edits.
//!
//! The backend is the sole arbiter of order truth; this module keeps a
//! local copy of the last-fetched list and of one expanded detail view,
//! and only ever updates those copies from successful responses. A failed
//! mutation leaves both caches exactly as they were.

use secrecy::SecretString;
use tracing::{info, instrument};

use bobr_core::{OrderId, OrderStatus};

use crate::api::ApiClient;
use crate::api::types::{NewOrder, Order, OrderSummary};
use crate::cart::CartStore;
use crate::error::{ClientError, Result};

/// Client-side view of the current user's orders.
pub struct OrderTracker {
    api: ApiClient,
    /// Last-fetched order list, most recent first.
    list: Vec<OrderSummary>,
    /// Currently expanded detail view, if any.
    detail: Option<Order>,
}

impl OrderTracker {
    /// Create a tracker with empty caches.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self {
            api,
            list: Vec::new(),
            detail: None,
        }
    }

    /// The cached order list (may be stale; [`list`](Self::list) refetches).
    #[must_use]
    pub fn cached(&self) -> &[OrderSummary] {
        &self.list
    }

    /// The cached detail view, if one is expanded.
    #[must_use]
    pub const fn cached_detail(&self) -> Option<&Order> {
        self.detail.as_ref()
    }

    /// Drop both caches (on logout; another user's orders must not linger).
    pub fn reset(&mut self) {
        self.list.clear();
        self.detail = None;
    }

    /// Convert the cart into a submitted order.
    ///
    /// Fails fast with [`ClientError::EmptyCart`] before any network call.
    /// On success the backend's order (server-computed total, generated ID)
    /// is cached and the cart is cleared. On failure the cart is untouched.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCart`, a backend rejection, or a transport error.
    #[instrument(skip_all)]
    pub async fn checkout(&mut self, token: &SecretString, cart: &mut CartStore) -> Result<Order> {
        if cart.is_empty() {
            return Err(ClientError::EmptyCart);
        }

        let request = NewOrder {
            items: cart.order_items(),
        };
        let order = self.api.create_order(token, &request).await?;

        // Only a confirmed order empties the cart.
        cart.clear()?;
        info!(order_id = %order.id, total = %order.total_amount, "order created");

        self.list.insert(0, order.summary());
        self.detail = Some(order.clone());
        Ok(order)
    }

    /// Refetch the order list, replacing the cache. The backend returns
    /// most recent first; that ordering is kept as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (the cache keeps its previous
    /// contents).
    #[instrument(skip_all)]
    pub async fn list(&mut self, token: &SecretString) -> Result<&[OrderSummary]> {
        let orders = self.api.orders(token).await?;
        self.list = orders;
        Ok(&self.list)
    }

    /// Fetch one order's item breakdown on demand and cache it as the
    /// expanded detail view.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is missing or the request fails.
    #[instrument(skip(self, token), fields(order_id = %order_id))]
    pub async fn detail(&mut self, token: &SecretString, order_id: OrderId) -> Result<&Order> {
        let order = self.api.order(token, order_id).await?;
        // The fetch may carry a fresher status than the cached list entry.
        Self::apply_status(&mut self.list, order_id, order.status);
        Ok(self.detail.insert(order))
    }

    /// Request a status transition.
    ///
    /// When the order's current status is known locally and the transition
    /// table forbids the move, this fails with
    /// [`ClientError::InvalidTransition`] without a network call. Otherwise
    /// the request is sent; only a successful response touches the caches,
    /// which are updated consistently (list entry and detail view both).
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition`, a backend rejection (the backend
    /// enforces the same table), or a transport error.
    #[instrument(skip(self, token), fields(order_id = %order_id, status = %next))]
    pub async fn set_status(
        &mut self,
        token: &SecretString,
        order_id: OrderId,
        next: OrderStatus,
    ) -> Result<OrderStatus> {
        if let Some(current) = self.known_status(order_id)
            && !current.can_transition_to(next)
        {
            return Err(ClientError::InvalidTransition {
                from: current,
                to: next,
            });
        }

        let updated = self.api.set_order_status(token, order_id, next).await?;

        Self::apply_status(&mut self.list, order_id, updated.status);
        if let Some(detail) = self.detail.as_mut()
            && detail.id == order_id
        {
            detail.status = updated.status;
        }
        info!(order_id = %order_id, status = %updated.status, "order status updated");
        Ok(updated.status)
    }

    /// Best local knowledge of an order's status: the expanded detail view
    /// wins over the list entry.
    fn known_status(&self, order_id: OrderId) -> Option<OrderStatus> {
        if let Some(detail) = &self.detail
            && detail.id == order_id
        {
            return Some(detail.status);
        }
        self.list
            .iter()
            .find(|o| o.id == order_id)
            .map(|o| o.status)
    }

    fn apply_status(list: &mut [OrderSummary], order_id: OrderId, status: OrderStatus) {
        if let Some(entry) = list.iter_mut().find(|o| o.id == order_id) {
            entry.status = status;
        }
    }
}
