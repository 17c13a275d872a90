//! The `Shop` facade: one object owning the whole client state.
//!
//! Components stay individually testable, but real callers (the CLI, a
//! future GUI) go through `Shop`, which enforces the two cross-cutting
//! rules: nothing runs without a session, and a backend 401 mid-operation
//! tears the session down (token gone, cart gone, caches dropped).

use secrecy::SecretString;
use tracing::{instrument, warn};

use bobr_core::{OrderId, OrderStatus, ProductId};

use crate::api::ApiClient;
use crate::api::types::{
    Credentials, Order, OrderSummary, Product, ProductInput, ProfileUpdate, Registration, User,
};
use crate::cart::CartStore;
use crate::catalog::{CatalogEntry, catalog_view};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::orders::OrderTracker;
use crate::session::{SessionManager, SessionState};
use crate::store::{StateDir, keys};

/// Facade over session, cart, orders and catalog.
pub struct Shop {
    api: ApiClient,
    state: StateDir,
    session: SessionManager,
    cart: CartStore,
    orders: OrderTracker,
}

impl Shop {
    /// Build the client stack from configuration: open the state
    /// directory, load the persisted cart, construct the API client.
    ///
    /// # Errors
    ///
    /// Returns an error if local state cannot be opened or the HTTP
    /// client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let api = ApiClient::new(config)?;
        let state = StateDir::open(config.state_dir.clone())?;
        let session = SessionManager::new(state.clone());
        let cart = CartStore::load(state.clone())?;
        let orders = OrderTracker::new(api.clone());

        Ok(Self {
            api,
            state,
            session,
            cart,
            orders,
        })
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Restore a persisted session, validating the token with the backend.
    ///
    /// A token that is present but rejected (or unverifiable) clears both
    /// the token and the cart, per the session contract.
    ///
    /// # Errors
    ///
    /// Returns an error only for local state failures.
    #[instrument(skip_all)]
    pub async fn restore(&mut self) -> Result<SessionState> {
        let had_token = self.state.exists(keys::TOKEN);
        let session_state = self.session.restore(&self.api).await?;
        if session_state == SessionState::Anonymous && had_token {
            self.drop_local_state()?;
        }
        Ok(session_state)
    }

    /// Log in with username-or-email plus password.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the credentials or the
    /// request fails.
    #[instrument(skip_all)]
    pub async fn login(&mut self, login: &str, password: &str) -> Result<User> {
        let response = self
            .api
            .login(&Credentials {
                login: login.to_string(),
                password: password.to_string(),
            })
            .await
            .map_err(ClientError::from)?;

        self.begin_session(response.access_token, response.user)
    }

    /// Register a new account and start a session with the issued token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the registration or the
    /// request fails.
    #[instrument(skip_all)]
    pub async fn register(&mut self, registration: &Registration) -> Result<User> {
        let response = self
            .api
            .register(registration)
            .await
            .map_err(ClientError::from)?;

        self.begin_session(response.access_token, response.user)
    }

    /// End the session: token gone, cart cleared, caches dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if local state cannot be written.
    pub fn logout(&mut self) -> Result<()> {
        self.session.logout()?;
        self.cart.clear()?;
        self.orders.reset();
        self.api.invalidate_catalog();
        Ok(())
    }

    /// The logged-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        self.session.current_user()
    }

    /// Whether a session is active.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Refetch the profile of the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if no session is active or the request fails.
    pub async fn profile(&mut self) -> Result<User> {
        let token = self.token()?;
        let result = self.api.me(&token).await;
        let user = self.guard(result)?;
        self.session.update_user(user.clone());
        Ok(user)
    }

    /// Update profile fields of the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if no session is active, the update is rejected,
    /// or the request fails.
    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<User> {
        let token = self.token()?;
        let result = self.api.update_profile(&token, update).await;
        let user = self.guard(result)?;
        self.session.update_user(user.clone());
        Ok(user)
    }

    /// Delete the account and tear down all local state.
    ///
    /// # Errors
    ///
    /// Returns an error if no session is active or the request fails.
    pub async fn delete_account(&mut self) -> Result<()> {
        let token = self.token()?;
        let result = self.api.delete_account(&token).await;
        self.guard(result)?;
        self.logout()
    }

    // =========================================================================
    // Products & catalog
    // =========================================================================

    /// Products created by the current user.
    ///
    /// # Errors
    ///
    /// Returns an error if no session is active or the request fails.
    pub async fn my_products(&mut self) -> Result<Vec<Product>> {
        let token = self.token()?;
        let result = self.api.my_products(&token).await;
        self.guard(result)
    }

    /// The whole catalog, with per-product capabilities resolved against
    /// the current user.
    ///
    /// # Errors
    ///
    /// Returns an error if no session is active or the request fails.
    pub async fn catalog(&mut self) -> Result<Vec<CatalogEntry>> {
        let token = self.token()?;
        let result = self.api.all_products(&token).await;
        let products = self.guard(result)?;
        let user = self
            .session
            .current_user()
            .ok_or(ClientError::Unauthenticated)?;
        Ok(catalog_view(user, products))
    }

    /// Create a product owned by the current user.
    ///
    /// # Errors
    ///
    /// Returns an error if no session is active, the input is rejected,
    /// or the request fails.
    pub async fn create_product(&mut self, input: &ProductInput) -> Result<Product> {
        let token = self.token()?;
        let result = self.api.create_product(&token, input).await;
        self.guard(result)
    }

    /// Update an owned product. Non-owners are rejected by the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if no session is active, the product is missing
    /// or not owned, or the request fails.
    pub async fn update_product(
        &mut self,
        product_id: ProductId,
        input: &ProductInput,
    ) -> Result<()> {
        let token = self.token()?;
        let result = self.api.update_product(&token, product_id, input).await;
        self.guard(result)
    }

    /// Delete an owned product. Non-owners are rejected by the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if no session is active, the product is missing
    /// or not owned, or the request fails.
    pub async fn delete_product(&mut self, product_id: ProductId) -> Result<()> {
        let token = self.token()?;
        let result = self.api.delete_product(&token, product_id).await;
        self.guard(result)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Read-only view of the cart.
    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Add a product to the cart, snapshotting its current name and price
    /// from the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if no session is active, the product does not
    /// exist, or local state cannot be written.
    pub async fn cart_add(&mut self, product_id: ProductId, qty: u32) -> Result<()> {
        let token = self.token()?;
        let result = self.api.all_products(&token).await;
        let products = self.guard(result)?;
        let product = products
            .iter()
            .find(|p| p.id == product_id)
            .ok_or(ClientError::UnknownProduct(product_id))?;
        self.cart.add(product, qty)
    }

    /// Set a cart line's quantity; below 1 removes the line.
    ///
    /// # Errors
    ///
    /// Returns an error if no session is active or local state cannot be
    /// written.
    pub fn cart_update_qty(&mut self, product_id: ProductId, qty: i64) -> Result<()> {
        self.token()?;
        self.cart.update_qty(product_id, qty)
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if no session is active or local state cannot be
    /// written.
    pub fn cart_remove(&mut self, product_id: ProductId) -> Result<()> {
        self.token()?;
        self.cart.remove(product_id)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if no session is active or local state cannot be
    /// written.
    pub fn cart_clear(&mut self) -> Result<()> {
        self.token()?;
        self.cart.clear()
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Convert the cart into a submitted order (see
    /// [`OrderTracker::checkout`]).
    ///
    /// # Errors
    ///
    /// Returns `EmptyCart` before any network call, or an error if the
    /// backend rejects the order or the request fails.
    pub async fn checkout(&mut self) -> Result<Order> {
        let token = self.token()?;
        let result = self.orders.checkout(&token, &mut self.cart).await;
        self.guard(result)
    }

    /// Refetch the order list.
    ///
    /// # Errors
    ///
    /// Returns an error if no session is active or the request fails.
    pub async fn orders(&mut self) -> Result<Vec<OrderSummary>> {
        let token = self.token()?;
        let result = self.orders.list(&token).await.map(<[OrderSummary]>::to_vec);
        self.guard(result)
    }

    /// Fetch one order with its item breakdown.
    ///
    /// # Errors
    ///
    /// Returns an error if no session is active, the order is missing, or
    /// the request fails.
    pub async fn order_detail(&mut self, order_id: OrderId) -> Result<Order> {
        let token = self.token()?;
        let result = self.orders.detail(&token, order_id).await.map(Clone::clone);
        self.guard(result)
    }

    /// Request an order status transition (see [`OrderTracker::set_status`]).
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` without a network call for a move the
    /// transition table forbids, or an error if the backend rejects it.
    pub async fn set_order_status(
        &mut self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<OrderStatus> {
        let token = self.token()?;
        let result = self.orders.set_status(&token, order_id, status).await;
        self.guard(result)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn token(&self) -> Result<SecretString> {
        self.session.token().cloned()
    }

    fn begin_session(&mut self, access_token: String, user: User) -> Result<User> {
        self.orders.reset();
        self.api.invalidate_catalog();
        self.session
            .login(SecretString::from(access_token), user.clone())?;
        Ok(user)
    }

    /// Pass a result through, tearing the session down on a backend 401.
    fn guard<T, E: Into<ClientError>>(&mut self, result: std::result::Result<T, E>) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                let error = e.into();
                if error.is_unauthorized()
                    && let Err(state_error) = self.drop_local_state()
                {
                    warn!(error = %state_error, "failed to clear local state after 401");
                }
                Err(error)
            }
        }
    }

    /// Forced teardown: session invalidated, cart cleared, caches dropped.
    fn drop_local_state(&mut self) -> Result<()> {
        self.session.invalidate()?;
        self.cart.clear()?;
        self.orders.reset();
        self.api.invalidate_catalog();
        Ok(())
    }
}
