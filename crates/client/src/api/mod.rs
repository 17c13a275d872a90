//! Typed REST client for the Bobr backend.
//!
//! Every backend operation the client performs goes through [`ApiClient`];
//! nothing else in the crate touches the network. Uses `reqwest` for HTTP
//! and `moka` to cache the product catalog for a short TTL (mutations and
//! session changes invalidate it).

pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use bobr_core::{OrderId, OrderStatus, ProductId};

use crate::config::ClientConfig;
use crate::error::ApiError;
use types::{
    AuthResponse, Credentials, NewOrder, Order, OrderSummary, Product, ProductInput,
    ProfileUpdate, Registration, StatusUpdate, User,
};

/// Cache key for the all-products listing.
const CATALOG_CACHE_KEY: &str = "products:all";
/// How long a catalog listing stays fresh.
const CATALOG_TTL: Duration = Duration::from_secs(60);

/// Error body shape the backend uses for every rejection.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    error: String,
}

/// Acknowledgement body for mutations that return no entity.
#[derive(Debug, serde::Deserialize)]
struct Acknowledgement {
    #[allow(dead_code)]
    message: String,
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the Bobr backend REST API.
///
/// Cheap to clone (`Arc` internals). Authenticated operations take the
/// bearer token as a parameter; the session manager owns the token and
/// decides when one exists.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base: String,
    catalog_cache: Cache<&'static str, Vec<Product>>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let catalog_cache = Cache::builder()
            .max_capacity(4)
            .time_to_live(CATALOG_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base: config.api_url.as_str().trim_end_matches('/').to_string(),
                catalog_cache,
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner.http.request(method, self.url(path))
    }

    fn authed(&self, method: Method, path: &str, token: &SecretString) -> RequestBuilder {
        self.request(method, path)
            .bearer_auth(token.expose_secret())
    }

    /// Send a request and decode the JSON response.
    ///
    /// The body is read as text first so a decode failure can be logged
    /// with the offending payload. Backend rejections are mapped onto
    /// [`ApiError`] by status: 401 invalidates the session upstream, 404
    /// becomes `NotFound`, anything else non-success carries the message
    /// from the `{"error": ...}` body.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&response_text)
                .map_or_else(
                    |_| response_text.chars().take(200).collect::<String>(),
                    |body| body.error,
                );
            tracing::debug!(status = %status, message = %message, "backend rejected request");
            if status == StatusCode::NOT_FOUND {
                return Err(ApiError::NotFound(message));
            }
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        match serde_json::from_str(&response_text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "failed to parse backend response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Log in with username-or-email plus password.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.execute(self.request(Method::POST, "/auth/login").json(credentials))
            .await
    }

    /// Register a new account; the backend issues a token right away.
    ///
    /// # Errors
    ///
    /// Returns an error if the registration is rejected (e.g. duplicate
    /// email) or the request fails.
    #[instrument(skip(self, registration))]
    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        self.execute(self.request(Method::POST, "/auth/register").json(registration))
            .await
    }

    /// Fetch the identity behind a token. This is the session validity check.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for a stale token, or another error
    /// if the request fails.
    #[instrument(skip_all)]
    pub async fn me(&self, token: &SecretString) -> Result<User, ApiError> {
        self.execute(self.authed(Method::GET, "/auth/me", token))
            .await
    }

    /// Update profile fields of the current user.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected or the request fails.
    #[instrument(skip_all)]
    pub async fn update_profile(
        &self,
        token: &SecretString,
        update: &ProfileUpdate,
    ) -> Result<User, ApiError> {
        self.execute(self.authed(Method::PUT, "/auth/me", token).json(update))
            .await
    }

    /// Delete the current user's account and everything it owns.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion is rejected or the request fails.
    #[instrument(skip_all)]
    pub async fn delete_account(&self, token: &SecretString) -> Result<(), ApiError> {
        let _: Acknowledgement = self
            .execute(self.authed(Method::DELETE, "/auth/me", token))
            .await?;
        self.invalidate_catalog();
        Ok(())
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List products created by the current user. Not cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn my_products(&self, token: &SecretString) -> Result<Vec<Product>, ApiError> {
        self.execute(self.authed(Method::GET, "/products", token))
            .await
    }

    /// List the whole catalog (every user's products, with owner emails).
    ///
    /// Cached for a short TTL; product mutations and session changes
    /// invalidate the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn all_products(&self, token: &SecretString) -> Result<Vec<Product>, ApiError> {
        if let Some(products) = self.inner.catalog_cache.get(CATALOG_CACHE_KEY).await {
            debug!("cache hit for catalog");
            return Ok(products);
        }

        let products: Vec<Product> = self
            .execute(self.authed(Method::GET, "/products/all", token))
            .await?;

        self.inner
            .catalog_cache
            .insert(CATALOG_CACHE_KEY, products.clone())
            .await;

        Ok(products)
    }

    /// Create a product owned by the current user.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is rejected or the request fails.
    #[instrument(skip(self, token, input), fields(name = %input.name))]
    pub async fn create_product(
        &self,
        token: &SecretString,
        input: &ProductInput,
    ) -> Result<Product, ApiError> {
        let product = self
            .execute(self.authed(Method::POST, "/products", token).json(input))
            .await?;
        self.invalidate_catalog();
        Ok(product)
    }

    /// Update a product. The backend 404s for non-owners.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is missing, not owned, or the
    /// request fails.
    #[instrument(skip(self, token, input), fields(product_id = %product_id))]
    pub async fn update_product(
        &self,
        token: &SecretString,
        product_id: ProductId,
        input: &ProductInput,
    ) -> Result<(), ApiError> {
        let _: Acknowledgement = self
            .execute(
                self.authed(Method::PUT, &format!("/products/{product_id}"), token)
                    .json(input),
            )
            .await?;
        self.invalidate_catalog();
        Ok(())
    }

    /// Delete a product. The backend 404s for non-owners.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is missing, not owned, or the
    /// request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn delete_product(
        &self,
        token: &SecretString,
        product_id: ProductId,
    ) -> Result<(), ApiError> {
        let _: Acknowledgement = self
            .execute(self.authed(Method::DELETE, &format!("/products/{product_id}"), token))
            .await?;
        self.invalidate_catalog();
        Ok(())
    }

    // =========================================================================
    // Order Methods (never cached here - OrderTracker owns order state)
    // =========================================================================

    /// Submit a new order. The response carries the server-computed total
    /// and the item breakdown with price snapshots.
    ///
    /// # Errors
    ///
    /// Returns an error if any referenced product is gone or the request
    /// fails.
    #[instrument(skip_all, fields(lines = order.items.len()))]
    pub async fn create_order(
        &self,
        token: &SecretString,
        order: &NewOrder,
    ) -> Result<Order, ApiError> {
        self.execute(self.authed(Method::POST, "/orders", token).json(order))
            .await
    }

    /// List the current user's orders, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn orders(&self, token: &SecretString) -> Result<Vec<OrderSummary>, ApiError> {
        self.execute(self.authed(Method::GET, "/orders", token))
            .await
    }

    /// Fetch one order with its item breakdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist (or belongs to someone
    /// else) or the request fails.
    #[instrument(skip(self, token), fields(order_id = %order_id))]
    pub async fn order(&self, token: &SecretString, order_id: OrderId) -> Result<Order, ApiError> {
        self.execute(self.authed(Method::GET, &format!("/orders/{order_id}"), token))
            .await
    }

    /// Request a status transition. The backend is the final arbiter; an
    /// invalid transition comes back as a rejection with its message.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is rejected or the request fails.
    #[instrument(skip(self, token), fields(order_id = %order_id, status = %status))]
    pub async fn set_order_status(
        &self,
        token: &SecretString,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<OrderSummary, ApiError> {
        self.execute(
            self.authed(Method::PUT, &format!("/orders/{order_id}"), token)
                .json(&StatusUpdate { status }),
        )
        .await
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Drop the cached catalog. Called after product mutations and on any
    /// session change (different users see different owner flags).
    pub fn invalidate_catalog(&self) {
        self.inner.catalog_cache.invalidate_all();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use std::path::PathBuf;

    pub(crate) fn test_client() -> ApiClient {
        let config = ClientConfig {
            api_url: url::Url::parse("http://127.0.0.1:1/api").expect("valid url"),
            state_dir: PathBuf::from("/nonexistent"),
            timeout: Duration::from_secs(1),
        };
        ApiClient::new(&config).expect("build client")
    }

    #[test]
    fn test_url_joining() {
        let client = test_client();
        assert_eq!(client.url("/orders"), "http://127.0.0.1:1/api/orders");
        assert_eq!(client.url("/products/7"), "http://127.0.0.1:1/api/products/7");
    }

    #[test]
    fn test_error_body_decoding() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error": "Invalid status"}"#).expect("decode");
        assert_eq!(body.error, "Invalid status");
    }
}
