//! HTTP client for the FoodVerse REST API.
//!
//! Wraps `reqwest` with bearer-token handling and typed responses. Every
//! endpoint maps HTTP 401 to [`ClientError::Unauthorized`] and any other
//! non-2xx status to [`ClientError::Api`] carrying the API's `error` message.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use foodverse_core::{AppConfig, OrderStatus, PickupCode, ReviewDecision};

use crate::error::ClientError;
use crate::types::{
    AuthResponse, FoodBag, FoodBagInput, FoodBagSearchRequest, FoodBagUpdate, LoginRequest, Order,
    OrderInput, OrderStatusUpdate, PickupVerification, RegisterRequest, SellerRequest,
    SellerRequestInput, SellerRequestPage, SellerRequestQuery, SellerRequestReview, Store,
    StoreInput, StoreSearchRequest, StoreUpdate, User, UserStats,
};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PAGE_LIMIT: u32 = 10;

/// List endpoints answer with a bare array, `null` for an empty result, or
/// (for owned stores) `{"data": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Bare(Vec<T>),
    Wrapped {
        // Required so an unrelated object is a decode error, not an empty list.
        #[serde(deserialize_with = "Option::deserialize")]
        data: Option<Vec<T>>,
    },
    Null,
}

impl<T> ListBody<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListBody::Bare(items) => items,
            ListBody::Wrapped { data } => data.unwrap_or_default(),
            ListBody::Null => Vec::new(),
        }
    }
}

/// Pulls the `error` field out of an API error body, falling back to the
/// raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(serde_json::Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty response body".to_string()
            } else {
                trimmed.to_string()
            }
        })
}

/// Client for the FoodVerse REST API.
///
/// Use [`FoodverseClient::new`] with loaded configuration, or
/// [`FoodverseClient::with_base_url`] to point at a mock server in tests.
pub struct FoodverseClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl FoodverseClient {
    /// Creates a client from application configuration, picking up the
    /// configured API token if there is one.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if the
    /// configured base URL does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        let client = Self::with_base_url(&config.api_base_url, config.request_timeout_secs)?;
        Ok(match &config.api_token {
            Some(token) => client.with_token(token),
            None => client,
        })
    }

    /// Creates an unauthenticated client against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute URL.
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("foodverse-cli/0.1")
            .build()?;

        // A trailing slash keeps the last path segment (`/api/v1`) when
        // endpoints are joined onto the base.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            token: None,
        })
    }

    #[must_use]
    pub fn with_token(mut self, token: &str) -> Self {
        self.set_token(Some(token.to_string()));
        self
    }

    /// Replaces the bearer token. Blank tokens are treated as no token.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.trim().is_empty());
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    // -----------------------------------------------------------------------
    // Discovery
    // -----------------------------------------------------------------------

    /// Searches stores around a coordinate.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Api`] on a non-2xx response.
    /// - [`ClientError::Deserialize`] if the body is not a store list.
    pub async fn search_stores(
        &self,
        request: &StoreSearchRequest,
    ) -> Result<Vec<Store>, ClientError> {
        let body: ListBody<Store> = self
            .send_json(Method::POST, "stores/search", Some(request))
            .await?;
        Ok(body.into_vec())
    }

    /// Searches food bags around a coordinate. Each bag embeds its store.
    ///
    /// # Errors
    ///
    /// Same as [`FoodverseClient::search_stores`].
    pub async fn search_food_bags(
        &self,
        request: &FoodBagSearchRequest,
    ) -> Result<Vec<FoodBag>, ClientError> {
        let body: ListBody<FoodBag> = self
            .send_json(Method::POST, "food-bags/search", Some(request))
            .await?;
        Ok(body.into_vec())
    }

    // -----------------------------------------------------------------------
    // Stores
    // -----------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 404 if the store does not exist.
    pub async fn get_store(&self, id: i64) -> Result<Store, ClientError> {
        self.send_json::<(), _>(Method::GET, &format!("stores/{id}"), None)
            .await
    }

    /// Stores owned by the signed-in seller.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] without a valid token.
    pub async fn my_stores(&self) -> Result<Vec<Store>, ClientError> {
        let body: ListBody<Store> = self
            .send_json::<(), _>(Method::GET, "stores/my", None)
            .await?;
        Ok(body.into_vec())
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] without a valid token, or
    /// [`ClientError::Api`] if the backend rejects the input.
    pub async fn create_store(&self, input: &StoreInput) -> Result<Store, ClientError> {
        self.send_json(Method::POST, "stores", Some(input)).await
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 403 when the caller does not
    /// own the store.
    pub async fn update_store(&self, id: i64, update: &StoreUpdate) -> Result<Store, ClientError> {
        self.send_json(Method::PUT, &format!("stores/{id}"), Some(update))
            .await
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 403 when the caller does not
    /// own the store.
    pub async fn delete_store(&self, id: i64) -> Result<(), ClientError> {
        self.send_empty::<()>(Method::DELETE, &format!("stores/{id}"), None)
            .await
    }

    // -----------------------------------------------------------------------
    // Food bags
    // -----------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 404 if the bag does not exist.
    pub async fn get_food_bag(&self, id: i64) -> Result<FoodBag, ClientError> {
        self.send_json::<(), _>(Method::GET, &format!("food-bags/{id}"), None)
            .await
    }

    /// Every bag a store lists, including sold-out ones.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] on a non-2xx response.
    pub async fn store_food_bags(&self, store_id: i64) -> Result<Vec<FoodBag>, ClientError> {
        let body: ListBody<FoodBag> = self
            .send_json::<(), _>(Method::GET, &format!("store-food-bags/{store_id}"), None)
            .await?;
        Ok(body.into_vec())
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 403 when the caller does not
    /// own the target store.
    pub async fn create_food_bag(&self, input: &FoodBagInput) -> Result<FoodBag, ClientError> {
        self.send_json(Method::POST, "food-bags", Some(input)).await
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 403 when the caller does not
    /// own the bag's store.
    pub async fn update_food_bag(
        &self,
        id: i64,
        update: &FoodBagUpdate,
    ) -> Result<FoodBag, ClientError> {
        self.send_json(Method::PUT, &format!("food-bags/{id}"), Some(update))
            .await
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 403 when the caller does not
    /// own the bag's store.
    pub async fn delete_food_bag(&self, id: i64) -> Result<(), ClientError> {
        self.send_empty::<()>(Method::DELETE, &format!("food-bags/{id}"), None)
            .await
    }

    // -----------------------------------------------------------------------
    // Orders
    // -----------------------------------------------------------------------

    /// Sends an order exactly as given. Prefer [`crate::orders::place_order`],
    /// which clamps the quantity first.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 400 when the bag no longer has
    /// enough stock.
    pub async fn create_order(&self, input: &OrderInput) -> Result<Order, ClientError> {
        self.send_json(Method::POST, "orders", Some(input)).await
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 403 or 404 when the order is
    /// not visible to the caller.
    pub async fn get_order(&self, id: i64) -> Result<Order, ClientError> {
        self.send_json::<(), _>(Method::GET, &format!("orders/{id}"), None)
            .await
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] without a valid token.
    pub async fn my_orders(&self) -> Result<Vec<Order>, ClientError> {
        let body: ListBody<Order> = self
            .send_json::<(), _>(Method::GET, "orders/my", None)
            .await?;
        Ok(body.into_vec())
    }

    /// Orders placed against one of the seller's stores.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] without a valid token.
    pub async fn store_orders(&self, store_id: i64) -> Result<Vec<Order>, ClientError> {
        let body: ListBody<Order> = self
            .send_json::<(), _>(Method::GET, &format!("store/{store_id}/orders"), None)
            .await?;
        Ok(body.into_vec())
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 403 when the caller may not
    /// change this order.
    pub async fn update_order_status(
        &self,
        id: i64,
        status: OrderStatus,
    ) -> Result<Order, ClientError> {
        let body = OrderStatusUpdate { status };
        self.send_json(Method::PUT, &format!("orders/{id}/status"), Some(&body))
            .await
    }

    /// Completes the order matching a pickup code.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 404 when no order has `code`.
    pub async fn verify_pickup(&self, code: &PickupCode) -> Result<Order, ClientError> {
        let body = PickupVerification {
            pickup_code: code.as_str().to_string(),
        };
        self.send_json(Method::POST, "orders/verify-pickup", Some(&body))
            .await
    }

    // -----------------------------------------------------------------------
    // Auth
    // -----------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 400 on bad credentials.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ClientError> {
        self.send_json(Method::POST, "login", Some(request)).await
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 400 when the email is taken
    /// or the input is incomplete.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        self.send_json(Method::POST, "register", Some(request)).await
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] without a valid token.
    pub async fn profile(&self) -> Result<User, ClientError> {
        self.send_json::<(), _>(Method::GET, "user", None).await
    }

    /// Order totals and savings for the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] without a valid token.
    pub async fn user_stats(&self) -> Result<UserStats, ClientError> {
        self.send_json::<(), _>(Method::GET, "user/stats", None).await
    }

    // -----------------------------------------------------------------------
    // Seller requests
    // -----------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 400 when the user already has a
    /// pending or approved request.
    pub async fn submit_seller_request(
        &self,
        input: &SellerRequestInput,
    ) -> Result<SellerRequest, ClientError> {
        self.send_json(Method::POST, "seller-requests", Some(input))
            .await
    }

    /// The caller's own request, or `None` if they never applied.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] without a valid token.
    pub async fn my_seller_request(&self) -> Result<Option<SellerRequest>, ClientError> {
        match self
            .send_json::<(), _>(Method::GET, "seller-requests/my", None)
            .await
        {
            Ok(request) => Ok(Some(request)),
            Err(ClientError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Admin listing. Page and limit default to 1 and 10.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 403 for non-admins.
    pub async fn list_seller_requests(
        &self,
        query: &SellerRequestQuery,
    ) -> Result<SellerRequestPage, ClientError> {
        let mut url = self.endpoint("seller-requests")?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(status) = query.status {
                pairs.append_pair("status", status.as_str());
            }
            pairs.append_pair("page", &query.page.unwrap_or(DEFAULT_PAGE).to_string());
            pairs.append_pair(
                "limit",
                &query.limit.unwrap_or(DEFAULT_PAGE_LIMIT).to_string(),
            );
        }
        let builder = self.request(Method::GET, url.clone());
        Self::send(builder, &url).await
    }

    /// Approves or rejects a request. Rejections must carry comments.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidInput`] when rejecting with blank comments.
    /// - [`ClientError::Api`] with status 403 for non-admins, or 400 when the
    ///   request was already reviewed.
    pub async fn review_seller_request(
        &self,
        id: i64,
        decision: ReviewDecision,
        comments: &str,
    ) -> Result<SellerRequest, ClientError> {
        if decision == ReviewDecision::Reject && comments.trim().is_empty() {
            return Err(ClientError::InvalidInput(
                "a rejection must include admin comments".to_string(),
            ));
        }
        let body = SellerRequestReview {
            status: decision.status(),
            admin_comments: comments.trim().to_string(),
        };
        self.send_json(Method::PUT, &format!("seller-requests/{id}"), Some(&body))
            .await
    }

    // -----------------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------------

    /// Resolves an endpoint path (no leading slash) against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidInput(format!("bad endpoint path '{path}': {e}")))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, %url, authenticated = self.token.is_some(), "api request");
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn builder<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(Url, RequestBuilder), ClientError> {
        let url = self.endpoint(path)?;
        let builder = self.request(method, url.clone());
        let builder = match body {
            Some(body) => builder.json(body),
            None => builder,
        };
        Ok((url, builder))
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (url, builder) = self.builder(method, path, body)?;
        Self::send(builder, &url).await
    }

    async fn send_empty<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ClientError> {
        let (url, builder) = self.builder(method, path, body)?;
        Self::checked_body(builder, &url).await.map(|_| ())
    }

    /// Sends the request and returns the body of a 2xx response.
    async fn checked_body(builder: RequestBuilder, url: &Url) -> Result<String, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(%url, "api rejected credentials");
            return Err(ClientError::Unauthorized);
        }

        let body = response.text().await?;
        if !status.is_success() {
            let message = error_message(&body);
            tracing::debug!(%url, status = status.as_u16(), %message, "api error");
            return Err(ClientError::Api {
                status: status.as_u16(),
                url: url.to_string(),
                message,
            });
        }
        Ok(body)
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder, url: &Url) -> Result<T, ClientError> {
        let body = Self::checked_body(builder, url).await?;
        serde_json::from_str(&body).map_err(|source| ClientError::Deserialize {
            context: url.path().to_string(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
