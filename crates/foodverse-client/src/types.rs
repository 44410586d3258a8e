//! FoodVerse API request and response types.
//!
//! The backend mixes casings for model fields (`ID`/`id`, `CreatedAt`/
//! `created_at`) and sends `null` for empty strings and lists. Every response
//! type here decodes either form into one canonical shape, so nothing past
//! this module needs to care.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use foodverse_core::seller_request::SellerRequestFields;
use foodverse_core::{OrderStatus, SellerRequestStatus};

/// Treats an explicit `null` the same as a missing field.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    #[serde(alias = "ID")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_default")]
    pub address: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_default")]
    pub image_url: String,
    #[serde(default)]
    pub rating: f64,
    /// Kilometres from the searched coordinate; only set by search endpoints.
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default, alias = "CreatedAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "UpdatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreSearchRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreInput {
    pub name: String,
    pub description: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Partial store update; only fields that are `Some` are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Food bags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodBag {
    #[serde(alias = "ID")]
    pub id: i64,
    #[serde(default)]
    pub store_id: Option<i64>,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default)]
    pub original_price: f64,
    #[serde(default)]
    pub discounted_price: f64,
    #[serde(default)]
    pub discount_percent: Option<i64>,
    #[serde(default)]
    pub quantity_left: i64,
    pub pickup_time_start: DateTime<Utc>,
    pub pickup_time_end: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_default")]
    pub image_url: String,
    #[serde(default, deserialize_with = "null_default")]
    pub category: String,
    #[serde(default)]
    pub store: Option<Store>,
    #[serde(default, alias = "CreatedAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl FoodBag {
    /// Parent store id, from the embedded store if the flat field is absent.
    #[must_use]
    pub fn parent_store_id(&self) -> Option<i64> {
        self.store_id.or_else(|| self.store.as_ref().map(|s| s.id))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FoodBagSearchRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FoodBagInput {
    pub store_id: i64,
    pub title: String,
    pub description: String,
    pub original_price: f64,
    pub discounted_price: f64,
    pub quantity_total: u32,
    pub pickup_time_start: DateTime<Utc>,
    pub pickup_time_end: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub category: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FoodBagUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_total: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_time_start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_time_end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(alias = "ID")]
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub food_bag_id: Option<i64>,
    #[serde(default)]
    pub store_id: Option<i64>,
    pub quantity: u32,
    #[serde(default)]
    pub total_price: f64,
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "null_default")]
    pub notes: String,
    #[serde(default, deserialize_with = "null_default")]
    pub pickup_code: String,
    #[serde(default)]
    pub food_bag: Option<FoodBag>,
    #[serde(default)]
    pub store: Option<Store>,
    #[serde(default, alias = "CreatedAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub picked_up_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderInput {
    pub food_bag_id: i64,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct PickupVerification {
    pub pickup_code: String,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "ID")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub user_type: String,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub expires_at: Option<String>,
    pub user: User,
}

/// Consumer order history summary from `GET /user/stats`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserStats {
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub completed_orders: u64,
    /// Rupiah saved against original prices.
    #[serde(default)]
    pub total_savings: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub favorite_categories: Vec<String>,
}

// ---------------------------------------------------------------------------
// Seller requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(alias = "ID")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_default")]
    pub user_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerRequest {
    #[serde(alias = "ID")]
    pub id: i64,
    pub user: UserSummary,
    #[serde(default, deserialize_with = "null_default")]
    pub id_number: String,
    #[serde(default, deserialize_with = "null_default")]
    pub reason: String,
    #[serde(default, deserialize_with = "null_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_default")]
    pub face_image_url: String,
    pub status: SellerRequestStatus,
    #[serde(default, deserialize_with = "null_default")]
    pub admin_comments: String,
    #[serde(default)]
    pub reviewed_by: Option<UserSummary>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "CreatedAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl SellerRequestFields for SellerRequest {
    fn status(&self) -> SellerRequestStatus {
        self.status
    }

    fn searchable_fields(&self) -> [&str; 5] {
        [
            self.user.name.as_str(),
            self.user.email.as_str(),
            self.id_number.as_str(),
            self.location.as_str(),
            self.reason.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SellerRequestPage {
    #[serde(default, deserialize_with = "null_default")]
    pub requests: Vec<SellerRequest>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SellerRequestInput {
    pub id_number: String,
    pub reason: String,
    pub location: String,
    pub face_image_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SellerRequestReview {
    pub status: SellerRequestStatus,
    pub admin_comments: String,
}

#[derive(Debug, Clone, Default)]
pub struct SellerRequestQuery {
    pub status: Option<SellerRequestStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
