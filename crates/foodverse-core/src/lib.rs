pub mod app_config;
pub mod config;
pub mod filter;
pub mod geo;
pub mod listing;
pub mod order;
pub mod seller_request;
pub mod settings;
pub mod stats;
pub mod theme;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use filter::{filter_and_sort, toggle, FilterCriteria, FilterState, SortKey};
pub use geo::{
    haversine_km, resolve_location, Coordinate, EnvLocation, FixedLocation, LocationError,
    LocationProvider, LocationSource, NoLocation, ResolvedLocation,
};
pub use listing::{discount_percent, Availability, Listing, ListingKind};
pub use order::{clamp_quantity, total_price, OrderStatus, PickupCode};
pub use seller_request::{ReviewDecision, SellerRequestStatus};
pub use settings::{
    AppSettings, SettingsError, SettingsPatch, SettingsStore, StoredAuth, StoredUser,
};
pub use theme::{Layout, ResolvedTheme, StoreCustomization, Theme, ThemeError};

/// Errors raised while loading application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Errors raised when a domain value fails to parse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid order status: {0}")]
    InvalidOrderStatus(String),

    #[error("invalid availability: {0}")]
    InvalidAvailability(String),

    #[error("invalid sort key: {0}")]
    InvalidSortKey(String),

    #[error("invalid pickup code \"{0}\": expected six hexadecimal characters")]
    InvalidPickupCode(String),

    #[error("invalid seller request status: {0}")]
    InvalidSellerRequestStatus(String),
}
