pub mod client;
pub mod discovery;
pub mod error;
pub mod normalize;
pub mod orders;
pub mod types;

pub use client::FoodverseClient;
pub use discovery::{
    DiscoverySession, Nearby, NearbyQuery, SearchFailure, SearchOutcome, SearchResource,
};
pub use error::ClientError;
pub use normalize::{food_bag_listing, order_line, store_listing};
pub use orders::{place_order, OrderTarget};
pub use types::{
    AuthResponse, FoodBag, FoodBagInput, FoodBagUpdate, LoginRequest, Order, RegisterRequest,
    SellerRequest, SellerRequestInput, SellerRequestPage, SellerRequestQuery, Store, StoreInput,
    StoreUpdate, User, UserStats,
};
