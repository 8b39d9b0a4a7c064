//! Endpoint-grouped request facades.
//!
//! Each facade borrows a [`DsmClient`](crate::DsmClient) and turns raw
//! responses into models or typed errors for one resource.

pub mod products;
pub mod users;

pub use products::ProductRequests;
pub use users::{ImageSource, UserRequests};

/// Page offset used when the caller does not pick one.
pub const DEFAULT_PAGE: u32 = 0;

/// Page size used when the caller does not pick one.
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 20;
