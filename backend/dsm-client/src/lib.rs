//! Blocking client for the OpenDSM marketplace API.
//!
//! ```no_run
//! use dsm_client::{ClientConfig, DsmClient, ProductListType};
//!
//! # fn main() -> Result<(), dsm_client::DsmError> {
//! let client = DsmClient::with_api_key("my-key", &ClientConfig::default())?;
//! let latest = client.products().get_products(ProductListType::Latest, 0, 20)?;
//! let me = client.users().get_user(None)?;
//! println!("{} sees {} products", me.username(), latest.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod requests;

#[cfg(test)]
mod tests;

pub use client::DsmClient;
pub use config::ClientConfig;
pub use credentials::Credentials;
pub use dispatch::{DsmRequest, DsmResponse, HttpMethod, RequestContent};
pub use error::{ConfigError, DsmError};
pub use models::{CredentialValidation, Product, ProductListType, Repository, User};
pub use requests::{ImageSource, ProductRequests, UserRequests};

pub const LOCAL_HOSTNAME: &str = "127.0.0.1";
pub const LOCAL_PORT: u16 = 8080;
pub const LOCAL_HOST: &str = const_format::concatcp!("http://", LOCAL_HOSTNAME, ":", LOCAL_PORT);
pub const PRODUCTION_HOST: &str = "http://api.opendsm.tk";

/// Host a session talks to unless configured otherwise.
#[cfg(debug_assertions)]
pub const DEFAULT_HOST: &str = LOCAL_HOST;

/// Host a session talks to unless configured otherwise.
#[cfg(not(debug_assertions))]
pub const DEFAULT_HOST: &str = PRODUCTION_HOST;
