//! Shared building blocks for the OpenDSM workspace.
//!
//! This crate holds the small pieces every other crate leans on: error
//! location tracking, HTTP status categorization and redacted secrets.
//!
//! ## Architecture
//!
//! - **common** (this crate): error plumbing and secret handling
//! - **dsm-client**: the OpenDSM HTTP client built on these types
//! - **opendsm**: command-line front end wiring everything together

pub mod error;
pub mod http_status;
pub mod redacted_secret;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_secret::RedactedSecret;

#[cfg(test)]
mod tests;
