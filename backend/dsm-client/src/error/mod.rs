pub mod config;
pub mod dsm_client;

pub use config::ConfigError;
pub use dsm_client::DsmError;
