use common::ErrorLocation;

use dsm_client::{ConfigError, DsmError};

use thiserror::Error;

/// Errors surfaced by the `opendsm` command line.
#[derive(Debug, Error)]
pub enum OpendsmError {
    /// Error from this app (logging, output)
    #[error("Opendsm Error: {message} {location}")]
    Opendsm {
        message: String,
        location: ErrorLocation,
    },

    /// Error from an OpenDSM request
    #[error(transparent)]
    Client(#[from] DsmError),

    /// Host or credential configuration is missing or invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}
