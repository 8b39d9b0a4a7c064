//! Error type for every OpenDSM client operation.
//!
//! Key design decisions:
//! - HTTP status codes stored directly (not parsed from strings)
//! - Dispatcher never fails on a status; facades pick the variant
//! - All errors include ErrorLocation for debugging
//! - `#[track_caller]` for automatic location capture

use super::config::ConfigError;

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum DsmError {
    #[error("Invalid Credentials Error: {message} {location}")]
    InvalidCredentials {
        message: String,
        location: ErrorLocation,
    },

    #[error(
        "Unresolved Query Result Error: the query returned no usable result {} {location}",
        .message.as_deref().unwrap_or_default()
    )]
    UnresolvedQueryResult {
        message: Option<String>,
        location: ErrorLocation,
    },

    #[error(
        "Transport Error: HTTP {status} - {} {location}",
        .message.as_deref().unwrap_or_default()
    )]
    Transport {
        status: HttpStatusCode,
        message: Option<String>,
        location: ErrorLocation,
    },

    #[error("Malformed Response Error: {message} {location}")]
    MalformedResponse {
        message: String,
        location: ErrorLocation,
    },

    #[error("HTTP Error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    #[error("IO Error: {message} {location}")]
    Io {
        message: String,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DsmError {
    #[track_caller]
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        DsmError::InvalidCredentials {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unresolved(message: Option<String>) -> Self {
        DsmError::UnresolvedQueryResult {
            message,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn transport(status: HttpStatusCode, message: Option<String>) -> Self {
        DsmError::Transport {
            status,
            message,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn malformed(message: impl Into<String>) -> Self {
        DsmError::MalformedResponse {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Get HTTP status code if applicable.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            DsmError::Transport { status, .. } => Some(status.0),
            _ => None,
        }
    }

    /// Get the server supplied message, if the error carries one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            DsmError::InvalidCredentials { message, .. } => Some(message),
            DsmError::UnresolvedQueryResult { message, .. } => message.as_deref(),
            DsmError::Transport { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<url::ParseError> for DsmError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        DsmError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for DsmError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        DsmError::Http {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for DsmError {
    #[track_caller]
    fn from(error: std::io::Error) -> Self {
        DsmError::Io {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for DsmError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        DsmError::MalformedResponse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
