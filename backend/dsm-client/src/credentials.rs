//! Credentials attached to every OpenDSM request.
//!
//! # Security
//! - Tokens and keys wrapped in [`RedactedSecret`] (safe Debug impl)
//! - Secrets zeroized on drop
//! - Never logged or serialized

use crate::config::load_dotenv;
use crate::error::config::ConfigError;

use common::{ErrorLocation, RedactedSecret};

use std::env;
use std::panic::Location;

use log::debug;

pub const AUTH_USER_HEADER: &str = "auth_user";
pub const AUTH_TOKEN_HEADER: &str = "auth_token";
pub const API_KEY_HEADER: &str = "api_key";

pub const USERNAME_ENV_VAR: &str = "OPENDSM_USERNAME";
pub const TOKEN_ENV_VAR: &str = "OPENDSM_TOKEN";
pub const API_KEY_ENV_VAR: &str = "OPENDSM_API_KEY";

/// How a session authenticates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Validated against the server when the session is created.
    UserToken {
        username: String,
        token: RedactedSecret,
    },
    /// Not validated up front; a bad key surfaces on the first request.
    ApiKey(RedactedSecret),
}

impl Credentials {
    pub fn user_token(username: impl Into<String>, token: impl Into<RedactedSecret>) -> Self {
        Credentials::UserToken {
            username: username.into(),
            token: token.into(),
        }
    }

    pub fn api_key(key: impl Into<RedactedSecret>) -> Self {
        Credentials::ApiKey(key.into())
    }

    /// Read credentials from the environment, loading `.env` first.
    ///
    /// `OPENDSM_API_KEY` wins over `OPENDSM_USERNAME` + `OPENDSM_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVariable`] if neither form is fully present.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();

        if let Some(key) = non_empty_var(API_KEY_ENV_VAR) {
            debug!("Using API key credentials ({} chars)", key.len());
            return Ok(Credentials::api_key(key));
        }

        let username = non_empty_var(USERNAME_ENV_VAR).ok_or_else(|| {
            ConfigError::MissingVariable {
                location: ErrorLocation::from(Location::caller()),
                name: format!("{API_KEY_ENV_VAR} or {USERNAME_ENV_VAR}"),
            }
        })?;
        let token = non_empty_var(TOKEN_ENV_VAR).ok_or_else(|| ConfigError::MissingVariable {
            location: ErrorLocation::from(Location::caller()),
            name: TOKEN_ENV_VAR.to_string(),
        })?;

        debug!("Using token credentials for user {username}");
        Ok(Credentials::user_token(username, token))
    }

    /// Header name/value pairs sent with every request.
    pub fn headers(&self) -> Vec<(&'static str, &str)> {
        match self {
            Credentials::UserToken { username, token } => vec![
                (AUTH_USER_HEADER, username.as_str()),
                (AUTH_TOKEN_HEADER, token.expose()),
            ],
            Credentials::ApiKey(key) => vec![(API_KEY_HEADER, key.expose())],
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
