use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::dispatch::{DsmRequest, DsmResponse, RAW_BODY_CONTENT_TYPE, RequestContent};
use crate::error::DsmError;
use crate::requests::{ProductRequests, UserRequests};

use common::RedactedSecret;

use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

const VALIDATE_TOKEN_ENDPOINT: &str = "/user/validate/token";

/// A credential-bearing session with one OpenDSM host.
///
/// Owns a single blocking transport whose default headers carry the
/// credentials; every facade borrows the session and issues its requests
/// through [`DsmClient::execute`].
#[derive(Debug, Clone)]
pub struct DsmClient {
    base_url: String,
    client: Client,
    credentials: Credentials,
}

impl DsmClient {
    /// Create a session.
    ///
    /// Username/token credentials are checked against the server before this
    /// returns; API keys are not.
    ///
    /// # Errors
    /// - [`DsmError::Config`] if `config` is invalid
    /// - [`DsmError::InvalidCredentials`] if the server rejects the token, or a
    ///   credential cannot be sent as a header
    /// - [`DsmError::Http`] if the validation request cannot be sent
    pub fn new(credentials: Credentials, config: &ClientConfig) -> Result<Self, DsmError> {
        config.validate()?;

        let client = Client::builder()
            .default_headers(credential_headers(&credentials)?)
            .build()?;

        let session = Self {
            base_url: config.host.trim_end_matches('/').to_string(),
            client,
            credentials,
        };

        if let Credentials::UserToken { username, token } = &session.credentials {
            session.validate_token(username, token)?;
        }

        info!("OpenDSM session ready for {}", session.base_url);
        Ok(session)
    }

    pub fn with_token(
        username: impl Into<String>,
        token: impl Into<RedactedSecret>,
        config: &ClientConfig,
    ) -> Result<Self, DsmError> {
        Self::new(Credentials::user_token(username, token), config)
    }

    pub fn with_api_key(
        key: impl Into<RedactedSecret>,
        config: &ClientConfig,
    ) -> Result<Self, DsmError> {
        Self::new(Credentials::api_key(key), config)
    }

    /// Create a session from `OPENDSM_*` environment variables (and `.env`).
    pub fn from_env() -> Result<Self, DsmError> {
        let config = ClientConfig::from_env()?;
        let credentials = Credentials::from_env()?;
        Self::new(credentials, &config)
    }

    pub fn host(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn users(&self) -> UserRequests<'_> {
        UserRequests::new(self)
    }

    pub fn products(&self) -> ProductRequests<'_> {
        ProductRequests::new(self)
    }

    /// Send a request and read the whole response.
    ///
    /// Never fails because of the HTTP status; only URL, connection and I/O
    /// problems are errors here.
    pub fn execute(&self, request: DsmRequest) -> Result<DsmResponse, DsmError> {
        let url = request.url(&self.base_url)?;
        let target = url.path().to_string();
        debug!("{} {target}", request.method);

        let builder = self.client.request(request.method.into(), url);
        let builder = match request.content() {
            RequestContent::Raw(body) => builder.header(CONTENT_TYPE, RAW_BODY_CONTENT_TYPE).body(body),
            RequestContent::Form(fields) => builder.form(&fields),
            RequestContent::Empty => builder,
        };

        let response = DsmResponse::read(builder.send()?)?;
        debug!("{} {target} -> {}", request.method, response.status);

        Ok(response)
    }

    fn validate_token(&self, username: &str, token: &RedactedSecret) -> Result<(), DsmError> {
        let request = DsmRequest::post(VALIDATE_TOKEN_ENDPOINT)
            .form([("username", username), ("token", token.expose())]);
        let response = self.execute(request)?;

        if !response.is_success() || response.success_flag() == Some(false) {
            let message = response.message().unwrap_or_else(|| {
                format!(
                    "OpenDSM rejected the credentials for '{username}' (HTTP {})",
                    response.status
                )
            });
            return Err(DsmError::invalid_credentials(message));
        }

        debug!("Token validated for {username}");
        Ok(())
    }
}

fn credential_headers(credentials: &Credentials) -> Result<HeaderMap, DsmError> {
    let mut headers = HeaderMap::new();
    for (name, value) in credentials.headers() {
        let mut value = HeaderValue::from_str(value).map_err(|_| {
            DsmError::invalid_credentials(format!(
                "{name} contains characters that cannot be sent in an HTTP header"
            ))
        })?;
        value.set_sensitive(true);
        headers.insert(HeaderName::from_static(name), value);
    }
    Ok(headers)
}
