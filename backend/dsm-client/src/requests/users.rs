use super::{DEFAULT_ITEMS_PER_PAGE, DEFAULT_PAGE};
use crate::client::DsmClient;
use crate::dispatch::DsmRequest;
use crate::error::DsmError;
use crate::models::{CredentialValidation, Repository, User, decode_parallel, into_array};

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{debug, log};
use serde_json::Value;

const USER_ENDPOINT: &str = "/user";
const SEARCH_USERS_ENDPOINT: &str = "/search/users";
const VALIDATE_CREDENTIALS_ENDPOINT: &str = "/user/validate";
const REPOSITORIES_ENDPOINT: &str = "/user/git/repositories";
const ACTIVATE_DEVELOPER_ENDPOINT: &str = "/user/git/activate";
const USER_IMAGES_ENDPOINT: &str = "/images/user";

const NO_USER_FOUND_PREFIX: &str = "No user found";

/// Where an uploaded image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    File(PathBuf),
    Bytes(Vec<u8>),
    /// Already base64 encoded; sent as is.
    Base64(String),
}

impl ImageSource {
    fn into_base64(self) -> Result<String, DsmError> {
        match self {
            ImageSource::File(path) => Ok(STANDARD.encode(std::fs::read(path)?)),
            ImageSource::Bytes(bytes) => Ok(STANDARD.encode(bytes)),
            ImageSource::Base64(encoded) => Ok(encoded),
        }
    }
}

/// Requests against the `/user` family of endpoints.
#[derive(Debug, Clone, Copy)]
pub struct UserRequests<'a> {
    client: &'a DsmClient,
}

impl<'a> UserRequests<'a> {
    pub fn new(client: &'a DsmClient) -> Self {
        Self { client }
    }

    /// Fetch a user by id; `None` fetches the user the session belongs to.
    ///
    /// # Errors
    /// - [`DsmError::UnresolvedQueryResult`] if the server reports no such user
    /// - [`DsmError::Transport`] for any other unsuccessful status
    pub fn get_user(&self, id: Option<u64>) -> Result<User, DsmError> {
        let request = match id {
            Some(id) => DsmRequest::get(USER_ENDPOINT).segment(id),
            None => DsmRequest::get(format!("{USER_ENDPOINT}/")),
        };
        let response = self.client.execute(request)?;

        if response.is_success() {
            return User::from_json(&response.body);
        }

        let message = response.message();
        if message
            .as_deref()
            .is_some_and(|message| message.starts_with(NO_USER_FOUND_PREFIX))
        {
            return Err(DsmError::unresolved(message));
        }
        Err(DsmError::transport(response.status, message))
    }

    /// Search users. Results keep the order the server sent them in.
    pub fn search(
        &self,
        query: &str,
        page: u32,
        items_per_page: u32,
    ) -> Result<Vec<User>, DsmError> {
        let request = DsmRequest::get(SEARCH_USERS_ENDPOINT)
            .query("query", query)
            .query("page", page)
            .query("count", items_per_page);
        let response = self.client.execute(request)?;

        if !response.is_success() {
            return Err(DsmError::unresolved(None));
        }

        let items = into_array(response.json()?)?;
        decode_parallel(items, User::from_value)
    }

    /// [`search`](Self::search) with the first page of 20.
    pub fn search_default(&self, query: &str) -> Result<Vec<User>, DsmError> {
        self.search(query, DEFAULT_PAGE, DEFAULT_ITEMS_PER_PAGE)
    }

    /// First search hit whose username is exactly `username`.
    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DsmError> {
        let users = match self.search_default(username) {
            Ok(users) => users,
            Err(DsmError::UnresolvedQueryResult { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(users.into_iter().find(|user| user.username() == username))
    }

    /// Register a new account and return it.
    ///
    /// # Errors
    /// - [`DsmError::Transport`] if the response is not JSON or the status is unsuccessful
    /// - [`DsmError::MalformedResponse`] if the body has no decodable `user` object
    pub fn create_user(&self, username: &str, email: &str, password: &str) -> Result<User, DsmError> {
        let request = DsmRequest::post(USER_ENDPOINT).form([
            ("username", username),
            ("email", email),
            ("password", password),
        ]);
        let response = self.client.execute(request)?;

        if !response.is_json() {
            return Err(DsmError::transport(
                response.status,
                Some(response.content_type_mismatch()),
            ));
        }
        if !response.is_success() {
            return Err(DsmError::transport(response.status, response.message()));
        }

        let mut json = response.json()?;
        let user = json
            .get_mut("user")
            .map(Value::take)
            .ok_or_else(|| DsmError::malformed("create user response has no user object"))?;
        User::from_value(user)
    }

    /// Check a username/password pair. A rejected login is not an error.
    ///
    /// # Errors
    /// - [`DsmError::Transport`] if the response body is not JSON
    /// - [`DsmError::MalformedResponse`] if a successful response carries an undecodable user
    pub fn validate_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<CredentialValidation, DsmError> {
        let request = DsmRequest::post(VALIDATE_CREDENTIALS_ENDPOINT)
            .form([("username", username), ("password", password)]);
        let response = self.client.execute(request)?;

        let Ok(mut json) = response.json() else {
            return Err(DsmError::transport(
                response.status,
                Some(response.content_type_mismatch()),
            ));
        };

        let success = json
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or_else(|| response.is_success());
        let message = json
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let user = match json.get_mut("user").map(Value::take) {
            Some(user) if success && !user.is_null() => Some(User::from_value(user)?),
            _ => None,
        };

        debug!("Credential validation for {username}: success={success}");
        Ok(CredentialValidation {
            success,
            user,
            message,
        })
    }

    /// Git repositories of the session's developer account, keyed by id.
    ///
    /// Duplicate ids keep the entry that appears last.
    pub fn get_repositories(&self) -> Result<HashMap<u64, String>, DsmError> {
        let response = self.client.execute(DsmRequest::get(REPOSITORIES_ENDPOINT))?;

        if !response.is_json() {
            return Err(DsmError::transport(
                response.status,
                Some(response.content_type_mismatch()),
            ));
        }
        if !response.is_success() {
            return Err(DsmError::unresolved(response.message()));
        }

        let items = into_array(response.json()?)?;
        let repositories = decode_parallel(items, Repository::from_value)?;
        Ok(repositories
            .into_iter()
            .map(|repository| (repository.id, repository.name))
            .collect())
    }

    /// Link a git account, turning the session's account into a developer account.
    pub fn activate_developer_account(
        &self,
        git_username: &str,
        git_token: &str,
    ) -> Result<bool, DsmError> {
        let request = DsmRequest::post(ACTIVATE_DEVELOPER_ENDPOINT)
            .form([("git_username", git_username), ("git_token", git_token)]);
        let response = self.client.execute(request)?;

        let activated = response.is_success() && response.success_flag() != Some(false);
        if !activated {
            log!(
                response.failure_level(),
                "Developer account activation refused (HTTP {}): {}",
                response.status,
                response.message().unwrap_or_default()
            );
        }
        Ok(activated)
    }

    /// Change one setting of the session's account.
    ///
    /// # Errors
    /// Returns [`DsmError::UnresolvedQueryResult`] with the server message if the update is refused.
    pub fn update_user_setting(&self, name: &str, value: &str) -> Result<bool, DsmError> {
        let request = DsmRequest::patch(USER_ENDPOINT).segment(name).body(value);
        let response = self.client.execute(request)?;

        if !response.is_success() {
            return Err(DsmError::unresolved(response.message()));
        }
        Ok(true)
    }

    /// Upload a user image of the given kind (for example `profile` or `banner`).
    pub fn upload_image(&self, kind: &str, source: ImageSource) -> Result<bool, DsmError> {
        let payload = source.into_base64()?;
        let request = DsmRequest::post(USER_IMAGES_ENDPOINT).segment(kind).body(payload);
        let response = self.client.execute(request)?;

        if !response.is_success() {
            log!(
                response.failure_level(),
                "Image upload refused (HTTP {})",
                response.status
            );
        }
        Ok(response.is_success())
    }

    pub fn upload_image_file(&self, kind: &str, path: impl AsRef<Path>) -> Result<bool, DsmError> {
        self.upload_image(kind, ImageSource::File(path.as_ref().to_path_buf()))
    }

    pub fn upload_image_reader(&self, kind: &str, mut reader: impl Read) -> Result<bool, DsmError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.upload_image(kind, ImageSource::Bytes(bytes))
    }

    pub fn upload_image_base64(&self, kind: &str, encoded: impl Into<String>) -> Result<bool, DsmError> {
        self.upload_image(kind, ImageSource::Base64(encoded.into()))
    }
}
