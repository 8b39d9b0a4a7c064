//! HTTP verb dispatcher.
//!
//! Requests are described as plain data ([`DsmRequest`]) and executed by
//! [`DsmClient::execute`](crate::DsmClient::execute), which hands back a
//! [`DsmResponse`] without looking at the status code. Interpreting the
//! status, content type and body is left to the request facades, since each
//! endpoint signals failure differently.

use crate::error::DsmError;

use common::HttpStatusCode;

use std::fmt;

use log::Level;
use serde_json::Value;
use url::Url;

pub const RAW_BODY_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// What ends up in the request body once precedence is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestContent {
    Empty,
    Raw(String),
    Form(Vec<(String, String)>),
}

/// An OpenDSM request described as plain data.
#[derive(Clone)]
pub struct DsmRequest {
    pub method: HttpMethod,
    pub path: String,
    /// Appended to `path` one encoded segment each, so `/`, `?` and `#` stay literal.
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
    pub form: Option<Vec<(String, String)>>,
}

impl DsmRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            segments: Vec::new(),
            query: Vec::new(),
            body: None,
            form: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn segment(mut self, segment: impl ToString) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.form = Some(
            fields
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }

    /// A non-blank raw body wins over form fields; neither means no body.
    pub fn content(&self) -> RequestContent {
        if let Some(body) = self.body.as_ref().filter(|body| !body.trim().is_empty()) {
            return RequestContent::Raw(body.clone());
        }
        match &self.form {
            Some(fields) => RequestContent::Form(fields.clone()),
            None => RequestContent::Empty,
        }
    }

    /// `{base_url}{path}/{segments..}` with segments and query pairs URL-encoded.
    pub fn url(&self, base_url: &str) -> Result<Url, DsmError> {
        let mut url = Url::parse(&format!("{}{}", base_url.trim_end_matches('/'), self.path))?;
        if !self.segments.is_empty() {
            url.path_segments_mut()
                .map_err(|()| DsmError::from(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
                .pop_if_empty()
                .extend(&self.segments);
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}

// Form fields and bodies carry passwords and tokens, so only their shape is printed.
impl fmt::Debug for DsmRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DsmRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("segments", &self.segments)
            .field("query", &self.query)
            .field("body_len", &self.body.as_ref().map(String::len))
            .field(
                "form_keys",
                &self
                    .form
                    .as_ref()
                    .map(|fields| fields.iter().map(|(key, _)| key.as_str()).collect::<Vec<_>>()),
            )
            .finish()
    }
}

/// A response read fully into memory.
#[derive(Debug, Clone)]
pub struct DsmResponse {
    pub status: HttpStatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

impl DsmResponse {
    pub(crate) fn read(response: reqwest::blocking::Response) -> Result<Self, DsmError> {
        let status = HttpStatusCode(response.status().as_u16());
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text()?;

        Ok(Self {
            status,
            content_type,
            body,
        })
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// True when the media type is `application/json`, ignoring parameters.
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .and_then(|content_type| content_type.split(';').next())
            .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case(JSON_CONTENT_TYPE))
    }

    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DsmError::MalformedResponse`] if the body is not valid JSON.
    pub fn json(&self) -> Result<Value, DsmError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// The `message` field of a JSON body, if there is one.
    pub fn message(&self) -> Option<String> {
        let json: Value = serde_json::from_str(&self.body).ok()?;
        json.get("message")?.as_str().map(str::to_string)
    }

    /// The boolean `success` field of a JSON body, if there is one.
    pub fn success_flag(&self) -> Option<bool> {
        let json: Value = serde_json::from_str(&self.body).ok()?;
        json.get("success")?.as_bool()
    }

    /// Level for logging this response as a refusal: server faults are
    /// errors, client errors are warnings, anything else is informational.
    pub(crate) fn failure_level(&self) -> Level {
        if self.status.is_server_error() {
            Level::Error
        } else if self.status.is_client_error() {
            Level::Warn
        } else {
            Level::Info
        }
    }

    /// Describes the content type for errors raised on a mismatch.
    pub(crate) fn content_type_mismatch(&self) -> String {
        match &self.content_type {
            Some(content_type) => {
                format!("expected {JSON_CONTENT_TYPE} response, got {content_type}")
            }
            None => format!("expected {JSON_CONTENT_TYPE} response, got no content type"),
        }
    }
}
