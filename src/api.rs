//! Low-level RevueCrafters API client.
//!
//! Every call returns the raw status code and body so callers can assert on
//! both, including on error statuses the service uses for validation
//! failures.
//!
//! # Routes
//!
//! | Method | Path | Body | Response |
//! |--------|------|------|----------|
//! | POST | `/api/User/Create` | [`RegisterUserRequest`] | - |
//! | POST | `/api/User/Authentication` | [`AuthenticationRequest`] | `{accessToken}` |
//! | POST | `/api/Revue/Create` | [`RevueDto`] | `{msg}` |
//! | GET | `/api/Revue/All` | - | array of revues |
//! | PUT | `/api/Revue/Edit?revueId=<id>` | [`RevueDto`] | `{msg}` |
//! | DELETE | `/api/Revue/Delete?revueId=<id>` | - | `{msg}` |

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::HttpClientConfig;

const REGISTER_PATH: &str = "/api/User/Create";
const AUTHENTICATION_PATH: &str = "/api/User/Authentication";
const REVUE_CREATE_PATH: &str = "/api/Revue/Create";
const REVUE_ALL_PATH: &str = "/api/Revue/All";
const REVUE_EDIT_PATH: &str = "/api/Revue/Edit";
const REVUE_DELETE_PATH: &str = "/api/Revue/Delete";

/// Errors raised while talking to the service.
///
/// Non-2xx statuses are not errors at this layer; they come back inside
/// [`RawResponse`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid bearer token: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

/// Payload for creating and editing a revue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevueDto {
    pub title: String,
    /// May be empty.
    pub url: String,
    pub description: String,
}

impl RevueDto {
    pub fn new(title: &str, url: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
            description: description.to_string(),
        }
    }
}

/// Message envelope returned by mutating revue routes.
///
/// The `msg` key is matched case-insensitively. When a body carries several
/// casings the first string-valued one in key order wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiResponseDto {
    pub msg: Option<String>,
}

impl ApiResponseDto {
    pub fn from_value(value: &Value) -> Self {
        let msg = value.as_object().and_then(|map| {
            map.iter()
                .filter(|(key, _)| key.eq_ignore_ascii_case("msg"))
                .find_map(|(_, v)| v.as_str())
                .map(str::to_string)
        });
        Self { msg }
    }
}

/// Request body for `POST /api/User/Create`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest<'a> {
    pub user_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub re_password: &'a str,
    pub accepted_agreement: bool,
}

/// Request body for `POST /api/User/Authentication`.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticationRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful authentication payload.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticationResponse {
    #[serde(rename = "accessToken")]
    pub access_token: Option<String>,
}

/// Status code and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    /// Deserializes the body.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// The `msg` field of the body, if the body is a message envelope.
    pub fn message(&self) -> Option<String> {
        let value = self.json::<Value>().ok()?;
        ApiResponseDto::from_value(&value).msg
    }
}

/// URL-encode a string for use in query parameters.
fn url_encode(s: &str) -> String {
    let mut encoded = String::new();
    for byte in s.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

/// RevueCrafters API client.
///
/// A client either carries no credentials (used for login and registration)
/// or a bearer token that is attached to every request.
#[derive(Debug, Clone)]
pub struct Client {
    http_client: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Creates an unauthenticated client.
    pub fn new(base_url: &str, config: &HttpClientConfig) -> Result<Self, ApiError> {
        Self::with_headers(base_url, HeaderMap::new(), config)
    }

    /// Creates a client that sends `Authorization: Bearer <token>` on every request.
    pub fn with_token(
        base_url: &str,
        token: &str,
        config: &HttpClientConfig,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        Self::with_headers(base_url, headers, config)
    }

    fn with_headers(
        base_url: &str,
        headers: HeaderMap,
        config: &HttpClientConfig,
    ) -> Result<Self, ApiError> {
        let builder = reqwest::Client::builder().default_headers(headers);
        let http_client = config.apply(builder).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http_client.request(method, format!("{}{}", self.base_url, path))
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> Result<RawResponse, ApiError> {
        debug!(%method, path, "sending request");

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(%method, path, status = status.as_u16(), "received response");
        Ok(RawResponse { status, body })
    }

    // =========================================================================
    // User APIs
    // =========================================================================

    /// Registers a new account.
    pub async fn register_user(
        &self,
        request: &RegisterUserRequest<'_>,
    ) -> Result<RawResponse, ApiError> {
        let builder = self.request(Method::POST, REGISTER_PATH).json(request);
        self.execute(Method::POST, REGISTER_PATH, builder).await
    }

    /// Exchanges an email and password for an access token.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<RawResponse, ApiError> {
        let builder = self
            .request(Method::POST, AUTHENTICATION_PATH)
            .json(&AuthenticationRequest { email, password });
        self.execute(Method::POST, AUTHENTICATION_PATH, builder).await
    }

    // =========================================================================
    // Revue APIs
    // =========================================================================

    pub async fn create_revue(&self, revue: &RevueDto) -> Result<RawResponse, ApiError> {
        let builder = self.request(Method::POST, REVUE_CREATE_PATH).json(revue);
        self.execute(Method::POST, REVUE_CREATE_PATH, builder).await
    }

    pub async fn list_revues(&self) -> Result<RawResponse, ApiError> {
        let builder = self.request(Method::GET, REVUE_ALL_PATH);
        self.execute(Method::GET, REVUE_ALL_PATH, builder).await
    }

    pub async fn edit_revue(
        &self,
        revue_id: &str,
        revue: &RevueDto,
    ) -> Result<RawResponse, ApiError> {
        let path = format!("{}?revueId={}", REVUE_EDIT_PATH, url_encode(revue_id));
        let builder = self.request(Method::PUT, &path).json(revue);
        self.execute(Method::PUT, &path, builder).await
    }

    pub async fn delete_revue(&self, revue_id: &str) -> Result<RawResponse, ApiError> {
        let path = format!("{}?revueId={}", REVUE_DELETE_PATH, url_encode(revue_id));
        let builder = self.request(Method::DELETE, &path);
        self.execute(Method::DELETE, &path, builder).await
    }
}
