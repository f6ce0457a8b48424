//! Suite configuration.
//!
//! Credentials, the base endpoint and the request timeout can be set through the
//! environment:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `REVUE_EMAIL` | `user@examplee.com` | Account email used for login |
//! | `REVUE_PASSWORD` | `string12` | Account password used for login |
//! | `REVUE_BASE_URL` | `https://d2925tksfvgq8c.cloudfront.net` | Service endpoint |
//! | `REVUE_TIMEOUT_SECS` | unset (no timeout) | Total per-request timeout in seconds |
//!
//! The email and password override only applies when both variables are set
//! and non-blank; otherwise both fall back to the defaults.

use std::env;
use std::time::Duration;

use thiserror::Error;

/// The deployed RevueCrafters endpoint.
pub const REVUE_CRAFTERS_API_URL: &str = "https://d2925tksfvgq8c.cloudfront.net";

pub const EMAIL_VAR: &str = "REVUE_EMAIL";
pub const PASSWORD_VAR: &str = "REVUE_PASSWORD";
pub const BASE_URL_VAR: &str = "REVUE_BASE_URL";
pub const TIMEOUT_VAR: &str = "REVUE_TIMEOUT_SECS";

pub const FALLBACK_EMAIL: &str = "user@examplee.com";
pub const FALLBACK_PASSWORD: &str = "string12";

/// Fatal configuration errors. These abort the run before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Email is empty.")]
    BlankEmail,

    #[error("Password is empty.")]
    BlankPassword,

    #[error("Invalid timeout {0:?}: expected a positive number of seconds.")]
    InvalidTimeout(String),
}

/// Account credentials for the service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Creates credentials, rejecting blank values.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let email = email.into();
        let password = password.into();

        if email.trim().is_empty() {
            return Err(ConfigError::BlankEmail);
        }
        if password.trim().is_empty() {
            return Err(ConfigError::BlankPassword);
        }

        Ok(Self { email, password })
    }

    /// Picks the overrides when both are non-blank, otherwise the fallbacks.
    pub fn resolve(email: Option<String>, password: Option<String>) -> Result<Self, ConfigError> {
        match (non_blank(email), non_blank(password)) {
            (Some(email), Some(password)) => Self::new(email, password),
            _ => Self::new(FALLBACK_EMAIL, FALLBACK_PASSWORD),
        }
    }

    /// Resolves credentials from `REVUE_EMAIL` and `REVUE_PASSWORD`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(env::var(EMAIL_VAR).ok(), env::var(PASSWORD_VAR).ok())
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// The registration username: the local part of the email.
    pub fn username(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// HTTP client configuration.
///
/// Without a timeout the client keeps reqwest's defaults, which put no limit
/// on the total request time.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use revuecrafters::HttpClientConfig;
///
/// let config = HttpClientConfig::resolve(Some("10".to_string())).unwrap();
/// assert_eq!(config.timeout, Some(Duration::from_secs(10)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Total request timeout.
    pub timeout: Option<Duration>,
}

impl HttpClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Parses a `REVUE_TIMEOUT_SECS` value. Unset or blank means no timeout.
    pub fn resolve(timeout_secs: Option<String>) -> Result<Self, ConfigError> {
        let Some(raw) = non_blank(timeout_secs) else {
            return Ok(Self::default());
        };

        match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Self::new().timeout(Duration::from_secs(secs))),
            _ => Err(ConfigError::InvalidTimeout(raw)),
        }
    }

    /// Applies the settings to a reqwest client builder.
    pub(crate) fn apply(&self, builder: reqwest::ClientBuilder) -> reqwest::ClientBuilder {
        match self.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }
}

/// Everything needed to bootstrap a session.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    pub base_url: String,
    pub credentials: Credentials,
    pub http: HttpClientConfig,
}

impl SuiteConfig {
    pub fn new(base_url: &str, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            http: HttpClientConfig::default(),
        }
    }

    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = non_blank(env::var(BASE_URL_VAR).ok())
            .unwrap_or_else(|| REVUE_CRAFTERS_API_URL.to_string());

        let mut config = Self::new(&base_url, Credentials::from_env()?);
        config.http = HttpClientConfig::resolve(env::var(TIMEOUT_VAR).ok())?;
        Ok(config)
    }
}
