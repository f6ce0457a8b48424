//! Session bootstrap.
//!
//! Logs in with the configured credentials. If the first login fails the
//! account is registered once and the login is retried once; a second
//! failure is fatal. The resulting [`Session`] wraps a client that carries
//! the bearer token and is not modified afterwards.

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiError, AuthenticationResponse, Client, RegisterUserRequest};
use crate::config::{ConfigError, Credentials, SuiteConfig};

/// Fatal setup errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] ApiError),

    #[error("Login failed for {email}.")]
    LoginFailed { email: String },
}

/// An authenticated connection to the service.
#[derive(Debug)]
pub struct Session {
    client: Client,
    credentials: Credentials,
}

impl Session {
    /// Logs in, falling back to register-then-login once.
    pub async fn bootstrap(config: &SuiteConfig) -> Result<Self, SessionError> {
        let credentials = &config.credentials;
        let anonymous = Client::new(&config.base_url, &config.http)?;

        let token = match try_login(&anonymous, credentials).await {
            Some(token) => token,
            None => {
                info!(
                    email = credentials.email(),
                    "login failed; registering account and retrying"
                );
                register(&anonymous, credentials).await;
                try_login(&anonymous, credentials)
                    .await
                    .ok_or_else(|| SessionError::LoginFailed {
                        email: credentials.email().to_string(),
                    })?
            }
        };

        info!(email = credentials.email(), "authenticated");

        let client = Client::with_token(&config.base_url, &token, &config.http)?;
        Ok(Self {
            client,
            credentials: credentials.clone(),
        })
    }

    /// Resolves [`SuiteConfig::from_env`] and bootstraps against it.
    pub async fn from_env() -> Result<Self, SessionError> {
        let config = SuiteConfig::from_env()?;
        Self::bootstrap(&config).await
    }

    /// The authenticated client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// Attempts a login, returning the access token on success.
///
/// Transport errors, non-200 statuses, empty or malformed bodies and a
/// missing or blank `accessToken` all count as a failed attempt.
///
/// The blank-token rule is stricter than the service contract, which only
/// promises a string-typed `accessToken`.
async fn try_login(client: &Client, credentials: &Credentials) -> Option<String> {
    let response = match client
        .authenticate(credentials.email(), credentials.password())
        .await
    {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, "login request failed");
            return None;
        }
    };

    if response.status != StatusCode::OK || response.body.trim().is_empty() {
        warn!(status = response.status.as_u16(), "login rejected");
        return None;
    }

    match response.json::<AuthenticationResponse>() {
        Ok(AuthenticationResponse {
            access_token: Some(token),
        }) if !token.trim().is_empty() => Some(token),
        Ok(_) => {
            warn!("login response has no access token");
            None
        }
        Err(err) => {
            warn!(error = %err, "login response is not valid JSON");
            None
        }
    }
}

/// Registers the account. The outcome is only logged; the retried login
/// decides whether bootstrap succeeds.
async fn register(client: &Client, credentials: &Credentials) {
    let request = RegisterUserRequest {
        user_name: credentials.username(),
        email: credentials.email(),
        password: credentials.password(),
        re_password: credentials.password(),
        accepted_agreement: true,
    };

    match client.register_user(&request).await {
        Ok(response) => info!(
            user_name = credentials.username(),
            status = response.status.as_u16(),
            "registration attempted"
        ),
        Err(err) => warn!(error = %err, "registration request failed"),
    }
}
