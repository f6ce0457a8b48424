//! End-to-end API test suite for the RevueCrafters content service.
//!
//! The crate authenticates against the service, obtains a bearer token and
//! runs a fixed, ordered sequence of revue CRUD checks against it.
//!
//! # Layout
//!
//! - [`api`] - Low-level HTTP client for the service's routes
//! - [`config`] - Credentials, base URL and HTTP client settings
//! - [`session`] - Login bootstrap with a single register-then-login fallback
//! - [`listing`] - Extraction of revue ids from the listing response
//! - [`scenario`] - The ordered check sequence and its report
//!
//! # Example
//!
//! ```no_run
//! use revuecrafters::{Scenario, Session};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let session = Session::from_env().await?;
//!
//! let report = Scenario::new(&session).run().await;
//! for failure in report.failures() {
//!     println!("{}: {}", failure.step, failure.outcome.as_ref().unwrap_err());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod listing;
pub mod scenario;
pub mod session;

pub use api::{ApiError, ApiResponseDto, Client, RawResponse, RevueDto};
pub use config::{ConfigError, Credentials, HttpClientConfig, SuiteConfig};
pub use listing::ListingError;
pub use scenario::{Scenario, ScenarioContext, ScenarioReport, Step, StepFailure, StepReport};
pub use session::{Session, SessionError};
