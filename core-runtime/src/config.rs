//! # Core Configuration Module
//!
//! Configuration for the authentication core.
//!
//! ## Overview
//!
//! A builder constructs a `CoreConfig` holding the OAuth client identifier,
//! the scopes requested during interactive sign-in, and the optional bridges
//! the provider crates consume. `build()` validates eagerly so a misconfigured
//! host fails at startup with an actionable message instead of at first
//! sign-in.
//!
//! The client identifier is deliberately optional: a sync framework may build
//! its services before the user has configured an account, and
//! `authenticate` then resolves with `InvalidClientId` without contacting the
//! provider.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .client_id("1234-abc.apps.googleusercontent.com")
//!     .build()
//!     .expect("valid config");
//!
//! assert_eq!(config.scopes, vec![core_runtime::config::DRIVE_APP_DATA_SCOPE.to_string()]);
//! ```
//!
//! ## Error Handling
//!
//! ```
//! use core_runtime::config::CoreConfig;
//!
//! let result = CoreConfig::builder().client_id("   ").build();
//! assert!(result.is_err());
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::HttpClient;
use std::sync::Arc;

/// Minimum scope needed for the application-private Drive folder.
pub const DRIVE_APP_DATA_SCOPE: &str = "https://www.googleapis.com/auth/drive.appdata";

/// Environment variable consulted by [`CoreConfig::from_env`].
pub const CLIENT_ID_ENV_VAR: &str = "GOOGLE_CLIENT_ID";

const MAX_EVENT_BUFFER_SIZE: usize = 10_000;

/// Core configuration for the authentication core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// OAuth client identifier. Interactive sign-in requires it.
    pub client_id: Option<String>,

    /// Scopes requested during interactive sign-in
    pub scopes: Vec<String>,

    /// Capacity of the auth event bus
    pub event_buffer_size: usize,

    /// HTTP transport for authorized REST calls (optional)
    pub http_client: Option<Arc<dyn HttpClient>>,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("client_id", &self.client_id)
            .field("scopes", &self.scopes)
            .field("event_buffer_size", &self.event_buffer_size)
            .field(
                "http_client",
                &self.http_client.as_ref().map(|_| "HttpClient { ... }"),
            )
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Builds a configuration from the process environment.
    ///
    /// Reads the client identifier from `GOOGLE_CLIENT_ID` when it is set;
    /// everything else uses defaults.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::builder();
        if let Ok(client_id) = std::env::var(CLIENT_ID_ENV_VAR) {
            builder = builder.client_id(client_id);
        }
        builder.build()
    }

    /// Whether a client identifier is configured.
    pub fn has_client_id(&self) -> bool {
        self.client_id.is_some()
    }

    /// Returns the HTTP client or a `CapabilityMissing` error naming it.
    pub fn require_http_client(&self) -> Result<Arc<dyn HttpClient>> {
        self.http_client
            .clone()
            .ok_or_else(|| Error::CapabilityMissing {
                capability: "HttpClient".to_string(),
                message: "No HTTP client implementation provided. \
                          Inject a host HttpClient to make authorized REST calls."
                    .to_string(),
            })
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - A configured client id is not blank
    /// - At least one non-blank scope is requested
    /// - The event buffer size is within `1..=10_000`
    pub fn validate(&self) -> Result<()> {
        if let Some(client_id) = &self.client_id {
            if client_id.trim().is_empty() {
                return Err(Error::Config(
                    "Client ID cannot be blank. Omit it entirely to defer configuration."
                        .to_string(),
                ));
            }
        }

        if self.scopes.is_empty() {
            return Err(Error::Config(
                "At least one OAuth scope must be requested".to_string(),
            ));
        }

        if self.scopes.iter().any(|scope| scope.trim().is_empty()) {
            return Err(Error::Config("OAuth scopes cannot be blank".to_string()));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "Event buffer size exceeds maximum of {}",
                MAX_EVENT_BUFFER_SIZE
            )));
        }

        Ok(())
    }
}

/// Builder for constructing [`CoreConfig`] instances.
#[derive(Default)]
pub struct CoreConfigBuilder {
    client_id: Option<String>,
    scopes: Option<Vec<String>>,
    event_buffer_size: Option<usize>,
    http_client: Option<Arc<dyn HttpClient>>,
}

impl CoreConfigBuilder {
    /// Sets the OAuth client identifier.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Replaces the requested scopes.
    ///
    /// Default: the Drive app-data scope only.
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the auth event bus capacity.
    ///
    /// Default: 100
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Sets the HTTP client implementation (optional).
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first invalid setting.
    pub fn build(self) -> Result<CoreConfig> {
        let config = CoreConfig {
            client_id: self.client_id,
            scopes: self
                .scopes
                .unwrap_or_else(|| vec![DRIVE_APP_DATA_SCOPE.to_string()]),
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            http_client: self.http_client,
        };

        config.validate()?;
        Ok(config)
    }
}
