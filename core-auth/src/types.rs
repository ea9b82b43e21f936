use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a single sign-in attempt, used to correlate log lines.
///
/// # Examples
///
/// ```
/// use core_auth::AttemptId;
///
/// let a = AttemptId::new();
/// let b = AttemptId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptId(Uuid);

impl AttemptId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AttemptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The signed-in user, as reported to every caller of a successful attempt.
///
/// # Examples
///
/// ```
/// use core_auth::Account;
///
/// let account = Account::new("Riley", "riley@example.com");
/// assert_eq!(account.display_name, "Riley");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    pub display_name: String,
    pub email: String,
}

impl Account {
    pub fn new(display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            email: email.into(),
        }
    }
}

/// Bearer credential obtained from a successful sign-in.
///
/// # Security
///
/// The `Debug` implementation redacts the token. Never log `access_token`.
///
/// # Examples
///
/// ```
/// use core_auth::Credential;
/// use chrono::{Duration, Utc};
///
/// let credential = Credential::new("ya29.a0...").with_expiry(Utc::now() + Duration::hours(1));
/// assert!(!credential.is_expired_at(Utc::now()));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// The access token sent as `Authorization: Bearer`
    pub access_token: String,
    /// When the access token expires (UTC); `None` if the provider did not say
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: None,
        }
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Whether the credential is expired at `now`.
    ///
    /// A credential without an expiry never expires locally; the server
    /// answers 401 instead.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    /// Time left before expiry, `None` when already expired or unknown.
    pub fn time_until_expiry(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at
            .filter(|expires_at| now < *expires_at)
            .map(|expires_at| expires_at - now)
    }
}

// Custom Debug implementation to avoid logging tokens
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// How a sign-in attempt was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignInMode {
    /// Presents provider UI.
    Interactive,
    /// Restores the previous session without UI.
    Silent,
}

impl SignInMode {
    pub fn is_interactive(&self) -> bool {
        matches!(self, SignInMode::Interactive)
    }
}

/// Coordinator state machine.
///
/// ```text
/// Idle -> SigningIn(mode) -> Idle
/// ```
///
/// Only one attempt is in flight at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SignInPhase {
    #[default]
    Idle,
    SigningIn(SignInMode),
}

impl SignInPhase {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, SignInPhase::SigningIn(_))
    }
}

impl fmt::Display for SignInPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignInPhase::Idle => write!(f, "Idle"),
            SignInPhase::SigningIn(SignInMode::Interactive) => write!(f, "Signing In..."),
            SignInPhase::SigningIn(SignInMode::Silent) => write!(f, "Restoring Session..."),
        }
    }
}
