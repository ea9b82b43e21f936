//! Closed error taxonomy surfaced to callers of the authentication core.
//!
//! Provider errors never escape the crate boundary as-is: they are translated
//! into one of the enums below by [`ErrorTranslator`](crate::ErrorTranslator).

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Opaque, cheaply clonable underlying cause.
///
/// Two causes compare equal only when they are clones of the same underlying
/// error, which is what every waiter of a coalesced sign-in receives.
#[derive(Clone)]
pub struct ErrorCause(Arc<dyn StdError + Send + Sync>);

impl ErrorCause {
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self(Arc::new(error))
    }

    pub fn from_boxed(error: Box<dyn StdError + Send + Sync>) -> Self {
        Self(Arc::from(error))
    }

    /// The generic "something went wrong" cause.
    pub fn unknown() -> Self {
        Self::new(GeneralError::Unknown)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.downcast_ref::<GeneralError>(), Some(GeneralError::Unknown))
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }
}

impl fmt::Debug for ErrorCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for ErrorCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl PartialEq for ErrorCause {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Provider-independent fallback errors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneralError {
    #[error("An unknown error occurred")]
    Unknown,
}

/// Errors produced while signing in.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthenticationError {
    #[error("Invalid client ID")]
    InvalidClientId,

    #[error("Authentication was cancelled")]
    Cancelled,

    #[error("No saved credentials")]
    NoSavedCredentials,

    #[error("Authentication token expired")]
    TokenExpired,

    #[error("{0}")]
    Other(ErrorCause),
}

impl AuthenticationError {
    /// `Other(Unknown)`, used when the provider reports success without data.
    pub fn unknown() -> Self {
        AuthenticationError::Other(ErrorCause::unknown())
    }

    /// Whether retrying without user intervention can reasonably succeed.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AuthenticationError::InvalidClientId)
    }
}

/// Errors produced by storage operations on the authorized service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Item does not exist")]
    ItemNotFound,

    #[error("{0}")]
    Unknown(ErrorCause),
}

/// Union of every taxonomy error, the output of translation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl DomainError {
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            DomainError::Authentication(AuthenticationError::Cancelled)
        )
    }

    /// The caller should run `authenticate` again before retrying.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            DomainError::Authentication(
                AuthenticationError::TokenExpired | AuthenticationError::NoSavedCredentials
            )
        )
    }

    /// The caller should wait before issuing more requests.
    pub fn should_back_off(&self) -> bool {
        matches!(self, DomainError::Service(ServiceError::RateLimitExceeded))
    }
}

impl From<DomainError> for AuthenticationError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::Authentication(e) => e,
            DomainError::Service(ServiceError::Unknown(cause)) => AuthenticationError::Other(cause),
            DomainError::Service(e) => AuthenticationError::Other(ErrorCause::new(e)),
        }
    }
}

/// Signing out cannot fail; this type has no values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeauthenticationError {}

impl fmt::Display for DeauthenticationError {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl StdError for DeauthenticationError {}

pub type Result<T> = std::result::Result<T, AuthenticationError>;
