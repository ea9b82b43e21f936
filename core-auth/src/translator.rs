//! # Error Translation
//!
//! Maps provider-specific failures onto the closed taxonomy in
//! [`crate::error`].
//!
//! ## Translation table
//!
//! | domain | code | result |
//! |---|---|---|
//! | identity SDK | canceled (`-5`) | `AuthenticationError::Cancelled` |
//! | identity SDK | has no auth in keychain (`-4`) | `AuthenticationError::NoSavedCredentials` |
//! | identity SDK | anything else | `ServiceError::Unknown(cause)` |
//! | REST API / HTTP status | 400, 401 | `AuthenticationError::TokenExpired` |
//! | REST API / HTTP status | 403 | `ServiceError::RateLimitExceeded` |
//! | REST API / HTTP status | 404 | `ServiceError::ItemNotFound` |
//! | REST API / HTTP status | anything else | `ServiceError::Unknown(cause)` |
//! | any other domain | any | `ServiceError::Unknown(cause)` |
//!
//! `ServiceError::Unknown(cause)` becomes `AuthenticationError::Other(cause)`
//! when it is reported to an authentication caller.

use crate::error::{AuthenticationError, DomainError, ErrorCause, ServiceError};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;
use tracing::{debug, error};

/// Origin of a raw provider error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorDomain {
    /// The platform identity / sign-in SDK.
    IdentitySdk,
    /// Structured error objects returned by the REST API.
    RestApi,
    /// Bare HTTP status codes.
    HttpStatus,
    /// The request never produced a response.
    Transport,
    /// Anything the translator has no table for.
    Other(String),
}

impl fmt::Display for ErrorDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorDomain::IdentitySdk => write!(f, "identity-sdk"),
            ErrorDomain::RestApi => write!(f, "rest-api"),
            ErrorDomain::HttpStatus => write!(f, "http-status"),
            ErrorDomain::Transport => write!(f, "transport"),
            ErrorDomain::Other(name) => write!(f, "{}", name),
        }
    }
}

/// A tagged provider error: origin domain plus numeric code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{domain} error {code}: {message}")]
pub struct ProviderError {
    pub domain: ErrorDomain,
    pub code: i64,
    pub message: String,
}

impl ProviderError {
    pub fn new(domain: ErrorDomain, code: i64, message: impl Into<String>) -> Self {
        Self {
            domain,
            code,
            message: message.into(),
        }
    }

    /// Error reported by the sign-in SDK.
    pub fn sign_in(code: SignInErrorCode, message: impl Into<String>) -> Self {
        Self::new(ErrorDomain::IdentitySdk, code.code(), message)
    }

    /// Error object returned by the REST API.
    pub fn rest_api(status: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorDomain::RestApi, i64::from(status), message)
    }

    /// Non-success HTTP status without a structured body.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorDomain::HttpStatus, i64::from(status), message)
    }

    /// Network-level failure; code is always 0.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorDomain::Transport, 0, message)
    }
}

/// Google Sign-In SDK error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignInErrorCode {
    Unknown,
    Keychain,
    HasNoAuthInKeychain,
    Canceled,
    Emm,
    ScopesAlreadyGranted,
    MismatchWithCurrentUser,
}

impl SignInErrorCode {
    pub fn code(self) -> i64 {
        match self {
            SignInErrorCode::Unknown => -1,
            SignInErrorCode::Keychain => -2,
            SignInErrorCode::HasNoAuthInKeychain => -4,
            SignInErrorCode::Canceled => -5,
            SignInErrorCode::Emm => -6,
            SignInErrorCode::ScopesAlreadyGranted => -8,
            SignInErrorCode::MismatchWithCurrentUser => -9,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(SignInErrorCode::Unknown),
            -2 => Some(SignInErrorCode::Keychain),
            -4 => Some(SignInErrorCode::HasNoAuthInKeychain),
            -5 => Some(SignInErrorCode::Canceled),
            -6 => Some(SignInErrorCode::Emm),
            -8 => Some(SignInErrorCode::ScopesAlreadyGranted),
            -9 => Some(SignInErrorCode::MismatchWithCurrentUser),
            _ => None,
        }
    }
}

/// Stateless provider-to-taxonomy mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorTranslator;

impl ErrorTranslator {
    /// Translates a raw provider error. Never fails.
    pub fn translate(error: &ProviderError) -> DomainError {
        let translated: DomainError = match error.domain {
            ErrorDomain::IdentitySdk => match SignInErrorCode::from_code(error.code) {
                Some(SignInErrorCode::Canceled) => AuthenticationError::Cancelled.into(),
                Some(SignInErrorCode::HasNoAuthInKeychain) => {
                    AuthenticationError::NoSavedCredentials.into()
                }
                _ => ServiceError::Unknown(ErrorCause::new(error.clone())).into(),
            },
            ErrorDomain::RestApi | ErrorDomain::HttpStatus => match error.code {
                400 | 401 => AuthenticationError::TokenExpired.into(),
                403 => ServiceError::RateLimitExceeded.into(),
                404 => ServiceError::ItemNotFound.into(),
                _ => ServiceError::Unknown(ErrorCause::new(error.clone())).into(),
            },
            ErrorDomain::Transport | ErrorDomain::Other(_) => {
                ServiceError::Unknown(ErrorCause::new(error.clone())).into()
            }
        };

        debug!(
            domain = %error.domain,
            code = error.code,
            translated = %translated,
            "Translated provider error"
        );
        translated
    }

    /// Translates a raw provider error for an authentication caller.
    pub fn translate_authentication(error: &ProviderError) -> AuthenticationError {
        Self::translate(error).into()
    }

    /// Top-level result processor.
    ///
    /// Provider errors are translated and taxonomy errors pass through. Any
    /// other error type is a defect in the caller: debug builds panic on it,
    /// release builds degrade it to `ServiceError::Unknown`.
    pub fn process<T>(
        result: Result<T, Box<dyn StdError + Send + Sync>>,
    ) -> Result<T, DomainError> {
        let err = match result {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        let err = match err.downcast::<ProviderError>() {
            Ok(provider_error) => return Err(Self::translate(&provider_error)),
            Err(err) => err,
        };
        let err = match err.downcast::<DomainError>() {
            Ok(domain_error) => return Err(*domain_error),
            Err(err) => err,
        };
        let err = match err.downcast::<AuthenticationError>() {
            Ok(auth_error) => return Err(DomainError::Authentication(*auth_error)),
            Err(err) => err,
        };
        let err = match err.downcast::<ServiceError>() {
            Ok(service_error) => return Err(DomainError::Service(*service_error)),
            Err(err) => err,
        };

        error!(error = %err, "Untranslated error reached the result processor");
        debug_assert!(
            false,
            "untranslated error reached the result processor: {}",
            err
        );
        Err(ServiceError::Unknown(ErrorCause::from_boxed(err)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed<E: StdError + Send + Sync + 'static>(e: E) -> Box<dyn StdError + Send + Sync> {
        Box::new(e)
    }

    #[test]
    fn test_sign_in_cancelled() {
        let err = ProviderError::sign_in(SignInErrorCode::Canceled, "The user canceled");
        assert_eq!(
            ErrorTranslator::translate(&err),
            DomainError::Authentication(AuthenticationError::Cancelled)
        );
    }

    #[test]
    fn test_sign_in_no_saved_credentials() {
        let err = ProviderError::new(ErrorDomain::IdentitySdk, -4, "No auth in keychain");
        assert_eq!(
            ErrorTranslator::translate_authentication(&err),
            AuthenticationError::NoSavedCredentials
        );
    }

    #[test]
    fn test_sign_in_other_codes_preserve_cause() {
        for code in [SignInErrorCode::Keychain, SignInErrorCode::Emm] {
            let err = ProviderError::sign_in(code, "keychain failure");
            match ErrorTranslator::translate_authentication(&err) {
                AuthenticationError::Other(cause) => {
                    assert_eq!(cause.downcast_ref::<ProviderError>(), Some(&err));
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_rest_api_statuses() {
        let cases = [
            (400, "TokenExpired"),
            (401, "TokenExpired"),
            (403, "RateLimitExceeded"),
            (404, "ItemNotFound"),
        ];

        for (status, expected) in cases {
            let translated = ErrorTranslator::translate(&ProviderError::rest_api(status, "x"));
            let actual = match translated {
                DomainError::Authentication(AuthenticationError::TokenExpired) => "TokenExpired",
                DomainError::Service(ServiceError::RateLimitExceeded) => "RateLimitExceeded",
                DomainError::Service(ServiceError::ItemNotFound) => "ItemNotFound",
                _ => "unexpected",
            };
            assert_eq!(actual, expected, "status {status}");
        }
    }

    #[test]
    fn test_http_status_domain_matches_rest_api() {
        let translated = ErrorTranslator::translate(&ProviderError::http(401, "Unauthorized"));
        assert!(translated.requires_reauthentication());
    }

    #[test]
    fn test_server_error_is_unknown() {
        let err = ProviderError::rest_api(500, "Backend error");
        match ErrorTranslator::translate(&err) {
            DomainError::Service(ServiceError::Unknown(cause)) => {
                assert_eq!(cause.downcast_ref::<ProviderError>(), Some(&err));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            ErrorTranslator::translate_authentication(&err),
            AuthenticationError::Other(_)
        ));
    }

    #[test]
    fn test_unmapped_domain_falls_through() {
        let err = ProviderError::new(ErrorDomain::Other("com.example".into()), 404, "nope");
        assert!(matches!(
            ErrorTranslator::translate(&err),
            DomainError::Service(ServiceError::Unknown(_))
        ));
        assert!(matches!(
            ErrorTranslator::translate(&ProviderError::transport("offline")),
            DomainError::Service(ServiceError::Unknown(_))
        ));
    }

    #[test]
    fn test_sign_in_code_table() {
        for code in [
            SignInErrorCode::Unknown,
            SignInErrorCode::Keychain,
            SignInErrorCode::HasNoAuthInKeychain,
            SignInErrorCode::Canceled,
            SignInErrorCode::Emm,
            SignInErrorCode::ScopesAlreadyGranted,
            SignInErrorCode::MismatchWithCurrentUser,
        ] {
            assert_eq!(SignInErrorCode::from_code(code.code()), Some(code));
        }
        assert_eq!(SignInErrorCode::from_code(-3), None);
    }

    #[test]
    fn test_process_success() {
        let result: Result<u8, Box<dyn StdError + Send + Sync>> = Ok(7);
        assert_eq!(ErrorTranslator::process(result).unwrap(), 7);
    }

    #[test]
    fn test_process_translates_provider_errors() {
        let result: Result<(), _> = Err(boxed(ProviderError::rest_api(403, "quota")));
        assert!(ErrorTranslator::process(result).unwrap_err().should_back_off());
    }

    #[test]
    fn test_process_passes_taxonomy_through() {
        let result: Result<(), _> = Err(boxed(AuthenticationError::InvalidClientId));
        assert_eq!(
            ErrorTranslator::process(result).unwrap_err(),
            DomainError::Authentication(AuthenticationError::InvalidClientId)
        );

        let result: Result<(), _> = Err(boxed(ServiceError::ItemNotFound));
        assert_eq!(
            ErrorTranslator::process(result).unwrap_err(),
            DomainError::Service(ServiceError::ItemNotFound)
        );

        let result: Result<(), _> =
            Err(boxed(DomainError::from(AuthenticationError::Cancelled)));
        assert!(ErrorTranslator::process(result).unwrap_err().is_cancellation());
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "untranslated error")]
    fn test_process_flags_foreign_errors_in_debug() {
        let result: Result<(), _> = Err(boxed(std::io::Error::other("socket closed")));
        let _ = ErrorTranslator::process(result);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn test_process_degrades_foreign_errors_in_release() {
        let result: Result<(), _> = Err(boxed(std::io::Error::other("socket closed")));
        assert!(matches!(
            ErrorTranslator::process(result),
            Err(DomainError::Service(ServiceError::Unknown(_)))
        ));
    }
}
