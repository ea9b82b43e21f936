//! Errors raised while wiring the authentication core together.
//!
//! These never reach sign-in callers directly; the coordinator wraps them in
//! `AuthenticationError::Other` when one aborts an attempt.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A setting failed validation or the logging stack rejected it.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The host did not provide a bridge the requested operation needs.
    #[error("Host did not provide {capability}: {message}")]
    CapabilityMissing { capability: String, message: String },

    /// No Tokio runtime was reachable to drive a sign-in attempt.
    #[error("No async runtime available: {0}")]
    RuntimeUnavailable(String),

    /// A background task died before producing a result.
    #[error("Internal failure: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
