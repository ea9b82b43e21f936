//! # Authentication Module
//!
//! Single-flight sign-in coordination and provider error normalization.
//!
//! ## Overview
//!
//! This crate authenticates a user against a cloud-storage identity provider
//! and turns every failure the provider can produce into a small, closed error
//! taxonomy, so sync code never needs provider-specific knowledge.
//!
//! ## Features
//!
//! - Coalescing of concurrent interactive and silent sign-in requests
//! - Exactly-once delivery of the shared outcome to every waiter
//! - Translation of identity SDK and REST/HTTP errors into domain errors
//! - Auth state event emission through the core event bus

pub mod coordinator;
pub mod error;
pub mod provider;
pub mod translator;
pub mod types;

pub use coordinator::{AuthCoordinator, AuthOutcome};
pub use error::{
    AuthenticationError, DeauthenticationError, DomainError, ErrorCause, GeneralError, Result,
    ServiceError,
};
pub use provider::{
    IdentityProvider, PresentationContext, ProviderUser, SignInConfig, StorageAuthorizer,
    UserProfile,
};
pub use translator::{ErrorDomain, ErrorTranslator, ProviderError, SignInErrorCode};
pub use types::{Account, AttemptId, Credential, SignInMode, SignInPhase};
