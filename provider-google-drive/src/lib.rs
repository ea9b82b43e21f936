//! # Google Drive Provider
//!
//! Google Drive binding of the authentication core.
//!
//! ## Overview
//!
//! This module provides:
//! - `DriveService`, the composed service a sync framework holds
//! - A bearer-token authorizer fed by successful sign-ins
//! - An authorized REST client whose failures surface as domain errors
//! - Drive identifiers and the Google Sign-In error code table

pub mod authorizer;
pub mod client;
pub mod constants;
pub mod error;
pub mod service;
pub mod types;

pub use authorizer::DriveAuthorizer;
pub use client::DriveApiClient;
pub use constants::{APP_DATA_FOLDER, APP_DATA_SCOPE, FILE_QUERY_FIELDS, SignInErrorCode};
pub use error::{GoogleDriveError, Result};
pub use service::DriveService;
