//! Error types for Google Drive provider

use bridge_traits::error::BridgeError;
use core_auth::{DomainError, ErrorTranslator, ProviderError};
use thiserror::Error;

use crate::types::DriveErrorResponse;

/// Raw Google Drive failures, before translation.
#[derive(Error, Debug)]
pub enum GoogleDriveError {
    /// The API answered with a structured error object
    #[error("Google Drive API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Non-2xx status without a parseable error body
    #[error("HTTP error (status {status_code})")]
    HttpStatus { status_code: u16 },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Bridge error
    #[error(transparent)]
    BridgeError(#[from] BridgeError),
}

impl GoogleDriveError {
    /// Classifies a non-2xx response by whether its body is a Google error object.
    pub fn from_response(status_code: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<DriveErrorResponse>(body) {
            Ok(response) => GoogleDriveError::ApiError {
                status_code,
                message: response.error.message,
            },
            Err(_) => GoogleDriveError::HttpStatus { status_code },
        }
    }

    /// Tags the error with its origin domain for translation.
    pub fn to_provider_error(&self) -> ProviderError {
        match self {
            GoogleDriveError::ApiError {
                status_code,
                message,
            } => ProviderError::rest_api(*status_code, message.clone()),
            GoogleDriveError::HttpStatus { status_code } => {
                ProviderError::http(*status_code, self.to_string())
            }
            GoogleDriveError::ParseError(_) | GoogleDriveError::BridgeError(_) => {
                ProviderError::transport(self.to_string())
            }
        }
    }
}

impl From<GoogleDriveError> for DomainError {
    fn from(error: GoogleDriveError) -> Self {
        ErrorTranslator::translate(&error.to_provider_error())
    }
}

/// Result type for Google Drive operations
pub type Result<T> = std::result::Result<T, DomainError>;
