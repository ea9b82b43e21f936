//! Google Drive API error response types
//!
//! See: https://developers.google.com/drive/api/guides/handle-errors

use serde::{Deserialize, Serialize};

/// Error envelope returned by Google APIs on non-2xx responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveErrorResponse {
    pub error: DriveErrorObject,
}

/// Structured error object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveErrorObject {
    /// HTTP status code, repeated in the body
    pub code: u16,

    /// Human-readable message
    pub message: String,

    /// Individual error details
    #[serde(default)]
    pub errors: Vec<DriveErrorDetail>,
}

/// One entry of `error.errors`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveErrorDetail {
    /// Error domain, e.g. `usageLimits`
    #[serde(default)]
    pub domain: Option<String>,

    /// Machine-readable reason, e.g. `rateLimitExceeded`
    #[serde(default)]
    pub reason: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}
