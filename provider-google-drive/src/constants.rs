//! Google Drive identifiers and API constants

/// Reverse-DNS identifier of the Drive service
pub const SERVICE_IDENTIFIER: &str = "com.harmony.drive";

/// User-facing service name
pub const LOCALIZED_NAME: &str = "Google Drive";

/// Google Drive API base URL
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Alias of the application-private folder
pub const APP_DATA_FOLDER: &str = "appDataFolder";

/// Fields to request for file resources
pub const FILE_QUERY_FIELDS: &str =
    "id, mimeType, name, headRevisionId, modifiedTime, appProperties, size";

pub use core_runtime::config::DRIVE_APP_DATA_SCOPE as APP_DATA_SCOPE;

/// Google Sign-In error codes, re-exported for hosts that bridge the SDK.
pub use core_auth::SignInErrorCode;
